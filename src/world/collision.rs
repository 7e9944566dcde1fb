use crate::config::SimSettings;
use super::transform::Transform;

/// Contact tests use planar (x, y) distance; z is ignored.
fn planar_distance(a: &Transform, b: &Transform) -> f32 {
    let dx = b.position.x - a.position.x;
    let dy = b.position.y - a.position.y;
    (dx * dx + dy * dy).sqrt()
}

/// Dozer pushing a ball. Contact within twice the collision radius copies
/// the dozer's speed onto the ball and kicks the ball's velocity along the
/// separation vector. The separation vector is scaled by its own magnitude
/// rather than normalized, so the kick grows quadratically with distance;
/// `push_scale` tunes the response.
pub fn dozer_collision(dozer: &Transform, ball: &mut Transform, settings: &SimSettings) -> bool {
    if planar_distance(dozer, ball) > 2.0 * settings.collision_radius {
        return false;
    }
    let a_to_b = ball.position - dozer.position;
    let scaled = a_to_b.length() * a_to_b;
    ball.speed = dozer.speed;
    ball.velocity += settings.push_scale * dozer.speed * scaled;
    true
}

/// One-directional speed transfer between two balls in contact: the second
/// ball takes the first ball's speed, then the first ball stops. The
/// receiver's velocity direction is left unchanged.
pub fn sphere_collision(first: &mut Transform, second: &mut Transform, settings: &SimSettings) -> bool {
    if planar_distance(first, second) > 2.0 * settings.collision_radius {
        return false;
    }
    second.speed = first.speed;
    first.speed = 0.0;
    true
}

/// True when the ball is inside the goal's trigger ring.
pub fn goal_collision(goal: &Transform, ball: &Transform, settings: &SimSettings) -> bool {
    planar_distance(goal, ball) <= settings.collision_radius + settings.score_collision_radius
}

/// Reflect the velocity of an object that has strayed past the arena
/// limits. Only the velocity sign flips; the position is never clamped, so
/// an object already outside keeps moving until the redirected velocity
/// carries it back in.
pub fn border_collision(object: &mut Transform, settings: &SimSettings) {
    if object.position.x > settings.arena_half_x {
        object.velocity.x = -object.velocity.x.abs();
    }
    if object.position.x < -settings.arena_half_x {
        object.velocity.x = object.velocity.x.abs();
    }
    if object.position.y > settings.arena_half_y {
        object.velocity.y = -object.velocity.y.abs();
    }
    if object.position.y < -settings.arena_half_y {
        object.velocity.y = object.velocity.y.abs();
    }
}
