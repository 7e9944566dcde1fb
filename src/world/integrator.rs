use std::f32::consts::PI;

use glam::Vec3;

use crate::config::SimSettings;
use super::controls::DozerControls;
use super::transform::{axis_angle_rotation, Transform};

/// Below this, a ball's speed snaps to exactly zero.
pub const STOP_EPSILON: f32 = 1e-6;
/// Height margin above the contact radius that still counts as airborne.
const GROUND_MARGIN: f32 = 0.001;
/// Upward correction applied to a rolling ball in ground contact.
const GROUND_NUDGE: f32 = 0.0001;
/// Minimum speed for the ground nudge to apply.
const MIN_ROLL_SPEED: f32 = 0.001;

/// Apply one frame of drive input to a dozer. Active flags each force the
/// signed speed (last flag wins) and contribute a heading delta (summed).
/// With no flags held the dozer stops instantly.
pub fn drive_dozer(dozer: &mut Transform, controls: &mut DozerControls, settings: &SimSettings) {
    let mut any_active = false;
    if controls.flags[0] {
        dozer.speed = settings.drive_speed;
        controls.heading += settings.turn_step;
        any_active = true;
    }
    if controls.flags[1] {
        dozer.speed = -settings.drive_speed;
        controls.heading -= settings.turn_step;
        any_active = true;
    }
    if controls.flags[2] {
        dozer.speed = settings.drive_speed;
        controls.heading -= settings.turn_step;
        any_active = true;
    }
    if controls.flags[3] {
        dozer.speed = -settings.drive_speed;
        controls.heading += settings.turn_step;
        any_active = true;
    }
    if !any_active {
        dozer.speed = 0.0;
    }

    // one unit of heading is half a turn
    let ang = controls.heading * PI;
    dozer.velocity = Vec3::new(ang.cos(), ang.sin(), 0.0);
    dozer.rotation = axis_angle_rotation(
        Vec3::new(0.0, 0.0, ang.sin() + ang.cos()),
        (ang * dozer.speed).sin(),
    );
    dozer.position += dozer.speed * dozer.velocity;
}

/// Advance one ball by one frame: displace along velocity, decay speed,
/// roll the rotation, then apply gravity or the ground nudge.
pub fn step_ball(ball: &mut Transform, settings: &SimSettings) {
    ball.position += ball.speed * ball.velocity;

    if ball.speed <= STOP_EPSILON {
        ball.speed = 0.0;
    } else {
        ball.speed *= settings.friction;
        ball.rotation = axis_angle_rotation(ball.velocity, ball.speed);
    }

    if ball.position.z >= settings.collision_radius + GROUND_MARGIN {
        ball.position.z -= settings.gravity;
    } else if ball.speed >= MIN_ROLL_SPEED {
        ball.position.z += GROUND_NUDGE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(z: f32) -> Transform {
        Transform {
            position: Vec3::new(0.0, 0.0, z),
            ..Transform::default()
        }
    }

    #[test]
    fn test_gravity_exact_decrement() {
        let settings = SimSettings::default();
        let mut ball = ball_at(1.0);
        step_ball(&mut ball, &settings);
        assert_eq!(ball.position.z, 1.0 - settings.gravity);
        step_ball(&mut ball, &settings);
        assert_eq!(ball.position.z, 1.0 - settings.gravity - settings.gravity);
    }

    #[test]
    fn test_stopped_ball_stays_stopped() {
        let settings = SimSettings::default();
        let mut ball = ball_at(0.15);
        ball.speed = 1e-7;
        for _ in 0..10 {
            step_ball(&mut ball, &settings);
            assert_eq!(ball.speed, 0.0);
        }
    }

    #[test]
    fn test_friction_is_monotonic() {
        let settings = SimSettings::default();
        let mut ball = ball_at(0.15);
        ball.speed = 0.02;
        ball.velocity = Vec3::new(1.0, 0.0, 0.0);
        let mut previous = ball.speed;
        for _ in 0..5 {
            step_ball(&mut ball, &settings);
            if ball.speed == 0.0 {
                break;
            }
            assert!(ball.speed < previous);
            assert_eq!(ball.speed, previous * settings.friction);
            previous = ball.speed;
        }
    }

    #[test]
    fn test_ground_nudge_for_rolling_ball() {
        let settings = SimSettings::default();
        // in ground contact, fast enough to roll
        let mut ball = ball_at(0.15);
        ball.speed = 0.02;
        ball.velocity = Vec3::new(1.0, 0.0, 0.0);
        step_ball(&mut ball, &settings);
        assert_eq!(ball.position.z, 0.15 + 0.0001);
    }

    #[test]
    fn test_no_nudge_when_slow() {
        let settings = SimSettings::default();
        let mut ball = ball_at(0.15);
        ball.speed = 0.0005;
        ball.velocity = Vec3::new(1.0, 0.0, 0.0);
        step_ball(&mut ball, &settings);
        // friction ran but the ball is too slow for the nudge
        assert_eq!(ball.position.z, 0.15);
    }

    #[test]
    fn test_ball_rotation_stays_unit() {
        let settings = SimSettings::default();
        let mut ball = ball_at(0.15);
        ball.speed = 0.05;
        ball.velocity = Vec3::new(3.0, -1.0, 0.5);
        step_ball(&mut ball, &settings);
        assert!((ball.rotation.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dozer_stops_without_input() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        dozer.speed = 0.01;
        let mut controls = DozerControls::default();
        drive_dozer(&mut dozer, &mut controls, &settings);
        assert_eq!(dozer.speed, 0.0);
        assert_eq!(controls.heading, 0.0);
    }

    #[test]
    fn test_heading_accumulates() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        let mut controls = DozerControls {
            flags: [true, false, false, false],
            heading: 0.0,
        };
        for _ in 0..100 {
            drive_dozer(&mut dozer, &mut controls, &settings);
        }
        assert!((controls.heading - 1.0).abs() < 1e-4);
        // heading 1.0 is half a turn: facing is flipped to -x
        assert!((dozer.velocity.x + 1.0).abs() < 1e-3);
        assert!(dozer.velocity.y.abs() < 1e-2);
    }

    #[test]
    fn test_opposing_turn_flags_cancel_heading() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        let mut controls = DozerControls {
            flags: [true, false, true, false],
            heading: 0.0,
        };
        drive_dozer(&mut dozer, &mut controls, &settings);
        // flag 0 adds, flag 2 subtracts; speed stays forward
        assert_eq!(controls.heading, 0.0);
        assert_eq!(dozer.speed, settings.drive_speed);
    }

    #[test]
    fn test_last_speed_flag_wins() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        let mut controls = DozerControls {
            flags: [true, false, false, true],
            heading: 0.0,
        };
        drive_dozer(&mut dozer, &mut controls, &settings);
        // flag 3 applies after flag 0
        assert_eq!(dozer.speed, -settings.drive_speed);
    }

    #[test]
    fn test_dozer_rotation_stays_unit() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        let mut controls = DozerControls {
            flags: [true, false, false, false],
            heading: 0.0,
        };
        for _ in 0..50 {
            drive_dozer(&mut dozer, &mut controls, &settings);
            assert!((dozer.rotation.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_axis_tolerated() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        // near heading 0.75, ang approaches 3pi/4 where sin + cos cancels
        // and the rotation axis collapses; the rotation must stay unit
        let mut controls = DozerControls {
            flags: [true, false, false, false],
            heading: 0.75 - settings.turn_step,
        };
        drive_dozer(&mut dozer, &mut controls, &settings);
        assert!(dozer.rotation.is_finite());
        assert!((dozer.rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dozer_advances_along_heading() {
        let settings = SimSettings::default();
        let mut dozer = Transform::default();
        let mut controls = DozerControls {
            flags: [true, false, false, false],
            heading: 0.0,
        };
        drive_dozer(&mut dozer, &mut controls, &settings);
        let ang = controls.heading * PI;
        let expected = settings.drive_speed * Vec3::new(ang.cos(), ang.sin(), 0.0);
        assert!(dozer.position.abs_diff_eq(expected, 1e-6));
    }
}
