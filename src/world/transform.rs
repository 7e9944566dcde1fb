use glam::{Mat4, Quat, Vec3};

/// Position, orientation and motion state for one object. Owned exclusively
/// by its object and mutated in place each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Must stay a unit quaternion after every mutation.
    pub rotation: Quat,
    pub scale: Vec3,
    /// Direction of travel; its magnitude matters for balls.
    pub velocity: Vec3,
    /// Signed scalar multiplied against velocity to displace per frame.
    pub speed: f32,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            velocity: Vec3::ZERO,
            speed: 0.0,
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

/// Axis-angle rotation that tolerates a non-unit axis: the angle is scaled
/// by the axis norm and the axis normalized, so the rotation rate stays
/// proportional to the axis magnitude while the result is always a unit
/// quaternion. A degenerate (zero-length) axis yields the identity.
pub fn axis_angle_rotation(axis: Vec3, angle: f32) -> Quat {
    match axis.try_normalize() {
        Some(unit) => Quat::from_axis_angle(unit, angle * axis.length()),
        None => Quat::IDENTITY,
    }
}
