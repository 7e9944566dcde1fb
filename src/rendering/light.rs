use glam::Vec3;

/// A single directional light; `direction` points from the scene toward
/// the light source.
pub struct Light {
    pub direction: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, 1.0, 10.0),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub to_light: [f32; 3],
    pub _padding: f32,
}

impl Light {
    pub fn to_uniform(&self) -> LightUniform {
        let direction = self.direction.try_normalize().unwrap_or(Vec3::Z);
        LightUniform {
            to_light: direction.to_array(),
            _padding: 0.0,
        }
    }
}
