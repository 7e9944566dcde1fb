use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Drag sensitivity in orbit radians per normalized-device unit.
const DRAG_SCALE: f32 = -2.0;

/// Orbit camera: a position derived from radius/elevation/azimuth around a
/// target point, always looking at the target with world +z as up.
pub struct OrbitCamera {
    pub radius: f32,
    pub elevation: f32,
    pub azimuth: f32,
    pub target: Vec3,
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    position: Vec3,
    rotation: Quat,
}

impl OrbitCamera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            radius: 5.0,
            elevation: 1.57,
            azimuth: 1.57,
            target: Vec3::ZERO,
            fovy: 60.0_f32.to_radians(),
            aspect,
            znear: 0.01,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        };
        camera.update_transform();
        camera
    }

    /// Rebuild position and orientation from the orbit parameters.
    pub fn update_transform(&mut self) {
        self.position = self.target
            + self.radius
                * Vec3::new(
                    self.elevation.cos() * self.azimuth.cos(),
                    self.elevation.cos() * self.azimuth.sin(),
                    self.elevation.sin(),
                );

        let out = (self.position - self.target)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        let up = (Vec3::Z - Vec3::Z.dot(out) * out)
            .try_normalize()
            .unwrap_or(Vec3::Y);
        let right = up.cross(out);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, out));
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::from_rotation_translation(self.rotation, self.position).inverse();
        let proj = Mat4::perspective_infinite_rh(self.fovy, self.aspect, self.znear);
        proj * view
    }
}

/// Translates pointer events into orbit parameter changes: left-drag pans
/// elevation and azimuth. Deltas accumulate between frames and are applied
/// once per frame by `update_camera`.
pub struct CameraController {
    width: f32,
    height: f32,
    mouse_ndc: Vec2,
    dragging: bool,
    pending: Vec2,
}

impl CameraController {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            mouse_ndc: Vec2::ZERO,
            dragging: false,
            pending: Vec2::ZERO,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    /// Returns true when the event was consumed.
    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.set_dragging(*state == ElementState::Pressed);
                true
            }
            _ => false,
        }
    }

    fn cursor_moved(&mut self, x: f32, y: f32) {
        // pixel center to [-1, 1] with y up
        let ndc = Vec2::new(
            (x + 0.5) / self.width * 2.0 - 1.0,
            (y + 0.5) / self.height * -2.0 + 1.0,
        );
        if self.dragging {
            self.pending += ndc - self.mouse_ndc;
        }
        self.mouse_ndc = ndc;
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn update_camera(&mut self, camera: &mut OrbitCamera) {
        camera.elevation += DRAG_SCALE * self.pending.y;
        camera.azimuth += DRAG_SCALE * self.pending.x;
        self.pending = Vec2::ZERO;
        camera.update_transform();
    }
}
