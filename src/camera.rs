//! A yaw/pitch first-person camera with switchable projection.
//!
//! Angles are in degrees. A yaw of -90 looks down -Z; positive pitch looks up. Movement is
//! along the camera's own axes, so moving "up" follows the tilted view.

use glam::{Mat4, Vec3};

/// Directions accepted by [`Camera::process_keyboard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// First-person camera.
///
/// # Default Values
///
/// | Field         | Default |
/// |---------------|---------|
/// | `yaw`         | -90     |
/// | `pitch`       | 0       |
/// | `speed`       | 2.5     |
/// | `sensitivity` | 0.1     |
/// | `zoom`        | 45      |
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub projection: Projection,
    world_up: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            yaw: Self::DEFAULT_YAW,
            pitch: 0.0,
            speed: 2.5,
            sensitivity: 0.1,
            zoom: Self::MAX_ZOOM,
            projection: Projection::Perspective,
            world_up: Vec3::Y,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_vectors();
        camera
    }
}

impl Camera {
    pub const DEFAULT_YAW: f32 = -90.0;
    pub const PITCH_LIMIT: f32 = 89.0;
    pub const MIN_ZOOM: f32 = 1.0;
    pub const MAX_ZOOM: f32 = 45.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 300.0;
    /// Half extent of the orthographic view volume on both axes.
    pub const ORTHO_EXTENT: f32 = 50.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Sets yaw and pitch in degrees. Pitch is clamped to ±89.
    pub fn looking(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.update_vectors();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Projection for the current mode, with wgpu's `[0, 1]` depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.zoom.to_radians(), aspect, Self::NEAR, Self::FAR)
            }
            Projection::Orthographic => {
                let e = Self::ORTHO_EXTENT;
                Mat4::orthographic_rh(-e, e, -e, e, Self::NEAR, Self::FAR)
            }
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn process_keyboard(&mut self, direction: Movement, dt: f32) {
        let velocity = self.speed * dt;
        let offset = match direction {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Left => -self.right,
            Movement::Right => self.right,
            Movement::Up => self.up,
            Movement::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// Turns the camera by a mouse offset in pixels. `dy` is positive when the mouse moves up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    pub fn toggle_projection(&mut self) {
        self.projection = match self.projection {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        };
        log::info!("projection: {:?}", self.projection);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = Camera::new();
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse_movement(0.0, -10_000.0);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new();
        camera.process_mouse_scroll(-5.0);
        assert_eq!(camera.zoom, 45.0);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn keyboard_moves_along_camera_axes() {
        let mut camera = Camera::new().with_speed(10.0);
        camera.process_keyboard(Movement::Forward, 0.5);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));

        camera.process_keyboard(Movement::Right, 0.1);
        camera.process_keyboard(Movement::Up, 0.1);
        assert!(camera.position.abs_diff_eq(Vec3::new(1.0, 1.0, -5.0), 1e-5));
    }

    #[test]
    fn looking_down_at_the_desk() {
        let camera = Camera::new().at(0.0, 70.0, 70.0).looking(-90.0, -45.0);
        let front = camera.front();
        assert_abs_diff_eq!(front.y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_abs_diff_eq!(front.z, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);

        // the origin is straight ahead and lands at the center of the screen
        let clip = camera.view_projection(1.0).project_point3(Vec3::ZERO);
        assert_abs_diff_eq!(clip.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(clip.y, 0.0, epsilon = 1e-3);
        assert!((0.0..1.0).contains(&clip.z));
    }

    #[test]
    fn projection_toggles() {
        let mut camera = Camera::new();
        let perspective = camera.projection_matrix(1.5);
        camera.toggle_projection();
        assert_eq!(camera.projection, Projection::Orthographic);
        assert_ne!(camera.projection_matrix(1.5), perspective);
        camera.toggle_projection();
        assert_eq!(camera.projection, Projection::Perspective);
    }
}
