use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::camera::{Camera, Movement};

/// Held keys and the camera movement they drive.
const MOVEMENT_KEYS: [(KeyCode, Movement); 6] = [
    (KeyCode::KeyW, Movement::Forward),
    (KeyCode::KeyS, Movement::Backward),
    (KeyCode::KeyA, Movement::Left),
    (KeyCode::KeyD, Movement::Right),
    (KeyCode::KeyQ, Movement::Down),
    (KeyCode::KeyE, Movement::Up),
];

const PROJECTION_KEY: KeyCode = KeyCode::KeyP;
const EXIT_KEY: KeyCode = KeyCode::Escape;

/// Collects window events between frames and applies them to a [`Camera`].
///
/// Held movement keys move the camera every frame. P toggles the projection once per press,
/// however long it is held. The first cursor position only seeds the tracker so the view does not
/// jump when the cursor enters the window.
#[derive(Debug, Default)]
pub struct InputHandler {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    last_cursor: Option<Vec2>,
    look_delta: Vec2,
    scroll_delta: f32,
    exit_requested: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
                if key == EXIT_KEY {
                    self.exit_requested = true;
                }
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
            }
        }
    }

    fn handle_cursor(&mut self, position: Vec2) {
        if let Some(last) = self.last_cursor {
            // screen y grows downward, pitch grows upward
            self.look_delta += Vec2::new(position.x - last.x, last.y - position.y);
        }
        self.last_cursor = Some(position);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Applies everything gathered since the last call to `camera` and starts a new frame.
    pub fn apply(&mut self, camera: &mut Camera, dt: f32) {
        for (key, movement) in MOVEMENT_KEYS {
            if self.keys_down.contains(&key) {
                camera.process_keyboard(movement, dt);
            }
        }

        if self.keys_pressed.contains(&PROJECTION_KEY) {
            camera.toggle_projection();
        }

        if self.look_delta != Vec2::ZERO {
            camera.process_mouse_movement(self.look_delta.x, self.look_delta.y);
        }
        if self.scroll_delta != 0.0 {
            camera.process_mouse_scroll(self.scroll_delta);
        }

        self.keys_pressed.clear();
        self.look_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    #[test]
    fn held_keys_move_every_frame() {
        let mut input = InputHandler::new();
        let mut camera = Camera::new().with_speed(50.0);
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);

        input.apply(&mut camera, 0.1);
        input.apply(&mut camera, 0.1);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-4));

        input.handle_key(KeyCode::KeyW, ElementState::Released);
        input.apply(&mut camera, 0.1);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-4));
    }

    #[test]
    fn q_and_e_move_down_and_up() {
        let mut input = InputHandler::new();
        let mut camera = Camera::new().with_speed(1.0);
        input.handle_key(KeyCode::KeyE, ElementState::Pressed);
        input.apply(&mut camera, 2.0);
        assert_abs_diff_eq!(camera.position.y, 2.0, epsilon = 1e-5);

        input.handle_key(KeyCode::KeyE, ElementState::Released);
        input.handle_key(KeyCode::KeyQ, ElementState::Pressed);
        input.apply(&mut camera, 3.0);
        assert_abs_diff_eq!(camera.position.y, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn projection_toggles_once_per_press() {
        let mut input = InputHandler::new();
        let mut camera = Camera::new();

        input.handle_key(PROJECTION_KEY, ElementState::Pressed);
        input.apply(&mut camera, 0.016);
        // key repeat while held
        input.handle_key(PROJECTION_KEY, ElementState::Pressed);
        input.apply(&mut camera, 0.016);
        assert_eq!(camera.projection, Projection::Orthographic);

        input.handle_key(PROJECTION_KEY, ElementState::Released);
        input.handle_key(PROJECTION_KEY, ElementState::Pressed);
        input.apply(&mut camera, 0.016);
        assert_eq!(camera.projection, Projection::Perspective);
    }

    #[test]
    fn first_cursor_position_only_seeds() {
        let mut input = InputHandler::new();
        let mut camera = Camera::new();

        input.handle_cursor(Vec2::new(500.0, 300.0));
        input.apply(&mut camera, 0.016);
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);

        // right and up
        input.handle_cursor(Vec2::new(510.0, 280.0));
        input.apply(&mut camera, 0.016);
        assert_abs_diff_eq!(camera.yaw, -89.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.pitch, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn scroll_zooms_in() {
        let mut input = InputHandler::new();
        let mut camera = Camera::new();
        input.scroll_delta += 3.0;
        input.apply(&mut camera, 0.016);
        assert_eq!(camera.zoom, 42.0);
    }

    #[test]
    fn escape_requests_exit() {
        let mut input = InputHandler::new();
        assert!(!input.exit_requested());
        input.handle_key(KeyCode::Escape, ElementState::Pressed);
        assert!(input.exit_requested());
    }
}
