use std::collections::HashSet;

use cgmath::{Vector3, Zero};

use crate::{
    config::CameraConfig,
    input::{CursorRequest, InputEvent, Key},
};

use super::orbit_camera::OrbitCamera;

/// Everything the rig needs from one frame of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// `(delta_azimuth, delta_polar)` in radians.
    pub orbit_delta: (f32, f32),
    /// Accumulated scroll, already signed for [`OrbitCamera::apply_zoom`].
    pub zoom_delta: f32,
    /// Camera-relative target displacement.
    pub displacement: Vector3<f32>,
    pub cursor: CursorRequest,
}

/// Input/movement resolver.
///
/// Keeps the per-frame input snapshot (cursor, previous cursor, primary
/// button, held keys, pending scroll) and turns it into orbit deltas and a
/// movement displacement once per frame.
pub struct CameraController {
    pub orbit_sensitivity: f32,
    pub movement_speed: f32,
    cursor: Option<(f64, f64)>,
    last_cursor: Option<(f64, f64)>,
    is_mouse_pressed: bool,
    held_keys: HashSet<Key>,
    pending_zoom: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            orbit_sensitivity: config.orbit_sensitivity,
            movement_speed: config.movement_speed,
            cursor: None,
            last_cursor: None,
            is_mouse_pressed: false,
            held_keys: HashSet::new(),
            pending_zoom: 0.0,
        }
    }

    /// Folds one event into the snapshot.
    ///
    /// Mode changes happen here: Escape toggles movement, a primary-button
    /// press always turns it back on. There is no click-based way to pause.
    pub fn process_event(&mut self, event: &InputEvent, camera: &mut OrbitCamera) {
        match *event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Some((x, y));
            }
            InputEvent::PrimaryButton { pressed } => {
                self.is_mouse_pressed = pressed;
                if pressed && !camera.movement_enabled() {
                    log::debug!("Movement resumed by click");
                    camera.set_movement_enabled(true);
                }
            }
            InputEvent::Scroll { lines } => {
                if camera.movement_enabled() {
                    // Scrolling up brings the camera closer.
                    self.pending_zoom -= lines;
                }
            }
            InputEvent::Key {
                key,
                pressed,
                repeat,
            } => {
                if pressed {
                    self.held_keys.insert(key);
                } else {
                    self.held_keys.remove(&key);
                }

                if key == Key::Escape && pressed && !repeat {
                    camera.toggle_movement();
                    log::debug!(
                        "Movement {}",
                        if camera.movement_enabled() { "enabled" } else { "paused" }
                    );
                }
            }
        }
    }

    /// Produces this frame's orbit delta, zoom and displacement.
    ///
    /// The previous cursor position is always advanced, so a drag that
    /// starts while paused does not jump once movement resumes.
    pub fn resolve(&mut self, movement_enabled: bool) -> FrameInput {
        let (motion_x, motion_y) = match (self.is_mouse_pressed, self.cursor, self.last_cursor) {
            (true, Some((x, y)), Some((last_x, last_y))) => ((x - last_x) as f32, (y - last_y) as f32),
            _ => (0.0, 0.0),
        };
        if self.cursor.is_some() {
            self.last_cursor = self.cursor;
        }

        let displacement = if movement_enabled {
            self.movement_displacement()
        } else {
            Vector3::zero()
        };

        FrameInput {
            orbit_delta: (
                motion_x * self.orbit_sensitivity,
                motion_y * self.orbit_sensitivity,
            ),
            zoom_delta: std::mem::take(&mut self.pending_zoom),
            displacement,
            cursor: if self.is_mouse_pressed {
                CursorRequest::Hand
            } else {
                CursorRequest::Default
            },
        }
    }

    fn movement_displacement(&self) -> Vector3<f32> {
        let speed = self.movement_speed;
        let mut movement = Vector3::zero();
        for key in &self.held_keys {
            match key {
                Key::Up => movement.x -= speed,
                Key::Down => movement.x += speed,
                Key::Semicolon => movement.y -= speed,
                Key::Space => movement.y += speed,
                Key::Right => movement.z -= speed,
                Key::Left => movement.z += speed,
                Key::Escape => {}
            }
        }
        movement
    }
}
