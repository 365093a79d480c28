//! Typed input events
//!
//! The windowing layer never touches the scene directly: it translates raw
//! window events into [`InputEvent`]s and pushes them into an [`EventQueue`].
//! The scene drains the queue once per frame before resolving movement.

use std::collections::VecDeque;

use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Pixel-precise scroll deltas are converted to lines with this factor.
const PIXELS_PER_SCROLL_LINE: f64 = 20.0;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Semicolon,
    Escape,
}

impl Key {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::Space => Some(Key::Space),
            KeyCode::Semicolon => Some(Key::Semicolon),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor position in window-relative physical pixels.
    CursorMoved { x: f64, y: f64 },
    /// Primary (left) mouse button.
    PrimaryButton { pressed: bool },
    /// Vertical scroll in lines; positive scrolls up/away from the user.
    Scroll { lines: f32 },
    Key { key: Key, pressed: bool, repeat: bool },
}

impl InputEvent {
    /// Translates a winit window event, ignoring everything the viewer does
    /// not consume.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => Some(InputEvent::PrimaryButton {
                pressed: *state == ElementState::Pressed,
            }),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => {
                        (position.y / PIXELS_PER_SCROLL_LINE) as f32
                    }
                };
                Some(InputEvent::Scroll { lines })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                Key::from_key_code(code).map(|key| InputEvent::Key {
                    key,
                    pressed: event.state == ElementState::Pressed,
                    repeat: event.repeat,
                })
            }
            _ => None,
        }
    }
}

/// FIFO of input events between the windowing layer and the scene.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Removes and yields every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Cosmetic cursor change requested by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorRequest {
    #[default]
    Default,
    Hand,
}

impl From<CursorRequest> for winit::window::CursorIcon {
    fn from(request: CursorRequest) -> Self {
        match request {
            CursorRequest::Default => winit::window::CursorIcon::Default,
            CursorRequest::Hand => winit::window::CursorIcon::Pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_arrival_order() {
        let mut queue = EventQueue::new();
        queue.push(InputEvent::PrimaryButton { pressed: true });
        queue.push(InputEvent::CursorMoved { x: 4.0, y: 2.0 });
        queue.push(InputEvent::Scroll { lines: -1.0 });
        assert_eq!(queue.len(), 3);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                InputEvent::PrimaryButton { pressed: true },
                InputEvent::CursorMoved { x: 4.0, y: 2.0 },
                InputEvent::Scroll { lines: -1.0 },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_only_viewer_keys_are_mapped() {
        assert_eq!(Key::from_key_code(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(Key::from_key_code(KeyCode::Semicolon), Some(Key::Semicolon));
        assert_eq!(Key::from_key_code(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(Key::from_key_code(KeyCode::KeyW), None);
    }
}
