//! Input reactions for the orbit camera.
//!
//! Window-system agnostic: the platform layer translates its events into the
//! calls below and applies the returned [`InputReaction`] to the window.

use crate::{DVec2, camera::CameraState};

/// Pixels of pointer travel per degree of rotation.
pub const ROTATE_SENSITIVITY: f32 = 10.0;
/// Scroll lines per unit of zoom.
pub const SCROLL_DIVISOR: f32 = 4.0;
/// Conversion for pixel-precise (touchpad) scroll deltas.
pub const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Other,
}

/// Side effect the window has to perform after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputReaction {
    RequestClose,
    /// Hide and lock the pointer in place.
    CapturePointer,
    /// Show the pointer again.
    ReleasePointer,
}

#[derive(Clone, Debug, Default)]
pub struct InputHandler {
    camera: CameraState,
    dragging: bool,
    /// Locked pointers report raw motion instead of cursor positions.
    pointer_locked: bool,
    cursor: DVec2,
}

impl InputHandler {
    pub fn new(camera: CameraState) -> Self {
        Self {
            camera,
            dragging: false,
            pointer_locked: false,
            cursor: DVec2::ZERO,
        }
    }

    #[inline]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn on_key(&mut self, key: Key, pressed: bool) -> Option<InputReaction> {
        match (key, pressed) {
            (Key::Escape, true) => Some(InputReaction::RequestClose),
            _ => None,
        }
    }

    pub fn on_mouse_button(&mut self, button: Button, pressed: bool) -> Option<InputReaction> {
        if button != Button::Left {
            return None;
        }
        if pressed {
            // Anchor is wherever the pointer was last reported.
            self.dragging = true;
            Some(InputReaction::CapturePointer)
        } else if self.dragging {
            self.dragging = false;
            self.pointer_locked = false;
            Some(InputReaction::ReleasePointer)
        } else {
            None
        }
    }

    /// Set once the window managed to lock the captured pointer. Rotation
    /// then follows [`on_pointer_motion`](Self::on_pointer_motion) only.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked && self.dragging;
    }

    /// Track the pointer; rotates the camera only while dragging an
    /// unlocked pointer.
    pub fn on_cursor_moved(&mut self, position: DVec2) {
        if self.dragging && !self.pointer_locked {
            self.rotate(position - self.cursor);
        }
        self.cursor = position;
    }

    /// Raw pointer motion, unbounded by the window edges.
    pub fn on_pointer_motion(&mut self, delta: DVec2) {
        if self.dragging && self.pointer_locked {
            self.rotate(delta);
        }
    }

    fn rotate(&mut self, pixels: DVec2) {
        self.camera.rotation += pixels.as_vec2() / ROTATE_SENSITIVITY;
        log::trace!("rotation -> {:?}", self.camera.rotation);
    }

    /// Line-based scroll; positive `lines` zooms out.
    pub fn on_scroll_lines(&mut self, lines: f32) {
        self.camera.zoom = (self.camera.zoom + lines / SCROLL_DIVISOR).max(0.0);
    }

    pub fn on_scroll_pixels(&mut self, pixels: f64) {
        self.on_scroll_lines((pixels / PIXELS_PER_LINE) as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn handler() -> InputHandler {
        InputHandler::new(CameraState::default())
    }

    #[test]
    fn escape_requests_close() {
        let mut h = handler();
        assert_eq!(h.on_key(Key::Escape, true), Some(InputReaction::RequestClose));
        assert_eq!(h.on_key(Key::Escape, false), None);
        assert_eq!(h.on_key(Key::Other, true), None);
    }

    #[test]
    fn drag_accumulates_rotation() {
        let mut h = handler();
        h.on_cursor_moved(DVec2::new(100.0, 100.0));
        assert_eq!(
            h.on_mouse_button(Button::Left, true),
            Some(InputReaction::CapturePointer)
        );
        h.on_cursor_moved(DVec2::new(130.0, 80.0));
        assert_eq!(h.camera().rotation, Vec2::new(3.0, -2.0));

        // Second move is relative to the previous one, not the anchor.
        h.on_cursor_moved(DVec2::new(140.0, 80.0));
        assert_eq!(h.camera().rotation, Vec2::new(4.0, -2.0));
    }

    #[test]
    fn moves_outside_drag_do_not_rotate() {
        let mut h = handler();
        h.on_cursor_moved(DVec2::new(10.0, 10.0));
        h.on_cursor_moved(DVec2::new(500.0, 300.0));
        assert_eq!(h.camera().rotation, Vec2::ZERO);

        h.on_mouse_button(Button::Left, true);
        assert_eq!(
            h.on_mouse_button(Button::Left, false),
            Some(InputReaction::ReleasePointer)
        );
        h.on_cursor_moved(DVec2::new(0.0, 0.0));
        assert_eq!(h.camera().rotation, Vec2::ZERO);
        assert!(!h.is_dragging());
    }

    #[test]
    fn locked_drag_follows_raw_motion() {
        let mut h = handler();
        h.on_pointer_motion(DVec2::new(50.0, 50.0));
        h.set_pointer_locked(true);
        assert_eq!(h.camera().rotation, Vec2::ZERO);

        h.on_mouse_button(Button::Left, true);
        h.set_pointer_locked(true);
        // The locked cursor keeps reporting one spot; only motion counts.
        h.on_cursor_moved(DVec2::new(400.0, 400.0));
        h.on_pointer_motion(DVec2::new(30.0, -20.0));
        h.on_pointer_motion(DVec2::new(2000.0, 0.0));
        assert_eq!(h.camera().rotation, Vec2::new(203.0, -2.0));

        h.on_mouse_button(Button::Left, false);
        h.on_pointer_motion(DVec2::new(10.0, 10.0));
        assert_eq!(h.camera().rotation, Vec2::new(203.0, -2.0));
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut h = handler();
        assert_eq!(h.on_mouse_button(Button::Other, true), None);
        assert!(!h.is_dragging());
        assert_eq!(h.on_mouse_button(Button::Left, false), None);
    }

    #[test]
    fn scroll_zoom_clamps_at_zero() {
        let mut h = InputHandler::new(CameraState::new(1.0));
        h.on_scroll_lines(2.0);
        assert_eq!(h.camera().zoom, 1.5);
        for _ in 0..50 {
            h.on_scroll_lines(-1.0);
            assert!(h.camera().zoom >= 0.0);
        }
        assert_eq!(h.camera().zoom, 0.0);
        h.on_scroll_lines(4.0);
        assert_eq!(h.camera().zoom, 1.0);
    }

    #[test]
    fn pixel_scroll_converts_to_lines() {
        let mut h = InputHandler::new(CameraState::new(0.0));
        h.on_scroll_pixels(80.0);
        assert_eq!(h.camera().zoom, 1.0);
    }
}
