//! Keyboard and mouse state, sampled once per frame.

use glam::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Per-frame input snapshot consumed by the game update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Left button went down since the previous frame.
    pub throw: bool,
    /// Right button is held.
    pub recall: bool,
    /// Virtual cursor; None until the first mouse motion arrives.
    pub cursor: Option<Vec2>,
}

/// Accumulates window/device events between frames.
#[derive(Debug, Default)]
pub struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    throw_pending: bool,
    recall_held: bool,
    cursor: Option<Vec2>,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key(&mut self, code: KeyCode, state: ElementState) {
        let down = state == ElementState::Pressed;
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => self.forward = down,
            KeyCode::KeyS | KeyCode::ArrowDown => self.back = down,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.left = down,
            KeyCode::KeyD | KeyCode::ArrowRight => self.right = down,
            KeyCode::Escape if down => self.quit = true,
            _ => {}
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let down = state == ElementState::Pressed;
        match button {
            MouseButton::Left if down => self.throw_pending = true,
            MouseButton::Right => self.recall_held = down,
            _ => {}
        }
    }

    /// Raw device motion (pixels). Moves the virtual cursor.
    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx as f32, dy as f32);
        self.cursor = Some(self.cursor.unwrap_or(Vec2::ZERO) + delta);
    }

    /// Drop held keys and buttons (window lost focus).
    pub fn release_all(&mut self) {
        let cursor = self.cursor;
        let quit = self.quit;
        *self = Self {
            cursor,
            quit,
            ..Self::default()
        };
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Take this frame's snapshot. The throw edge is consumed.
    pub fn frame(&mut self) -> FrameInput {
        FrameInput {
            forward: self.forward,
            back: self.back,
            left: self.left,
            right: self.right,
            throw: std::mem::take(&mut self.throw_pending),
            recall: self.recall_held,
            cursor: self.cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_edge_consumed_once() {
        let mut input = InputState::new();
        input.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.frame().throw);
        // still held, but no new press
        assert!(!input.frame().throw);
        input.on_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!input.frame().throw);
    }

    #[test]
    fn test_recall_is_level() {
        let mut input = InputState::new();
        input.on_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(input.frame().recall);
        assert!(input.frame().recall);
        input.on_mouse_button(MouseButton::Right, ElementState::Released);
        assert!(!input.frame().recall);
    }

    #[test]
    fn test_keys_and_arrows() {
        let mut input = InputState::new();
        input.on_key(KeyCode::KeyW, ElementState::Pressed);
        input.on_key(KeyCode::ArrowRight, ElementState::Pressed);
        let f = input.frame();
        assert!(f.forward && f.right && !f.back && !f.left);
        input.on_key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.frame().forward);
    }

    #[test]
    fn test_cursor_accumulates_motion() {
        let mut input = InputState::new();
        assert_eq!(input.frame().cursor, None);
        input.on_mouse_motion(3.0, -2.0);
        input.on_mouse_motion(1.5, 4.0);
        assert_eq!(input.frame().cursor, Some(Vec2::new(4.5, 2.0)));
    }

    #[test]
    fn test_escape_and_release_all() {
        let mut input = InputState::new();
        input.on_key(KeyCode::KeyA, ElementState::Pressed);
        input.on_mouse_motion(1.0, 1.0);
        input.on_key(KeyCode::Escape, ElementState::Pressed);
        input.release_all();
        assert!(input.quit_requested());
        let f = input.frame();
        assert!(!f.left);
        assert_eq!(f.cursor, Some(Vec2::ONE));
    }
}
