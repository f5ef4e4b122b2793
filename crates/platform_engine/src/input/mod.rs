//! Input state
//!
//! The engine consumes raw key events and keeps the set of held keys.
//! Behaviors read it through [`Frame::input`](crate::ecs::Frame).

use std::collections::HashSet;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Space bar
    Space,
    /// Return
    Enter,
    /// Escape
    Escape,
    /// Z key
    Z,
    /// X key
    X,
    /// 5 key
    Num5,
    /// 6 key
    Num6,
    /// 8 key
    Num8,
}

/// Held and newly pressed keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // Key repeat does not count as a new press
            if self.held.insert(key) {
                self.pressed.insert(key);
            }
        } else {
            self.held.remove(&key);
        }
    }

    /// Whether `key` is down
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Whether `key` went down since the last frame
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Forget per-frame presses
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Release every key (focus loss)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// -1, 0 or 1 from the left and right keys
    pub fn horizontal_axis(&self) -> f32 {
        match (self.is_held(KeyCode::Left), self.is_held(KeyCode::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::Space, true);
        assert!(input.is_held(KeyCode::Space));
        assert!(input.just_pressed(KeyCode::Space));

        input.end_frame();
        assert!(input.is_held(KeyCode::Space));
        assert!(!input.just_pressed(KeyCode::Space));

        input.handle_key(KeyCode::Space, false);
        assert!(!input.is_held(KeyCode::Space));
    }

    #[test]
    fn test_repeat_is_not_a_new_press() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::Z, true);
        input.end_frame();
        input.handle_key(KeyCode::Z, true);
        assert!(!input.just_pressed(KeyCode::Z));
    }

    #[test]
    fn test_horizontal_axis() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::Left, true);
        assert_eq!(input.horizontal_axis(), -1.0);
        input.handle_key(KeyCode::Right, true);
        assert_eq!(input.horizontal_axis(), 0.0);
        input.release_all();
        assert_eq!(input.horizontal_axis(), 0.0);
    }
}
