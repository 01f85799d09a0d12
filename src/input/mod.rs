//! Keyboard input
//!
//! Raw key state comes in through a [`KeySource`]; each player owns a
//! [`ControlMap`] that turns the held keys into four level-triggered
//! [`ControlSignals`] once per tick. Nothing here buffers or debounces.

pub mod control_map;
pub mod script;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use control_map::{ControlMap, ControlSignals, Signal};
pub use script::ScriptedKeys;

/// Physical key identifier (names follow DOM `KeyboardEvent.code`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(code.to_string())).ok()
    }
}

/// Live "is this key held right now" query
pub trait KeySource {
    fn is_held(&self, key: KeyCode) -> bool;
}

/// Set of currently pressed keys, fed by platform key events
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Drop every held key (window blur, focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn held(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.held.iter().copied()
    }
}

impl KeySource for KeyboardState {
    fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}

impl<const N: usize> KeySource for [KeyCode; N] {
    fn is_held(&self, key: KeyCode) -> bool {
        self.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_press_release() {
        let mut kb = KeyboardState::new();
        assert!(!kb.is_held(KeyCode::KeyW));

        kb.press(KeyCode::KeyW);
        kb.press(KeyCode::KeyW);
        assert!(kb.is_held(KeyCode::KeyW));

        kb.release(KeyCode::KeyW);
        assert!(!kb.is_held(KeyCode::KeyW));
    }

    #[test]
    fn test_keyboard_clear_on_blur() {
        let mut kb = KeyboardState::new();
        kb.press(KeyCode::ArrowUp);
        kb.press(KeyCode::KeyA);
        kb.clear();
        assert_eq!(kb.held().count(), 0);
    }

    #[test]
    fn test_key_from_dom_code() {
        assert_eq!(KeyCode::from_code("KeyW"), Some(KeyCode::KeyW));
        assert_eq!(KeyCode::from_code("ArrowLeft"), Some(KeyCode::ArrowLeft));
        assert_eq!(KeyCode::from_code("F13"), None);
    }
}
