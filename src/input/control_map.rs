//! Key-to-signal bindings and the per-tick input sampler

use serde::{Deserialize, Serialize};

use super::{KeyCode, KeySource};

/// Named control signals a vehicle understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Forward,
    Backward,
    Left,
    Right,
}

impl Signal {
    pub const ALL: [Signal; 4] = [Signal::Forward, Signal::Backward, Signal::Left, Signal::Right];
}

/// Per-player key bindings, fixed once the session is configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlMap {
    forward: Vec<KeyCode>,
    backward: Vec<KeyCode>,
    left: Vec<KeyCode>,
    right: Vec<KeyCode>,
}

impl ControlMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind another key to `signal`
    pub fn bind(mut self, signal: Signal, key: KeyCode) -> Self {
        let keys = match signal {
            Signal::Forward => &mut self.forward,
            Signal::Backward => &mut self.backward,
            Signal::Left => &mut self.left,
            Signal::Right => &mut self.right,
        };
        if !keys.contains(&key) {
            keys.push(key);
        }
        self
    }

    /// Player one: WASD
    pub fn wasd() -> Self {
        Self::new()
            .bind(Signal::Forward, KeyCode::KeyW)
            .bind(Signal::Backward, KeyCode::KeyS)
            .bind(Signal::Left, KeyCode::KeyA)
            .bind(Signal::Right, KeyCode::KeyD)
    }

    /// Player two: arrow keys
    pub fn arrows() -> Self {
        Self::new()
            .bind(Signal::Forward, KeyCode::ArrowUp)
            .bind(Signal::Backward, KeyCode::ArrowDown)
            .bind(Signal::Left, KeyCode::ArrowLeft)
            .bind(Signal::Right, KeyCode::ArrowRight)
    }

    pub fn keys(&self, signal: Signal) -> &[KeyCode] {
        match signal {
            Signal::Forward => &self.forward,
            Signal::Backward => &self.backward,
            Signal::Left => &self.left,
            Signal::Right => &self.right,
        }
    }

    /// Every bound key, in signal order
    pub fn all_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        Signal::ALL.into_iter().flat_map(|s| self.keys(s).iter().copied())
    }

    /// First key bound in both maps, if any. Shared keys drive both players at once.
    pub fn overlap(&self, other: &ControlMap) -> Option<KeyCode> {
        self.all_keys().find(|k| other.all_keys().any(|o| o == *k))
    }

    /// True iff at least one key bound to `signal` is held
    pub fn is_active(&self, signal: Signal, source: &(impl KeySource + ?Sized)) -> bool {
        self.keys(signal).iter().any(|&k| source.is_held(k))
    }

    /// Sample all four signals from the current key state
    pub fn sample(&self, source: &(impl KeySource + ?Sized)) -> ControlSignals {
        ControlSignals {
            forward: self.is_active(Signal::Forward, source),
            backward: self.is_active(Signal::Backward, source),
            left: self.is_active(Signal::Left, source),
            right: self.is_active(Signal::Right, source),
        }
    }
}

/// Level-triggered signal state for one tick
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSignals {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl ControlSignals {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// +1 forward, -1 backward, 0 for neither or both
    pub fn throttle(&self) -> f32 {
        (self.forward as i8 - self.backward as i8) as f32
    }

    /// +1 left (counter-clockwise), -1 right, 0 for neither or both
    pub fn steer(&self) -> f32 {
        (self.left as i8 - self.right as i8) as f32
    }
}
