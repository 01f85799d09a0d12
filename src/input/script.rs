//! Synthetic key sources for headless runs and tests

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{KeyCode, KeySource};

/// Chance per tick that a key flips between held and released
const TOGGLE_CHANCE: f64 = 0.08;

/// Pre-recorded key state, one frame of held keys per tick
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    frames: Vec<Vec<KeyCode>>,
    cursor: usize,
}

impl ScriptedKeys {
    pub fn new(frames: Vec<Vec<KeyCode>>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Hold the same keys for `ticks` frames
    pub fn hold(keys: &[KeyCode], ticks: usize) -> Self {
        Self::new(vec![keys.to_vec(); ticks])
    }

    /// Seeded key mashing over `keys`: each key toggles now and then,
    /// so presses last several ticks like a human's would
    pub fn random(seed: u64, keys: &[KeyCode], ticks: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut held = vec![false; keys.len()];
        let frames = (0..ticks)
            .map(|_| {
                for h in held.iter_mut() {
                    if rng.random_bool(TOGGLE_CHANCE) {
                        *h = !*h;
                    }
                }
                keys.iter()
                    .zip(&held)
                    .filter(|(_, h)| **h)
                    .map(|(k, _)| *k)
                    .collect()
            })
            .collect();
        Self::new(frames)
    }

    /// Append more frames after the current script
    pub fn then(mut self, other: ScriptedKeys) -> Self {
        self.frames.extend(other.frames);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    /// Move to the next frame. Past the end nothing is held.
    pub fn advance(&mut self) {
        if self.cursor < self.frames.len() {
            self.cursor += 1;
        }
    }
}

impl KeySource for ScriptedKeys {
    fn is_held(&self, key: KeyCode) -> bool {
        self.frames
            .get(self.cursor)
            .is_some_and(|frame| frame.contains(&key))
    }
}
