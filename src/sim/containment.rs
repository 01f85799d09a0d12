//! Keeping dynamic bodies on the pitch
//!
//! Two strategies, picked per body when the scene is configured:
//! - `Clamp`: after each physics step the horizontal position is clamped
//!   to the arena's half-extents (engine independent)
//! - `Walls`: nothing is done here; the static wall colliders and the
//!   engine's contact response keep the body in

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::BodyHandle;
use crate::physics::PhysicsBackend;

/// Horizontal extents a clamped body may occupy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub half_width: f32,
    pub half_length: f32,
}

impl ArenaBounds {
    /// Bounds for a field of full `width` x `length`, less `margin` on every side
    pub fn from_field(width: f32, length: f32, margin: f32) -> Self {
        Self::from_half_extents(width / 2.0, length / 2.0, margin)
    }

    pub fn from_half_extents(half_width: f32, half_length: f32, margin: f32) -> Self {
        Self {
            half_width: (half_width - margin).max(0.0),
            half_length: (half_length - margin).max(0.0),
        }
    }

    /// Clamp x and z; y is left to the engine
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(-self.half_width, self.half_width),
            p.y,
            p.z.clamp(-self.half_length, self.half_length),
        )
    }

    pub fn contains(&self, p: Vec3, tolerance: f32) -> bool {
        p.x.abs() <= self.half_width + tolerance && p.z.abs() <= self.half_length + tolerance
    }
}

/// Per-body containment configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Containment {
    Clamp(ArenaBounds),
    Walls,
}

/// Serializable choice of strategy; bounds come from the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentMode {
    Clamp,
    #[default]
    Walls,
}

impl ContainmentMode {
    pub fn resolve(self, bounds: ArenaBounds) -> Containment {
        match self {
            ContainmentMode::Clamp => Containment::Clamp(bounds),
            ContainmentMode::Walls => Containment::Walls,
        }
    }
}

impl Containment {
    /// Apply after the physics step. Returns the body's (possibly corrected)
    /// translation, or `None` if the engine does not know the body.
    pub fn enforce<P: PhysicsBackend + ?Sized>(
        &self,
        world: &mut P,
        handle: BodyHandle,
    ) -> Option<Vec3> {
        let current = world.translation(handle)?;
        match self {
            Containment::Walls => Some(current),
            Containment::Clamp(bounds) => {
                let clamped = bounds.clamp(current);
                if clamped != current {
                    world.set_translation(handle, clamped);
                    log::trace!("clamped body {:?} {} -> {}", handle, current, clamped);
                }
                Some(clamped)
            }
        }
    }
}

/// A dynamic body with no controller that still needs containing (the ball)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainedBody {
    pub handle: BodyHandle,
    pub containment: Containment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_subtract_margin() {
        let b = ArenaBounds::from_half_extents(350.0, 490.0, 10.0);
        assert_eq!(b.half_width, 340.0);
        assert_eq!(b.half_length, 480.0);

        let f = ArenaBounds::from_field(720.0, 1000.0, 10.0);
        assert_eq!(f.half_width, 350.0);
        assert_eq!(f.half_length, 490.0);
    }

    #[test]
    fn test_clamp_keeps_height() {
        let b = ArenaBounds::from_half_extents(350.0, 490.0, 10.0);
        let p = b.clamp(Vec3::new(-1000.0, 42.0, 1000.0));
        assert_eq!(p, Vec3::new(-340.0, 42.0, 480.0));

        let inside = Vec3::new(12.0, 3.0, -7.0);
        assert_eq!(b.clamp(inside), inside);
    }

    #[test]
    fn test_contains_tolerance() {
        let b = ArenaBounds::from_half_extents(100.0, 100.0, 0.0);
        assert!(b.contains(Vec3::new(100.0, 0.0, -100.0), 0.0));
        assert!(!b.contains(Vec3::new(100.5, 0.0, 0.0), 0.0));
        assert!(b.contains(Vec3::new(100.5, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_mode_resolves() {
        let b = ArenaBounds::from_half_extents(1.0, 2.0, 0.0);
        assert_eq!(ContainmentMode::Clamp.resolve(b), Containment::Clamp(b));
        assert_eq!(ContainmentMode::Walls.resolve(b), Containment::Walls);
    }
}
