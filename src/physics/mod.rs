//! Physics engine boundary
//!
//! The simulation never integrates rigid bodies itself. It creates bodies,
//! writes velocity/orientation commands, reads velocities and transforms
//! back, and asks the engine to step. Two engines sit behind [`PhysicsBackend`]:
//! - [`ArcadeWorld`]: small deterministic integrator with box contacts
//! - [`RapierWorld`]: full `rapier3d` pipeline

pub mod arcade;
pub mod rapier;

use glam::{Quat, Vec3};

pub use arcade::ArcadeWorld;
pub use rapier::RapierWorld;

use crate::sim::{BodyHandle, BodyTransform, DynamicBodyDesc, StaticBody};

/// Operations the simulation needs from a physics engine.
///
/// Every per-body call takes a handle the engine handed out earlier; an
/// unknown handle is ignored by setters and yields `None` from getters.
pub trait PhysicsBackend {
    /// Register an immovable collider
    fn add_static(&mut self, body: &StaticBody) -> BodyHandle;
    /// Register a physics-driven body
    fn add_dynamic(&mut self, desc: &DynamicBodyDesc) -> BodyHandle;

    fn linvel(&self, handle: BodyHandle) -> Option<Vec3>;
    fn set_linvel(&mut self, handle: BodyHandle, linvel: Vec3);
    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat);
    fn translation(&self, handle: BodyHandle) -> Option<Vec3>;
    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3);
    fn transform(&self, handle: BodyHandle) -> Option<BodyTransform>;

    /// Advance the world by `dt` seconds (gravity, contacts, restitution)
    fn step(&mut self, dt: f32);
}
