//! Simulation module
//!
//! Everything that happens inside one tick lives here. It talks to the
//! physics engine only through [`PhysicsBackend`](crate::physics::PhysicsBackend)
//! and to the keyboard only through [`KeySource`](crate::input::KeySource):
//! - Fixed timestep only
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod containment;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use arena::{ArenaSpec, BoxShape, FieldSpec, GoalSpec, Material, StaticBody, StaticKind, WallSpec};
pub use containment::{ArenaBounds, ContainedBody, Containment, ContainmentMode};
pub use state::{BodyHandle, BodyTransform, ColliderShape, DynamicBodyDesc};
pub use tick::{SimulationDriver, TickReport};
pub use vehicle::{VehicleCommand, VehicleController, VehicleParams, VehicleState};
