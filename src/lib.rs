//! Pitch Rush - two cars and a ball in a walled 3D arena
//!
//! Core modules:
//! - `input`: Key sources, control maps and the per-controller input sampler
//! - `sim`: Arena definition, vehicle controllers, containment, the tick driver
//! - `physics`: Physics engine boundary plus the arcade and rapier backends
//! - `renderer`: Renderer boundary (instances, static meshes, camera rig)
//! - `assets`: Model loading status for dynamic bodies
//! - `scene`: Composition of all of the above into one running session
//! - `settings`: Data-driven session configuration

pub mod assets;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::Scene;
pub use settings::SessionSettings;

use glam::{Quat, Vec3};

/// Session configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame we are willing to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World gravity (units/s²)
    pub const GRAVITY: [f32; 3] = [0.0, -15.0, 0.0];

    /// Camera defaults
    pub const CAMERA_POSITION: [f32; 3] = [0.0, 70.0, 70.0];
    pub const CAMERA_FOV_DEGREES: f32 = 75.0;

    /// Vehicle drive speed (units/s) and turn step (radians per tick)
    pub const VEHICLE_SPEED: f32 = 60.0;
    pub const VEHICLE_ROTATION_SPEED: f32 = 0.05;
    pub const VEHICLE_MASS: f32 = 100.0;
    pub const VEHICLE_RESTITUTION: f32 = 0.2;
    pub const VEHICLE_FRICTION: f32 = 1.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_MASS: f32 = 10.0;
    pub const BALL_RESTITUTION: f32 = 0.6;
    pub const BALL_FRICTION: f32 = 0.5;
}

/// Unit vector a body at `yaw` drives along (+Z at yaw 0, +X at yaw π/2)
#[inline]
pub fn forward_axis(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Absolute orientation for a heading about the vertical axis
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}
