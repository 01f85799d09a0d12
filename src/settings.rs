//! Session settings
//!
//! Gravity, camera, key bindings, per-car tuning and arena dimensions in one
//! JSON-loadable struct. Every field has a default, so a settings file only
//! needs the values it changes.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::input::ControlMap;
use crate::renderer::vertex::colors;
use crate::sim::{ArenaSpec, ContainmentMode, VehicleParams};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Initial camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub orbit_damping: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: CAMERA_POSITION,
            target: [0.0; 3],
            fov_degrees: CAMERA_FOV_DEGREES,
            orbit_damping: true,
        }
    }
}

/// One player-controlled car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub label: String,
    pub model: String,
    /// Placeholder model size (before `scale`) used until a real mesh is supplied
    pub model_size: [f32; 3],
    pub scale: f32,
    pub controls: ControlMap,
    pub speed: f32,
    pub rotation_speed: f32,
    pub initial_yaw: f32,
    pub spawn: [f32; 3],
    pub containment: ContainmentMode,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub tint: [f32; 4],
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            label: "player".to_string(),
            model: String::new(),
            model_size: [2.0, 1.2, 4.5],
            scale: 10.0,
            controls: ControlMap::new(),
            speed: VEHICLE_SPEED,
            rotation_speed: VEHICLE_ROTATION_SPEED,
            initial_yaw: 0.0,
            spawn: [0.0, 10.0, 0.0],
            containment: ContainmentMode::Walls,
            mass: VEHICLE_MASS,
            restitution: VEHICLE_RESTITUTION,
            friction: VEHICLE_FRICTION,
            tint: colors::PLAYER_ONE,
        }
    }
}

impl PlayerSettings {
    pub fn vehicle_params(&self) -> VehicleParams {
        VehicleParams {
            speed: self.speed,
            rotation_speed: self.rotation_speed,
            initial_yaw: self.initial_yaw,
            spawn: Vec3::from_array(self.spawn),
        }
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub model: String,
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub spawn: [f32; 3],
    pub containment: ContainmentMode,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            model: "soccer_ball/scene.gltf".to_string(),
            radius: BALL_RADIUS,
            mass: BALL_MASS,
            restitution: BALL_RESTITUTION,
            friction: BALL_FRICTION,
            spawn: [25.0, 10.0, 0.0],
            containment: ContainmentMode::Walls,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub gravity: [f32; 3],
    pub camera: CameraSettings,
    pub arena: ArenaSpec,
    pub players: Vec<PlayerSettings>,
    pub ball: BallSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            camera: CameraSettings::default(),
            arena: ArenaSpec::default(),
            players: vec![
                PlayerSettings {
                    label: "mcqueen".to_string(),
                    model: "lightning_mcqueen_cars_3/scene.gltf".to_string(),
                    controls: ControlMap::wasd(),
                    initial_yaw: 0.0,
                    spawn: [0.0, 10.0, -150.0],
                    tint: colors::PLAYER_ONE,
                    ..Default::default()
                },
                PlayerSettings {
                    label: "mystery_machine".to_string(),
                    model: "the_mystery_machine/scene.gltf".to_string(),
                    model_size: [2.2, 2.2, 5.0],
                    controls: ControlMap::arrows(),
                    initial_yaw: std::f32::consts::PI,
                    spawn: [0.0, 10.0, 150.0],
                    tint: colors::PLAYER_TWO,
                    ..Default::default()
                },
            ],
            ball: BallSettings::default(),
        }
    }
}

impl SessionSettings {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    /// Problems worth a warning; none of them stop the session
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (i, a) in self.players.iter().enumerate() {
            if a.speed <= 0.0 {
                warnings.push(format!("{}: speed {} is not positive", a.label, a.speed));
            }
            if a.rotation_speed <= 0.0 {
                warnings.push(format!(
                    "{}: rotation_speed {} is not positive",
                    a.label, a.rotation_speed
                ));
            }
            if a.controls.all_keys().next().is_none() {
                warnings.push(format!("{}: no keys bound", a.label));
            }
            for b in &self.players[i + 1..] {
                if let Some(key) = a.controls.overlap(&b.controls) {
                    warnings.push(format!(
                        "{} and {} both use {:?}; that key drives both",
                        a.label, b.label, key
                    ));
                }
            }
        }
        let bounds = self.arena.bounds();
        if bounds.half_width <= 0.0 || bounds.half_length <= 0.0 {
            warnings.push("arena walls leave no room to play".to_string());
        }
        warnings
    }
}
