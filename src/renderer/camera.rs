//! Orbit camera rig
//!
//! The camera circles a target point; user drag input feeds angular velocity
//! which decays every frame when damping is on (it keeps gliding briefly
//! after the pointer is released).

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Fraction of orbit velocity kept per frame with damping on
const DAMPING_FACTOR: f32 = 0.95;
/// Keep the camera off the poles
const MAX_PITCH: f32 = 1.5;
const MIN_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub target: Vec3,
    /// Angle around the vertical axis, measured from +Z (radians)
    pub azimuth: f32,
    /// Elevation above the horizontal plane (radians)
    pub pitch: f32,
    pub distance: f32,
    pub fov_degrees: f32,
    pub damping: bool,
    #[serde(skip)]
    velocity: (f32, f32),
}

impl CameraRig {
    /// Rig looking at `target` from `position`
    pub fn looking_at(position: Vec3, target: Vec3, fov_degrees: f32, damping: bool) -> Self {
        let offset = position - target;
        let distance = offset.length().max(MIN_DISTANCE);
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH),
            distance,
            fov_degrees,
            damping,
            velocity: (0.0, 0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.azimuth.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.azimuth.cos(),
            )
    }

    /// Pointer drag in radians
    pub fn orbit(&mut self, d_azimuth: f32, d_pitch: f32) {
        if self.damping {
            self.velocity.0 += d_azimuth;
            self.velocity.1 += d_pitch;
        } else {
            self.apply(d_azimuth, d_pitch);
        }
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).max(MIN_DISTANCE);
    }

    /// Advance damped motion by one frame
    pub fn update(&mut self) {
        if !self.damping {
            return;
        }
        let (da, dp) = self.velocity;
        self.apply(da * (1.0 - DAMPING_FACTOR), dp * (1.0 - DAMPING_FACTOR));
        self.velocity = (da * DAMPING_FACTOR, dp * DAMPING_FACTOR);
    }

    fn apply(&mut self, d_azimuth: f32, d_pitch: f32) {
        self.azimuth += d_azimuth;
        self.pitch = (self.pitch + d_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, 0.1, 5000.0)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}
