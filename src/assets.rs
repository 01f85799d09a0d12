//! Model assets for dynamic bodies
//!
//! Loading itself happens outside the simulation (and may take a while).
//! A body whose model is still pending is neither simulated nor drawn; the
//! scene creates it the moment [`Model`] data arrives.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::ColliderShape;

/// Which model a body is waiting on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelKey(pub String);

impl ModelKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

/// Loading state of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
}

/// Triangle mesh in model space
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl Model {
    /// Axis-aligned box mesh centered on the origin (stand-in for a loaded model)
    pub fn placeholder_box(size: Vec3) -> Self {
        let h = size * 0.5;
        let vertices = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { -h.x } else { h.x },
                    if i & 2 == 0 { -h.y } else { h.y },
                    if i & 4 == 0 { -h.z } else { h.z },
                )
            })
            .collect();
        let indices = vec![
            [0, 2, 1], [1, 2, 3], // -z
            [4, 5, 6], [5, 7, 6], // +z
            [0, 1, 4], [1, 5, 4], // -y
            [2, 6, 3], [3, 6, 7], // +y
            [0, 4, 2], [2, 4, 6], // -x
            [1, 3, 5], [3, 7, 5], // +x
        ];
        Self { vertices, indices }
    }

    /// Uniformly scaled copy (models are authored small and placed at scale 10)
    pub fn scaled(&self, scale: f32) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v * scale).collect(),
            indices: self.indices.clone(),
        }
    }

    pub fn collider(&self) -> ColliderShape {
        ColliderShape::TriMesh {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Status of every model the scene asked for
#[derive(Debug, Clone, Default)]
pub struct AssetTracker {
    status: BTreeMap<ModelKey, AssetStatus>,
}

impl AssetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, key: ModelKey) {
        self.status.entry(key).or_insert(AssetStatus::Pending);
    }

    /// Mark loaded. Returns false if the key was never requested or already loaded.
    pub fn mark_ready(&mut self, key: &ModelKey) -> bool {
        match self.status.get_mut(key) {
            Some(status @ AssetStatus::Pending) => {
                *status = AssetStatus::Ready;
                true
            }
            _ => false,
        }
    }

    pub fn status(&self, key: &ModelKey) -> Option<AssetStatus> {
        self.status.get(key).copied()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ModelKey> {
        self.status
            .iter()
            .filter(|(_, s)| **s == AssetStatus::Pending)
            .map(|(k, _)| k)
    }

    pub fn all_ready(&self) -> bool {
        self.pending().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_box_bounds() {
        let model = Model::placeholder_box(Vec3::new(2.0, 4.0, 6.0)).scaled(10.0);
        assert_eq!(model.triangle_count(), 12);
        let (lo, hi) = model.collider().local_bounds();
        assert_eq!(lo, Vec3::new(-10.0, -20.0, -30.0));
        assert_eq!(hi, Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_tracker_lifecycle() {
        let mut tracker = AssetTracker::new();
        let key = ModelKey::new("soccer_ball/scene.gltf");
        assert!(!tracker.mark_ready(&key));

        tracker.request(key.clone());
        assert_eq!(tracker.status(&key), Some(AssetStatus::Pending));
        assert!(!tracker.all_ready());

        assert!(tracker.mark_ready(&key));
        assert!(!tracker.mark_ready(&key));
        assert!(tracker.all_ready());
    }
}
