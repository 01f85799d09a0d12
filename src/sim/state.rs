//! Body descriptors shared by the simulation and the engine boundary

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::yaw_rotation;

/// Opaque engine-issued body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// World-space pose reported by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl BodyTransform {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// Collision geometry of a dynamic body, in body-local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    ConvexHull { points: Vec<Vec3> },
    TriMesh { vertices: Vec<Vec3>, indices: Vec<[u32; 3]> },
}

impl ColliderShape {
    /// Local axis-aligned bounds as (min, max)
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        match self {
            ColliderShape::Ball { radius } => (Vec3::splat(-radius), Vec3::splat(*radius)),
            ColliderShape::Cuboid { half_extents } => (-*half_extents, *half_extents),
            ColliderShape::ConvexHull { points: pts }
            | ColliderShape::TriMesh { vertices: pts, .. } => {
                if pts.is_empty() {
                    return (Vec3::ZERO, Vec3::ZERO);
                }
                pts.iter().fold(
                    (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
                    |(lo, hi), p| (lo.min(*p), hi.max(*p)),
                )
            }
        }
    }

    /// Vertices usable as a convex hull, if the shape has any
    pub fn hull_points(&self) -> Option<&[Vec3]> {
        match self {
            ColliderShape::ConvexHull { points } => Some(points),
            ColliderShape::TriMesh { vertices, .. } => Some(vertices),
            _ => None,
        }
    }
}

/// Everything the engine needs to create one dynamic body
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBodyDesc {
    pub label: String,
    pub shape: ColliderShape,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub position: Vec3,
    pub yaw: f32,
    pub gravity_scale: f32,
    /// Orientation is only ever written from outside (vehicles)
    pub lock_rotations: bool,
}

impl DynamicBodyDesc {
    pub fn new(label: impl Into<String>, shape: ColliderShape) -> Self {
        Self {
            label: label.into(),
            shape,
            mass: 1.0,
            restitution: 0.0,
            friction: 0.5,
            position: Vec3::ZERO,
            yaw: 0.0,
            gravity_scale: 1.0,
            lock_rotations: false,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_material(mut self, restitution: f32, friction: f32) -> Self {
        self.restitution = restitution;
        self.friction = friction;
        self
    }

    pub fn at(mut self, position: Vec3, yaw: f32) -> Self {
        self.position = position;
        self.yaw = yaw;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn locked_rotations(mut self) -> Self {
        self.lock_rotations = true;
        self
    }

    pub fn initial_transform(&self) -> BodyTransform {
        BodyTransform::new(self.position, yaw_rotation(self.yaw))
    }
}
