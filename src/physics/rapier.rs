//! rapier3d physics integration
//!
//! [`RapierWorld`] owns a complete rapier pipeline and maps the simulation's
//! [`BodyHandle`]s onto rapier rigid-body handles. Dynamic triangle meshes are
//! built as convex hulls: rapier has no trimesh-vs-trimesh contacts, and two
//! cars with trimesh colliders would pass straight through each other.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

use super::PhysicsBackend;
use crate::sim::{
    BodyHandle, BodyTransform, ColliderShape, DynamicBodyDesc, StaticBody,
};

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn quat_from_na(q: &UnitQuaternion<Real>) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

/// Collider for a dynamic body's shape
fn dynamic_collider(shape: &ColliderShape) -> ColliderBuilder {
    match shape {
        ColliderShape::Ball { radius } => ColliderBuilder::ball(*radius),
        ColliderShape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
        ColliderShape::ConvexHull { .. } | ColliderShape::TriMesh { .. } => {
            let points: Vec<Point<Real>> = shape
                .hull_points()
                .unwrap_or_default()
                .iter()
                .map(|p| point![p.x, p.y, p.z])
                .collect();
            ColliderBuilder::convex_hull(&points).unwrap_or_else(|| {
                // Degenerate hull (flat or too few points): fall back to its bounds
                let (lo, hi) = shape.local_bounds();
                let h = ((hi - lo) * 0.5).max(Vec3::splat(0.01));
                log::warn!("degenerate hull ({} points), using bounding box", points.len());
                ColliderBuilder::cuboid(h.x, h.y, h.z).translation(to_na((lo + hi) * 0.5))
            })
        }
    }
}

/// rapier-backed physics world
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Indexed by `BodyHandle.0`
    handles: Vec<RigidBodyHandle>,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: Vec::new(),
        }
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> BodyHandle {
        let rb = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, rb, &mut self.rigid_body_set);
        self.handles.push(rb);
        BodyHandle((self.handles.len() - 1) as u32)
    }

    fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        let rb = *self.handles.get(handle.0 as usize)?;
        self.rigid_body_set.get(rb)
    }

    fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let rb = *self.handles.get(handle.0 as usize)?;
        self.rigid_body_set.get_mut(rb)
    }
}

impl PhysicsBackend for RapierWorld {
    fn add_static(&mut self, body: &StaticBody) -> BodyHandle {
        let h = body.shape.half_extents;
        let rb = RigidBodyBuilder::fixed()
            .translation(to_na(body.shape.center))
            .build();
        let collider = ColliderBuilder::cuboid(h.x, h.y, h.z)
            .restitution(body.restitution)
            .friction(body.friction)
            .build();
        self.insert(rb, collider)
    }

    fn add_dynamic(&mut self, desc: &DynamicBodyDesc) -> BodyHandle {
        let mut builder = RigidBodyBuilder::dynamic()
            .translation(to_na(desc.position))
            .rotation(vector![0.0, desc.yaw, 0.0])
            .gravity_scale(desc.gravity_scale)
            .ccd_enabled(true);
        if desc.lock_rotations {
            builder = builder.lock_rotations();
        }
        let collider = dynamic_collider(&desc.shape)
            .restitution(desc.restitution)
            .friction(desc.friction)
            .mass(desc.mass)
            .build();
        let handle = self.insert(builder.build(), collider);
        log::debug!("rapier: {} -> {:?}", desc.label, handle);
        handle
    }

    fn linvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.get(handle).map(|rb| from_na(rb.linvel()))
    }

    fn set_linvel(&mut self, handle: BodyHandle, linvel: Vec3) {
        if let Some(rb) = self.get_mut(handle) {
            rb.set_linvel(to_na(linvel), true);
        }
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) {
        if let Some(rb) = self.get_mut(handle) {
            rb.set_rotation(quat_to_na(rotation), true);
        }
    }

    fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.get(handle).map(|rb| from_na(rb.translation()))
    }

    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3) {
        if let Some(rb) = self.get_mut(handle) {
            rb.set_translation(to_na(translation), true);
        }
    }

    fn transform(&self, handle: BodyHandle) -> Option<BodyTransform> {
        self.get(handle).map(|rb| {
            BodyTransform::new(from_na(rb.translation()), quat_from_na(rb.rotation()))
        })
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}
