//! Built-in arcade physics
//!
//! A deliberately small rigid-body integrator: explicit Euler with gravity,
//! axis-aligned box contacts, and restitution applied along the contact
//! normal. Orientation is carried (and rotates a body's bounds about the
//! vertical axis) but never integrated; only commands change it.
//!
//! Contacts resolve along the axis of least penetration, dynamic bodies
//! against static boxes first, then dynamic pairs weighted by inverse mass.

use glam::{Mat3, Quat, Vec3};

use super::PhysicsBackend;
use crate::sim::{BodyHandle, BodyTransform, BoxShape, DynamicBodyDesc, StaticBody};

/// Normal speeds below this after a bounce are zeroed (stops resting jitter)
pub const REST_SPEED: f32 = 0.5;

#[derive(Debug, Clone)]
struct StaticCollider {
    shape: BoxShape,
    restitution: f32,
}

#[derive(Debug, Clone)]
struct ArcadeBody {
    /// Local bounds center and half extents
    local_center: Vec3,
    local_half: Vec3,
    inv_mass: f32,
    restitution: f32,
    gravity_scale: f32,
    translation: Vec3,
    rotation: Quat,
    linvel: Vec3,
}

impl ArcadeBody {
    /// World-space AABB as (center, half extents)
    fn aabb(&self) -> (Vec3, Vec3) {
        let m = Mat3::from_quat(self.rotation);
        let abs = Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
        (self.translation + m * self.local_center, abs * self.local_half)
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Static(StaticCollider),
    Dynamic(ArcadeBody),
}

/// Deterministic in-process physics world
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    gravity: Vec3,
    entries: Vec<Entry>,
}

/// Contact between two boxes: unit normal pointing from `b` to `a`, and depth
fn box_contact(ca: Vec3, ha: Vec3, cb: Vec3, hb: Vec3) -> Option<(Vec3, f32)> {
    let delta = ca - cb;
    let overlap = (ha + hb) - delta.abs();
    if overlap.min_element() <= 0.0 {
        return None;
    }
    let (axis, depth) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (Vec3::X, overlap.x)
    } else if overlap.y <= overlap.z {
        (Vec3::Y, overlap.y)
    } else {
        (Vec3::Z, overlap.z)
    };
    let sign = if delta.dot(axis) < 0.0 { -1.0 } else { 1.0 };
    Some((axis * sign, depth))
}

/// Remove the approaching normal component, bouncing back by `restitution`
fn bounce(linvel: Vec3, normal: Vec3, restitution: f32) -> Vec3 {
    let vn = linvel.dot(normal);
    if vn >= 0.0 {
        return linvel;
    }
    let out = -vn * restitution;
    let tangent = linvel - normal * vn;
    if out < REST_SPEED {
        tangent
    } else {
        tangent + normal * out
    }
}

impl ArcadeWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            entries: Vec::new(),
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn dynamic_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Dynamic(_)))
            .count()
    }

    /// Box registered for a static handle
    pub fn static_shape(&self, handle: BodyHandle) -> Option<BoxShape> {
        match self.entries.get(handle.0 as usize)? {
            Entry::Static(s) => Some(s.shape),
            Entry::Dynamic(_) => None,
        }
    }

    fn push(&mut self, entry: Entry) -> BodyHandle {
        self.entries.push(entry);
        BodyHandle((self.entries.len() - 1) as u32)
    }

    fn body(&self, handle: BodyHandle) -> Option<&ArcadeBody> {
        match self.entries.get(handle.0 as usize)? {
            Entry::Dynamic(b) => Some(b),
            Entry::Static(_) => None,
        }
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut ArcadeBody> {
        match self.entries.get_mut(handle.0 as usize)? {
            Entry::Dynamic(b) => Some(b),
            Entry::Static(_) => None,
        }
    }

    fn resolve_static_contacts(&mut self) {
        let statics: Vec<StaticCollider> = self
            .entries
            .iter()
            .filter_map(|e| match e {
                Entry::Static(s) => Some(s.clone()),
                Entry::Dynamic(_) => None,
            })
            .collect();

        for entry in self.entries.iter_mut() {
            let Entry::Dynamic(body) = entry else {
                continue;
            };
            for wall in &statics {
                let (center, half) = body.aabb();
                let Some((normal, depth)) =
                    box_contact(center, half, wall.shape.center, wall.shape.half_extents)
                else {
                    continue;
                };
                body.translation += normal * depth;
                let e = (body.restitution + wall.restitution) * 0.5;
                body.linvel = bounce(body.linvel, normal, e);
            }
        }
    }

    fn resolve_dynamic_contacts(&mut self) {
        for j in 1..self.entries.len() {
            let (head, tail) = self.entries.split_at_mut(j);
            let Entry::Dynamic(b) = &mut tail[0] else {
                continue;
            };
            for entry in head.iter_mut() {
                let Entry::Dynamic(a) = entry else {
                    continue;
                };
                let inv_sum = a.inv_mass + b.inv_mass;
                if inv_sum <= 0.0 {
                    continue;
                }
                let (ca, ha) = a.aabb();
                let (cb, hb) = b.aabb();
                let Some((normal, depth)) = box_contact(ca, ha, cb, hb) else {
                    continue;
                };
                a.translation += normal * depth * (a.inv_mass / inv_sum);
                b.translation -= normal * depth * (b.inv_mass / inv_sum);

                let approach = (a.linvel - b.linvel).dot(normal);
                if approach < 0.0 {
                    let e = (a.restitution + b.restitution) * 0.5;
                    let impulse = -(1.0 + e) * approach / inv_sum;
                    a.linvel += normal * impulse * a.inv_mass;
                    b.linvel -= normal * impulse * b.inv_mass;
                }
            }
        }
    }
}

impl PhysicsBackend for ArcadeWorld {
    fn add_static(&mut self, body: &StaticBody) -> BodyHandle {
        self.push(Entry::Static(StaticCollider {
            shape: body.shape,
            restitution: body.restitution,
        }))
    }

    fn add_dynamic(&mut self, desc: &DynamicBodyDesc) -> BodyHandle {
        let (lo, hi) = desc.shape.local_bounds();
        let initial = desc.initial_transform();
        self.push(Entry::Dynamic(ArcadeBody {
            local_center: (lo + hi) * 0.5,
            local_half: (hi - lo) * 0.5,
            inv_mass: if desc.mass > 0.0 { 1.0 / desc.mass } else { 0.0 },
            restitution: desc.restitution,
            gravity_scale: desc.gravity_scale,
            translation: initial.translation,
            rotation: initial.rotation,
            linvel: Vec3::ZERO,
        }))
    }

    fn linvel(&self, handle: BodyHandle) -> Option<Vec3> {
        match self.entries.get(handle.0 as usize)? {
            Entry::Dynamic(b) => Some(b.linvel),
            Entry::Static(_) => Some(Vec3::ZERO),
        }
    }

    fn set_linvel(&mut self, handle: BodyHandle, linvel: Vec3) {
        if let Some(b) = self.body_mut(handle) {
            b.linvel = linvel;
        }
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) {
        if let Some(b) = self.body_mut(handle) {
            b.rotation = rotation.normalize();
        }
    }

    fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.transform(handle).map(|t| t.translation)
    }

    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3) {
        if let Some(b) = self.body_mut(handle) {
            b.translation = translation;
        }
    }

    fn transform(&self, handle: BodyHandle) -> Option<BodyTransform> {
        match self.entries.get(handle.0 as usize)? {
            Entry::Dynamic(b) => Some(BodyTransform::new(b.translation, b.rotation)),
            Entry::Static(s) => Some(BodyTransform::new(s.shape.center, Quat::IDENTITY)),
        }
    }

    fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        for entry in self.entries.iter_mut() {
            if let Entry::Dynamic(b) = entry {
                b.linvel += gravity * b.gravity_scale * dt;
                b.translation += b.linvel * dt;
            }
        }
        self.resolve_static_contacts();
        self.resolve_dynamic_contacts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ArenaSpec, ColliderShape};

    fn ball_at(world: &mut ArcadeWorld, pos: Vec3) -> BodyHandle {
        world.add_dynamic(
            &DynamicBodyDesc::new("ball", ColliderShape::Ball { radius: 5.0 })
                .with_mass(10.0)
                .with_material(0.6, 0.5)
                .at(pos, 0.0),
        )
    }

    #[test]
    fn test_free_fall() {
        let mut world = ArcadeWorld::new(Vec3::new(0.0, -10.0, 0.0));
        let h = ball_at(&mut world, Vec3::new(0.0, 100.0, 0.0));
        world.step(0.5);
        assert_eq!(world.linvel(h).unwrap(), Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(world.translation(h).unwrap().y, 97.5);
    }

    #[test]
    fn test_ball_settles_on_ground() {
        let mut world = ArcadeWorld::new(Vec3::new(0.0, -15.0, 0.0));
        for body in ArenaSpec::default().static_bodies() {
            world.add_static(&body);
        }
        let h = ball_at(&mut world, Vec3::new(25.0, 10.0, 0.0));
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let p = world.translation(h).unwrap();
        assert!((p.y - 5.0).abs() < 0.1, "ball at {p}");
        assert_eq!(world.linvel(h).unwrap().y, 0.0);
    }

    #[test]
    fn test_wall_bounce() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        for body in ArenaSpec::default().static_bodies() {
            world.add_static(&body);
        }
        let h = ball_at(&mut world, Vec3::new(340.0, 50.0, 0.0));
        world.set_linvel(h, Vec3::new(120.0, 0.0, 0.0));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        // Wall inner face is at x = 355, ball radius 5
        assert!(world.translation(h).unwrap().x <= 350.0 + 1e-3);
        assert!(world.linvel(h).unwrap().x < 0.0);
    }

    #[test]
    fn test_dynamic_push() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let a = ball_at(&mut world, Vec3::new(0.0, 0.0, 0.0));
        let b = ball_at(&mut world, Vec3::new(12.0, 0.0, 0.0));
        world.set_linvel(a, Vec3::new(60.0, 0.0, 0.0));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        // Momentum handed to the resting ball
        assert!(world.linvel(b).unwrap().x > 0.0);
        assert!(world.translation(b).unwrap().x > 12.0);
    }

    #[test]
    fn test_rotation_rotates_bounds() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let h = world.add_dynamic(&DynamicBodyDesc::new(
            "car",
            ColliderShape::Cuboid {
                half_extents: Vec3::new(1.0, 1.0, 4.0),
            },
        ));
        world.set_rotation(h, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let Some(Entry::Dynamic(body)) = world.entries.get(h.0 as usize) else {
            panic!("missing body");
        };
        let (_, half) = body.aabb();
        assert!((half.x - 4.0).abs() < 1e-5);
        assert!((half.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_handles_ignored() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        world.set_linvel(BodyHandle(3), Vec3::ONE);
        assert!(world.linvel(BodyHandle(3)).is_none());
        assert!(world.transform(BodyHandle(3)).is_none());
    }
}
