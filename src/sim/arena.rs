//! Arena definition
//!
//! Pure data describing the pitch: the ground slab, four invisible boundary
//! walls and a goal frame at each end (mirrored front/back). The same list of
//! [`StaticBody`] values is handed to the physics engine and to the renderer,
//! so colliders and drawn geometry cannot disagree.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::containment::ArenaBounds;

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxShape {
    /// Box from its center and full size
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }
}

/// Static geometry categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticKind {
    Ground,
    Wall,
    GoalPost,
    Crossbar,
}

/// How a static body looks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Color([f32; 4]),
    /// Image texture, rotated about the surface normal (radians)
    Texture { path: String, rotation: f32 },
    /// Collides but is never drawn
    Invisible,
}

/// Immovable collider plus its render material
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBody {
    pub label: &'static str,
    pub kind: StaticKind,
    pub shape: BoxShape,
    pub restitution: f32,
    pub friction: f32,
    pub material: Material,
}

/// Colors for arena elements
pub mod colors {
    pub const GOAL_FRAME: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const WALL: [f32; 4] = [1.0, 1.0, 1.0, 0.0];
}

/// Playing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub width: f32,
    pub length: f32,
    /// Depth of the collision slab below y = 0
    pub thickness: f32,
    pub restitution: f32,
    pub friction: f32,
    pub texture: String,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            width: 720.0,
            length: 1060.0,
            thickness: 10.0,
            restitution: 0.2,
            friction: 1.0,
            texture: "terrain.png".to_string(),
        }
    }
}

/// Invisible boundary walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSpec {
    /// Distance between the side walls' centers
    pub width: f32,
    /// Distance between the end walls' centers
    pub length: f32,
    pub height: f32,
    pub thickness: f32,
    pub restitution: f32,
    pub friction: f32,
    pub visible: bool,
}

impl Default for WallSpec {
    fn default() -> Self {
        Self {
            width: 720.0,
            length: 1000.0,
            height: 600.0,
            thickness: 10.0,
            restitution: 0.5,
            friction: 0.0,
            visible: false,
        }
    }
}

/// Goal frame (two posts and a crossbar) at each end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalSpec {
    pub width: f32,
    pub height: f32,
    /// Posts stand this far in front of the goal line
    pub depth: f32,
    pub post_thickness: f32,
    /// |z| of the goal line
    pub line_z: f32,
}

impl Default for GoalSpec {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 80.0,
            depth: 50.0,
            post_thickness: 5.0,
            line_z: 500.0,
        }
    }
}

/// Complete static description of the pitch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSpec {
    pub field: FieldSpec,
    pub walls: WallSpec,
    pub goals: GoalSpec,
}

impl ArenaSpec {
    /// Clamp bounds for position-clamp containment; the wall thickness is the margin
    pub fn bounds(&self) -> ArenaBounds {
        ArenaBounds::from_field(self.walls.width, self.walls.length, self.walls.thickness)
    }

    /// Every static body, in registration order: ground, walls, goals
    pub fn static_bodies(&self) -> Vec<StaticBody> {
        let mut bodies = Vec::with_capacity(11);
        bodies.push(self.ground());
        bodies.extend(self.walls());
        bodies.extend(self.goal_frame(-1.0));
        bodies.extend(self.goal_frame(1.0));
        bodies
    }

    fn ground(&self) -> StaticBody {
        let f = &self.field;
        StaticBody {
            label: "field",
            kind: StaticKind::Ground,
            // Top face sits at y = 0
            shape: BoxShape::new(
                Vec3::new(0.0, -f.thickness / 2.0, 0.0),
                Vec3::new(f.width, f.thickness, f.length),
            ),
            restitution: f.restitution,
            friction: f.friction,
            material: Material::Texture {
                path: f.texture.clone(),
                rotation: std::f32::consts::FRAC_PI_2,
            },
        }
    }

    fn walls(&self) -> [StaticBody; 4] {
        let w = &self.walls;
        let y = w.height / 2.0;
        let material = if w.visible {
            Material::Color(colors::WALL)
        } else {
            Material::Invisible
        };
        let wall = |label, center: Vec3, size: Vec3| StaticBody {
            label,
            kind: StaticKind::Wall,
            shape: BoxShape::new(center, size),
            restitution: w.restitution,
            friction: w.friction,
            material: material.clone(),
        };
        let end = Vec3::new(w.width, w.height, w.thickness);
        let side = Vec3::new(w.thickness, w.height, w.length);
        [
            wall("wall_front", Vec3::new(0.0, y, -w.length / 2.0), end),
            wall("wall_back", Vec3::new(0.0, y, w.length / 2.0), end),
            wall("wall_left", Vec3::new(-w.width / 2.0, y, 0.0), side),
            wall("wall_right", Vec3::new(w.width / 2.0, y, 0.0), side),
        ]
    }

    /// Posts and crossbar for the goal at `side * line_z` (-1 front, +1 back)
    fn goal_frame(&self, side: f32) -> [StaticBody; 3] {
        let g = &self.goals;
        let t = g.post_thickness;
        // Frame stands `depth / 2` toward the center from the goal line
        let z = side * (g.line_z - g.depth / 2.0);
        let part = |label, kind, center: Vec3, size: Vec3| StaticBody {
            label,
            kind,
            shape: BoxShape::new(center, size),
            restitution: 0.0,
            friction: 0.5,
            material: Material::Color(colors::GOAL_FRAME),
        };
        let post = Vec3::new(t, g.height, t);
        let (left, right, bar) = if side < 0.0 {
            ("goal_front_left", "goal_front_right", "goal_front_crossbar")
        } else {
            ("goal_back_left", "goal_back_right", "goal_back_crossbar")
        };
        [
            part(left, StaticKind::GoalPost, Vec3::new(-g.width / 2.0, g.height / 2.0, z), post),
            part(right, StaticKind::GoalPost, Vec3::new(g.width / 2.0, g.height / 2.0, z), post),
            part(
                bar,
                StaticKind::Crossbar,
                Vec3::new(0.0, g.height, z),
                Vec3::new(g.width, t, t),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_body_count() {
        let arena = ArenaSpec::default();
        let bodies = arena.static_bodies();
        assert_eq!(bodies.len(), 11);
        assert_eq!(bodies[0].kind, StaticKind::Ground);
        assert_eq!(bodies.iter().filter(|b| b.kind == StaticKind::Wall).count(), 4);
        assert_eq!(bodies.iter().filter(|b| b.kind == StaticKind::GoalPost).count(), 4);
    }

    #[test]
    fn test_ground_top_at_zero() {
        let ground = &ArenaSpec::default().static_bodies()[0];
        assert!(ground.shape.max().y.abs() < 1e-6);
        assert_eq!(ground.shape.size().x, 720.0);
        assert_eq!(ground.shape.size().z, 1060.0);
    }

    #[test]
    fn test_walls_enclose_bounds() {
        let arena = ArenaSpec::default();
        let bounds = arena.bounds();
        for wall in arena.static_bodies().iter().filter(|b| b.kind == StaticKind::Wall) {
            // No wall intrudes on the clamp region
            let lo = wall.shape.min();
            let hi = wall.shape.max();
            let inside_x = lo.x > -bounds.half_width && hi.x < bounds.half_width;
            let inside_z = lo.z > -bounds.half_length && hi.z < bounds.half_length;
            assert!(!(inside_x && inside_z), "{} overlaps play area", wall.label);
            assert_eq!(wall.material, Material::Invisible);
        }
    }

    #[test]
    fn test_goals_mirrored() {
        let bodies = ArenaSpec::default().static_bodies();
        let front: Vec<_> = bodies.iter().filter(|b| b.label.starts_with("goal_front")).collect();
        let back: Vec<_> = bodies.iter().filter(|b| b.label.starts_with("goal_back")).collect();
        assert_eq!(front.len(), 3);
        for (f, b) in front.iter().zip(&back) {
            assert_eq!(f.shape.center.x, b.shape.center.x);
            assert_eq!(f.shape.center.y, b.shape.center.y);
            assert_eq!(f.shape.center.z, -b.shape.center.z);
            assert_eq!(f.shape.half_extents, b.shape.half_extents);
        }
        // Posts at z = ±475
        assert_eq!(front[0].shape.center.z, -475.0);
    }

    #[test]
    fn test_arena_json_partial() {
        let arena: ArenaSpec = serde_json::from_str(r#"{"walls":{"width":500.0}}"#).unwrap();
        assert_eq!(arena.walls.width, 500.0);
        assert_eq!(arena.walls.length, 1000.0);
        assert_eq!(arena.goals, GoalSpec::default());
    }
}
