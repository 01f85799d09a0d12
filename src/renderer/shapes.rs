//! Mesh generation for static arena geometry

use glam::Vec3;

use super::vertex::Vertex;
use crate::sim::{BoxShape, Material};

/// Neutral color used for textured surfaces (the texture supplies the rest)
const TEXTURED_BASE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Vertex color for a material; `None` for geometry that is never drawn
pub fn material_color(material: &Material) -> Option<[f32; 4]> {
    match material {
        Material::Color(c) => Some(*c),
        Material::Texture { .. } => Some(TEXTURED_BASE),
        Material::Invisible => None,
    }
}

/// Triangle list for a box: 6 faces, 2 triangles each, outward normals
pub fn box_mesh(shape: &BoxShape, color: [f32; 4]) -> Vec<Vertex> {
    let c = shape.center;
    let h = shape.half_extents;
    // (normal, u axis, v axis) per face; u x v == normal keeps winding CCW from outside
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let center = c + n * h;
        let du = u * h;
        let dv = v * h;
        let corners = [
            center - du - dv,
            center + du - dv,
            center + du + dv,
            center - du + dv,
        ];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex::new(corners[i].to_array(), n.to_array(), color));
        }
    }
    vertices
}

/// Bounds of a generated mesh (min, max)
pub fn mesh_bounds(vertices: &[Vertex]) -> Option<(Vec3, Vec3)> {
    let first = Vec3::from_array(vertices.first()?.position);
    Some(vertices.iter().fold((first, first), |(lo, hi), v| {
        let p = Vec3::from_array(v.position);
        (lo.min(p), hi.max(p))
    }))
}
