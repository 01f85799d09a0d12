//! GPU-ready vertex and instance types

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Static geometry vertex with position, normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Per-body instance data: model matrix columns plus a tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl BodyInstance {
    pub fn new(model: Mat4, tint: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Raw bytes for an instance buffer upload
pub fn instance_bytes(instances: &[BodyInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// Tints for dynamic bodies
pub mod colors {
    pub const PLAYER_ONE: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const PLAYER_TWO: [f32; 4] = [0.2, 0.6, 0.9, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
