//! Renderer boundary
//!
//! Drawing is done by an external renderer; the scene only tells it what
//! exists and where. Static arena geometry is registered once, dynamic
//! bodies once their model has loaded, and every frame gets one instance
//! per drawable body.

pub mod camera;
pub mod shapes;
pub mod vertex;

pub use camera::CameraRig;
pub use shapes::{box_mesh, material_color};
pub use vertex::{BodyInstance, Vertex, instance_bytes};

use crate::assets::ModelKey;
use crate::sim::{BodyHandle, StaticBody};

/// A dynamic body's look, bound to its live transform
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableDesc {
    pub label: String,
    pub model: ModelKey,
    pub scale: f32,
    pub tint: [f32; 4],
}

/// What the scene needs from a renderer
pub trait RenderSink {
    fn register_static(&mut self, body: &StaticBody);
    fn register_dynamic(&mut self, handle: BodyHandle, drawable: &DrawableDesc);
    fn set_camera(&mut self, camera: &CameraRig);
    /// One frame's worth of dynamic body instances, in registration order
    fn draw(&mut self, instances: &[(BodyHandle, BodyInstance)]);
}

/// Renderer that keeps everything it is given (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub statics: Vec<StaticBody>,
    /// Static meshes built for visible static bodies
    pub static_meshes: Vec<Vec<Vertex>>,
    pub dynamics: Vec<(BodyHandle, DrawableDesc)>,
    pub camera: Option<CameraRig>,
    pub frames: usize,
    pub last_frame: Vec<(BodyHandle, BodyInstance)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for RecordingRenderer {
    fn register_static(&mut self, body: &StaticBody) {
        if let Some(color) = material_color(&body.material) {
            self.static_meshes.push(box_mesh(&body.shape, color));
        }
        self.statics.push(body.clone());
    }

    fn register_dynamic(&mut self, handle: BodyHandle, drawable: &DrawableDesc) {
        self.dynamics.push((handle, drawable.clone()));
    }

    fn set_camera(&mut self, camera: &CameraRig) {
        self.camera = Some(*camera);
    }

    fn draw(&mut self, instances: &[(BodyHandle, BodyInstance)]) {
        self.frames += 1;
        self.last_frame = instances.to_vec();
    }
}
