//! wgpu renderer for the court: GPU context, first-person camera, meshes,
//! textures and the scene/line pipelines.

pub mod camera;
pub mod context;
pub mod error;
pub mod mesh;
pub mod pipelines;
pub mod shapes;
pub mod texture;

pub use camera::{CameraUniform, FirstPersonCamera};
pub use context::RenderContext;
pub use error::RenderError;
pub use mesh::GpuMesh;
pub use texture::Texture;
