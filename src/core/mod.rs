pub mod gpu_context;
pub mod texture;
pub mod uniforms;

pub use gpu_context::GpuContext;
pub use texture::Texture;
pub use uniforms::{CameraUniform, MaterialUniforms};
