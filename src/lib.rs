pub mod assets;
pub mod camera;
pub mod cli;
pub mod context;
pub mod core;
pub mod frame;
pub mod geometry;
pub mod renderer;
pub mod scene;

pub use context::RenderContext;
pub use scene::SceneGeometry;
