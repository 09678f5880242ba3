use glam::Vec2;

use crate::frame::FrameInfo;

/// Camera uniform buffer data for GPU. View and projection stay separate so
/// the particle shader can billboard in view space.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

/// Per-material uniform block shared by all three materials.
/// Written once per frame, never read back.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    pub time: f32,
    pub progress: f32,
    pub mouse: [f32; 2],
}

impl MaterialUniforms {
    pub fn for_frame(frame: &FrameInfo, pointer: Vec2, progress: f32) -> Self {
        Self {
            time: frame.scaled_time(),
            progress,
            mouse: pointer.to_array(),
        }
    }
}
