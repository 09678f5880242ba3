use super::mesh::{Mesh, MeshVertex};

pub const QUAD_WIDTH: f32 = 20.0;
pub const QUAD_HEIGHT: f32 = 10.0;
/// The quad sits behind the knot and the particle cloud.
pub const QUAD_Z: f32 = -2.0;

/// Flat rectangle in the XY plane at depth `z`, facing +Z.
pub fn build_quad(width: f32, height: f32, z: f32) -> Mesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let normal = [0.0, 0.0, 1.0];

    let vertices = vec![
        MeshVertex {
            position: [-hw, -hh, z],
            normal,
            uv: [0.0, 1.0],
        },
        MeshVertex {
            position: [hw, -hh, z],
            normal,
            uv: [1.0, 1.0],
        },
        MeshVertex {
            position: [hw, hh, z],
            normal,
            uv: [1.0, 0.0],
        },
        MeshVertex {
            position: [-hw, hh, z],
            normal,
            uv: [0.0, 0.0],
        },
    ];

    let indices = vec![0, 1, 2, 0, 2, 3];

    Mesh { vertices, indices }
}
