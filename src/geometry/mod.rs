pub mod mesh;
pub mod particles;
pub mod plane;
pub mod spline;
pub mod trefoil;
pub mod tube;

pub use mesh::{Mesh, MeshVertex};
pub use particles::{ParticleCloud, ParticleInstance, PARTICLE_COUNT};
pub use plane::{build_quad, QUAD_HEIGHT, QUAD_WIDTH, QUAD_Z};
pub use spline::ClosedCatmullRom;
pub use trefoil::{sample_trefoil, trefoil_point, CURVE_SAMPLES};
pub use tube::{build_tube, RADIAL_SEGMENTS, TUBE_RADIUS, TUBULAR_SEGMENTS};
