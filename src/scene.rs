use glam::Vec3;
use log::info;

use crate::geometry::{
    build_quad, build_tube, sample_trefoil, ClosedCatmullRom, Mesh, ParticleCloud,
    CURVE_SAMPLES, PARTICLE_COUNT, QUAD_HEIGHT, QUAD_WIDTH, QUAD_Z, RADIAL_SEGMENTS,
    TUBE_RADIUS, TUBULAR_SEGMENTS,
};

/// CPU-side geometry for the three drawables, built once at startup and
/// uploaded once. The particle cloud, the knot tube, and the caustics quad
/// are the only objects in the scene.
pub struct SceneGeometry {
    pub particles: ParticleCloud,
    pub curve_points: Vec<Vec3>,
    pub tube: Mesh,
    pub quad: Mesh,
}

impl SceneGeometry {
    pub fn build() -> Self {
        let particles = ParticleCloud::generate(PARTICLE_COUNT, &mut rand::thread_rng());

        let curve_points = sample_trefoil(CURVE_SAMPLES);
        let path = ClosedCatmullRom::new(curve_points.clone());
        let tube = build_tube(&path, TUBULAR_SEGMENTS, TUBE_RADIUS, RADIAL_SEGMENTS);

        let quad = build_quad(QUAD_WIDTH, QUAD_HEIGHT, QUAD_Z);

        info!(
            "scene built: {} particles, tube {} verts / {} indices, quad {} verts",
            particles.len(),
            tube.vertices.len(),
            tube.indices.len(),
            quad.vertices.len()
        );

        Self {
            particles,
            curve_points,
            tube,
            quad,
        }
    }
}
