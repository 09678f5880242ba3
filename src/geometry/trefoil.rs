use glam::Vec3;
use std::f32::consts::TAU;

/// Number of equally spaced angle samples taken around the closed knot.
pub const CURVE_SAMPLES: usize = 100;

/// Point on the trefoil knot at angle `theta`.
///
/// https://en.wikipedia.org/wiki/Trefoil_knot
pub fn trefoil_point(theta: f32) -> Vec3 {
    Vec3::new(
        theta.sin() + 2.0 * (2.0 * theta).sin(),
        theta.cos() - 2.0 * (2.0 * theta).cos(),
        -(3.0 * theta).sin(),
    )
}

/// Equally spaced samples around the closed trefoil curve. The curve closes
/// on itself, so the sample at angle 2π is deliberately not repeated.
pub fn sample_trefoil(samples: usize) -> Vec<Vec3> {
    (0..samples)
        .map(|i| trefoil_point(TAU * i as f32 / samples as f32))
        .collect()
}
