use glam::Vec3;

/// Closed uniform Catmull-Rom spline through a fixed set of control points.
///
/// The parameter wraps: `point(0.0)` and `point(1.0)` are the same position,
/// and every control point lies on the curve.
#[derive(Debug, Clone)]
pub struct ClosedCatmullRom {
    points: Vec<Vec3>,
}

impl ClosedCatmullRom {
    /// Needs at least 4 control points for a well-defined segment basis.
    pub fn new(points: Vec<Vec3>) -> Self {
        assert!(points.len() >= 4, "closed spline needs at least 4 points");
        Self { points }
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    fn segment(&self, t: f32) -> (Vec3, Vec3, Vec3, Vec3, f32) {
        let n = self.points.len();
        let u = t.rem_euclid(1.0) * n as f32;
        let i = (u as usize).min(n - 1);
        let local = u - i as f32;

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];

        (p0, p1, p2, p3, local)
    }

    /// Interpolated position at `t` in [0, 1), wrapping outside that range.
    pub fn point(&self, t: f32) -> Vec3 {
        let (p0, p1, p2, p3, u) = self.segment(t);
        let u2 = u * u;
        let u3 = u2 * u;

        0.5 * ((2.0 * p1)
            + (-p0 + p2) * u
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * u3)
    }

    /// First derivative with respect to the segment-local parameter.
    /// Direction is what matters for framing; callers normalize.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let (p0, p1, p2, p3, u) = self.segment(t);
        let u2 = u * u;

        0.5 * ((-p0 + p2)
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * 2.0 * u
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * 3.0 * u2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ClosedCatmullRom {
        ClosedCatmullRom::new(vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ])
    }

    #[test]
    fn curve_passes_through_control_points() {
        let spline = square();
        let n = spline.control_points().len();

        for (i, expected) in spline.control_points().iter().enumerate() {
            let p = spline.point(i as f32 / n as f32);
            assert!(p.distance(*expected) < 1e-5, "point {} off the curve", i);
        }
    }

    #[test]
    fn parameter_wraps_around() {
        let spline = square();
        assert!(spline.point(0.0).distance(spline.point(1.0)) < 1e-5);
        assert!(spline.point(0.25).distance(spline.point(1.25)) < 1e-4);
    }

    #[test]
    fn tangent_follows_curve_direction() {
        let spline = square();
        // At the first control point the curve heads toward the second.
        let tangent = spline.tangent(0.0).normalize();
        let toward_next =
            (spline.control_points()[1] - spline.control_points()[0]).normalize();
        assert!(tangent.dot(toward_next) > 0.5);
    }

    #[test]
    #[should_panic]
    fn rejects_too_few_points() {
        ClosedCatmullRom::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    }
}
