//! Centripetal Catmull-Rom spline through a list of control points.

use glam::Vec3;

use crate::mesh::MeshError;

/// Segments shorter than this are treated as unit length to avoid division by zero.
const MIN_KNOT_SPAN: f32 = 1e-4;

/// A centripetal Catmull-Rom curve (alpha = 0.5) interpolating every control point.
///
/// Open curves extrapolate phantom end points by mirroring the neighbours;
/// closed curves wrap around.
#[derive(Clone, Debug, PartialEq)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    closed: bool,
}

/// Cubic coefficients of one curve segment, all three axes at once.
#[derive(Clone, Copy)]
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    fn nonuniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self {
            c0: x1,
            c1: t1,
            c2: -3.0 * x1 + 3.0 * x2 - 2.0 * t1 - t2,
            c3: 2.0 * x1 - 2.0 * x2 + t1 + t2,
        }
    }

    fn eval(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

impl CatmullRomCurve {
    /// Build a curve through `points`.
    ///
    /// # Errors
    ///
    /// [`MeshError::TooFewPoints`] when fewer than two points are given.
    pub fn new(points: Vec<Vec3>, closed: bool) -> Result<Self, MeshError> {
        if points.len() < 2 {
            return Err(MeshError::TooFewPoints(points.len()));
        }
        Ok(Self { points, closed })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn point(&self, t: f32) -> Vec3 {
        let pts = &self.points;
        let l = pts.len();
        let span = if self.closed { l } else { l - 1 };
        let p = span as f32 * t.clamp(0.0, 1.0);

        let mut segment = p.floor() as usize;
        let mut weight = p - segment as f32;
        if self.closed {
            segment %= l;
        } else if segment >= l - 1 {
            segment = l - 2;
            weight = 1.0;
        }

        let p1 = pts[segment];
        let p2 = pts[(segment + 1) % l];
        let p0 = if self.closed || segment > 0 {
            pts[(segment + l - 1) % l]
        } else {
            2.0 * pts[0] - pts[1]
        };
        let p3 = if self.closed || segment + 2 < l {
            pts[(segment + 2) % l]
        } else {
            2.0 * pts[l - 1] - pts[l - 2]
        };

        // Centripetal parameterization: knot spans are sqrt of chord length.
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < MIN_KNOT_SPAN {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPAN {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPAN {
            dt2 = dt1;
        }

        Cubic::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2).eval(weight)
    }

    /// Unit tangent at `t`, by central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        const DELTA: f32 = 1e-4;
        let t0 = (t - DELTA).max(0.0);
        let t1 = (t + DELTA).min(1.0);
        let d = self.point(t1) - self.point(t0);
        if d.length_squared() > 0.0 {
            d.normalize()
        } else {
            (self.points[1] - self.points[0]).normalize_or_zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_points() -> Vec<Vec3> {
        (0..=20)
            .map(|i| {
                let t = i as f32 / 20.0;
                let a = t * std::f32::consts::FRAC_PI_4;
                Vec3::new(a.cos() * 2.0, (t * std::f32::consts::PI).sin(), a.sin() * 2.0)
            })
            .collect()
    }

    #[test]
    fn test_curve_passes_through_endpoints() {
        let pts = arc_points();
        let curve = CatmullRomCurve::new(pts.clone(), false).unwrap();
        assert!((curve.point(0.0) - pts[0]).length() < 1e-5);
        assert!((curve.point(1.0) - pts[20]).length() < 1e-5);
    }

    #[test]
    fn test_curve_interpolates_control_points() {
        let pts = arc_points();
        let curve = CatmullRomCurve::new(pts.clone(), false).unwrap();
        for (i, p) in pts.iter().enumerate() {
            let t = i as f32 / 20.0;
            assert!(
                (curve.point(t) - *p).length() < 1e-4,
                "control point {i} not interpolated"
            );
        }
    }

    #[test]
    fn test_straight_line_stays_straight() {
        let curve =
            CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Vec3::X * 3.0], false)
                .unwrap();
        for i in 0..=30 {
            let p = curve.point(i as f32 / 30.0);
            assert!(p.y.abs() < 1e-5 && p.z.abs() < 1e-5);
        }
        assert!((curve.tangent(0.5) - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_closed_curve_wraps() {
        let square = vec![Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z];
        let curve = CatmullRomCurve::new(square, true).unwrap();
        assert!((curve.point(0.0) - curve.point(1.0)).length() < 1e-5);
        assert!((curve.point(0.25) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(
            CatmullRomCurve::new(vec![Vec3::ZERO], false),
            Err(MeshError::TooFewPoints(1))
        );
    }
}
