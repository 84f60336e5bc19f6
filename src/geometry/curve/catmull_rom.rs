use crate::math::Point3;

/// Evaluates a uniform Catmull-Rom segment at `t ∈ [0, 1]`.
///
/// The segment runs from `p1` (t = 0) to `p2` (t = 1); `p0` and `p3` only
/// shape the tangents.
#[must_use]
pub fn catmull_rom(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3, t: f64) -> Point3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let c0 = -0.5 * t3 + t2 - 0.5 * t;
    let c1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let c2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let c3 = 0.5 * t3 - 0.5 * t2;
    Point3::from(p0.coords * c0 + p1.coords * c1 + p2.coords * c2 + p3.coords * c3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> [Point3; 4] {
        [
            Point3::new(-1.0, 0.0, -2.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 3.0),
            Point3::new(4.0, 1.0, 5.0),
        ]
    }

    #[test]
    fn passes_through_inner_points() {
        let [p0, p1, p2, p3] = quad();
        assert_relative_eq!(catmull_rom(&p0, &p1, &p2, &p3, 0.0), p1);
        assert_relative_eq!(catmull_rom(&p0, &p1, &p2, &p3, 1.0), p2, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_stay_on_line() {
        let pts: Vec<Point3> = (0..4).map(|i| Point3::new(0.0, 0.0, f64::from(i))).collect();
        let mid = catmull_rom(&pts[0], &pts[1], &pts[2], &pts[3], 0.5);
        assert_relative_eq!(mid, Point3::new(0.0, 0.0, 1.5), epsilon = 1e-12);
    }
}
