use crate::math::Point3;

/// Evaluates a cubic Bezier segment in Bernstein form at `t ∈ [0, 1]`.
///
/// The curve starts at `p0` and ends at `p3`; `p1` and `p2` are the handles.
#[must_use]
pub fn cubic_bezier(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3, t: f64) -> Point3 {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    Point3::from(
        p0.coords * (uu * u)
            + p1.coords * (3.0 * uu * t)
            + p2.coords * (3.0 * u * tt)
            + p3.coords * (tt * t),
    )
}
