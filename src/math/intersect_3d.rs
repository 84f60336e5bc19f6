use crate::geometry::Plane;

use super::{Point3, Vector3, TOLERANCE};

/// Relationship of a line with a plane.
#[derive(Debug)]
pub enum LinePlaneRelation {
    /// Line intersects the plane at a single point.
    Point { point: Point3, t: f64 },
    /// Line is parallel to the plane (does not intersect).
    Parallel,
    /// Line lies entirely on the plane.
    OnPlane,
}

/// Computes the intersection of a line `origin + t * dir` with a plane.
#[must_use]
pub fn line_plane_intersect(origin: &Point3, dir: &Vector3, plane: &Plane) -> LinePlaneRelation {
    let normal = plane.plane_normal();
    let denom = normal.dot(dir);

    let diff = plane.origin() - origin;
    let numer = normal.dot(&diff);

    if denom.abs() < TOLERANCE {
        if numer.abs() < TOLERANCE {
            LinePlaneRelation::OnPlane
        } else {
            LinePlaneRelation::Parallel
        }
    } else {
        let t = numer / denom;
        let point = origin + dir * t;
        LinePlaneRelation::Point { point, t }
    }
}

/// Finds where the segment `a → b` crosses a plane.
///
/// Returns the crossing point and its fraction along the segment, or `None`
/// when the segment stays on one side, runs parallel, or lies on the plane.
#[must_use]
pub fn segment_plane_crossing(a: &Point3, b: &Point3, plane: &Plane) -> Option<(Point3, f64)> {
    let dir = b - a;
    match line_plane_intersect(a, &dir, plane) {
        LinePlaneRelation::Point { point, t } if (-TOLERANCE..=1.0 + TOLERANCE).contains(&t) => {
            Some((point, t.clamp(0.0, 1.0)))
        }
        _ => None,
    }
}
