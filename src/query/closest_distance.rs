use crate::error::Result;
use crate::graph::{PathGraph, PathId};
use crate::math::Point3;
use crate::path::SampledPath;

use super::NearestPathParams;

/// Result of a closest-distance query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestDistanceResult {
    /// Arc-length distance along the path of the closest point.
    pub distance: f64,
    /// The closest point on the path.
    pub point: Point3,
    /// Euclidean distance from the query point to `point`.
    pub separation: f64,
}

/// Finds the arc-length distance on a path closest to a world point.
pub struct ClosestDistanceOnPath {
    path: PathId,
    point: Point3,
    params: NearestPathParams,
}

impl ClosestDistanceOnPath {
    /// Creates a new query with the default probe resolution.
    #[must_use]
    pub fn new(path: PathId, point: Point3) -> Self {
        Self {
            path,
            point,
            params: NearestPathParams::default(),
        }
    }

    /// Overrides the probe resolution.
    #[must_use]
    pub fn with_params(mut self, params: NearestPathParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the query.
    ///
    /// An empty path reports distance 0 at the path's fallback position.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not in the graph.
    pub fn execute(&self, graph: &PathGraph) -> Result<ClosestDistanceResult> {
        let node = graph.path(self.path)?;
        if node.sampled().is_empty() {
            let point = node.position_at_distance(0.0);
            return Ok(ClosestDistanceResult {
                distance: 0.0,
                point,
                separation: nalgebra::distance(&self.point, &point),
            });
        }
        Ok(closest_distance(node.sampled(), &self.point, self.params.probes))
    }
}

/// Probes `path` at `probes + 1` uniform distances, then narrows the
/// bracket around the best probe by ternary search. Requires a non-empty path.
pub(crate) fn closest_distance(path: &SampledPath, point: &Point3, probes: u32) -> ClosestDistanceResult {
    let probes = probes.max(1);
    let total = path.total_length();
    let separation_at = |d: f64| {
        path.position_at_distance(d)
            .map_or(f64::INFINITY, |p| nalgebra::distance(point, &p))
    };

    let mut best_d = 0.0;
    let mut best_sep = f64::INFINITY;
    for i in 0..=probes {
        let d = total * f64::from(i) / f64::from(probes);
        let sep = separation_at(d);
        if sep < best_sep {
            best_sep = sep;
            best_d = d;
        }
    }

    // Refine with ternary search around the best probe
    let step = total / f64::from(probes);
    let mut lo = (best_d - step).max(0.0);
    let mut hi = (best_d + step).min(total);
    for _ in 0..50 {
        let mid1 = lo + (hi - lo) / 3.0;
        let mid2 = hi - (hi - lo) / 3.0;
        if separation_at(mid1) < separation_at(mid2) {
            hi = mid2;
        } else {
            lo = mid1;
        }
    }

    #[allow(clippy::manual_midpoint)]
    let refined = (lo + hi) / 2.0;
    let refined_sep = separation_at(refined);
    let distance = if refined_sep < best_sep { refined } else { best_d };

    let point_on_path = path.position_at_distance(distance).unwrap_or(*point);
    ClosestDistanceResult {
        distance,
        point: point_on_path,
        separation: nalgebra::distance(point, &point_on_path),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::PathNode;
    use approx::assert_relative_eq;

    fn graph_with(points: Vec<Point3>) -> (PathGraph, PathId) {
        let mut graph = PathGraph::new();
        let id = graph.add_path(PathNode::new("road", points));
        (graph, id)
    }

    #[test]
    fn perpendicular_projection_on_straight_path() {
        let (graph, id) = graph_with(vec![Point3::origin(), Point3::new(0.0, 0.0, 100.0)]);
        let result = ClosestDistanceOnPath::new(id, Point3::new(3.0, 0.0, 42.123))
            .execute(&graph)
            .unwrap();
        assert_relative_eq!(result.distance, 42.123, epsilon = 1e-6);
        assert_relative_eq!(result.separation, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn clamps_before_start_and_after_end() {
        let (graph, id) = graph_with(vec![Point3::origin(), Point3::new(0.0, 0.0, 10.0)]);
        let before = ClosestDistanceOnPath::new(id, Point3::new(0.0, 0.0, -5.0))
            .execute(&graph)
            .unwrap();
        assert_relative_eq!(before.distance, 0.0, epsilon = 1e-9);
        let after = ClosestDistanceOnPath::new(id, Point3::new(0.0, 0.0, 15.0))
            .execute(&graph)
            .unwrap();
        assert_relative_eq!(after.distance, 10.0, epsilon = 1e-6);
        assert_relative_eq!(after.separation, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn empty_path_reports_zero() {
        let (graph, id) = graph_with(vec![Point3::origin()]);
        let result = ClosestDistanceOnPath::new(id, Point3::new(0.0, 4.0, 0.0))
            .execute(&graph)
            .unwrap();
        assert_eq!(result.distance, 0.0);
        assert_relative_eq!(result.separation, 4.0);
    }

    #[test]
    fn coarse_probes_still_refine() {
        let (graph, id) = graph_with(vec![Point3::origin(), Point3::new(0.0, 0.0, 100.0)]);
        let result = ClosestDistanceOnPath::new(id, Point3::new(1.0, 0.0, 37.0))
            .with_params(NearestPathParams { probes: 4 })
            .execute(&graph)
            .unwrap();
        assert_relative_eq!(result.distance, 37.0, epsilon = 1e-6);
    }
}
