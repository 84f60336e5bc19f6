use tracing::debug;

use crate::graph::{PathGraph, PathId};
use crate::math::Point3;

use super::closest_distance::closest_distance;
use super::NearestPathParams;

/// The path chosen by a nearest-path search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPathResult {
    pub path: PathId,
    /// Arc-length distance of the closest point on `path`.
    pub distance: f64,
    /// Euclidean distance from the query point to the path.
    pub separation: f64,
}

/// Picks, among candidate paths, the one passing closest to a point.
pub struct NearestPath {
    point: Point3,
    params: NearestPathParams,
}

impl NearestPath {
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            params: NearestPathParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: NearestPathParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the search over `candidates`.
    ///
    /// Unknown IDs and empty paths are skipped. Returns `None` when no
    /// candidate is usable.
    #[must_use]
    pub fn execute(&self, graph: &PathGraph, candidates: &[PathId]) -> Option<NearestPathResult> {
        let mut best: Option<NearestPathResult> = None;

        for &id in candidates {
            let Ok(node) = graph.path(id) else {
                continue;
            };
            if node.sampled().is_empty() {
                debug!(path = node.name(), "skipping path with no length");
                continue;
            }

            let found = closest_distance(node.sampled(), &self.point, self.params.probes);
            debug!(
                path = node.name(),
                separation = found.separation,
                distance = found.distance,
                "checked path"
            );

            if best.is_none_or(|b| found.separation < b.separation) {
                best = Some(NearestPathResult {
                    path: id,
                    distance: found.distance,
                    separation: found.separation,
                });
            }
        }

        best
    }
}
