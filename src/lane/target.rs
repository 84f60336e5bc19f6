use tracing::debug;

use crate::error::{LaneChangeError, Result};
use crate::geometry::{Plane, Pose};
use crate::graph::{PathGraph, PathId, PathNode};
use crate::math::intersect_3d::segment_plane_crossing;
use crate::math::{Point3, Vector3};
use crate::query::closest_distance;
use crate::travel::Traveler;

use super::{LaneChangeConfig, LaneTargetStrategy};

/// Control points a target lane needs for its polyline to have a segment.
const MIN_TARGET_POINTS: usize = 2;

/// Control points `node` needs to be a usable lane change target.
fn required_points(node: &PathNode) -> usize {
    node.sampling().kind.min_control_points().max(MIN_TARGET_POINTS)
}

/// End pose of a lane change and its arc-length distance on the target lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneTarget {
    pub pose: Pose,
    pub distance: f64,
}

/// Computes where a lane change from the traveler's current pose onto
/// `target` should end.
///
/// # Errors
///
/// Returns an error if `target` is not in the graph or has fewer control
/// points than its curve family needs.
pub fn resolve_target(
    graph: &PathGraph,
    traveler: &Traveler,
    target: PathId,
    config: &LaneChangeConfig,
) -> Result<LaneTarget> {
    let node = graph.path(target)?;
    let found = node.control_points().len();
    let required = required_points(node);
    if found < required || node.sampled().is_empty() {
        return Err(LaneChangeError::TooFewControlPoints { found, required }.into());
    }

    let travel = traveler.speed() * config.duration;
    let signed_travel = if traveler.is_forward() { travel } else { -travel };

    let distance = match config.strategy {
        LaneTargetStrategy::SameDistance => traveler.distance(),
        LaneTargetStrategy::Lookahead => traveler.distance() + signed_travel,
        LaneTargetStrategy::PlaneIntersection => {
            let pose = traveler.pose();
            let ahead = pose.position + pose.forward() * travel;
            let point = plane_crossing(node, &ahead, &pose.forward())
                .unwrap_or_else(|| nearest_control_point(node, &ahead));
            closest_distance(node.sampled(), &point, config.nearest.probes).distance
        }
    };
    let distance = node.sampled().clamp_distance(distance);

    Ok(LaneTarget {
        pose: node.pose_at_distance(distance, traveler.is_forward()),
        distance,
    })
}

/// Crossing of the target's control-point polyline with the plane through
/// `ahead` facing `heading`, nearest to `ahead`.
fn plane_crossing(node: &PathNode, ahead: &Point3, heading: &Vector3) -> Option<Point3> {
    let plane = Plane::from_normal(*ahead, *heading).ok()?;
    let points = node.world_control_points();

    let crossing = points
        .windows(2)
        .filter_map(|seg| segment_plane_crossing(&seg[0], &seg[1], &plane))
        .map(|(p, _)| p)
        .min_by(|a, b| {
            nalgebra::distance(a, ahead).total_cmp(&nalgebra::distance(b, ahead))
        });

    if crossing.is_none() {
        debug!(path = node.name(), "no plane crossing on target lane, using nearest control point");
    }
    crossing
}

fn nearest_control_point(node: &PathNode, ahead: &Point3) -> Point3 {
    node.world_control_points()
        .into_iter()
        .min_by(|a, b| nalgebra::distance(a, ahead).total_cmp(&nalgebra::distance(b, ahead)))
        .unwrap_or(*ahead)
}
