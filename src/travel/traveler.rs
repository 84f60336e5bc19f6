use tracing::{debug, warn};

use crate::error::{GraphError, TravelError};
use crate::event::{AgentId, EventBus, PathEvent};
use crate::geometry::Pose;
use crate::graph::{PathGraph, PathId};
use crate::query::{NearestPath, NearestPathParams, NearestPathResult};

use super::TravelConfig;

/// Path boundary reached during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Forward travel hit the path's total length.
    End,
    /// Backward travel hit distance 0.
    Start,
}

/// A boundary crossing and the distance that went past it before clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    pub boundary: Boundary,
    pub overflow: f64,
}

/// An entity whose position is a scalar distance along a path.
///
/// The traveler is either stopped or moving. While moving, each
/// [`advance`](Self::advance) adds `speed * dt` in the travel direction and
/// clamps to the path. Hitting either end publishes the matching boundary
/// event and stops the traveler; continuing onto a linked path is left to
/// the caller (see [`RouteFollower`](super::RouteFollower)).
#[derive(Debug, Clone)]
pub struct Traveler {
    agent: AgentId,
    path: Option<PathId>,
    distance: f64,
    config: TravelConfig,
    moving: bool,
    suspended: bool,
    pose: Pose,
}

impl Traveler {
    /// Creates a stopped traveler with no path.
    #[must_use]
    pub fn new(agent: AgentId, config: TravelConfig) -> Self {
        Self {
            agent,
            path: None,
            distance: 0.0,
            config,
            moving: false,
            suspended: false,
            pose: Pose::default(),
        }
    }

    #[must_use]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[must_use]
    pub fn path(&self) -> Option<PathId> {
        self.path
    }

    /// Distance along the current path.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
    }

    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.config.forward
    }

    /// Changes the travel direction and turns the pose to match.
    pub fn set_forward(&mut self, graph: &PathGraph, forward: bool) {
        self.config.forward = forward;
        self.refresh_pose(graph);
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// `true` while a lane change owns the pose.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Current world pose.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Starts moving along the assigned path.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::NoPath`] if no path is assigned; the traveler
    /// stays stopped.
    pub fn start_moving(&mut self, bus: &mut EventBus) -> Result<(), TravelError> {
        if self.path.is_none() {
            warn!(agent = ?self.agent, "cannot start moving without a path");
            return Err(TravelError::NoPath);
        }
        self.moving = true;
        bus.publish(PathEvent::StartedMoving { agent: self.agent });
        debug!(agent = ?self.agent, "started moving");
        Ok(())
    }

    /// Stops moving. Safe to call while already stopped.
    pub fn stop_moving(&mut self, bus: &mut EventBus) {
        self.moving = false;
        bus.publish(PathEvent::StoppedMoving { agent: self.agent });
        debug!(agent = ?self.agent, "stopped moving");
    }

    /// Advances the traveler by `dt` seconds.
    ///
    /// Does nothing while stopped or suspended. Returns the boundary hit
    /// during this update, after its event has been published and the
    /// traveler stopped.
    pub fn advance(
        &mut self,
        graph: &PathGraph,
        dt: f64,
        bus: &mut EventBus,
    ) -> Option<BoundaryHit> {
        if !self.moving || self.suspended {
            return None;
        }
        let path_id = self.path?;
        let Ok(node) = graph.path(path_id) else {
            warn!(agent = ?self.agent, "assigned path no longer exists, stopping");
            self.stop_moving(bus);
            return None;
        };

        let total = node.total_length();
        let step = self.config.speed * dt;
        let mut boundary = None;

        if self.config.forward {
            self.distance += step;
            if self.distance >= total {
                bus.publish(PathEvent::ReachedPathEnd {
                    agent: self.agent,
                    path: path_id,
                });
                boundary = Some(BoundaryHit {
                    boundary: Boundary::End,
                    overflow: self.distance - total,
                });
            }
        } else {
            self.distance -= step;
            if self.distance <= 0.0 {
                bus.publish(PathEvent::ReachedPathStart {
                    agent: self.agent,
                    path: path_id,
                });
                boundary = Some(BoundaryHit {
                    boundary: Boundary::Start,
                    overflow: -self.distance,
                });
            }
        }

        if boundary.is_some() {
            self.stop_moving(bus);
        }

        self.distance = self.distance.clamp(0.0, total);
        self.pose = node.pose_at_distance(self.distance, self.config.forward);
        boundary
    }

    /// Places the traveler on `path` at `distance` (clamped to the path)
    /// and snaps the pose there.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not in the graph; nothing changes.
    pub fn set_path(
        &mut self,
        graph: &PathGraph,
        path: PathId,
        distance: f64,
    ) -> Result<(), GraphError> {
        let node = graph.path(path)?;
        self.path = Some(path);
        self.distance = node.sampled().clamp_distance(distance);
        self.pose = node.pose_at_distance(self.distance, self.config.forward);
        Ok(())
    }

    /// Moves along the current path to `distance`, clamped.
    pub fn set_distance(&mut self, graph: &PathGraph, distance: f64) {
        match self.path.and_then(|id| graph.path(id).ok()) {
            Some(node) => {
                self.distance = node.sampled().clamp_distance(distance);
                self.pose = node.pose_at_distance(self.distance, self.config.forward);
            }
            None => self.distance = distance,
        }
    }

    /// Snaps onto whichever candidate passes closest to the current position.
    ///
    /// Keeps the current path when no candidate is usable.
    pub fn find_nearest_path(
        &mut self,
        graph: &PathGraph,
        candidates: &[PathId],
        params: NearestPathParams,
    ) -> Option<NearestPathResult> {
        let Some(found) = NearestPath::new(self.pose.position)
            .with_params(params)
            .execute(graph, candidates)
        else {
            warn!(
                agent = ?self.agent,
                candidates = candidates.len(),
                "no path found to snap to, keeping current path"
            );
            return None;
        };

        // The winner was just read from the graph.
        if self.set_path(graph, found.path, found.distance).is_err() {
            return None;
        }
        debug!(
            agent = ?self.agent,
            distance = found.distance,
            separation = found.separation,
            "snapped to nearest path"
        );
        Some(found)
    }

    /// Recomputes the pose from the current path and distance.
    pub fn refresh_pose(&mut self, graph: &PathGraph) {
        if self.suspended {
            return;
        }
        if let Some(node) = self.path.and_then(|id| graph.path(id).ok()) {
            self.pose = node.pose_at_distance(self.distance, self.config.forward);
        }
    }

    /// Overrides the pose, e.g. to place an entity before snapping.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub(crate) fn suspend(&mut self) {
        self.suspended = true;
    }

    pub(crate) fn resume(&mut self) {
        self.suspended = false;
    }
}
