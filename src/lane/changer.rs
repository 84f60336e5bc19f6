use tracing::{debug, warn};

use crate::error::{LaneChangeError, Result};
use crate::event::{EventBus, PathEvent};
use crate::geometry::Pose;
use crate::graph::{PathGraph, PathId};
use crate::query::closest_distance;
use crate::travel::Traveler;

use super::target::resolve_target;
use super::{LaneChangeConfig, LaneTargetStrategy};

/// Slack absorbing accumulated `dt` rounding when comparing elapsed time
/// against durations and cooldowns.
const TIME_EPSILON: f64 = 1e-9;

/// An in-flight lane change.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneChangeState {
    /// Lane the traveler was on when the change started.
    pub origin: PathId,
    /// Lane being moved to.
    pub target: PathId,
    /// Traveler distance on the origin lane when the change started.
    pub start_distance: f64,
    pub elapsed: f64,
    pub duration: f64,
    pub start_pose: Pose,
    pub target_pose: Pose,
    /// Last interpolated pose.
    pub current_pose: Pose,
}

impl LaneChangeState {
    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.elapsed + TIME_EPSILON >= self.duration {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Drives timed transitions of a [`Traveler`] between parallel lanes.
///
/// While a change is active the traveler is suspended and its pose is the
/// interpolation between the start pose and the target pose. On completion
/// the traveler is re-anchored on the target lane at the arc-length distance
/// closest to where the interpolation ended.
#[derive(Debug, Clone)]
pub struct LaneChanger {
    config: LaneChangeConfig,
    since_last_start: Option<f64>,
    active: Option<LaneChangeState>,
}

impl LaneChanger {
    #[must_use]
    pub fn new(config: LaneChangeConfig) -> Self {
        Self {
            config,
            since_last_start: None,
            active: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LaneChangeConfig {
        &self.config
    }

    /// The active change, if any.
    #[must_use]
    pub fn active(&self) -> Option<&LaneChangeState> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_changing(&self) -> bool {
        self.active.is_some()
    }

    /// `true` iff a change could start right now.
    #[must_use]
    pub fn can_change(&self, traveler: &Traveler) -> bool {
        self.check(traveler).is_ok()
    }

    /// Reports why a change cannot start, if it cannot.
    ///
    /// # Errors
    ///
    /// Returns the first unmet precondition: no change in progress, the
    /// cooldown elapsed, and the traveler moving.
    pub fn check(&self, traveler: &Traveler) -> std::result::Result<(), LaneChangeError> {
        if self.active.is_some() {
            return Err(LaneChangeError::InProgress);
        }
        if let Some(since) = self.since_last_start {
            if since + TIME_EPSILON < self.config.cooldown {
                return Err(LaneChangeError::CoolingDown {
                    remaining: self.config.cooldown - since,
                });
            }
        }
        if !traveler.is_moving() {
            return Err(LaneChangeError::NotMoving);
        }
        Ok(())
    }

    /// Starts a change to the lane on the left of the traveler's path.
    ///
    /// # Errors
    ///
    /// Fails when a precondition is unmet or there is no left lane.
    pub fn start_left(
        &mut self,
        graph: &PathGraph,
        traveler: &mut Traveler,
        bus: &mut EventBus,
    ) -> Result<()> {
        self.check(traveler)?;
        let current = traveler.path().ok_or(LaneChangeError::NoLane)?;
        let lane = graph.left_lane(current)?.ok_or(LaneChangeError::NoLane)?;
        self.start(graph, traveler, lane, bus)
    }

    /// Starts a change to the lane on the right of the traveler's path.
    ///
    /// # Errors
    ///
    /// Fails when a precondition is unmet or there is no right lane.
    pub fn start_right(
        &mut self,
        graph: &PathGraph,
        traveler: &mut Traveler,
        bus: &mut EventBus,
    ) -> Result<()> {
        self.check(traveler)?;
        let current = traveler.path().ok_or(LaneChangeError::NoLane)?;
        let lane = graph.right_lane(current)?.ok_or(LaneChangeError::NoLane)?;
        self.start(graph, traveler, lane, bus)
    }

    /// Starts a change onto `target`.
    ///
    /// # Errors
    ///
    /// Fails, changing nothing, when [`check`](Self::check) fails, the
    /// traveler has no path, or `target` is missing or too short to aim at.
    pub fn start(
        &mut self,
        graph: &PathGraph,
        traveler: &mut Traveler,
        target: PathId,
        bus: &mut EventBus,
    ) -> Result<()> {
        self.check(traveler)?;
        let origin = traveler.path().ok_or(LaneChangeError::NoLane)?;
        let resolved = resolve_target(graph, traveler, target, &self.config)?;

        let start_pose = *traveler.pose();
        self.active = Some(LaneChangeState {
            origin,
            target,
            start_distance: traveler.distance(),
            elapsed: 0.0,
            duration: self.config.duration,
            start_pose,
            target_pose: resolved.pose,
            current_pose: start_pose,
        });
        self.since_last_start = Some(0.0);
        traveler.suspend();

        bus.publish(PathEvent::LaneChangeStarted {
            agent: traveler.agent(),
            from: origin,
            to: target,
        });
        debug!(
            agent = ?traveler.agent(),
            target_distance = resolved.distance,
            "lane change started"
        );
        Ok(())
    }

    /// Advances the cooldown clock and any active change by `dt`.
    ///
    /// On the tick the change completes, returns `Ok(Some(leftover))` where
    /// `leftover` is the part of `dt` past the end of the change; the
    /// traveler has not moved for it yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the target lane disappeared mid-change; the change
    /// is aborted and the traveler dropped back onto its previous lane.
    pub fn tick(
        &mut self,
        graph: &PathGraph,
        traveler: &mut Traveler,
        dt: f64,
        bus: &mut EventBus,
    ) -> Result<Option<f64>> {
        if let Some(since) = self.since_last_start.as_mut() {
            *since += dt;
        }
        let Some(state) = self.active.as_mut() else {
            return Ok(None);
        };

        state.elapsed += dt;
        let progress = state.progress();
        if self.config.strategy == LaneTargetStrategy::SameDistance {
            track_target(graph, traveler, state);
        }
        let eased = self.config.easing.apply(progress);
        state.current_pose = state.start_pose.interpolate(&state.target_pose, eased);
        traveler.set_pose(state.current_pose);

        if progress < 1.0 {
            return Ok(None);
        }

        let Some(state) = self.active.take() else {
            return Ok(None);
        };
        let leftover = (state.elapsed - state.duration).clamp(0.0, dt);
        traveler.resume();

        let node = match graph.path(state.target) {
            Ok(node) => node,
            Err(err) => {
                warn!(agent = ?traveler.agent(), "target lane vanished during lane change");
                self.return_to_origin(graph, traveler, &state, bus);
                return Err(err.into());
            }
        };
        let distance =
            closest_distance(node.sampled(), &state.current_pose.position, self.config.nearest.probes)
                .distance;
        traveler.set_path(graph, state.target, distance)?;

        bus.publish(PathEvent::LaneChangeCompleted {
            agent: traveler.agent(),
            path: state.target,
            distance: traveler.distance(),
        });
        debug!(agent = ?traveler.agent(), distance = traveler.distance(), "lane change completed");
        Ok(Some(leftover))
    }

    /// Cancels the active change and drops the traveler back onto the lane
    /// it started from, at the point closest to its last interpolated pose.
    ///
    /// Returns `false` when no change was active.
    pub fn abort(&mut self, graph: &PathGraph, traveler: &mut Traveler, bus: &mut EventBus) -> bool {
        let Some(state) = self.active.take() else {
            return false;
        };
        traveler.resume();
        self.return_to_origin(graph, traveler, &state, bus);
        true
    }

    fn return_to_origin(
        &self,
        graph: &PathGraph,
        traveler: &mut Traveler,
        state: &LaneChangeState,
        bus: &mut EventBus,
    ) {
        match graph.path(state.origin) {
            Ok(node) if !node.sampled().is_empty() => {
                let distance = closest_distance(
                    node.sampled(),
                    &state.current_pose.position,
                    self.config.nearest.probes,
                )
                .distance;
                if let Err(err) = traveler.set_path(graph, state.origin, distance) {
                    warn!(agent = ?traveler.agent(), %err, "could not return to origin lane");
                }
            }
            _ => warn!(agent = ?traveler.agent(), "origin lane unusable, keeping last pose"),
        }

        bus.publish(PathEvent::LaneChangeAborted {
            agent: traveler.agent(),
            path: state.origin,
            distance: traveler.distance(),
        });
        debug!(agent = ?traveler.agent(), distance = traveler.distance(), "lane change aborted");
    }
}

/// Moves the target pose along the target lane at the traveler's speed, so
/// the change ends where the traveler would be had it kept running.
fn track_target(graph: &PathGraph, traveler: &Traveler, state: &mut LaneChangeState) {
    let Ok(node) = graph.path(state.target) else {
        return;
    };
    let covered = traveler.speed() * state.elapsed.min(state.duration);
    let signed = if traveler.is_forward() { covered } else { -covered };
    let distance = node.sampled().clamp_distance(state.start_distance + signed);
    state.target_pose = node.pose_at_distance(distance, traveler.is_forward());
}
