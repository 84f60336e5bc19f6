use crate::error::{LaneChangeError, Result};
use crate::event::EventBus;
use crate::graph::PathGraph;
use crate::lane::{LaneChangeConfig, LaneChanger};
use crate::query::NearestPathParams;
use crate::travel::{RouteFollower, TravelConfig, Traveler};

use super::LaneIntent;

/// Behaviours to attach to a spawned agent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentConfig {
    pub travel: TravelConfig,
    /// `None` for agents that never change lanes, e.g. scenery traffic.
    pub lane_change: Option<LaneChangeConfig>,
    /// `None` to stop at the end of each path.
    pub route: Option<RouteFollower>,
    /// Probe resolution used when snapping to the nearest path.
    pub nearest: NearestPathParams,
}

impl AgentConfig {
    /// Validates every attached behaviour.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<()> {
        self.travel.validate()?;
        if let Some(lane_change) = &self.lane_change {
            lane_change.validate()?;
        }
        self.nearest.validate()?;
        Ok(())
    }
}

/// A traveler plus its optional lane changer and route follower.
#[derive(Debug, Clone)]
pub struct Agent {
    pub(super) traveler: Traveler,
    pub(super) lane_changer: Option<LaneChanger>,
    pub(super) route: Option<RouteFollower>,
    pub(super) nearest: NearestPathParams,
}

impl Agent {
    pub(super) fn new(traveler: Traveler, config: &AgentConfig) -> Self {
        Self {
            traveler,
            lane_changer: config.lane_change.map(LaneChanger::new),
            route: config.route,
            nearest: config.nearest,
        }
    }

    #[must_use]
    pub fn traveler(&self) -> &Traveler {
        &self.traveler
    }

    pub fn traveler_mut(&mut self) -> &mut Traveler {
        &mut self.traveler
    }

    #[must_use]
    pub fn lane_changer(&self) -> Option<&LaneChanger> {
        self.lane_changer.as_ref()
    }

    #[must_use]
    pub fn route(&self) -> Option<&RouteFollower> {
        self.route.as_ref()
    }

    #[must_use]
    pub fn is_changing_lanes(&self) -> bool {
        self.lane_changer
            .as_ref()
            .is_some_and(LaneChanger::is_changing)
    }

    pub(super) fn change_lane(
        &mut self,
        graph: &PathGraph,
        intent: LaneIntent,
        bus: &mut EventBus,
    ) -> Result<()> {
        let changer = self.lane_changer.as_mut().ok_or(LaneChangeError::Disabled)?;
        match intent {
            LaneIntent::Left => changer.start_left(graph, &mut self.traveler, bus),
            LaneIntent::Right => changer.start_right(graph, &mut self.traveler, bus),
        }
    }

    pub(super) fn stop(&mut self, graph: &PathGraph, bus: &mut EventBus) {
        if let Some(changer) = self.lane_changer.as_mut() {
            changer.abort(graph, &mut self.traveler, bus);
        }
        self.traveler.stop_moving(bus);
    }
}
