//! Explicit per-frame scheduler for path-following agents.
//!
//! The embedding application owns one [`Simulation`], feeds it lane change
//! intents as they arrive, calls [`Simulation::tick`] once per frame, and
//! drains the resulting [`PathEvent`]s for animation, audio and traffic code.

mod agent;

pub use agent::{Agent, AgentConfig};

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::error::{Result, TravelError};
use crate::event::{AgentId, EventBus, PathEvent};
use crate::geometry::Pose;
use crate::graph::{PathGraph, PathId};
use crate::query::NearestPathResult;
use crate::travel::{RouteOutcome, Traveler};

/// Sideways move requested by input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneIntent {
    Left,
    Right,
}

/// Owns the path graph, every agent, and the event bus they publish to.
pub struct Simulation {
    graph: PathGraph,
    agents: SlotMap<AgentId, Agent>,
    order: Vec<AgentId>,
    bus: EventBus,
}

impl Simulation {
    #[must_use]
    pub fn new(graph: PathGraph) -> Self {
        Self::with_bus_capacity(graph, EventBus::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_bus_capacity(graph: PathGraph, capacity: usize) -> Self {
        Self {
            graph,
            agents: SlotMap::with_key(),
            order: Vec::new(),
            bus: EventBus::new(capacity),
        }
    }

    #[must_use]
    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    /// Mutable access for level edits between ticks.
    pub fn graph_mut(&mut self) -> &mut PathGraph {
        &mut self.graph
    }

    /// Adds an agent. It starts stopped and without a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn spawn(&mut self, config: AgentConfig) -> Result<AgentId> {
        config.validate()?;
        let id = self
            .agents
            .insert_with_key(|id| Agent::new(Traveler::new(id, config.travel), &config));
        self.order.push(id);
        Ok(id)
    }

    /// Removes an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn despawn(&mut self, id: AgentId) -> Result<Agent> {
        let agent = self.agents.remove(id).ok_or(TravelError::EntityNotFound)?;
        self.order.retain(|&other| other != id);
        Ok(agent)
    }

    /// Returns a reference to the agent, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        Ok(self.agents.get(id).ok_or(TravelError::EntityNotFound)?)
    }

    /// Returns a mutable reference to the agent, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        Ok(self.agents.get_mut(id).ok_or(TravelError::EntityNotFound)?)
    }

    /// Current pose of an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn pose(&self, id: AgentId) -> Result<Pose> {
        Ok(*self.agent(id)?.traveler().pose())
    }

    /// Places an agent on `path` at `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent or path does not exist.
    pub fn place(&mut self, id: AgentId, path: PathId, distance: f64) -> Result<()> {
        let agent = self.agents.get_mut(id).ok_or(TravelError::EntityNotFound)?;
        agent.traveler.set_path(&self.graph, path, distance)?;
        Ok(())
    }

    /// Moves an agent to a free world pose, e.g. its spawn point, before
    /// snapping it onto a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn set_pose(&mut self, id: AgentId, pose: Pose) -> Result<()> {
        self.agent_mut(id)?.traveler.set_pose(pose);
        Ok(())
    }

    /// Snaps an agent onto the closest path in the graph.
    ///
    /// Returns `None`, keeping the agent's path, when the graph has no
    /// usable path.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn snap_to_nearest(&mut self, id: AgentId) -> Result<Option<NearestPathResult>> {
        let agent = self.agents.get_mut(id).ok_or(TravelError::EntityNotFound)?;
        let candidates: Vec<PathId> = self.graph.ids().collect();
        let params = agent.nearest;
        Ok(agent
            .traveler
            .find_nearest_path(&self.graph, &candidates, params))
    }

    /// Starts an agent moving.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist or has no path.
    pub fn start(&mut self, id: AgentId) -> Result<()> {
        let agent = self.agents.get_mut(id).ok_or(TravelError::EntityNotFound)?;
        agent.traveler.start_moving(&mut self.bus)?;
        Ok(())
    }

    /// Stops an agent, dropping it back onto its lane if it was mid change.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn stop(&mut self, id: AgentId) -> Result<()> {
        let agent = self.agents.get_mut(id).ok_or(TravelError::EntityNotFound)?;
        agent.stop(&self.graph, &mut self.bus);
        Ok(())
    }

    /// Starts every agent that has a path. Returns how many started.
    pub fn start_all(&mut self) -> usize {
        let mut started = 0;
        for &id in &self.order {
            if let Some(agent) = self.agents.get_mut(id) {
                if agent.traveler.path().is_some()
                    && agent.traveler.start_moving(&mut self.bus).is_ok()
                {
                    started += 1;
                }
            }
        }
        started
    }

    /// Stops every agent.
    pub fn stop_all(&mut self) {
        for &id in &self.order {
            if let Some(agent) = self.agents.get_mut(id) {
                agent.stop(&self.graph, &mut self.bus);
            }
        }
    }

    /// Requests a lane change for an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist, has no lane changer, or
    /// the change cannot start.
    pub fn request_lane_change(&mut self, id: AgentId, intent: LaneIntent) -> Result<()> {
        let agent = self.agents.get_mut(id).ok_or(TravelError::EntityNotFound)?;
        agent.change_lane(&self.graph, intent, &mut self.bus)
    }

    /// Advances every agent by `dt` seconds, in spawn order.
    ///
    /// Per agent: the lane changer runs first, then the traveler advances,
    /// then the route follower reacts to any boundary the traveler hit. On
    /// the tick a lane change completes, the traveler only advances by the
    /// part of `dt` left over after the change.
    /// Route outcomes for agents that ran out of road are returned.
    pub fn tick(&mut self, dt: f64) -> Vec<(AgentId, RouteOutcome)> {
        let mut dead_ends = Vec::new();
        for &id in &self.order {
            let Some(agent) = self.agents.get_mut(id) else {
                continue;
            };
            let mut travel_dt = dt;
            if let Some(changer) = agent.lane_changer.as_mut() {
                match changer.tick(&self.graph, &mut agent.traveler, dt, &mut self.bus) {
                    Ok(Some(leftover)) => travel_dt = leftover,
                    Ok(None) => {}
                    Err(err) => warn!(agent = ?id, %err, "lane change failed"),
                }
            }

            let Some(hit) = agent.traveler.advance(&self.graph, travel_dt, &mut self.bus) else {
                continue;
            };
            let Some(route) = agent.route else {
                continue;
            };
            match route.follow(&self.graph, &mut agent.traveler, hit, &mut self.bus) {
                Ok(RouteOutcome::Advanced) => {}
                Ok(RouteOutcome::EndOfRoad) => {
                    debug!(agent = ?id, "end of road");
                    dead_ends.push((id, RouteOutcome::EndOfRoad));
                }
                Err(err) => warn!(agent = ?id, %err, "route follow failed"),
            }
        }
        dead_ends
    }

    /// Takes every event published since the last drain.
    pub fn drain_events(&mut self) -> Vec<PathEvent> {
        self.bus.drain()
    }

    /// Number of events waiting to be drained.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.bus.pending_count()
    }

    /// Agent IDs in tick order.
    #[must_use]
    pub fn agent_ids(&self) -> &[AgentId] {
        &self.order
    }
}
