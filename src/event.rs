//! Decoupled notifications. Travelers, lane changers and route followers
//! publish events here; rendering, audio and traffic code drain them.

use std::collections::VecDeque;

use tracing::warn;

use crate::graph::PathId;

slotmap::new_key_type! {
    /// Unique identifier for an agent in the simulation.
    pub struct AgentId;
}

/// Something that happened to an agent during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEvent {
    StartedMoving {
        agent: AgentId,
    },
    StoppedMoving {
        agent: AgentId,
    },
    ReachedPathEnd {
        agent: AgentId,
        path: PathId,
    },
    ReachedPathStart {
        agent: AgentId,
        path: PathId,
    },
    LaneChangeStarted {
        agent: AgentId,
        from: PathId,
        to: PathId,
    },
    LaneChangeCompleted {
        agent: AgentId,
        path: PathId,
        distance: f64,
    },
    LaneChangeAborted {
        agent: AgentId,
        path: PathId,
        distance: f64,
    },
    PathAdvanced {
        agent: AgentId,
        from: PathId,
        to: PathId,
    },
}

impl PathEvent {
    /// Agent the event concerns.
    #[must_use]
    pub fn agent(&self) -> AgentId {
        match *self {
            Self::StartedMoving { agent }
            | Self::StoppedMoving { agent }
            | Self::ReachedPathEnd { agent, .. }
            | Self::ReachedPathStart { agent, .. }
            | Self::LaneChangeStarted { agent, .. }
            | Self::LaneChangeCompleted { agent, .. }
            | Self::LaneChangeAborted { agent, .. }
            | Self::PathAdvanced { agent, .. } => agent,
        }
    }
}

/// Bounded FIFO of pending events.
///
/// When full, publishing drops the oldest pending event.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<PathEvent>,
    max_pending: usize,
}

impl EventBus {
    /// Pending events kept by [`EventBus::default`].
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a bus holding at most `max_pending` events (at least one).
    #[must_use]
    pub fn new(max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    /// Queues an event, dropping the oldest one if the bus is full.
    pub fn publish(&mut self, event: PathEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                max_pending = self.max_pending,
                "event bus full, dropping oldest"
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Removes and returns every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<PathEvent> {
        self.events.drain(..).collect()
    }

    /// Number of events waiting to be drained.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.events.len()
    }

    /// Pending events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PathEvent> {
        self.events.iter()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
