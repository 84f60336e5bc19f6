use tracing::debug;

use crate::error::Result;
use crate::event::{EventBus, PathEvent};
use crate::graph::PathGraph;

use super::traveler::{Boundary, BoundaryHit, Traveler};

/// What a route follower did with a boundary hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The traveler moved onto the linked path and kept moving.
    Advanced,
    /// No continuation; the traveler stays stopped at the boundary.
    EndOfRoad,
}

/// Continues travel onto `next`/`previous` paths when a traveler runs off
/// the end of its current one, the way traffic follows a road.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteFollower {
    /// Carry the distance travelled past the boundary onto the new path.
    pub carry_overflow: bool,
}

impl RouteFollower {
    #[must_use]
    pub fn new(carry_overflow: bool) -> Self {
        Self { carry_overflow }
    }

    /// Moves `traveler` across `hit` onto the linked path and restarts it.
    ///
    /// Forward travel enters `next` at its start; backward travel enters
    /// `previous` at its end.
    ///
    /// # Errors
    ///
    /// Returns an error if the traveler's path or its continuation is
    /// missing from the graph.
    pub fn follow(
        &self,
        graph: &PathGraph,
        traveler: &mut Traveler,
        hit: BoundaryHit,
        bus: &mut EventBus,
    ) -> Result<RouteOutcome> {
        let Some(from) = traveler.path() else {
            return Ok(RouteOutcome::EndOfRoad);
        };
        let carried = if self.carry_overflow { hit.overflow } else { 0.0 };

        let (to, distance) = match hit.boundary {
            Boundary::End => match graph.next(from)? {
                Some(next) => (next, carried),
                None => return Ok(RouteOutcome::EndOfRoad),
            },
            Boundary::Start => match graph.previous(from)? {
                Some(prev) => (prev, graph.path(prev)?.total_length() - carried),
                None => return Ok(RouteOutcome::EndOfRoad),
            },
        };

        traveler.set_path(graph, to, distance)?;
        traveler.start_moving(bus)?;
        bus.publish(PathEvent::PathAdvanced {
            agent: traveler.agent(),
            from,
            to,
        });
        debug!(agent = ?traveler.agent(), distance = traveler.distance(), "advanced to linked path");
        Ok(RouteOutcome::Advanced)
    }
}
