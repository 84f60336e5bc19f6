mod route;
mod traveler;

pub use route::{RouteFollower, RouteOutcome};
pub use traveler::{Boundary, BoundaryHit, Traveler};

use crate::error::ConfigError;

/// Per-traveler movement settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelConfig {
    /// Distance covered per second of simulation time.
    pub speed: f64,
    /// Travel towards the path's end (`true`) or its start.
    pub forward: bool,
}

impl TravelConfig {
    /// Checks that the speed is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for a negative or
    /// non-finite speed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed.is_finite() && self.speed >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidParameter {
                name: "speed",
                value: self.speed,
            })
        }
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            forward: true,
        }
    }
}
