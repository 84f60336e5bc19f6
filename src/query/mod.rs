mod closest_distance;
mod nearest_path;

pub(crate) use closest_distance::closest_distance;
pub use closest_distance::{ClosestDistanceOnPath, ClosestDistanceResult};
pub use nearest_path::{NearestPath, NearestPathResult};

use crate::error::ConfigError;

/// Resolution of the probe grid used by closest-point searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearestPathParams {
    /// Number of uniform intervals probed along each path.
    pub probes: u32,
}

impl NearestPathParams {
    /// Checks that at least one interval is probed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] when `probes` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probes == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "probes",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for NearestPathParams {
    fn default() -> Self {
        Self { probes: 100 }
    }
}
