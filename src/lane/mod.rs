mod changer;
mod target;

pub use changer::{LaneChangeState, LaneChanger};
pub use target::{resolve_target, LaneTarget};

use crate::error::ConfigError;
use crate::query::NearestPathParams;

/// How the end pose of a lane change is chosen on the target lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneTargetStrategy {
    /// Intersect a plane, placed ahead of the traveler and facing its
    /// heading, with the target lane's control-point polyline.
    #[default]
    PlaneIntersection,
    /// Sample the target lane at the traveler's current distance.
    SameDistance,
    /// Sample the target lane at the distance the traveler would cover
    /// during the change.
    Lookahead,
}

/// Shape of the progress curve during a lane change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Smoothstep: zero velocity at both ends.
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Per-agent lane change settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneChangeConfig {
    /// Seconds a lane change takes.
    pub duration: f64,
    /// Minimum seconds between the starts of two lane changes.
    pub cooldown: f64,
    pub strategy: LaneTargetStrategy,
    pub easing: Easing,
    /// Probe resolution for re-anchoring on the target lane.
    pub nearest: NearestPathParams,
}

impl LaneChangeConfig {
    /// Checks durations and probe resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for a non-positive duration,
    /// a negative cooldown, non-finite values, or zero probes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "duration",
                value: self.duration,
            });
        }
        if !(self.cooldown.is_finite() && self.cooldown >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "cooldown",
                value: self.cooldown,
            });
        }
        self.nearest.validate()
    }
}

impl Default for LaneChangeConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            cooldown: 0.3,
            strategy: LaneTargetStrategy::default(),
            easing: Easing::default(),
            nearest: NearestPathParams::default(),
        }
    }
}
