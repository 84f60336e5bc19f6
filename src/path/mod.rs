mod sampled;

pub use sampled::SampledPath;

use crate::error::ConfigError;
use crate::geometry::SplineKind;

/// Parameters controlling how control points are turned into a sampled path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingParams {
    /// Curve family interpolating the control points.
    pub kind: SplineKind,
    /// Uniform `t` steps evaluated per curve segment.
    pub segments_per_curve: u32,
}

impl SamplingParams {
    /// Smallest accepted `segments_per_curve`.
    pub const MIN_SEGMENTS: u32 = 4;
    /// Largest accepted `segments_per_curve`.
    pub const MAX_SEGMENTS: u32 = 100;

    /// Checks that the segment count lies in the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] when `segments_per_curve`
    /// is outside `4..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (Self::MIN_SEGMENTS..=Self::MAX_SEGMENTS).contains(&self.segments_per_curve) {
            Ok(())
        } else {
            Err(ConfigError::InvalidParameter {
                name: "segments_per_curve",
                value: f64::from(self.segments_per_curve),
            })
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            kind: SplineKind::CatmullRom,
            segments_per_curve: 20,
        }
    }
}
