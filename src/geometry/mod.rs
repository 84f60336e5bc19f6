pub mod curve;
pub mod plane;
pub mod pose;

pub use curve::{SplineKind, SplineWindow};
pub use plane::Plane;
pub use pose::Pose;
