use thiserror::Error;

/// Top-level error type for the lane path library.
#[derive(Debug, Error)]
pub enum LanePathError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Travel(#[from] TravelError),

    #[error(transparent)]
    LaneChange(#[from] LaneChangeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the path graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("path not found")]
    PathNotFound,

    #[error("a path cannot be linked to itself")]
    SelfLink,
}

/// Errors raised by travelers and the simulation that drives them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TravelError {
    #[error("no path assigned")]
    NoPath,

    #[error("agent not found")]
    EntityNotFound,
}

/// Reasons a lane change cannot start.
#[derive(Debug, Error, PartialEq)]
pub enum LaneChangeError {
    #[error("a lane change is already in progress")]
    InProgress,

    #[error("lane change cooling down for another {remaining:.3}s")]
    CoolingDown { remaining: f64 },

    #[error("traveler is not moving")]
    NotMoving,

    #[error("no lane in the requested direction")]
    NoLane,

    #[error("lane changes are disabled for this agent")]
    Disabled,

    #[error("target lane has {found} control points, {required} required")]
    TooFewControlPoints { found: usize, required: usize },
}

/// Errors from validating configuration parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Convenience type alias for results using [`LanePathError`].
pub type Result<T> = std::result::Result<T, LanePathError>;
