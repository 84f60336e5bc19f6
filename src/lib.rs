//! Spline paths, lane graphs and path-following agents for lane-based
//! runner games.

pub mod error;
pub mod event;
pub mod geometry;
pub mod graph;
pub mod lane;
pub mod math;
pub mod path;
pub mod query;
pub mod sim;
pub mod travel;

pub use error::{LanePathError, Result};
