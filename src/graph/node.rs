use crate::geometry::Pose;
use crate::math::{forward, Isometry3, Point3, Vector3};
use crate::path::{SampledPath, SamplingParams};

slotmap::new_key_type! {
    /// Unique identifier for a path in the path graph.
    pub struct PathId;
}

/// Links from a path to its neighbours in the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathLinks {
    /// Same-lane continuation after the path's end.
    pub next: Option<PathId>,
    /// Same-lane continuation before the path's start.
    pub previous: Option<PathId>,
    /// Parallel path to the left.
    pub left_lane: Option<PathId>,
    /// Parallel path to the right.
    pub right_lane: Option<PathId>,
}

/// A single lane segment: control points, their sampled polyline, and
/// links to neighbouring paths.
///
/// Control points live in the node's local `frame`; the sampled path is in
/// world space and is regenerated whenever the points, frame or sampling
/// parameters change.
#[derive(Debug, Clone)]
pub struct PathNode {
    name: String,
    frame: Isometry3,
    control_points: Vec<Point3>,
    sampling: SamplingParams,
    sampled: SampledPath,
    /// Neighbour links, maintained through [`PathGraph`](super::PathGraph).
    pub links: PathLinks,
    /// Index of the lane this path belongs to.
    pub lane_index: i32,
    /// Lateral width of the lane.
    pub lane_width: f64,
}

impl PathNode {
    /// Default lane width in world units.
    pub const DEFAULT_LANE_WIDTH: f64 = 3.5;

    /// Creates a path with the identity frame and default sampling.
    #[must_use]
    pub fn new(name: impl Into<String>, control_points: Vec<Point3>) -> Self {
        Self::with_frame(name, Isometry3::identity(), control_points, SamplingParams::default())
    }

    /// Creates a path whose control points are expressed in `frame`.
    #[must_use]
    pub fn with_frame(
        name: impl Into<String>,
        frame: Isometry3,
        control_points: Vec<Point3>,
        sampling: SamplingParams,
    ) -> Self {
        let sampled = SampledPath::sample(&control_points, &frame, &sampling);
        Self {
            name: name.into(),
            frame,
            control_points,
            sampling,
            sampled,
            links: PathLinks::default(),
            lane_index: 0,
            lane_width: Self::DEFAULT_LANE_WIDTH,
        }
    }

    /// Sets the lane index.
    #[must_use]
    pub fn in_lane(mut self, lane_index: i32) -> Self {
        self.lane_index = lane_index;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn frame(&self) -> &Isometry3 {
        &self.frame
    }

    /// Control points in the local frame.
    #[must_use]
    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    /// Control points transformed to world space.
    #[must_use]
    pub fn world_control_points(&self) -> Vec<Point3> {
        self.control_points
            .iter()
            .map(|p| self.frame.transform_point(p))
            .collect()
    }

    #[must_use]
    pub fn sampling(&self) -> &SamplingParams {
        &self.sampling
    }

    #[must_use]
    pub fn sampled(&self) -> &SampledPath {
        &self.sampled
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.sampled.total_length()
    }

    /// Replaces the control points and re-samples.
    pub fn set_control_points(&mut self, control_points: Vec<Point3>) {
        self.control_points = control_points;
        self.resample();
    }

    /// Replaces the sampling parameters and re-samples.
    pub fn set_sampling(&mut self, sampling: SamplingParams) {
        self.sampling = sampling;
        self.resample();
    }

    /// Moves the local frame and re-samples.
    pub fn set_frame(&mut self, frame: Isometry3) {
        self.frame = frame;
        self.resample();
    }

    fn resample(&mut self) {
        self.sampled = SampledPath::sample(&self.control_points, &self.frame, &self.sampling);
    }

    /// World position at `distance`, or the frame origin for an empty path.
    #[must_use]
    pub fn position_at_distance(&self, distance: f64) -> Point3 {
        self.sampled
            .position_at_distance(distance)
            .unwrap_or_else(|| self.frame.transform_point(&Point3::origin()))
    }

    /// Unit travel direction at `distance`, or the frame's forward axis.
    #[must_use]
    pub fn direction_at_distance(&self, distance: f64) -> Vector3 {
        self.sampled
            .direction_at_distance(distance)
            .unwrap_or_else(|| self.frame.rotation * forward())
    }

    /// Pose at `distance`, facing backwards along the path unless `forward`.
    #[must_use]
    pub fn pose_at_distance(&self, distance: f64, forward: bool) -> Pose {
        let dir = self.direction_at_distance(distance);
        let dir = if forward { dir } else { -dir };
        Pose::facing(self.position_at_distance(distance), &dir)
    }
}
