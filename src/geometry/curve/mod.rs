mod bezier;
mod catmull_rom;

pub use bezier::cubic_bezier;
pub use catmull_rom::catmull_rom;

use crate::math::Point3;

/// Four control points feeding a single curve segment.
pub type SplineWindow = [Point3; 4];

/// Curve family used to interpolate a path's control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplineKind {
    /// Uniform Catmull-Rom through every control point.
    #[default]
    CatmullRom,
    /// Disjoint cubic Bezier segments sharing their end points.
    Bezier,
}

impl SplineKind {
    /// Minimum number of control points needed to produce a segment.
    #[must_use]
    pub fn min_control_points(self) -> usize {
        match self {
            Self::CatmullRom => 2,
            Self::Bezier => 4,
        }
    }

    /// Evaluates one segment at `t ∈ [0, 1]`.
    #[must_use]
    pub fn evaluate(self, window: &SplineWindow, t: f64) -> Point3 {
        let [p0, p1, p2, p3] = window;
        match self {
            Self::CatmullRom => catmull_rom(p0, p1, p2, p3, t),
            Self::Bezier => cubic_bezier(p0, p1, p2, p3, t),
        }
    }

    /// Start point of a window's segment (`t = 0`).
    #[must_use]
    pub fn window_start(self, window: &SplineWindow) -> Point3 {
        match self {
            Self::CatmullRom => window[1],
            Self::Bezier => window[0],
        }
    }

    /// Splits control points into the 4-point windows for this curve family.
    ///
    /// Catmull-Rom uses stride 1 and duplicates the first and last points so
    /// the end segments have neighbours. Bezier uses stride 3; trailing points
    /// that do not fill a full segment are ignored.
    #[must_use]
    pub fn windows(self, points: &[Point3]) -> Vec<SplineWindow> {
        let n = points.len();
        if n < self.min_control_points() {
            return Vec::new();
        }

        match self {
            Self::CatmullRom => (0..n - 1)
                .map(|i| {
                    [
                        points[i.saturating_sub(1)],
                        points[i],
                        points[i + 1],
                        points[(i + 2).min(n - 1)],
                    ]
                })
                .collect(),
            Self::Bezier => (0..=n - 4)
                .step_by(3)
                .map(|i| [points[i], points[i + 1], points[i + 2], points[i + 3]])
                .collect(),
        }
    }
}
