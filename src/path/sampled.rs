use tracing::warn;

use crate::math::{Isometry3, Point3, Vector3, TOLERANCE};

use super::SamplingParams;

/// Dense polyline approximation of a spline with a cumulative arc-length table.
///
/// Positions are stored in world space. `distances[i]` is the length of the
/// polyline from the first point up to `points[i]`, so the table starts at 0,
/// never decreases, and ends at [`total_length`](Self::total_length).
#[derive(Debug, Clone, Default)]
pub struct SampledPath {
    points: Vec<Point3>,
    distances: Vec<f64>,
    total_length: f64,
}

impl SampledPath {
    /// Samples `control_points` (given in the local frame `frame`).
    ///
    /// Fewer control points than the curve family needs produce an empty
    /// path with zero length.
    #[must_use]
    pub fn sample(control_points: &[Point3], frame: &Isometry3, params: &SamplingParams) -> Self {
        let kind = params.kind;
        let windows = kind.windows(control_points);
        let Some(first) = windows.first() else {
            warn!(
                found = control_points.len(),
                required = kind.min_control_points(),
                "not enough control points to sample path"
            );
            return Self::default();
        };

        let segments = params.segments_per_curve.max(1);
        let capacity = windows.len() * segments as usize + 1;
        let mut points = Vec::with_capacity(capacity);
        let mut distances = Vec::with_capacity(capacity);

        let start = frame.transform_point(&kind.window_start(first));
        points.push(start);
        distances.push(0.0);

        let mut total = 0.0;
        let mut prev = start;
        for window in &windows {
            for j in 1..=segments {
                let t = f64::from(j) / f64::from(segments);
                let point = frame.transform_point(&kind.evaluate(window, t));
                total += nalgebra::distance(&prev, &point);
                points.push(point);
                distances.push(total);
                prev = point;
            }
        }

        Self {
            points,
            distances,
            total_length: total,
        }
    }

    /// Sampled world positions.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Cumulative distance at each sampled position.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Length of the whole polyline.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Returns `true` if sampling produced no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Clamps `distance` into `[0, total_length]`.
    #[must_use]
    pub fn clamp_distance(&self, distance: f64) -> f64 {
        distance.clamp(0.0, self.total_length)
    }

    /// Position at `distance` along the path, clamped to the path's range.
    ///
    /// Returns `None` for an empty path.
    #[must_use]
    pub fn position_at_distance(&self, distance: f64) -> Option<Point3> {
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0]),
            _ => {
                let (lo, frac) = self.bracket(distance);
                Some(self.points[lo].lerp(&self.points[lo + 1], frac))
            }
        }
    }

    /// Unit tangent of the polyline segment containing `distance`.
    ///
    /// Zero-length segments are skipped in favour of the nearest segment
    /// with extent. Returns `None` when no such segment exists.
    #[must_use]
    pub fn direction_at_distance(&self, distance: f64) -> Option<Vector3> {
        if self.points.len() < 2 {
            return None;
        }
        let (lo, _) = self.bracket(distance);
        let segment_dir = |i: usize| (self.points[i + 1] - self.points[i]).try_normalize(TOLERANCE);

        (lo..self.points.len() - 1)
            .find_map(segment_dir)
            .or_else(|| (0..lo).rev().find_map(segment_dir))
    }

    /// Finds the segment `[lo, lo + 1]` holding `distance` and the fraction
    /// of the way along it. Requires at least two points.
    fn bracket(&self, distance: f64) -> (usize, f64) {
        let d = self.clamp_distance(distance);
        let last = self.distances.len() - 1;
        let hi = self.distances.partition_point(|&x| x < d).clamp(1, last);
        let lo = hi - 1;

        let seg_len = self.distances[hi] - self.distances[lo];
        let frac = if seg_len > TOLERANCE {
            ((d - self.distances[lo]) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (lo, frac)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::SplineKind;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn straight(length: f64) -> Vec<Point3> {
        vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, length)]
    }

    fn curvy() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 10.0),
            Point3::new(-3.0, 1.0, 20.0),
            Point3::new(0.0, 0.0, 35.0),
            Point3::new(8.0, 0.0, 40.0),
        ]
    }

    fn sample(points: &[Point3]) -> SampledPath {
        SampledPath::sample(points, &Isometry3::identity(), &SamplingParams::default())
    }

    #[test]
    fn straight_line_has_exact_length() {
        let path = sample(&straight(100.0));
        assert_relative_eq!(path.total_length(), 100.0, epsilon = 1e-9);
        assert_eq!(path.points().len(), 21);
    }

    #[test]
    fn endpoints_match_table() {
        let path = sample(&curvy());
        assert_eq!(path.position_at_distance(0.0).unwrap(), path.points()[0]);
        assert_relative_eq!(
            path.position_at_distance(path.total_length()).unwrap(),
            *path.points().last().unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn distances_are_monotonic() {
        let path = sample(&curvy());
        assert_eq!(path.distances()[0], 0.0);
        assert!(path.distances().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*path.distances().last().unwrap(), path.total_length());
    }

    #[test]
    fn out_of_range_queries_clamp() {
        let path = sample(&curvy());
        let len = path.total_length();
        assert_eq!(path.position_at_distance(-5.0), path.position_at_distance(0.0));
        assert_eq!(path.position_at_distance(len + 7.0), path.position_at_distance(len));
        assert_eq!(path.direction_at_distance(-1.0), path.direction_at_distance(0.0));
    }

    #[test]
    fn directions_at_table_distances_are_unit() {
        let path = sample(&curvy());
        for &d in path.distances() {
            let dir = path.direction_at_distance(d).unwrap();
            assert_abs_diff_eq!(dir.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn interpolates_between_samples() {
        let path = sample(&straight(10.0));
        let p = path.position_at_distance(2.25).unwrap();
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 2.25), epsilon = 1e-9);
        assert_relative_eq!(path.direction_at_distance(2.25).unwrap(), Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn too_few_points_gives_empty_path() {
        let path = sample(&[Point3::origin()]);
        assert!(path.is_empty());
        assert_eq!(path.total_length(), 0.0);
        assert!(path.position_at_distance(3.0).is_none());
        assert!(path.direction_at_distance(3.0).is_none());
    }

    #[test]
    fn bezier_needs_four_points() {
        let params = SamplingParams {
            kind: SplineKind::Bezier,
            segments_per_curve: 10,
        };
        let three = SampledPath::sample(&curvy()[..3], &Isometry3::identity(), &params);
        assert!(three.is_empty());
        let four = SampledPath::sample(&curvy()[..4], &Isometry3::identity(), &params);
        assert_eq!(four.points().len(), 11);
        assert_relative_eq!(*four.points().last().unwrap(), curvy()[3], epsilon = 1e-9);
    }

    #[test]
    fn frame_moves_samples_to_world() {
        let frame = Isometry3::translation(10.0, 0.0, 0.0);
        let path = SampledPath::sample(&straight(5.0), &frame, &SamplingParams::default());
        assert_relative_eq!(path.points()[0], Point3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(path.total_length(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_segments_skip_to_next_direction() {
        // The first Bezier group collapses to a point.
        let mut pts = vec![Point3::origin(); 4];
        pts.extend((1..=3).map(|z| Point3::new(0.0, 0.0, f64::from(z))));
        let params = SamplingParams {
            kind: SplineKind::Bezier,
            segments_per_curve: 10,
        };
        let path = SampledPath::sample(&pts, &Isometry3::identity(), &params);
        assert_relative_eq!(path.total_length(), 3.0, epsilon = 1e-9);
        let dir = path.direction_at_distance(0.0).unwrap();
        assert_relative_eq!(dir, Vector3::z(), epsilon = 1e-9);
    }
}
