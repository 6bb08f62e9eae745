// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segments, distances and polyline sampling

use crate::{Point2, Point3, GEOMETRY_EPSILON};

/// Minimum step used when discretizing a polyline
pub const MIN_SAMPLE_STEP: f64 = 0.05;

/// Planar line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2D {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment2D {
    #[inline]
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Distance from a point to this segment
    #[inline]
    pub fn distance_to(&self, p: &Point2<f64>) -> f64 {
        point_segment_distance(p, &self.start, &self.end)
    }
}

/// Ordered segments, typically the bottom edges of a solid
pub type SegmentLoop2D = Vec<Segment2D>;

/// Distance from `p` to segment `ab`
pub fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Minimum distance from `p` to any segment, `INFINITY` for an empty list
pub fn point_segments_distance(p: &Point2<f64>, segments: &[Segment2D]) -> f64 {
    segments
        .iter()
        .map(|s| s.distance_to(p))
        .fold(f64::INFINITY, f64::min)
}

#[inline]
fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper or touching intersection of two segments
pub fn segments_intersect(a: &Segment2D, b: &Segment2D) -> bool {
    let d1 = orientation(&b.start, &b.end, &a.start);
    let d2 = orientation(&b.start, &b.end, &a.end);
    let d3 = orientation(&a.start, &a.end, &b.start);
    let d4 = orientation(&a.start, &a.end, &b.end);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Collinear or endpoint contact
    a.distance_to(&b.start) <= GEOMETRY_EPSILON
        || a.distance_to(&b.end) <= GEOMETRY_EPSILON
        || b.distance_to(&a.start) <= GEOMETRY_EPSILON
        || b.distance_to(&a.end) <= GEOMETRY_EPSILON
}

/// Minimum distance between two segments (0 when they cross)
pub fn segment_segment_distance(a: &Segment2D, b: &Segment2D) -> f64 {
    if segments_intersect(a, b) {
        return 0.0;
    }
    a.distance_to(&b.start)
        .min(a.distance_to(&b.end))
        .min(b.distance_to(&a.start))
        .min(b.distance_to(&a.end))
}

/// Minimum distance between two segment sets, `INFINITY` if either is empty
pub fn segment_sets_distance(a: &[Segment2D], b: &[Segment2D]) -> f64 {
    let mut best = f64::INFINITY;
    for sa in a {
        for sb in b {
            best = best.min(segment_segment_distance(sa, sb));
            if best == 0.0 {
                return 0.0;
            }
        }
    }
    best
}

/// Plan-view (XY) distance between two 3D points
#[inline]
pub fn plan_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Plan-view length of an open polyline
pub fn polyline_length(points: &[Point3<f64>]) -> f64 {
    points.windows(2).map(|w| plan_distance(&w[0], &w[1])).sum()
}

/// One fixed-length piece of a discretized polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylinePiece {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    /// Plan-view length of the piece
    pub length: f64,
}

impl PolylinePiece {
    #[inline]
    pub fn midpoint_2d(&self) -> Point2<f64> {
        Point2::new(
            (self.start.x + self.end.x) * 0.5,
            (self.start.y + self.end.y) * 0.5,
        )
    }
}

/// Cuts a polyline into pieces of `step` plan length.
///
/// Each polyline segment is walked independently, so the last piece of every
/// segment carries the remainder. `step` is clamped to [`MIN_SAMPLE_STEP`].
pub fn sample_polyline(points: &[Point3<f64>], step: f64) -> Vec<PolylinePiece> {
    let step = if step.is_finite() {
        step.max(MIN_SAMPLE_STEP)
    } else {
        MIN_SAMPLE_STEP
    };
    let mut pieces = Vec::new();

    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg_len = plan_distance(&a, &b);
        if seg_len <= GEOMETRY_EPSILON {
            continue;
        }

        // a remainder shorter than the tolerance is folded into the last piece
        let count = ((seg_len - GEOMETRY_EPSILON) / step).ceil().max(1.0) as usize;
        for k in 0..count {
            let from = k as f64 * step;
            let to = if k + 1 == count { seg_len } else { from + step };
            pieces.push(PolylinePiece {
                start: a + (b - a) * (from / seg_len),
                end: a + (b - a) * (to / seg_len),
                length: to - from,
            });
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_to_segment_interior_and_ends() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_relative_eq!(point_segment_distance(&Point2::new(5.0, 3.0), &a, &b), 3.0);
        assert_relative_eq!(point_segment_distance(&Point2::new(13.0, 4.0), &a, &b), 5.0);
        assert_relative_eq!(point_segment_distance(&Point2::new(1.0, 1.0), &a, &a), 2f64.sqrt());
    }

    #[test]
    fn distance_to_empty_list_is_infinite() {
        assert!(point_segments_distance(&Point2::new(0.0, 0.0), &[]).is_infinite());
    }

    #[test]
    fn crossing_segments_have_zero_distance() {
        let a = Segment2D::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let b = Segment2D::new(Point2::new(0.0, 2.0), Point2::new(2.0, 0.0));
        assert!(segments_intersect(&a, &b));
        assert_relative_eq!(segment_segment_distance(&a, &b), 0.0);
    }

    #[test]
    fn parallel_segments_distance() {
        let a = Segment2D::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let b = Segment2D::new(Point2::new(2.0, 6.0), Point2::new(8.0, 6.0));
        assert!(!segments_intersect(&a, &b));
        assert_relative_eq!(segment_segment_distance(&a, &b), 6.0);
    }

    #[test]
    fn sampling_covers_whole_length() {
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 2.5, 0.0),
        ];
        let pieces = sample_polyline(&line, 1.0);
        let total: f64 = pieces.iter().map(|p| p.length).sum();
        assert_relative_eq!(total, 12.5, epsilon = 1e-9);
        assert_relative_eq!(total, polyline_length(&line), epsilon = 1e-9);
        // 10 full pieces on the first leg, 2 full + 1 remainder on the second
        assert_eq!(pieces.len(), 13);
        assert_relative_eq!(pieces.last().unwrap().length, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn piece_count_is_bounded_for_long_segments() {
        let line = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0e6, 0.0, 0.0)];
        let pieces = sample_polyline(&line, 1.0e3);
        assert_eq!(pieces.len(), 1000);
        assert_relative_eq!(pieces.last().unwrap().end.x, 1.0e6);
    }

    #[test]
    fn sampling_step_is_clamped() {
        let line = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(sample_polyline(&line, 0.0).len(), 20);
    }
}
