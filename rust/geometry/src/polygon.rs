// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon queries
//!
//! Polygons are implicitly closed vertex rings. Degenerate rings (fewer than
//! three vertices) are accepted everywhere and yield empty/zero results.

use crate::distance::{point_segment_distance, Segment2D};
use crate::{Point2, Polygon2D, GEOMETRY_EPSILON};

/// Ray-casting parity test.
///
/// Works for convex and concave simple polygons regardless of winding.
/// Points exactly on the boundary may land either way; call sites that care
/// use [`point_in_polygon_tolerant`].
pub fn point_in_polygon(p: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Inside, or within `tolerance` of the boundary
pub fn point_in_polygon_tolerant(p: &Point2<f64>, polygon: &[Point2<f64>], tolerance: f64) -> bool {
    if point_in_polygon(p, polygon) {
        return true;
    }
    polygon.len() >= 2 && boundary_distance(p, polygon) <= tolerance
}

/// Distance from a point to the closed boundary ring
pub fn boundary_distance(p: &Point2<f64>, polygon: &[Point2<f64>]) -> f64 {
    polygon_edges(polygon)
        .iter()
        .map(|s| point_segment_distance(p, &s.start, &s.end))
        .fold(f64::INFINITY, f64::min)
}

/// Edges of the closed ring, skipping zero-length ones
pub fn polygon_edges(polygon: &[Point2<f64>]) -> Vec<Segment2D> {
    let n = polygon.len();
    if n < 2 {
        return Vec::new();
    }
    let count = if n == 2 { 1 } else { n };
    (0..count)
        .map(|i| Segment2D::new(polygon[i], polygon[(i + 1) % n]))
        .filter(|s| s.length() > GEOMETRY_EPSILON)
        .collect()
}

/// Shoelace signed area (positive for counter-clockwise)
pub fn polygon_signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area * 0.5
}

#[inline]
pub fn polygon_area(polygon: &[Point2<f64>]) -> f64 {
    polygon_signed_area(polygon).abs()
}

/// Length of the closed ring
pub fn polygon_perimeter(polygon: &[Point2<f64>]) -> f64 {
    polygon_edges(polygon).iter().map(Segment2D::length).sum()
}

/// Area centroid, falling back to the vertex mean for zero-area rings
pub fn polygon_centroid(polygon: &[Point2<f64>]) -> Option<Point2<f64>> {
    if polygon.is_empty() {
        return None;
    }

    let signed = polygon_signed_area(polygon);
    if signed.abs() < GEOMETRY_EPSILON {
        let n = polygon.len() as f64;
        let (sx, sy) = polygon
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Some(Point2::new(sx / n, sy / n));
    }

    let n = polygon.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    let factor = 1.0 / (6.0 * signed);
    Some(Point2::new(cx * factor, cy * factor))
}

/// Drops a trailing vertex that repeats the first one
pub fn strip_closing_point(mut polygon: Polygon2D) -> Polygon2D {
    while polygon.len() > 1 {
        let first = polygon[0];
        let last = polygon[polygon.len() - 1];
        if (first - last).norm() <= GEOMETRY_EPSILON {
            polygon.pop();
        } else {
            break;
        }
    }
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Polygon2D {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn point_in_convex_polygon_either_winding() {
        let ccw = square(10.0);
        let mut cw = ccw.clone();
        cw.reverse();

        for poly in [&ccw, &cw] {
            assert!(point_in_polygon(&Point2::new(5.0, 5.0), poly));
            assert!(!point_in_polygon(&Point2::new(15.0, 5.0), poly));
            assert!(!point_in_polygon(&Point2::new(-1.0, -1.0), poly));
        }
    }

    #[test]
    fn point_in_concave_polygon() {
        // L-shape with the notch at the top right
        let l_shape = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 4.0),
            Point2::new(4.0, 4.0),
            Point2::new(4.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(&Point2::new(2.0, 8.0), &l_shape));
        assert!(point_in_polygon(&Point2::new(8.0, 2.0), &l_shape));
        assert!(!point_in_polygon(&Point2::new(8.0, 8.0), &l_shape));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
        assert!(!point_in_polygon(&Point2::new(0.5, 0.5), &line));
    }

    #[test]
    fn tolerant_containment_accepts_boundary() {
        let sq = square(10.0);
        assert!(point_in_polygon_tolerant(&Point2::new(10.005, 5.0), &sq, 0.01));
        assert!(!point_in_polygon_tolerant(&Point2::new(10.5, 5.0), &sq, 0.01));
    }

    #[test]
    fn area_perimeter_centroid() {
        let sq = square(4.0);
        assert_relative_eq!(polygon_area(&sq), 16.0);
        assert_relative_eq!(polygon_perimeter(&sq), 16.0);
        let c = polygon_centroid(&sq).unwrap();
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn signed_area_follows_winding() {
        let mut sq = square(2.0);
        assert!(polygon_signed_area(&sq) > 0.0);
        sq.reverse();
        assert!(polygon_signed_area(&sq) < 0.0);
    }

    #[test]
    fn closing_point_is_stripped() {
        let mut ring = square(1.0);
        ring.push(Point2::new(0.0, 0.0));
        assert_eq!(strip_closing_point(ring).len(), 4);
    }
}
