// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D convex hull (Andrew's monotone chain)

use crate::{Point2, Polygon2D, GEOMETRY_EPSILON};

#[inline]
fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull of a point cloud, counter-clockwise, without a closing vertex.
///
/// Points are sorted and de-duplicated first; collinear points on the hull are
/// dropped. Fewer than three unique points are returned as-is.
pub fn convex_hull(points: &[Point2<f64>]) -> Polygon2D {
    let mut pts: Vec<Point2<f64>> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .copied()
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| (*a - *b).norm() <= GEOMETRY_EPSILON);

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{polygon_area, polygon_signed_area};
    use approx::assert_relative_eq;

    #[test]
    fn hull_of_square_with_interior_points() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 3.0),
            Point2::new(2.0, 0.0), // collinear on an edge
            Point2::new(4.0, 4.0), // duplicate
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert_relative_eq!(polygon_area(&hull), 16.0);
        assert!(polygon_signed_area(&hull) > 0.0);
    }

    #[test]
    fn hull_of_few_points() {
        let points = vec![Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)];
        assert_eq!(convex_hull(&points).len(), 1);
        assert!(convex_hull(&[]).is_empty());
    }

    #[test]
    fn hull_of_collinear_points_is_degenerate() {
        let points: Vec<_> = (0..5).map(|i| Point2::new(i as f64, i as f64)).collect();
        assert!(convex_hull(&points).len() < 3);
    }
}
