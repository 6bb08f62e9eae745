// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve adapter (sampled polylines)

use sitecheck_core::{GeometryKind, RawPoint};

use super::helpers::{fallback_rectangle, flatten, strip_closing_point_3d, to_points};
use super::GeometryAdapter;
use crate::distance::{Segment2D, SegmentLoop2D};
use crate::polygon::polygon_edges;
use crate::triangulation::triangulate_loop;
use crate::{BoundingBox, Point3, Polygon2D, TriangleSoup, GEOMETRY_EPSILON};

/// Polyline adapter. A curve is closed when flagged so or when its last
/// point repeats the first.
#[derive(Debug, Clone)]
pub struct CurveAdapter {
    /// Vertices without the duplicated closing point
    points: Vec<Point3<f64>>,
    closed: bool,
    bbox: Option<BoundingBox>,
}

impl CurveAdapter {
    pub fn new(raw: &[RawPoint], closed: bool) -> Self {
        let points = to_points(raw);
        let repeats_start = points.len() > 2
            && (points[0] - points[points.len() - 1]).norm() <= GEOMETRY_EPSILON;
        let closed = closed || repeats_start;
        let points = if closed {
            strip_closing_point_3d(points)
        } else {
            points
        };
        let bbox = BoundingBox::from_points(&points);
        Self {
            points,
            closed,
            bbox,
        }
    }

    /// Plan-view vertices of the curve
    pub fn points_2d(&self) -> Polygon2D {
        flatten(&self.points)
    }
}

impl GeometryAdapter for CurveAdapter {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Curve
    }

    fn is_closed_curve(&self) -> bool {
        self.closed && self.points.len() >= 3
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    fn footprint(&self) -> Polygon2D {
        if self.is_closed_curve() {
            return self.points_2d();
        }
        fallback_rectangle(self.bbox)
    }

    fn bottom_edge_loop(&self) -> SegmentLoop2D {
        let flat = self.points_2d();
        if self.closed {
            return polygon_edges(&flat);
        }
        flat.windows(2)
            .map(|w| Segment2D::new(w[0], w[1]))
            .filter(|s| s.length() > GEOMETRY_EPSILON)
            .collect()
    }

    fn triangles(&self) -> TriangleSoup {
        if !self.is_closed_curve() {
            return Vec::new();
        }
        triangulate_loop(&self.points).unwrap_or_default()
    }

    fn outline(&self) -> Vec<Point3<f64>> {
        let mut outline = self.points.clone();
        if self.closed {
            if let Some(first) = self.points.first() {
                outline.push(*first);
            }
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::polygon_area;
    use crate::Point2;
    use approx::assert_relative_eq;

    #[test]
    fn repeated_start_point_closes_curve() {
        let curve = CurveAdapter::new(
            &[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 3.0, 0.0], [0.0, 0.0, 0.0]],
            false,
        );
        assert!(curve.is_closed_curve());
        assert_eq!(curve.footprint().len(), 3);
        assert_relative_eq!(polygon_area(&curve.footprint()), 6.0);
        assert_eq!(curve.outline().len(), 4);
    }

    #[test]
    fn open_curve_footprint_is_bbox() {
        let curve = CurveAdapter::new(&[[0.0, 0.0, 0.0], [4.0, 2.0, 0.0], [8.0, 0.0, 0.0]], false);
        assert!(!curve.is_closed_curve());
        assert_relative_eq!(polygon_area(&curve.footprint()), 16.0);
        assert_eq!(curve.bottom_edge_loop().len(), 2);
        assert_eq!(curve.outline().len(), 3);
    }

    #[test]
    fn closed_curve_edges_include_closing_edge() {
        let curve = CurveAdapter::new(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            true,
        );
        assert_eq!(curve.bottom_edge_loop().len(), 4);
        assert_eq!(curve.triangles().len(), 2);
        let first: Point2<f64> = curve.points_2d()[0];
        assert_eq!(first, Point2::new(0.0, 0.0));
    }
}
