// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Separating-axis intersection tests
//!
//! Both tests are strict: shapes that only touch along an edge or at a vertex
//! are reported as separated. An axis separates two shapes when their
//! projections are disjoint or overlap by no more than `epsilon`.

use crate::{Axis, Point2, Triangle, Vector2, Vector3};

/// Cross products shorter than this are treated as parallel directions
const PARALLEL_EPSILON: f64 = 1e-9;

#[inline]
fn separated(a: (f64, f64), b: (f64, f64), epsilon: f64) -> bool {
    a.1 <= b.0 + epsilon || b.1 <= a.0 + epsilon
}

#[inline]
fn project_polygon(polygon: &[Point2<f64>], axis: &Vector2<f64>) -> (f64, f64) {
    polygon.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = p.coords.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Unit edge normals of a closed ring, skipping zero-length edges
fn edge_normals(polygon: &[Point2<f64>]) -> Vec<Vector2<f64>> {
    let n = polygon.len();
    (0..n)
        .filter_map(|i| {
            let edge = polygon[(i + 1) % n] - polygon[i];
            let len = edge.norm();
            (len > PARALLEL_EPSILON).then(|| Vector2::new(-edge.y / len, edge.x / len))
        })
        .collect()
}

/// True only if the polygons genuinely overlap.
///
/// Every edge normal of both polygons is a candidate separating axis. The
/// result is exact for convex polygons; concave inputs are treated as their
/// edge-normal envelope. Degenerate polygons (fewer than three vertices) never
/// intersect.
pub fn polygons_intersect_strict(a: &[Point2<f64>], b: &[Point2<f64>], epsilon: f64) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    for axis in edge_normals(a).iter().chain(edge_normals(b).iter()) {
        if separated(project_polygon(a, axis), project_polygon(b, axis), epsilon) {
            return false;
        }
    }
    true
}

/// Triangle/triangle intersection by the separating-axis theorem.
///
/// Parallel triangles are either in different planes (no intersection) or
/// coplanar, in which case both are flattened along the dominant normal axis
/// and tested with [`polygons_intersect_strict`]. Otherwise the candidate
/// axes are both face normals and the nine edge cross products.
pub fn triangles_intersect(a: &Triangle, b: &Triangle, epsilon: f64) -> bool {
    let (Some(na), Some(nb)) = (a.normal(), b.normal()) else {
        return false;
    };

    if na.cross(&nb).norm() < PARALLEL_EPSILON {
        let plane_offset = na.dot(&(b.v0 - a.v0));
        if plane_offset.abs() > epsilon {
            return false;
        }
        let drop = Axis::dominant(&na);
        return polygons_intersect_strict(&a.project(drop), &b.project(drop), epsilon);
    }

    let mut axes: Vec<Vector3<f64>> = Vec::with_capacity(11);
    axes.push(na);
    axes.push(nb);
    for ea in a.edges() {
        for eb in b.edges() {
            let axis = ea.cross(&eb);
            let len = axis.norm();
            if len > PARALLEL_EPSILON {
                axes.push(axis / len);
            }
        }
    }

    !axes
        .iter()
        .any(|axis| separated(a.interval(axis), b.interval(axis), epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point3;

    const EPS: f64 = 1e-6;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    #[test]
    fn overlapping_rectangles_intersect() {
        assert!(polygons_intersect_strict(
            &rect(0.0, 0.0, 2.0, 2.0),
            &rect(1.0, 1.0, 3.0, 3.0),
            EPS
        ));
    }

    #[test]
    fn edge_touching_rectangles_do_not_intersect() {
        assert!(!polygons_intersect_strict(
            &rect(0.0, 0.0, 2.0, 2.0),
            &rect(2.0, 0.0, 4.0, 2.0),
            EPS
        ));
    }

    #[test]
    fn containment_counts_as_intersection() {
        assert!(polygons_intersect_strict(
            &rect(0.0, 0.0, 10.0, 10.0),
            &rect(4.0, 4.0, 5.0, 5.0),
            EPS
        ));
    }

    #[test]
    fn rotated_square_separated_by_its_own_axis() {
        let diamond = vec![
            Point2::new(3.0, 1.0),
            Point2::new(4.0, 2.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 2.0),
        ];
        // bounding boxes overlap but the diamond's edge normal separates them
        assert!(!polygons_intersect_strict(&rect(0.0, 0.0, 2.4, 1.4), &diamond, EPS));
    }

    #[test]
    fn degenerate_polygons_never_intersect() {
        let segment = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0)];
        assert!(!polygons_intersect_strict(&segment, &rect(0.0, 0.0, 5.0, 5.0), EPS));
    }

    #[test]
    fn coplanar_triangles_sharing_an_edge_do_not_intersect() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = tri([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(!triangles_intersect(&a, &b, EPS));
    }

    #[test]
    fn coplanar_overlapping_triangles_intersect() {
        let a = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        let b = tri([0.5, 0.5, 0.0], [2.5, 0.5, 0.0], [0.5, 2.5, 0.0]);
        assert!(triangles_intersect(&a, &b, EPS));
    }

    #[test]
    fn piercing_triangles_intersect() {
        let a = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let b = tri([1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.5, 0.5, 1.0]);
        assert!(triangles_intersect(&a, &b, EPS));
    }

    #[test]
    fn parallel_triangles_in_different_planes() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = tri([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        assert!(!triangles_intersect(&a, &b, EPS));
    }

    #[test]
    fn distant_triangles_do_not_intersect() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = tri([5.0, 5.0, -1.0], [5.0, 5.0, 1.0], [6.0, 5.0, 0.0]);
        assert!(!triangles_intersect(&a, &b, EPS));
    }

    #[test]
    fn perpendicular_faces_touching_along_an_edge_do_not_intersect() {
        // floor and wall of a box meeting at the x axis
        let floor = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        let wall = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 2.0]);
        assert!(!triangles_intersect(&floor, &wall, EPS));
    }
}
