// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D triangles

use crate::{Axis, BoundingBox, Point2, Point3, Vector3, GEOMETRY_EPSILON};

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

/// Unordered list of triangles describing a solid's surface
pub type TriangleSoup = Vec<Triangle>;

/// Parity-test ray, skewed off every coordinate plane and diagonal
const PARITY_RAY: [f64; 3] = [0.8017, 0.4523, 0.3907];

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized normal (length is twice the area)
    #[inline]
    pub fn raw_normal(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal, `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.raw_normal();
        let len = n.norm();
        (len > 1e-12).then(|| n / len)
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        self.raw_normal().norm() * 0.5
    }

    #[inline]
    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Edge vectors v0→v1, v1→v2, v2→v0
    #[inline]
    pub fn edges(&self) -> [Vector3<f64>; 3] {
        [self.v1 - self.v0, self.v2 - self.v1, self.v0 - self.v2]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new(self.v0, self.v1);
        bbox = bbox.union(&BoundingBox::new(self.v2, self.v2));
        bbox
    }

    /// Vertices projected onto the plane perpendicular to `axis`
    pub fn project(&self, axis: Axis) -> Vec<Point2<f64>> {
        self.vertices().iter().map(|p| axis.drop(p)).collect()
    }

    /// Extent of the triangle along `axis` (not necessarily unit)
    #[inline]
    pub fn interval(&self, axis: &Vector3<f64>) -> (f64, f64) {
        let d0 = self.v0.coords.dot(axis);
        let d1 = self.v1.coords.dot(axis);
        let d2 = self.v2.coords.dot(axis);
        (d0.min(d1).min(d2), d0.max(d1).max(d2))
    }

    /// Ray parameter where `origin + t * dir` crosses the triangle
    /// (Möller-Trumbore), `None` when the ray misses or runs parallel.
    pub fn ray_hit(&self, origin: &Point3<f64>, dir: &Vector3<f64>) -> Option<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let h = dir.cross(&e2);
        let a = e1.dot(&h);
        if a.abs() < 1e-12 {
            return None;
        }
        let f = 1.0 / a;
        let s = origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(&e1);
        let v = f * dir.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        Some(f * e2.dot(&q))
    }
}

/// True when `p` is enclosed by `surface`: a ray from it crosses the
/// surface an odd number of times. Open or empty surfaces enclose nothing
/// reliably.
pub fn point_in_solid(p: &Point3<f64>, surface: &[Triangle]) -> bool {
    let dir = Vector3::new(PARITY_RAY[0], PARITY_RAY[1], PARITY_RAY[2]).normalize();
    let crossings = surface
        .iter()
        .filter_map(|t| t.ray_hit(p, &dir))
        .filter(|&t| t > GEOMETRY_EPSILON)
        .count();
    crossings % 2 == 1
}
