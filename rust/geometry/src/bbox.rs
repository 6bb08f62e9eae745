// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes

use crate::{Axis, Point2, Point3, Polygon2D};

/// Axis-aligned 3D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from two corners (normalized so `min <= max`)
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Tight box around a point set, `None` when empty or non-finite
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;

        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        let finite = [min.x, min.y, min.z, max.x, max.y, max.z]
            .iter()
            .all(|v| v.is_finite());
        finite.then_some(Self { min, max })
    }

    /// Extent along X
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along Z
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    #[inline]
    pub fn center_2d(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Plan-view corners, counter-clockwise from `min`
    pub fn corners_2d(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.min.x, self.min.y),
            Point2::new(self.max.x, self.min.y),
            Point2::new(self.max.x, self.max.y),
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// Plan-view rectangle as a polygon
    pub fn rectangle(&self) -> Polygon2D {
        self.corners_2d().to_vec()
    }

    /// Plan-view containment with the box grown by `tolerance` on every side
    #[inline]
    pub fn contains_2d(&self, p: &Point2<f64>, tolerance: f64) -> bool {
        p.x >= self.min.x - tolerance
            && p.x <= self.max.x + tolerance
            && p.y >= self.min.y - tolerance
            && p.y <= self.max.y + tolerance
    }

    /// Strict overlap on all three axes: the boxes must interpenetrate by more
    /// than `epsilon`, so touching faces do not count.
    #[inline]
    pub fn overlaps_strict(&self, other: &BoundingBox, epsilon: f64) -> bool {
        self.min.x < other.max.x - epsilon
            && other.min.x < self.max.x - epsilon
            && self.min.y < other.max.y - epsilon
            && other.min.y < self.max.y - epsilon
            && self.min.z < other.max.z - epsilon
            && other.min.z < self.max.z - epsilon
    }

    /// Closed overlap test, boxes within `tolerance` of each other count
    #[inline]
    pub fn intersects(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
            && self.min.z <= other.max.z + tolerance
            && other.min.z <= self.max.z + tolerance
    }

    /// Strict overlap ignoring the extent along `drop`, for shapes compared
    /// after projection
    pub fn overlaps_strict_projected(&self, other: &BoundingBox, drop: Axis, epsilon: f64) -> bool {
        let overlaps = |a0: f64, a1: f64, b0: f64, b1: f64| a0 < b1 - epsilon && b0 < a1 - epsilon;
        let x = overlaps(self.min.x, self.max.x, other.min.x, other.max.x);
        let y = overlaps(self.min.y, self.max.y, other.min.y, other.max.y);
        let z = overlaps(self.min.z, self.max.z, other.min.z, other.max.z);
        match drop {
            Axis::X => y && z,
            Axis::Y => x && z,
            Axis::Z => x && y,
        }
    }

    /// Plan-view distance from a point to the box (0 inside)
    pub fn distance_2d(&self, p: &Point2<f64>) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        dx.hypot(dy)
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }
}
