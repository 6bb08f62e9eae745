// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate axes used to flatten 3D geometry into a plane

use crate::{Point2, Point3, Vector3};

/// A coordinate axis. Projection "drops" the axis and keeps the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    /// Projects a point onto the plane perpendicular to this axis
    #[inline]
    pub fn drop(&self, p: &Point3<f64>) -> Point2<f64> {
        match self {
            Axis::X => Point2::new(p.y, p.z),
            Axis::Y => Point2::new(p.x, p.z),
            Axis::Z => Point2::new(p.x, p.y),
        }
    }

    /// Axis along the largest absolute component of `v`
    pub fn dominant(v: &Vector3<f64>) -> Axis {
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
        if az >= ax && az >= ay {
            Axis::Z
        } else if ay >= ax {
            Axis::Y
        } else {
            Axis::X
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_axis_picks_largest_component() {
        assert_eq!(Axis::dominant(&Vector3::new(0.1, -0.9, 0.3)), Axis::Y);
        assert_eq!(Axis::dominant(&Vector3::new(0.0, 0.0, -1.0)), Axis::Z);
        assert_eq!(Axis::dominant(&Vector3::new(2.0, 1.0, 1.0)), Axis::X);
    }

    #[test]
    fn drop_keeps_remaining_coordinates() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::X.drop(&p), Point2::new(2.0, 3.0));
        assert_eq!(Axis::Y.drop(&p), Point2::new(1.0, 3.0));
        assert_eq!(Axis::Z.drop(&p), Point2::new(1.0, 2.0));
    }
}
