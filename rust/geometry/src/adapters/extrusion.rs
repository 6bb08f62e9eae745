// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion adapter (profile swept along a vector)

use sitecheck_core::{GeometryKind, RawPoint};

use super::helpers::{strip_closing_point_3d, to_point, to_points, FacetedSolid};
use super::GeometryAdapter;
use crate::distance::SegmentLoop2D;
use crate::{BoundingBox, Point3, Polygon2D, TriangleSoup, Vector3, GEOMETRY_EPSILON};

/// Closed profile extruded along `direction`.
///
/// The solid is expanded into its two caps and one quad per profile edge so
/// that all queries go through the faceted-solid path.
#[derive(Debug, Clone)]
pub struct ExtrusionAdapter {
    solid: FacetedSolid,
    direction: Vector3<f64>,
}

impl ExtrusionAdapter {
    pub fn new(profile: &[RawPoint], direction: RawPoint) -> Self {
        let base = strip_closing_point_3d(to_points(profile));
        let end = to_point(&direction);
        let direction = if end.coords.iter().all(|c| c.is_finite()) {
            end.coords
        } else {
            Vector3::zeros()
        };

        let faces = if direction.norm() <= GEOMETRY_EPSILON || base.len() < 2 {
            vec![base]
        } else {
            let top: Vec<Point3<f64>> = base.iter().map(|p| p + direction).collect();
            let n = base.len();
            let mut faces = Vec::with_capacity(n + 2);
            for i in 0..n {
                let j = (i + 1) % n;
                faces.push(vec![base[i], base[j], top[j], top[i]]);
            }
            let mut bottom = base.clone();
            bottom.reverse();
            faces.push(bottom);
            faces.push(top);
            faces
        };

        Self {
            solid: FacetedSolid::new(faces),
            direction,
        }
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }
}

impl GeometryAdapter for ExtrusionAdapter {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Extrusion
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.solid.bbox
    }

    fn footprint(&self) -> Polygon2D {
        self.solid.footprint()
    }

    fn bottom_edge_loop(&self) -> SegmentLoop2D {
        self.solid.bottom_edge_loop()
    }

    fn triangles(&self) -> TriangleSoup {
        self.solid.triangles()
    }

    fn outline(&self) -> Vec<Point3<f64>> {
        self.solid.faces.iter().flatten().copied().collect()
    }
}
