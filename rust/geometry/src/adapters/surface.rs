// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar surface adapter

use sitecheck_core::{GeometryKind, RawPoint};

use super::helpers::{to_points, FacetedSolid};
use super::GeometryAdapter;
use crate::distance::SegmentLoop2D;
use crate::{BoundingBox, Point3, Polygon2D, TriangleSoup};

/// A single planar boundary loop, treated as a one-face solid
#[derive(Debug, Clone)]
pub struct SurfaceAdapter {
    solid: FacetedSolid,
}

impl SurfaceAdapter {
    pub fn new(boundary: &[RawPoint]) -> Self {
        Self {
            solid: FacetedSolid::new(vec![to_points(boundary)]),
        }
    }
}

impl GeometryAdapter for SurfaceAdapter {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Surface
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
        self.solid.faces.first().cloned().unwrap_or_default()
    }
}
