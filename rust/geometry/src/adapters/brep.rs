// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brep adapter (polygonal face sets)

use sitecheck_core::{BrepFace, GeometryKind};

use super::helpers::{to_points, FacetedSolid};
use super::GeometryAdapter;
use crate::distance::SegmentLoop2D;
use crate::{BoundingBox, Point3, Polygon2D, TriangleSoup};

/// Boundary representation made of planar face loops
#[derive(Debug, Clone)]
pub struct BrepAdapter {
    solid: FacetedSolid,
}

impl BrepAdapter {
    pub fn new(faces: &[BrepFace]) -> Self {
        let loops = faces.iter().map(|f| to_points(&f.outer)).collect();
        Self {
            solid: FacetedSolid::new(loops),
        }
    }

    pub fn face_count(&self) -> usize {
        self.solid.faces.len()
    }
}

impl GeometryAdapter for BrepAdapter {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Brep
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
