// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Adapters - uniform queries over heterogeneous shapes
//!
//! Every model geometry kind is wrapped by one adapter. Rules only ever talk to
//! the [`GeometryAdapter`] trait:
//!
//! - `curve`: open and closed polylines
//! - `brep`: polygonal face sets
//! - `mesh`: indexed triangle meshes
//! - `extrusion`: planar profiles swept along a vector
//! - `surface`: single planar boundary loops
//! - `helpers`: faceted-solid logic shared by brep, extrusion and surface

mod helpers;
mod curve;
mod brep;
mod mesh;
mod extrusion;
mod surface;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use sitecheck_core::{Geometry, GeometryKind};

use crate::distance::SegmentLoop2D;
use crate::hull::convex_hull;
use crate::{Axis, BoundingBox, Point3, Polygon2D, TriangleSoup};

pub use brep::BrepAdapter;
pub use curve::CurveAdapter;
pub use extrusion::ExtrusionAdapter;
pub use mesh::MeshAdapter;
pub use surface::SurfaceAdapter;

/// Uniform geometric queries over one model geometry
pub trait GeometryAdapter: Debug {
    /// Kind of the wrapped geometry
    fn kind(&self) -> GeometryKind;

    /// Axis-aligned bounds, `None` when the geometry has no finite points
    fn bounding_box(&self) -> Option<BoundingBox>;

    /// Plan-view outline. Empty only when the geometry has no points.
    fn footprint(&self) -> Polygon2D;

    /// Bottom edges projected to plan, or the polyline segments of a curve
    fn bottom_edge_loop(&self) -> SegmentLoop2D;

    /// Triangles of the surface, empty for open curves
    fn triangles(&self) -> TriangleSoup;

    /// 3D points describing the shape for reporting
    fn outline(&self) -> Vec<Point3<f64>>;

    /// Only closed curves can act as plot or redline boundaries
    fn is_closed_curve(&self) -> bool {
        false
    }
}

/// Wraps a geometry in the adapter for its kind
pub fn adapt(geometry: &Geometry) -> Box<dyn GeometryAdapter> {
    match geometry {
        Geometry::Curve { points, closed } => Box::new(CurveAdapter::new(points, *closed)),
        Geometry::Brep { faces } => Box::new(BrepAdapter::new(faces)),
        Geometry::Mesh { vertices, faces } => Box::new(MeshAdapter::new(vertices, faces)),
        Geometry::Extrusion { profile, direction } => {
            Box::new(ExtrusionAdapter::new(profile, *direction))
        }
        Geometry::Surface { boundary } => Box::new(SurfaceAdapter::new(boundary)),
    }
}

/// Convex hull of the geometry projected along `axis`.
///
/// Uses triangle vertices when the geometry has a surface and the outline
/// otherwise.
pub fn project_hull(adapter: &dyn GeometryAdapter, axis: Axis) -> Polygon2D {
    let triangles = adapter.triangles();
    let points: Vec<_> = if triangles.is_empty() {
        adapter.outline().iter().map(|p| axis.drop(p)).collect()
    } else {
        triangles
            .iter()
            .flat_map(|t| t.vertices())
            .map(|p| axis.drop(&p))
            .collect()
    };
    convex_hull(&points)
}
