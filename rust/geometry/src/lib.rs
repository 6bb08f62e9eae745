// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SiteCheck Geometry
//!
//! Computational-geometry primitives for plan-view compliance checks, plus
//! adapters that give every CAD geometry kind the same query surface
//! (bounding box, footprint, bottom edges, triangles).
//!
//! ```
//! use sitecheck_core::Geometry;
//! use sitecheck_geometry::{adapt, polygon_area};
//!
//! let adapter = adapt(&Geometry::block([0.0, 0.0, 0.0], [10.0, 6.0, 25.0]));
//! assert_eq!(adapter.bounding_box().unwrap().max.z, 25.0);
//! assert!((polygon_area(&adapter.footprint()) - 60.0).abs() < 1e-9);
//! ```

pub mod adapters;
pub mod axis;
pub mod bbox;
pub mod distance;
pub mod error;
pub mod hull;
pub mod polygon;
pub mod sat;
pub mod triangle;
pub mod triangulation;
pub mod visibility;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

/// Planar polygon without a duplicated closing vertex
pub type Polygon2D = Vec<Point2<f64>>;

/// Generic geometric tolerance (metres)
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Tolerance applied when comparing measured values against rule thresholds
pub const THRESHOLD_EPSILON: f64 = 1e-3;

/// Vertical tolerance used to pick the bottom edges of a solid
pub const Z_TOLERANCE: f64 = 1e-3;

pub use adapters::{
    adapt, project_hull, BrepAdapter, CurveAdapter, ExtrusionAdapter, GeometryAdapter,
    MeshAdapter, SurfaceAdapter,
};
pub use axis::Axis;
pub use bbox::BoundingBox;
pub use distance::{
    plan_distance, point_segment_distance, point_segments_distance, polyline_length,
    sample_polyline, segment_sets_distance, PolylinePiece, Segment2D, SegmentLoop2D,
    MIN_SAMPLE_STEP,
};
pub use error::{Error, Result};
pub use hull::convex_hull;
pub use polygon::{
    boundary_distance, point_in_polygon, point_in_polygon_tolerant, polygon_area,
    polygon_centroid, polygon_edges, polygon_perimeter,
};
pub use sat::{polygons_intersect_strict, triangles_intersect};
pub use triangle::{point_in_solid, Triangle, TriangleSoup};
pub use triangulation::{triangulate_loop, triangulate_polygon};
pub use visibility::{visibility_sweep, AngularInterval, VisibilitySweep};
