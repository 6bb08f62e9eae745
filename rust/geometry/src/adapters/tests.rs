// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tests for geometry adapters.

use super::*;
use crate::polygon::{polygon_area, polygon_perimeter};
use crate::GEOMETRY_EPSILON;
use approx::assert_relative_eq;
use sitecheck_core::BrepFace;

fn unit_box_faces() -> Vec<BrepFace> {
    let p = |x: f64, y: f64, z: f64| [x, y, z];
    vec![
        BrepFace { outer: vec![p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)] },
        BrepFace { outer: vec![p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)] },
        BrepFace { outer: vec![p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)] },
        BrepFace { outer: vec![p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)] },
        BrepFace { outer: vec![p(1., 1., 0.), p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.)] },
        BrepFace { outer: vec![p(0., 1., 0.), p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.)] },
    ]
}

#[test]
fn block_extrusion_queries() {
    let geometry = Geometry::block([0.0, 0.0, 0.0], [10.0, 6.0, 25.0]);
    let adapter = adapt(&geometry);
    assert_eq!(adapter.kind(), GeometryKind::Extrusion);

    let bbox = adapter.bounding_box().unwrap();
    assert_relative_eq!(bbox.max.z, 25.0);
    assert_relative_eq!(bbox.width(), 10.0);

    assert_relative_eq!(polygon_area(&adapter.footprint()), 60.0, epsilon = 1e-9);
    let bottom = adapter.bottom_edge_loop();
    assert_eq!(bottom.len(), 4);
    let perimeter: f64 = bottom.iter().map(|s| s.length()).sum();
    assert_relative_eq!(perimeter, 32.0, epsilon = 1e-9);

    // 2 per cap + 2 per side
    assert_eq!(adapter.triangles().len(), 12);
    assert!(!adapter.is_closed_curve());
}

#[test]
fn brep_box_footprint_is_bottom_face() {
    let adapter = adapt(&Geometry::Brep { faces: unit_box_faces() });
    let footprint = adapter.footprint();
    assert_eq!(footprint.len(), 4);
    assert_relative_eq!(polygon_area(&footprint), 1.0, epsilon = 1e-9);
    assert_relative_eq!(polygon_perimeter(&footprint), 4.0, epsilon = 1e-9);
    assert_eq!(adapter.bottom_edge_loop().len(), 4);
    assert_eq!(adapter.triangles().len(), 12);
}

#[test]
fn brep_without_faces_is_empty() {
    let adapter = adapt(&Geometry::Brep { faces: Vec::new() });
    assert!(adapter.bounding_box().is_none());
    assert!(adapter.footprint().is_empty());
    assert!(adapter.bottom_edge_loop().is_empty());
}

#[test]
fn flat_extrusion_behaves_like_a_surface() {
    let geometry = Geometry::Extrusion {
        profile: vec![[0.0, 0.0, 5.0], [4.0, 0.0, 5.0], [4.0, 4.0, 5.0], [0.0, 4.0, 5.0]],
        direction: [0.0, 0.0, 0.0],
    };
    let adapter = adapt(&geometry);
    assert_relative_eq!(polygon_area(&adapter.footprint()), 16.0, epsilon = 1e-9);
    assert_eq!(adapter.triangles().len(), 2);
}

#[test]
fn horizontal_surface_footprint() {
    let geometry = Geometry::Surface {
        boundary: vec![[0.0, 0.0, 3.0], [6.0, 0.0, 3.0], [6.0, 2.0, 3.0], [0.0, 2.0, 3.0]],
    };
    let adapter = adapt(&geometry);
    assert_eq!(adapter.kind(), GeometryKind::Surface);
    assert_relative_eq!(polygon_area(&adapter.footprint()), 12.0, epsilon = 1e-9);
    assert_eq!(adapter.outline().len(), 4);
}

#[test]
fn vertical_surface_falls_back_to_degenerate_rectangle() {
    let geometry = Geometry::Surface {
        boundary: vec![[0.0, 0.0, 0.0], [6.0, 0.0, 0.0], [6.0, 0.0, 3.0], [0.0, 0.0, 3.0]],
    };
    let adapter = adapt(&geometry);
    let footprint = adapter.footprint();
    assert_eq!(footprint.len(), 4);
    assert!(polygon_area(&footprint) <= GEOMETRY_EPSILON);
}

#[test]
fn project_hull_along_each_axis() {
    let adapter = adapt(&Geometry::block([0.0, 0.0, 0.0], [10.0, 6.0, 25.0]));
    assert_relative_eq!(polygon_area(&project_hull(adapter.as_ref(), Axis::Z)), 60.0, epsilon = 1e-9);
    assert_relative_eq!(polygon_area(&project_hull(adapter.as_ref(), Axis::X)), 150.0, epsilon = 1e-9);
    assert_relative_eq!(polygon_area(&project_hull(adapter.as_ref(), Axis::Y)), 250.0, epsilon = 1e-9);
}

#[test]
fn project_hull_of_open_curve_uses_outline() {
    let adapter = adapt(&Geometry::polyline(vec![
        [0.0, 0.0, 0.0],
        [4.0, 0.0, 0.0],
        [4.0, 3.0, 0.0],
    ]));
    assert_relative_eq!(polygon_area(&project_hull(adapter.as_ref(), Axis::Z)), 6.0, epsilon = 1e-9);
}
