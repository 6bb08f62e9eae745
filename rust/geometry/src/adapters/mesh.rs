// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed triangle mesh adapter

use rustc_hash::{FxHashMap, FxHashSet};
use sitecheck_core::{GeometryKind, RawPoint};

use super::helpers::{fallback_rectangle, to_point};
use super::GeometryAdapter;
use crate::distance::{Segment2D, SegmentLoop2D};
use crate::hull::convex_hull;
use crate::polygon::polygon_edges;
use crate::{BoundingBox, Point2, Point3, Polygon2D, Triangle, TriangleSoup, Z_TOLERANCE};

/// Triangle mesh with shared vertices
#[derive(Debug, Clone)]
pub struct MeshAdapter {
    vertices: Vec<Point3<f64>>,
    /// Faces whose indices all resolve to finite vertices
    faces: Vec<[usize; 3]>,
    bbox: Option<BoundingBox>,
}

impl MeshAdapter {
    pub fn new(vertices: &[RawPoint], faces: &[[u32; 3]]) -> Self {
        let vertices: Vec<Point3<f64>> = vertices.iter().map(to_point).collect();
        let finite = |i: usize| {
            vertices
                .get(i)
                .map_or(false, |p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
        };
        let faces: Vec<[usize; 3]> = faces
            .iter()
            .map(|f| [f[0] as usize, f[1] as usize, f[2] as usize])
            .filter(|f| f.iter().all(|&i| finite(i)))
            .collect();
        let bbox = BoundingBox::from_points(
            vertices
                .iter()
                .filter(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite()),
        );
        Self {
            vertices,
            faces,
            bbox,
        }
    }

    fn finite_vertices(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.vertices
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
    }

    /// Plan projections of the vertices sitting at the minimum Z
    fn floor_points(&self) -> Vec<Point2<f64>> {
        let Some(bbox) = self.bbox else {
            return Vec::new();
        };
        let floor = bbox.min.z + Z_TOLERANCE;
        self.finite_vertices()
            .filter(|p| p.z <= floor)
            .map(|p| Point2::new(p.x, p.y))
            .collect()
    }
}

impl GeometryAdapter for MeshAdapter {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Mesh
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    fn footprint(&self) -> Polygon2D {
        let floor = convex_hull(&self.floor_points());
        if floor.len() >= 3 {
            return floor;
        }
        let all: Vec<Point2<f64>> = self
            .finite_vertices()
            .map(|p| Point2::new(p.x, p.y))
            .collect();
        let hull = convex_hull(&all);
        if hull.len() >= 3 {
            return hull;
        }
        fallback_rectangle(self.bbox)
    }

    /// Boundary of the floor triangulation: edges used by exactly one floor
    /// face. Meshes without floor faces use the floor edges of their sides.
    fn bottom_edge_loop(&self) -> SegmentLoop2D {
        let Some(bbox) = self.bbox else {
            return Vec::new();
        };
        let floor = bbox.min.z + Z_TOLERANCE;
        let on_floor = |i: usize| self.vertices[i].z <= floor;

        let mut uses: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        let mut order: Vec<(usize, usize)> = Vec::new();
        for face in self.faces.iter().filter(|f| f.iter().all(|&i| on_floor(i))) {
            for k in 0..3 {
                let (i, j) = (face[k], face[(k + 1) % 3]);
                let key = (i.min(j), i.max(j));
                let count = uses.entry(key).or_insert(0);
                if *count == 0 {
                    order.push(key);
                }
                *count += 1;
            }
        }

        if order.is_empty() {
            let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
            for face in &self.faces {
                for k in 0..3 {
                    let (i, j) = (face[k], face[(k + 1) % 3]);
                    if on_floor(i) && on_floor(j) && seen.insert((i.min(j), i.max(j))) {
                        order.push((i.min(j), i.max(j)));
                        uses.insert((i.min(j), i.max(j)), 1);
                    }
                }
            }
        }

        let bottom: SegmentLoop2D = order
            .into_iter()
            .filter(|key| uses.get(key) == Some(&1))
            .map(|(i, j)| {
                let (a, b) = (self.vertices[i], self.vertices[j]);
                Segment2D::new(Point2::new(a.x, a.y), Point2::new(b.x, b.y))
            })
            .filter(|segment| segment.length() > 0.0)
            .collect();
        if bottom.is_empty() {
            return polygon_edges(&self.footprint());
        }
        bottom
    }

    fn triangles(&self) -> TriangleSoup {
        self.faces
            .iter()
            .map(|f| Triangle::new(self.vertices[f[0]], self.vertices[f[1]], self.vertices[f[2]]))
            .filter(|t| t.normal().is_some())
            .collect()
    }

    fn outline(&self) -> Vec<Point3<f64>> {
        self.finite_vertices().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::polygon_area;
    use approx::assert_relative_eq;

    #[test]
    fn out_of_range_faces_are_dropped() {
        let mesh = MeshAdapter::new(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2], [0, 1, 7]],
        );
        assert_eq!(mesh.triangles().len(), 1);
    }

    #[test]
    fn footprint_uses_floor_vertices() {
        // pyramid on a 2x2 base with its apex off to the side
        let mesh = MeshAdapter::new(
            &[
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 2.0, 0.0],
                [0.0, 2.0, 0.0],
                [5.0, 1.0, 3.0],
            ],
            &[[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4], [0, 2, 1], [0, 3, 2]],
        );
        assert_relative_eq!(polygon_area(&mesh.footprint()), 4.0);
        // the base diagonal is interior and not a bottom edge
        let edges = mesh.bottom_edge_loop();
        assert_eq!(edges.len(), 4);
        let perimeter: f64 = edges.iter().map(Segment2D::length).sum();
        assert_relative_eq!(perimeter, 8.0);
    }

    #[test]
    fn open_bottom_uses_side_floor_edges() {
        // four walls of a 2x2 box, no floor or roof
        let mesh = MeshAdapter::new(
            &[
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 2.0, 0.0],
                [0.0, 2.0, 0.0],
                [0.0, 0.0, 3.0],
                [2.0, 0.0, 3.0],
                [2.0, 2.0, 3.0],
                [0.0, 2.0, 3.0],
            ],
            &[
                [0, 1, 5],
                [1, 2, 6],
                [2, 3, 7],
                [3, 0, 4],
            ],
        );
        assert_eq!(mesh.bottom_edge_loop().len(), 4);
    }

    #[test]
    fn empty_mesh_has_no_footprint() {
        let mesh = MeshAdapter::new(&[], &[]);
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.footprint().is_empty());
        assert!(mesh.bottom_edge_loop().is_empty());
    }
}
