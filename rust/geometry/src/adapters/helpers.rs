// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helpers for the geometry adapters.
//!
//! Faceted solids (breps, extrusions, planar surfaces) all reduce to a list of
//! planar face loops, so their footprint and bottom-edge logic lives here.

use rustc_hash::FxHashSet;
use sitecheck_core::RawPoint;

use crate::distance::{Segment2D, SegmentLoop2D};
use crate::hull::convex_hull;
use crate::polygon::{polygon_edges, strip_closing_point};
use crate::triangulation::triangulate_loop;
use crate::{BoundingBox, Point2, Point3, Polygon2D, Triangle, GEOMETRY_EPSILON, Z_TOLERANCE};

/// Endpoint snapping distance when chaining bottom edges into a ring
const CHAIN_TOLERANCE: f64 = 1e-3;

#[inline]
pub(super) fn to_point(raw: &RawPoint) -> Point3<f64> {
    Point3::new(raw[0], raw[1], raw[2])
}

/// Converts raw points, dropping non-finite ones
pub(super) fn to_points(raw: &[RawPoint]) -> Vec<Point3<f64>> {
    raw.iter()
        .filter(|p| p.iter().all(|c| c.is_finite()))
        .map(to_point)
        .collect()
}

/// Removes a trailing 3D point equal to the first one
pub(super) fn strip_closing_point_3d(mut points: Vec<Point3<f64>>) -> Vec<Point3<f64>> {
    while points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first - last).norm() <= GEOMETRY_EPSILON {
            points.pop();
        } else {
            break;
        }
    }
    points
}

#[inline]
pub(super) fn flatten(points: &[Point3<f64>]) -> Polygon2D {
    points.iter().map(|p| Point2::new(p.x, p.y)).collect()
}

/// Last-resort footprint: the plan rectangle of the bounding box
pub(super) fn fallback_rectangle(bbox: Option<BoundingBox>) -> Polygon2D {
    bbox.map(|b| b.rectangle()).unwrap_or_default()
}

/// Quantized undirected edge key for de-duplicating shared face edges
fn edge_key(a: &Point3<f64>, b: &Point3<f64>) -> [i64; 6] {
    let q = |v: f64| (v / GEOMETRY_EPSILON).round() as i64;
    let ka = [q(a.x), q(a.y), q(a.z)];
    let kb = [q(b.x), q(b.y), q(b.z)];
    let (lo, hi) = if ka <= kb { (ka, kb) } else { (kb, ka) };
    [lo[0], lo[1], lo[2], hi[0], hi[1], hi[2]]
}

/// Chains unordered segments into a closed ring.
///
/// Returns `None` unless every segment is consumed and the chain closes.
pub(super) fn chain_segments(segments: &[Segment2D]) -> Option<Polygon2D> {
    if segments.len() < 3 {
        return None;
    }

    let mut remaining: Vec<Segment2D> = segments[1..].to_vec();
    let mut ring = vec![segments[0].start, segments[0].end];

    while !remaining.is_empty() {
        let tail = ring[ring.len() - 1];
        let next = remaining.iter().position(|s| {
            (s.start - tail).norm() <= CHAIN_TOLERANCE || (s.end - tail).norm() <= CHAIN_TOLERANCE
        })?;
        let seg = remaining.swap_remove(next);
        let point = if (seg.start - tail).norm() <= CHAIN_TOLERANCE {
            seg.end
        } else {
            seg.start
        };
        ring.push(point);
    }

    let closes = (ring[0] - ring[ring.len() - 1]).norm() <= CHAIN_TOLERANCE;
    if !closes {
        return None;
    }
    let ring = strip_closing_point(ring);
    (ring.len() >= 3).then_some(ring)
}

/// A solid described by planar face loops
#[derive(Debug, Clone)]
pub(super) struct FacetedSolid {
    pub(super) faces: Vec<Vec<Point3<f64>>>,
    pub(super) bbox: Option<BoundingBox>,
}

impl FacetedSolid {
    pub(super) fn new(faces: Vec<Vec<Point3<f64>>>) -> Self {
        let faces: Vec<Vec<Point3<f64>>> = faces
            .into_iter()
            .map(strip_closing_point_3d)
            .filter(|f| !f.is_empty())
            .collect();
        let bbox = BoundingBox::from_points(faces.iter().flatten());
        Self { faces, bbox }
    }

    /// Unique undirected edges over all face loops
    pub(super) fn edges(&self) -> Vec<(Point3<f64>, Point3<f64>)> {
        let mut seen: FxHashSet<[i64; 6]> = FxHashSet::default();
        let mut edges = Vec::new();
        for face in &self.faces {
            let n = face.len();
            if n < 2 {
                continue;
            }
            let count = if n == 2 { 1 } else { n };
            for i in 0..count {
                let (a, b) = (face[i], face[(i + 1) % n]);
                if (b - a).norm() <= GEOMETRY_EPSILON {
                    continue;
                }
                if seen.insert(edge_key(&a, &b)) {
                    edges.push((a, b));
                }
            }
        }
        edges
    }

    /// Edges lying flat at the solid's minimum Z, projected to plan
    pub(super) fn bottom_edge_loop(&self) -> SegmentLoop2D {
        let Some(bbox) = self.bbox else {
            return Vec::new();
        };
        let floor = bbox.min.z + Z_TOLERANCE;
        let bottom: SegmentLoop2D = self
            .edges()
            .into_iter()
            .filter(|(a, b)| a.z <= floor && b.z <= floor)
            .map(|(a, b)| Segment2D::new(Point2::new(a.x, a.y), Point2::new(b.x, b.y)))
            .filter(|s| s.length() > GEOMETRY_EPSILON)
            .collect();

        if bottom.is_empty() {
            return polygon_edges(&bbox.rectangle());
        }
        bottom
    }

    /// Footprint from the bottom loop: chained ring, else hull, else bbox
    pub(super) fn footprint(&self) -> Polygon2D {
        let bottom = self.bottom_edge_loop();
        if let Some(ring) = chain_segments(&bottom) {
            return ring;
        }

        let endpoints: Vec<Point2<f64>> = bottom.iter().flat_map(|s| [s.start, s.end]).collect();
        let hull = convex_hull(&endpoints);
        if hull.len() >= 3 {
            return hull;
        }
        fallback_rectangle(self.bbox)
    }

    pub(super) fn triangles(&self) -> Vec<Triangle> {
        self.faces
            .iter()
            .filter(|f| f.len() >= 3)
            .filter_map(|f| triangulate_loop(f).ok())
            .flatten()
            .collect()
    }
}
