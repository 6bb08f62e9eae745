// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Angular-sweep visibility from a single observer
//!
//! Each footprint is reduced to the bearing interval(s) it covers as seen
//! from the observer. The union of all interval endpoints splits the full turn
//! into cells; within a cell the set of covering footprints is constant, so a
//! single ray through the cell midpoint decides which footprint is in front.

use std::collections::BTreeSet;
use std::f64::consts::TAU;

use smallvec::{smallvec, SmallVec};

use crate::polygon::point_in_polygon;
use crate::{Point2, Polygon2D, Vector2, GEOMETRY_EPSILON};

/// Cells narrower than this (radians) are skipped
const MIN_CELL_WIDTH: f64 = 1e-12;

/// Closed bearing interval in radians, `0 <= start <= end <= TAU`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularInterval {
    pub start: f64,
    pub end: f64,
}

impl AngularInterval {
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn full() -> Self {
        Self { start: 0.0, end: TAU }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, angle: f64) -> bool {
        self.start <= angle && angle <= self.end
    }
}

/// At most two intervals per footprint (one when it does not wrap past 0)
pub type Intervals = SmallVec<[AngularInterval; 2]>;

/// Bearing from `from` to `to`, normalized to `[0, TAU)`
#[inline]
pub fn bearing(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    let a = (to.y - from.y).atan2(to.x - from.x);
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Bearing interval(s) covered by `polygon` as seen from `observer`.
///
/// An observer inside the polygon (or on one of its vertices) sees it over
/// the full turn. Otherwise the vertex bearings are sorted and the interval is
/// the complement of the largest angular gap between consecutive bearings;
/// when that complement wraps through bearing 0 it is split in two.
pub fn angular_intervals(observer: &Point2<f64>, polygon: &[Point2<f64>]) -> Intervals {
    if polygon.is_empty() {
        return SmallVec::new();
    }
    if point_in_polygon(observer, polygon) {
        return smallvec![AngularInterval::full()];
    }

    let mut angles: Vec<f64> = Vec::with_capacity(polygon.len());
    for vertex in polygon {
        if (vertex - observer).norm() <= GEOMETRY_EPSILON {
            return smallvec![AngularInterval::full()];
        }
        angles.push(bearing(observer, vertex));
    }
    angles.sort_by(f64::total_cmp);

    let n = angles.len();
    // Gap after index i; the last one wraps around to the first bearing.
    let mut widest = n - 1;
    let mut widest_gap = angles[0] + TAU - angles[n - 1];
    for i in 0..n - 1 {
        let gap = angles[i + 1] - angles[i];
        if gap > widest_gap {
            widest_gap = gap;
            widest = i;
        }
    }

    if widest == n - 1 {
        smallvec![AngularInterval::new(angles[0], angles[n - 1])]
    } else {
        smallvec![
            AngularInterval::new(angles[widest + 1], TAU),
            AngularInterval::new(0.0, angles[widest]),
        ]
    }
}

/// Ray parameter where the ray hits segment `pq`, if it does
fn ray_segment_hit(
    origin: &Point2<f64>,
    dir: &Vector2<f64>,
    p: &Point2<f64>,
    q: &Point2<f64>,
) -> Option<f64> {
    let s = q - p;
    let denom = dir.x * s.y - dir.y * s.x;
    if denom.abs() < 1e-12 {
        return None;
    }

    let w = p - origin;
    let t = (w.x * s.y - w.y * s.x) / denom;
    let u = (w.x * dir.y - w.y * dir.x) / denom;

    let tol = 1e-9;
    (t >= -tol && (-tol..=1.0 + tol).contains(&u)).then_some(t.max(0.0))
}

/// Distance along `angle` from the observer to where the ray enters the polygon.
///
/// Zero when the observer is inside; `None` when the ray misses.
pub fn entry_distance(observer: &Point2<f64>, polygon: &[Point2<f64>], angle: f64) -> Option<f64> {
    if polygon.len() >= 3 && point_in_polygon(observer, polygon) {
        return Some(0.0);
    }

    let dir = Vector2::new(angle.cos(), angle.sin());
    let n = polygon.len();
    if n < 2 {
        return None;
    }
    let edges = if n == 2 { 1 } else { n };

    (0..edges)
        .filter_map(|i| ray_segment_hit(observer, &dir, &polygon[i], &polygon[(i + 1) % n]))
        .min_by(f64::total_cmp)
}

/// Outcome of a visibility sweep, indexed like the input polygons
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySweep {
    pub intervals: Vec<Intervals>,
    /// Visible in at least one angular cell
    pub visible: Vec<bool>,
    /// Total bearing (radians) over which the polygon is in front
    pub visible_angle: Vec<f64>,
    /// Polygons that were nearest in a cell where this one was hidden
    pub blockers: Vec<BTreeSet<usize>>,
}

/// Sweeps the full turn around `observer` and decides, per angular cell,
/// which polygons are in front.
///
/// Within a cell every covering polygon is ray-cast at the cell's mid
/// bearing. Polygons whose entry distance is within `epsilon` (relative for
/// distances above 1) of the nearest are all visible; the nearest one is
/// recorded as a blocker of every polygon behind them.
pub fn visibility_sweep(observer: &Point2<f64>, polygons: &[Polygon2D], epsilon: f64) -> VisibilitySweep {
    let count = polygons.len();
    let intervals: Vec<Intervals> = polygons
        .iter()
        .map(|poly| angular_intervals(observer, poly))
        .collect();

    let mut events: Vec<f64> = vec![0.0, TAU];
    for iv in intervals.iter().flatten() {
        events.push(iv.start);
        events.push(iv.end);
    }
    events.sort_by(f64::total_cmp);
    events.dedup_by(|a, b| (*a - *b).abs() <= MIN_CELL_WIDTH);

    let mut visible = vec![false; count];
    let mut visible_angle = vec![0.0; count];
    let mut blockers = vec![BTreeSet::new(); count];

    let mut candidates: Vec<(usize, f64)> = Vec::new();
    for cell in events.windows(2) {
        let (lo, hi) = (cell[0], cell[1]);
        if hi - lo <= MIN_CELL_WIDTH {
            continue;
        }
        let mid = (lo + hi) * 0.5;

        candidates.clear();
        for (index, ivs) in intervals.iter().enumerate() {
            if !ivs.iter().any(|iv| iv.contains(mid)) {
                continue;
            }
            if let Some(distance) = entry_distance(observer, &polygons[index], mid) {
                candidates.push((index, distance));
            }
        }
        if candidates.is_empty() {
            continue;
        }

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let (nearest, nearest_distance) = candidates[0];
        let tie = epsilon * nearest_distance.max(1.0);

        for &(index, distance) in candidates.iter() {
            if distance <= nearest_distance + tie {
                visible[index] = true;
                visible_angle[index] += hi - lo;
            } else {
                blockers[index].insert(nearest);
            }
        }
    }

    VisibilitySweep {
        intervals,
        visible,
        visible_angle,
        blockers,
    }
}
