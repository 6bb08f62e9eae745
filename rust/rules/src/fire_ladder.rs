// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fire-ladder (aerial apparatus access) check.
//!
//! Each redline is checked on its own. Buildings and ladders are assigned to
//! a redline by containment, every ladder serves its nearest building, and
//! all violated conditions are collected instead of stopping at the first.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sitecheck_core::{LayerIndex, Model, Result};
use sitecheck_geometry::{
    point_in_polygon, point_in_polygon_tolerant, point_segments_distance, segment_sets_distance,
    Point2, THRESHOLD_EPSILON,
};

use crate::entities::{load_ladders, require_buildings, require_redlines, Building, Ladder, Redline};
use crate::params::{BuildingContainment, FireLadderParams};
use crate::report::Status;
use crate::warnings::{Warning, WarningCode, Warnings};

/// Why a redline passed without checks or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireLadderReason {
    NoBuildings,
    MissingLadder,
    LadderOutsideRedline,
    WidthTooSmall,
    LengthTooShort,
    DistanceTooSmall,
    DistanceTooLarge,
}

impl FireLadderReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FireLadderReason::NoBuildings => "no_buildings",
            FireLadderReason::MissingLadder => "missing_ladder",
            FireLadderReason::LadderOutsideRedline => "ladder_outside_redline",
            FireLadderReason::WidthTooSmall => "width_too_small",
            FireLadderReason::LengthTooShort => "length_too_short",
            FireLadderReason::DistanceTooSmall => "distance_too_small",
            FireLadderReason::DistanceTooLarge => "distance_too_large",
        }
    }
}

/// Dimensions of a ladder relative to the building it serves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderMeasure {
    /// Depth away from the building, across the edge nearest to it
    pub width: f64,
    /// Longest edge
    pub length: f64,
    /// Gap between ladder and building outlines
    pub distance: f64,
}

/// Measures a ladder against a building's bottom edges.
pub fn measure_ladder(ladder: &Ladder, building: &Building) -> LadderMeasure {
    let edges = ladder.edges();
    let length = edges.iter().map(|e| e.length()).fold(0.0, f64::max);

    let mut near = None;
    let mut near_distance = f64::INFINITY;
    for edge in &edges {
        let d = point_segments_distance(&edge.midpoint(), &building.bottom_edges);
        if d < near_distance {
            near_distance = d;
            near = Some(*edge);
        }
    }

    let width = near.map_or(0.0, |edge| {
        let dir = edge.end - edge.start;
        let len = dir.norm();
        ladder
            .footprint
            .iter()
            .map(|v| {
                let w = v - edge.start;
                (dir.x * w.y - dir.y * w.x).abs() / len
            })
            .fold(0.0, f64::max)
    });

    LadderMeasure {
        width,
        length,
        distance: segment_sets_distance(&edges, &building.bottom_edges),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderAccess {
    pub ladder_id: String,
    pub ladder_name: String,
    pub building_id: String,
    pub building_name: String,
    pub width: f64,
    pub length: f64,
    pub distance: f64,
    pub inside_redline: bool,
    pub width_ok: bool,
    pub distance_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingAccess {
    pub building_id: String,
    pub building_name: String,
    pub perimeter: f64,
    /// `perimeter * length_ratio`
    pub required_length: f64,
    /// Sum of the lengths of the ladders serving this building
    pub ladder_length: f64,
    pub ladders: Vec<String>,
    pub length_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedlineAccess {
    pub redline_id: String,
    pub redline_name: String,
    pub status: Status,
    pub reasons: Vec<FireLadderReason>,
    pub buildings: Vec<BuildingAccess>,
    pub ladders: Vec<LadderAccess>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireLadderSummary {
    pub redlines: usize,
    pub passed: usize,
    pub failed: usize,
    pub buildings: usize,
    pub ladders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireLadderReport {
    pub status: Status,
    pub summary: FireLadderSummary,
    pub redlines: Vec<RedlineAccess>,
    /// Names of ladders inside no redline
    pub unmatched_ladders: Vec<String>,
    pub warnings: Vec<Warning>,
    pub params: FireLadderParams,
}

fn building_inside(building: &Building, redline: &Redline, containment: BuildingContainment) -> bool {
    if point_in_polygon(&building.center, &redline.boundary) {
        return true;
    }
    match containment {
        BuildingContainment::Center => false,
        BuildingContainment::AnyVertex => building
            .footprint
            .iter()
            .any(|v| point_in_polygon(v, &redline.boundary)),
    }
}

/// Index of the building whose edges are closest to `p`, first on ties.
fn nearest_building(p: &Point2<f64>, buildings: &[&Building]) -> Option<usize> {
    let mut best = None;
    let mut best_distance = f64::INFINITY;
    for (i, building) in buildings.iter().enumerate() {
        let d = point_segments_distance(p, &building.bottom_edges);
        if d < best_distance {
            best_distance = d;
            best = Some(i);
        }
    }
    best
}

fn check_redline(
    redline: &Redline,
    buildings: &[Building],
    ladders: &[Ladder],
    params: &FireLadderParams,
) -> RedlineAccess {
    let inside: Vec<&Building> = buildings
        .iter()
        .filter(|b| building_inside(b, redline, params.building_containment))
        .collect();
    let ladders: Vec<&Ladder> = ladders
        .iter()
        .filter(|l| point_in_polygon(&l.center, &redline.boundary))
        .collect();

    let mut reasons = BTreeSet::new();
    if inside.is_empty() {
        reasons.insert(FireLadderReason::NoBuildings);
    } else if ladders.is_empty() {
        reasons.insert(FireLadderReason::MissingLadder);
    }

    let mut ladder_records = Vec::with_capacity(ladders.len());
    let mut served: Vec<Vec<(String, f64)>> = vec![Vec::new(); inside.len()];
    if !inside.is_empty() {
        for ladder in &ladders {
            let Some(b) = nearest_building(&ladder.center, &inside) else {
                continue;
            };
            let building = inside[b];
            let m = measure_ladder(ladder, building);

            let inside_redline = ladder
                .footprint
                .iter()
                .all(|v| point_in_polygon_tolerant(v, &redline.boundary, params.boundary_tolerance));
            let width_ok = m.width + THRESHOLD_EPSILON >= params.min_width;
            let too_close = m.distance + THRESHOLD_EPSILON < params.min_distance;
            let too_far = m.distance > params.max_distance + THRESHOLD_EPSILON;

            if !inside_redline {
                reasons.insert(FireLadderReason::LadderOutsideRedline);
            }
            if !width_ok {
                reasons.insert(FireLadderReason::WidthTooSmall);
            }
            if too_close {
                reasons.insert(FireLadderReason::DistanceTooSmall);
            }
            if too_far {
                reasons.insert(FireLadderReason::DistanceTooLarge);
            }

            tracing::debug!(
                redline = %redline.name,
                ladder = %ladder.name,
                building = %building.name,
                width = m.width,
                length = m.length,
                distance = m.distance,
                "ladder measured"
            );

            served[b].push((ladder.name.clone(), m.length));
            ladder_records.push(LadderAccess {
                ladder_id: ladder.id.clone(),
                ladder_name: ladder.name.clone(),
                building_id: building.id.clone(),
                building_name: building.name.clone(),
                width: m.width,
                length: m.length,
                distance: m.distance,
                inside_redline,
                width_ok,
                distance_ok: !too_close && !too_far,
            });
        }
    }

    let building_records: Vec<BuildingAccess> = inside
        .iter()
        .zip(served)
        .map(|(building, served)| {
            let required_length = building.perimeter * params.length_ratio;
            let ladder_length: f64 = served.iter().map(|(_, l)| l).sum();
            let length_ok = ladder_length + THRESHOLD_EPSILON >= required_length;
            BuildingAccess {
                building_id: building.id.clone(),
                building_name: building.name.clone(),
                perimeter: building.perimeter,
                required_length,
                ladder_length,
                ladders: served.into_iter().map(|(name, _)| name).collect(),
                length_ok,
            }
        })
        .collect();

    if !ladders.is_empty() && building_records.iter().any(|b| !b.length_ok) {
        reasons.insert(FireLadderReason::LengthTooShort);
    }

    let failed = reasons.iter().any(|r| *r != FireLadderReason::NoBuildings);
    RedlineAccess {
        redline_id: redline.id.clone(),
        redline_name: redline.name.clone(),
        status: if failed { Status::Fail } else { Status::Pass },
        reasons: reasons.into_iter().collect(),
        buildings: building_records,
        ladders: ladder_records,
    }
}

/// Runs the fire-ladder check.
pub fn check_fire_ladders(model: &Model, params: &FireLadderParams) -> Result<FireLadderReport> {
    let index = LayerIndex::new(model);
    let mut warnings = Warnings::new();

    let redlines = require_redlines(
        &index,
        &params.redline_layer,
        params.require_curve_redlines,
        &mut warnings,
    )?;
    let buildings = require_buildings(&index, &params.building_layer, &mut warnings)?;
    let ladder_objects = index.objects_in_layer(&params.ladder_layer);
    if ladder_objects.is_empty() {
        warnings.push(
            WarningCode::MissingOptionalLayer,
            format!("ladder layer '{}' is empty", params.ladder_layer),
        );
    }
    let ladders = load_ladders(&ladder_objects, &params.ladder_layer, &mut warnings);

    let unmatched_ladders: Vec<String> = ladders
        .iter()
        .filter(|l| !redlines.iter().any(|r| point_in_polygon(&l.center, &r.boundary)))
        .map(|l| l.name.clone())
        .collect();
    for name in &unmatched_ladders {
        warnings.push(
            WarningCode::UnmatchedLadder,
            format!("ladder '{}' lies in no redline", name),
        );
    }

    let records: Vec<RedlineAccess> = redlines
        .iter()
        .map(|r| check_redline(r, &buildings, &ladders, params))
        .collect();

    let summary = FireLadderSummary {
        redlines: records.len(),
        passed: records.iter().filter(|r| r.status == Status::Pass).count(),
        failed: records.iter().filter(|r| r.status == Status::Fail).count(),
        buildings: buildings.len(),
        ladders: ladders.len(),
    };
    let status = Status::combine(records.iter().map(|r| r.status));

    tracing::info!(
        status = status.as_str(),
        redlines = summary.redlines,
        failed = summary.failed,
        "fire-ladder check complete"
    );

    Ok(FireLadderReport {
        status,
        summary,
        redlines: records,
        unmatched_ladders,
        warnings: warnings.finish(),
        params: params.clone(),
    })
}
