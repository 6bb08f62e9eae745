// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Height-limit check.
//!
//! Every building is matched to a plot and its top compared with the plot's
//! height limit. A building exceeds the limit only when its top is strictly
//! above it.

use serde::{Deserialize, Serialize};
use sitecheck_core::{LayerIndex, Model, Result};

use crate::entities::{load_setbacks, require_buildings, require_plots, Plot, Setback};
use crate::matcher::{building_samples, PlotMatcher};
use crate::params::HeightLimitParams;
use crate::report::{lift, ring_xy, Status, Volume, XYZ};
use crate::warnings::{Warning, WarningCode, Warnings};

/// One building compared against its plot's limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingHeight {
    pub building_id: String,
    pub building_name: String,
    pub plot_id: String,
    pub plot_name: String,
    pub max_z: f64,
    pub height_limit: Option<f64>,
    pub exceeded: bool,
    /// `max_z - height_limit` when exceeded, else 0
    pub exceed_amount: f64,
    pub status: Status,
    /// Part of the building above the limit
    pub exceeded_volume: Option<Volume>,
}

/// Per-plot aggregate, derived from the building records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotHeight {
    pub plot_id: String,
    pub plot_name: String,
    pub height_limit: Option<f64>,
    pub total: usize,
    pub exceeded: usize,
    pub compliant: usize,
    /// Setback outlines (or the plot boundary) lifted to the limit height
    pub limit_outlines: Vec<Vec<XYZ>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightSummary {
    pub total_buildings: usize,
    pub exceeded: usize,
    pub compliant: usize,
    pub unmatched: usize,
    pub plots_missing_height: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightLimitReport {
    pub status: Status,
    pub summary: HeightSummary,
    pub buildings: Vec<BuildingHeight>,
    pub plots: Vec<PlotHeight>,
    /// Names of buildings inside no plot
    pub unmatched: Vec<String>,
    /// Names of plots without a height limit, once each
    pub missing_height: Vec<String>,
    pub warnings: Vec<Warning>,
    pub params: HeightLimitParams,
}

/// Outlines to draw at the limit height of each plot.
fn limit_outlines(
    plots: &[Plot],
    setbacks: &[Setback],
    matcher: &PlotMatcher<'_>,
    warnings: &mut Warnings,
) -> Vec<Vec<Vec<XYZ>>> {
    let mut matched: Vec<Vec<&Setback>> = vec![Vec::new(); plots.len()];
    for setback in setbacks {
        let m = matcher.match_samples(&setback.samples(), setback.declared_plot.as_deref());
        m.report("setback", &setback.name, warnings);
        match m.index {
            Some(index) => matched[index].push(setback),
            None => warnings.push(
                WarningCode::UnmatchedSetback,
                format!("setback '{}' lies in no plot", setback.name),
            ),
        }
    }

    plots
        .iter()
        .zip(matched)
        .map(|(plot, setbacks)| {
            let Some(limit) = plot.height_limit else {
                return Vec::new();
            };
            if setbacks.is_empty() {
                let mut ring = lift(&plot.boundary, limit);
                if let Some(first) = ring.first().copied() {
                    ring.push(first);
                }
                return vec![ring];
            }
            setbacks
                .iter()
                .map(|s| s.points.iter().map(|p| [p.x, p.y, limit]).collect())
                .collect()
        })
        .collect()
}

/// Runs the height-limit check.
pub fn check_height_limits(model: &Model, params: &HeightLimitParams) -> Result<HeightLimitReport> {
    let index = LayerIndex::new(model);
    let mut warnings = Warnings::new();

    let plots = require_plots(&index, &params.plot_layer, &mut warnings)?;
    let buildings = require_buildings(&index, &params.building_layer, &mut warnings)?;
    let setback_objects = index.objects_in_layer(&params.setback_layer);
    if setback_objects.is_empty() {
        warnings.push(
            WarningCode::MissingOptionalLayer,
            format!("setback layer '{}' is empty; plot boundaries are used", params.setback_layer),
        );
    }
    let setbacks = load_setbacks(&setback_objects, &params.setback_layer, &mut warnings);
    let matcher = PlotMatcher::new(&plots);

    let mut missing_height = Vec::new();
    for plot in &plots {
        if plot.height_limit.is_none() {
            warnings.push(
                WarningCode::MissingHeightLimit,
                format!("plot '{}' has no height limit", plot.name),
            );
            missing_height.push(plot.name.clone());
        }
    }

    let outlines = limit_outlines(&plots, &setbacks, &matcher, &mut warnings);

    let mut records = Vec::with_capacity(buildings.len());
    let mut record_plot = Vec::with_capacity(buildings.len());
    let mut unmatched = Vec::new();
    for building in &buildings {
        let m = matcher.match_samples(&building_samples(&building.bbox), building.declared_plot.as_deref());
        m.report("building", &building.name, &mut warnings);
        let Some(plot_index) = m.index else {
            warnings.push(
                WarningCode::UnmatchedBuilding,
                format!("building '{}' lies in no plot", building.name),
            );
            unmatched.push(building.name.clone());
            continue;
        };

        let plot = &plots[plot_index];
        let max_z = building.max_z();
        let (exceeded, exceed_amount, status, exceeded_volume) = match plot.height_limit {
            Some(limit) if max_z > limit => (
                true,
                max_z - limit,
                Status::Fail,
                Some(Volume {
                    outline: ring_xy(&building.footprint),
                    bottom_z: limit,
                    top_z: max_z,
                }),
            ),
            Some(_) => (false, 0.0, Status::Pass, None),
            None => (false, 0.0, Status::Unknown, None),
        };

        tracing::debug!(
            building = %building.name,
            plot = %plot.name,
            max_z,
            limit = ?plot.height_limit,
            exceeded,
            "height compared"
        );

        records.push(BuildingHeight {
            building_id: building.id.clone(),
            building_name: building.name.clone(),
            plot_id: plot.id.clone(),
            plot_name: plot.name.clone(),
            max_z,
            height_limit: plot.height_limit,
            exceeded,
            exceed_amount,
            status,
            exceeded_volume,
        });
        record_plot.push(plot_index);
    }

    let plot_stats: Vec<PlotHeight> = plots
        .iter()
        .zip(outlines)
        .map(|(plot, limit_outlines)| {
            let in_plot = || {
                records
                    .iter()
                    .zip(&record_plot)
                    .filter(move |(_, p)| **p == plot.index)
                    .map(|(r, _)| r)
            };
            PlotHeight {
                plot_id: plot.id.clone(),
                plot_name: plot.name.clone(),
                height_limit: plot.height_limit,
                total: in_plot().count(),
                exceeded: in_plot().filter(|r| r.exceeded).count(),
                compliant: in_plot().filter(|r| r.status == Status::Pass).count(),
                limit_outlines,
            }
        })
        .collect();

    let summary = HeightSummary {
        total_buildings: buildings.len(),
        exceeded: records.iter().filter(|r| r.exceeded).count(),
        compliant: records.iter().filter(|r| r.status == Status::Pass).count(),
        unmatched: unmatched.len(),
        plots_missing_height: missing_height.len(),
    };

    let status = Status::combine(
        records
            .iter()
            .map(|r| r.status)
            .chain((!unmatched.is_empty()).then_some(Status::Unknown)),
    );

    tracing::info!(
        status = status.as_str(),
        buildings = summary.total_buildings,
        exceeded = summary.exceeded,
        unmatched = summary.unmatched,
        "height-limit check complete"
    );

    Ok(HeightLimitReport {
        status,
        summary,
        buildings: records,
        plots: plot_stats,
        unmatched,
        missing_height,
        warnings: warnings.finish(),
        params: params.clone(),
    })
}
