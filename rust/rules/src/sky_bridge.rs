// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sky-bridge (aerial corridor) check.

use serde::{Deserialize, Serialize};
use sitecheck_core::{LayerIndex, Model, Result};
use sitecheck_geometry::{adapt, BoundingBox, THRESHOLD_EPSILON};

use crate::entities::{require_plots, Plot};
use crate::params::SkyBridgeParams;
use crate::report::Status;
use crate::warnings::{Warning, Warnings};

/// Slack used when retesting with the corridor's corners
const CORNER_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyBridgeReason {
    NotConnecting,
    WidthTooSmall,
    HeightTooSmall,
    ClearanceTooLow,
}

impl SkyBridgeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkyBridgeReason::NotConnecting => "not_connecting",
            SkyBridgeReason::WidthTooSmall => "width_too_small",
            SkyBridgeReason::HeightTooSmall => "height_too_small",
            SkyBridgeReason::ClearanceTooLow => "clearance_too_low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyBridgeRecord {
    pub corridor_id: String,
    pub corridor_name: String,
    /// Smaller plan dimension
    pub width: f64,
    pub height: f64,
    /// Underside elevation
    pub clearance: f64,
    /// Distinct names of the plots the corridor reaches
    pub connected_plots: Vec<String>,
    pub status: Status,
    pub reasons: Vec<SkyBridgeReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyBridgeSummary {
    pub corridors: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyBridgeReport {
    pub status: Status,
    pub summary: SkyBridgeSummary,
    pub corridors: Vec<SkyBridgeRecord>,
    pub warnings: Vec<Warning>,
    pub params: SkyBridgeParams,
}

/// Plot names reached by the corridor, deduplicated in plot order.
///
/// The bbox center is tested first with half the larger plan dimension as
/// slack; when that reaches fewer than two plots the four corners are tested
/// with a fixed slack and the results are merged.
pub fn connected_plots(bbox: &BoundingBox, plots: &[Plot]) -> Vec<String> {
    let center = bbox.center_2d();
    let reach = 0.5 * bbox.width().max(bbox.depth());
    let mut hits: Vec<bool> = plots
        .iter()
        .map(|p| p.bbox.contains_2d(&center, reach))
        .collect();

    if hits.iter().filter(|h| **h).count() < 2 {
        let corners = bbox.corners_2d();
        for (hit, plot) in hits.iter_mut().zip(plots) {
            *hit |= corners
                .iter()
                .any(|c| plot.bbox.contains_2d(c, CORNER_TOLERANCE));
        }
    }

    let mut names: Vec<String> = Vec::new();
    for (plot, hit) in plots.iter().zip(hits) {
        if hit && !names.contains(&plot.name) {
            names.push(plot.name.clone());
        }
    }
    names
}

/// Runs the sky-bridge check.
pub fn check_sky_bridges(model: &Model, params: &SkyBridgeParams) -> Result<SkyBridgeReport> {
    let index = LayerIndex::new(model);
    let mut warnings = Warnings::new();

    let corridors = index.require_layer(&params.corridor_layer)?;
    let plots = require_plots(&index, &params.plot_layer, &mut warnings)?;

    let mut records = Vec::with_capacity(corridors.len());
    for object in &corridors {
        let Some(bbox) = adapt(object.geometry).bounding_box() else {
            warnings.skip(&params.corridor_layer, object.id(), "no finite points");
            continue;
        };

        let width = bbox.width().min(bbox.depth());
        let height = bbox.height();
        let clearance = bbox.min.z;
        let connected = connected_plots(&bbox, &plots);

        let mut reasons = Vec::new();
        if connected.len() < 2 {
            reasons.push(SkyBridgeReason::NotConnecting);
        }
        if width + THRESHOLD_EPSILON < params.min_width {
            reasons.push(SkyBridgeReason::WidthTooSmall);
        }
        if height + THRESHOLD_EPSILON < params.min_height {
            reasons.push(SkyBridgeReason::HeightTooSmall);
        }
        if clearance + THRESHOLD_EPSILON < params.min_clearance {
            reasons.push(SkyBridgeReason::ClearanceTooLow);
        }

        tracing::debug!(
            corridor = object.label(),
            width,
            height,
            clearance,
            plots = connected.len(),
            "sky bridge measured"
        );

        records.push(SkyBridgeRecord {
            corridor_id: object.id().to_string(),
            corridor_name: object.label().to_string(),
            width,
            height,
            clearance,
            connected_plots: connected,
            status: if reasons.is_empty() { Status::Pass } else { Status::Fail },
            reasons,
        });
    }

    let summary = SkyBridgeSummary {
        corridors: records.len(),
        passed: records.iter().filter(|r| r.status == Status::Pass).count(),
        failed: records.iter().filter(|r| r.status == Status::Fail).count(),
    };
    let status = Status::combine(records.iter().map(|r| r.status));

    tracing::info!(
        status = status.as_str(),
        corridors = summary.corridors,
        failed = summary.failed,
        "sky-bridge check complete"
    );

    Ok(SkyBridgeReport {
        status,
        summary,
        corridors: records,
        warnings: warnings.finish(),
        params: params.clone(),
    })
}
