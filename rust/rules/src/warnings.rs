// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured, non-fatal notices attached to every report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of a non-fatal condition met during a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// Objects dropped from a layer because their geometry was unusable
    SkippedObjects,
    /// An optional layer resolved to no objects
    MissingOptionalLayer,
    /// A plot has no parseable height limit
    MissingHeightLimit,
    /// No required frontage rate was given or found on the plot
    MissingRequiredRate,
    /// A parameter was out of range and was adjusted
    ParameterAdjusted,
    /// A building lies in no plot
    UnmatchedBuilding,
    /// A setback curve lies in no plot
    UnmatchedSetback,
    /// A ladder lies in no redline
    UnmatchedLadder,
    /// The declared plot name matches no plot
    PlotNameNotFound,
    /// The declared plot does not contain the object
    PlotNameMismatch,
    /// Solid comparison fell back to footprints
    SolidFallback,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::SkippedObjects => "skipped_objects",
            WarningCode::MissingOptionalLayer => "missing_optional_layer",
            WarningCode::MissingHeightLimit => "missing_height_limit",
            WarningCode::MissingRequiredRate => "missing_required_rate",
            WarningCode::ParameterAdjusted => "parameter_adjusted",
            WarningCode::UnmatchedBuilding => "unmatched_building",
            WarningCode::UnmatchedSetback => "unmatched_setback",
            WarningCode::UnmatchedLadder => "unmatched_ladder",
            WarningCode::PlotNameNotFound => "plot_name_not_found",
            WarningCode::PlotNameMismatch => "plot_name_mismatch",
            WarningCode::SolidFallback => "solid_fallback",
        }
    }
}

/// One `(code, detail)` notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: WarningCode,
    pub detail: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.detail)
    }
}

/// Collects warnings during a check.
///
/// Skipped objects are only counted while the check runs; [`finish`](Self::finish)
/// turns every non-zero count into a `skipped_objects` warning after the
/// individual notices.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<Warning>,
    skipped: BTreeMap<String, usize>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: WarningCode, detail: impl Into<String>) {
        let warning = Warning {
            code,
            detail: detail.into(),
        };
        tracing::debug!(code = warning.code.as_str(), detail = %warning.detail, "check warning");
        self.items.push(warning);
    }

    /// Counts one object dropped from `layer`.
    pub fn skip(&mut self, layer: &str, object: &str, reason: &str) {
        tracing::debug!(layer, object, reason, "skipping object");
        *self.skipped.entry(layer.to_string()).or_default() += 1;
    }

    pub fn skipped(&self, layer: &str) -> usize {
        self.skipped.get(layer).copied().unwrap_or(0)
    }

    pub fn has(&self, code: WarningCode) -> bool {
        self.items.iter().any(|w| w.code == code)
    }

    pub fn finish(self) -> Vec<Warning> {
        let mut items = self.items;
        for (layer, count) in self.skipped {
            items.push(Warning {
                code: WarningCode::SkippedObjects,
                detail: format!("layer '{}': skipped {} object(s) with unusable geometry", layer, count),
            });
        }
        items
    }
}
