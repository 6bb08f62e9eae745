// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SiteCheck Rules
//!
//! Geometric building-code checks over a CAD model snapshot.
//!
//! ## Checks
//!
//! - **Height limit**: building tops against per-plot limits
//! - **Frontage rate**: share of each setback line faced by buildings
//! - **Fire ladder**: ladder placement, size and distance per redline
//! - **Sky bridge**: bridges must link two plots and meet size rules
//! - **Sight corridor**: observer visibility and corridor collision
//!
//! Every checker takes `&Model` plus a parameter struct and returns a
//! serializable report or an [`Error`]. Non-fatal findings are collected as
//! [`Warning`]s inside the report.
//!
//! ## Quick Start
//!
//! ```rust
//! use sitecheck_core::{Geometry, Model};
//! use sitecheck_rules::{run_check, CheckRequest, HeightLimitParams, Status};
//!
//! let mut model = Model::new();
//! model
//!     .add("plots", "P1", Geometry::closed_curve(vec![
//!         [0.0, 0.0, 0.0], [50.0, 0.0, 0.0], [50.0, 40.0, 0.0], [0.0, 40.0, 0.0],
//!     ]))
//!     .attributes
//!     .insert("height_limit", "24m");
//! model.add("buildings", "B1", Geometry::block([10.0, 10.0, 0.0], [20.0, 20.0, 18.0]));
//!
//! let request = CheckRequest::HeightLimit(HeightLimitParams::default());
//! let result = run_check(&model, &request).unwrap();
//! assert_eq!(result.status(), Status::Pass);
//! ```

pub mod entities;
pub mod fire_ladder;
pub mod frontage;
pub mod height;
pub mod matcher;
pub mod params;
pub mod report;
pub mod sight_corridor;
pub mod sky_bridge;
pub mod warnings;

use serde::{Deserialize, Serialize};

pub use sitecheck_core::{Error, Model, Result};

pub use fire_ladder::{check_fire_ladders, FireLadderReason, FireLadderReport};
pub use frontage::{check_frontage, FrontageReport};
pub use height::{check_height_limits, HeightLimitReport};
pub use matcher::{NameCheck, PlotMatch, PlotMatcher};
pub use params::{
    normalize_rate, BuildingContainment, CollisionMode, CorridorCollisionParams, DropAxis,
    FireLadderParams, FrontageParams, HeightLimitParams, SightVisibilityParams, SkyBridgeParams,
};
pub use report::{Status, Volume};
pub use sight_corridor::{
    check_corridor_collision, check_sight_visibility, CorridorCollisionReport,
    SightVisibilityReport,
};
pub use sky_bridge::{check_sky_bridges, SkyBridgeReason, SkyBridgeReport};
pub use warnings::{Warning, WarningCode};

/// One check to run, tagged by name.
///
/// ```toml
/// check = "frontage_rate"
/// sample_step = 0.5
/// required_rate = 80
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckRequest {
    HeightLimit(HeightLimitParams),
    FrontageRate(FrontageParams),
    FireLadder(FireLadderParams),
    SkyBridge(SkyBridgeParams),
    SightVisibility(SightVisibilityParams),
    CorridorCollision(CorridorCollisionParams),
}

impl CheckRequest {
    pub fn name(&self) -> &'static str {
        match self {
            CheckRequest::HeightLimit(_) => "height_limit",
            CheckRequest::FrontageRate(_) => "frontage_rate",
            CheckRequest::FireLadder(_) => "fire_ladder",
            CheckRequest::SkyBridge(_) => "sky_bridge",
            CheckRequest::SightVisibility(_) => "sight_visibility",
            CheckRequest::CorridorCollision(_) => "corridor_collision",
        }
    }
}

/// Report of any check, tagged like its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckResult {
    HeightLimit(HeightLimitReport),
    FrontageRate(FrontageReport),
    FireLadder(FireLadderReport),
    SkyBridge(SkyBridgeReport),
    SightVisibility(SightVisibilityReport),
    CorridorCollision(CorridorCollisionReport),
}

impl CheckResult {
    /// Overall status of the wrapped report
    pub fn status(&self) -> Status {
        match self {
            CheckResult::HeightLimit(r) => r.status,
            CheckResult::FrontageRate(r) => r.status,
            CheckResult::FireLadder(r) => r.status,
            CheckResult::SkyBridge(r) => r.status,
            CheckResult::SightVisibility(r) => r.status,
            CheckResult::CorridorCollision(r) => r.status,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            CheckResult::HeightLimit(r) => &r.warnings,
            CheckResult::FrontageRate(r) => &r.warnings,
            CheckResult::FireLadder(r) => &r.warnings,
            CheckResult::SkyBridge(r) => &r.warnings,
            CheckResult::SightVisibility(r) => &r.warnings,
            CheckResult::CorridorCollision(r) => &r.warnings,
        }
    }
}

/// Runs the requested check against `model`.
pub fn run_check(model: &Model, request: &CheckRequest) -> Result<CheckResult> {
    tracing::debug!(check = request.name(), objects = model.objects.len(), "running check");
    Ok(match request {
        CheckRequest::HeightLimit(p) => CheckResult::HeightLimit(check_height_limits(model, p)?),
        CheckRequest::FrontageRate(p) => CheckResult::FrontageRate(check_frontage(model, p)?),
        CheckRequest::FireLadder(p) => CheckResult::FireLadder(check_fire_ladders(model, p)?),
        CheckRequest::SkyBridge(p) => CheckResult::SkyBridge(check_sky_bridges(model, p)?),
        CheckRequest::SightVisibility(p) => {
            CheckResult::SightVisibility(check_sight_visibility(model, p)?)
        }
        CheckRequest::CorridorCollision(p) => {
            CheckResult::CorridorCollision(check_corridor_collision(model, p)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_toml() {
        let request: CheckRequest = toml::from_str(
            r#"
            check = "frontage_rate"
            sample_step = 0.5
            required_rate = 80
            "#,
        )
        .unwrap();
        match request {
            CheckRequest::FrontageRate(p) => {
                assert_eq!(p.sample_step, 0.5);
                assert_eq!(p.required_rate, Some(80.0));
                assert_eq!(p.building_layer, FrontageParams::default().building_layer);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn bare_request_uses_defaults() {
        let request: CheckRequest = serde_json::from_str(r#"{"check":"sky_bridge"}"#).unwrap();
        assert_eq!(request, CheckRequest::SkyBridge(SkyBridgeParams::default()));
        assert_eq!(request.name(), "sky_bridge");
    }

    #[test]
    fn errors_propagate() {
        let err = run_check(&Model::new(), &CheckRequest::HeightLimit(HeightLimitParams::default()))
            .unwrap_err();
        assert_eq!(err.code(), Error::MissingLayer(String::new()).code());
    }
}
