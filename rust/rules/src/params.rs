// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Checker parameters.
//!
//! Every field has a default, so a parameter file only needs the values it
//! overrides:
//!
//! ```toml
//! building_layer = "Site::Towers"
//! min_width = 8.0
//! ```

use serde::{Deserialize, Serialize};
use sitecheck_geometry::{Axis, GEOMETRY_EPSILON};

/// Height-limit check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightLimitParams {
    pub plot_layer: String,
    pub building_layer: String,
    /// Optional; plots without a matched setback use their own boundary
    pub setback_layer: String,
}

impl Default for HeightLimitParams {
    fn default() -> Self {
        Self {
            plot_layer: "plots".into(),
            building_layer: "buildings".into(),
            setback_layer: "setbacks".into(),
        }
    }
}

/// Frontage-rate check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontageParams {
    pub setback_layer: String,
    pub building_layer: String,
    /// Optional; without plots every building is a candidate for every setback
    pub plot_layer: String,
    /// Length of one sampled piece of the setback line
    pub sample_step: f64,
    /// Maximum distance from a piece midpoint to a building edge
    pub tolerance: f64,
    /// Fraction or percentage; overrides per-plot attributes
    pub required_rate: Option<f64>,
}

impl Default for FrontageParams {
    fn default() -> Self {
        Self {
            setback_layer: "setbacks".into(),
            building_layer: "buildings".into(),
            plot_layer: "plots".into(),
            sample_step: 1.0,
            tolerance: 0.5,
            required_rate: None,
        }
    }
}

/// How a building is assigned to a redline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingContainment {
    /// The bounding-box center must lie inside
    #[default]
    Center,
    /// The center or any footprint vertex may lie inside
    AnyVertex,
}

/// Fire-ladder check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireLadderParams {
    pub redline_layer: String,
    pub building_layer: String,
    pub ladder_layer: String,
    pub min_width: f64,
    /// Required ladder length as a fraction of the building perimeter
    pub length_ratio: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Slack allowed when testing ladder vertices against the redline
    pub boundary_tolerance: f64,
    pub building_containment: BuildingContainment,
    /// Reject redline objects that are not curves
    pub require_curve_redlines: bool,
}

impl Default for FireLadderParams {
    fn default() -> Self {
        Self {
            redline_layer: "redlines".into(),
            building_layer: "buildings".into(),
            ladder_layer: "fire_ladders".into(),
            min_width: 10.0,
            length_ratio: 0.25,
            min_distance: 5.0,
            max_distance: 10.0,
            boundary_tolerance: 0.01,
            building_containment: BuildingContainment::Center,
            require_curve_redlines: true,
        }
    }
}

/// Sky-bridge check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyBridgeParams {
    pub corridor_layer: String,
    pub plot_layer: String,
    pub min_width: f64,
    pub min_height: f64,
    pub min_clearance: f64,
}

impl Default for SkyBridgeParams {
    fn default() -> Self {
        Self {
            corridor_layer: "sky_bridges".into(),
            plot_layer: "plots".into(),
            min_width: 3.0,
            min_height: 2.2,
            min_clearance: 5.0,
        }
    }
}

/// Sight-visibility check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightVisibilityParams {
    pub building_layer: String,
    /// Used only when `observer` is not given
    pub observer_layer: String,
    pub observer: Option<[f64; 2]>,
}

impl Default for SightVisibilityParams {
    fn default() -> Self {
        Self {
            building_layer: "buildings".into(),
            observer_layer: "observers".into(),
            observer: None,
        }
    }
}

/// How corridor and building volumes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// 2D polygons after dropping one axis
    #[default]
    Footprint,
    /// 3D triangle against triangle
    Solid,
}

/// Serializable mirror of [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropAxis {
    X,
    Y,
    #[default]
    Z,
}

impl From<DropAxis> for Axis {
    fn from(axis: DropAxis) -> Self {
        match axis {
            DropAxis::X => Axis::X,
            DropAxis::Y => Axis::Y,
            DropAxis::Z => Axis::Z,
        }
    }
}

/// Sight-corridor collision check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorCollisionParams {
    pub corridor_layer: String,
    pub building_layer: String,
    pub mode: CollisionMode,
    pub drop_axis: DropAxis,
    /// Overlap depth below which shapes count as touching
    pub epsilon: f64,
}

impl Default for CorridorCollisionParams {
    fn default() -> Self {
        Self {
            corridor_layer: "sight_corridors".into(),
            building_layer: "buildings".into(),
            mode: CollisionMode::Footprint,
            drop_axis: DropAxis::Z,
            epsilon: GEOMETRY_EPSILON,
        }
    }
}

/// Required rates above 1 are percentages.
#[inline]
pub fn normalize_rate(rate: f64) -> f64 {
    if rate > 1.0 {
        rate / 100.0
    } else {
        rate
    }
}
