// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frontage-rate (setback line coverage) check.
//!
//! A setback line is cut into fixed-length pieces. A piece is covered when
//! its midpoint lies within `tolerance` of a bottom edge of one of the
//! buildings on the same plot. The frontage rate is the covered share of the
//! line's plan length.

use serde::{Deserialize, Serialize};
use sitecheck_core::{LayerIndex, Model, Result};
use sitecheck_geometry::{
    point_segments_distance, sample_polyline, Point3, PolylinePiece, Segment2D, GEOMETRY_EPSILON,
    MIN_SAMPLE_STEP, THRESHOLD_EPSILON,
};

use crate::entities::{load_plots, load_setbacks, require_buildings, Building, Plot};
use crate::matcher::{building_samples, PlotMatcher};
use crate::params::{normalize_rate, FrontageParams};
use crate::report::{xyz, Status, XYZ};
use crate::warnings::{Warning, WarningCode, Warnings};

/// Coverage of one setback line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetbackFrontage {
    pub setback_id: String,
    pub setback_name: String,
    pub plot_id: Option<String>,
    pub plot_name: Option<String>,
    pub total_length: f64,
    pub covered_length: f64,
    /// `covered_length / total_length`, 0 for a zero-length line
    pub frontage_rate: f64,
    pub required_rate: Option<f64>,
    /// `None` when no requirement applies
    pub compliant: Option<bool>,
    pub status: Status,
    /// Buildings whose edges were measured against the line
    pub buildings: Vec<String>,
    /// Maximal runs of covered pieces
    pub covered_runs: Vec<Vec<XYZ>>,
    pub outline: Vec<XYZ>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontageSummary {
    pub setbacks: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub undetermined: usize,
    pub total_length: f64,
    pub covered_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontageReport {
    pub status: Status,
    pub summary: FrontageSummary,
    pub setbacks: Vec<SetbackFrontage>,
    pub warnings: Vec<Warning>,
    pub params: FrontageParams,
}

/// Joins consecutive covered pieces that share an endpoint.
fn merge_runs(pieces: &[PolylinePiece], covered: &[bool]) -> Vec<Vec<XYZ>> {
    let mut runs: Vec<Vec<XYZ>> = Vec::new();
    let mut previous_end = None;
    for (piece, &is_covered) in pieces.iter().zip(covered) {
        if !is_covered {
            previous_end = None;
            continue;
        }
        let continues = previous_end
            .map_or(false, |end: Point3<f64>| (piece.start - end).norm() <= GEOMETRY_EPSILON);
        match runs.last_mut() {
            Some(run) if continues => run.push(xyz(&piece.end)),
            _ => runs.push(vec![xyz(&piece.start), xyz(&piece.end)]),
        }
        previous_end = Some(piece.end);
    }
    runs
}

/// Requirement for a setback: global parameter first, then the plot attribute.
fn required_rate(params: &FrontageParams, plot: Option<&Plot>) -> Option<f64> {
    params
        .required_rate
        .or_else(|| plot.and_then(|p| p.required_rate))
        .filter(|r| r.is_finite() && *r >= 0.0)
        .map(normalize_rate)
}

/// Runs the frontage-rate check.
pub fn check_frontage(model: &Model, params: &FrontageParams) -> Result<FrontageReport> {
    let index = LayerIndex::new(model);
    let mut warnings = Warnings::new();

    let setback_objects = index.require_layer(&params.setback_layer)?;
    let setbacks = load_setbacks(&setback_objects, &params.setback_layer, &mut warnings);
    let buildings = require_buildings(&index, &params.building_layer, &mut warnings)?;

    let plot_objects = index.objects_in_layer(&params.plot_layer);
    let plots = load_plots(&plot_objects, &params.plot_layer, &mut warnings);
    if plots.is_empty() {
        warnings.push(
            WarningCode::MissingOptionalLayer,
            format!(
                "plot layer '{}' has no usable plots; every building is measured against every setback",
                params.plot_layer
            ),
        );
    }

    let step = if params.sample_step.is_finite() {
        params.sample_step.max(MIN_SAMPLE_STEP)
    } else {
        MIN_SAMPLE_STEP
    };
    if step != params.sample_step {
        warnings.push(
            WarningCode::ParameterAdjusted,
            format!("sample_step {} raised to {}", params.sample_step, step),
        );
    }

    let matcher = PlotMatcher::new(&plots);
    let building_plots: Vec<Option<usize>> = buildings
        .iter()
        .map(|b| {
            let m = matcher.match_samples(&building_samples(&b.bbox), b.declared_plot.as_deref());
            m.report("building", &b.name, &mut warnings);
            m.index
        })
        .collect();

    let mut records = Vec::with_capacity(setbacks.len());
    for setback in &setbacks {
        let plot_index = if plots.is_empty() {
            None
        } else {
            let m = matcher.match_samples(&setback.samples(), setback.declared_plot.as_deref());
            m.report("setback", &setback.name, &mut warnings);
            if m.index.is_none() {
                warnings.push(
                    WarningCode::UnmatchedSetback,
                    format!("setback '{}' lies in no plot; all buildings are candidates", setback.name),
                );
            }
            m.index
        };
        let plot = plot_index.map(|i| &plots[i]);

        let candidates: Vec<&Building> = buildings
            .iter()
            .zip(&building_plots)
            .filter(|(_, bp)| plot_index.is_none() || **bp == plot_index)
            .map(|(b, _)| b)
            .collect();
        let edges: Vec<Segment2D> = candidates
            .iter()
            .flat_map(|b| b.bottom_edges.iter().copied())
            .collect();

        let pieces = sample_polyline(&setback.points, step);
        let covered: Vec<bool> = pieces
            .iter()
            .map(|piece| {
                point_segments_distance(&piece.midpoint_2d(), &edges)
                    <= params.tolerance + GEOMETRY_EPSILON
            })
            .collect();

        let total_length: f64 = pieces.iter().map(|p| p.length).sum();
        let covered_length: f64 = pieces
            .iter()
            .zip(&covered)
            .filter(|(_, c)| **c)
            .map(|(p, _)| p.length)
            .sum();
        let frontage_rate = if total_length > GEOMETRY_EPSILON {
            (covered_length / total_length).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let required = required_rate(params, plot);
        if required.is_none() {
            warnings.push(
                WarningCode::MissingRequiredRate,
                format!("setback '{}' has no required frontage rate", setback.name),
            );
        }
        let compliant = required.map(|r| frontage_rate + THRESHOLD_EPSILON >= r);
        let status = match compliant {
            Some(true) => Status::Pass,
            Some(false) => Status::Fail,
            None => Status::Unknown,
        };

        tracing::debug!(
            setback = %setback.name,
            plot = ?plot.map(|p| p.name.as_str()),
            candidates = candidates.len(),
            pieces = pieces.len(),
            frontage_rate,
            "frontage measured"
        );

        records.push(SetbackFrontage {
            setback_id: setback.id.clone(),
            setback_name: setback.name.clone(),
            plot_id: plot.map(|p| p.id.clone()),
            plot_name: plot.map(|p| p.name.clone()),
            total_length,
            covered_length,
            frontage_rate,
            required_rate: required,
            compliant,
            status,
            buildings: candidates.iter().map(|b| b.name.clone()).collect(),
            covered_runs: merge_runs(&pieces, &covered),
            outline: setback.points.iter().map(xyz).collect(),
        });
    }

    let summary = FrontageSummary {
        setbacks: records.len(),
        compliant: records.iter().filter(|r| r.compliant == Some(true)).count(),
        non_compliant: records.iter().filter(|r| r.compliant == Some(false)).count(),
        undetermined: records.iter().filter(|r| r.compliant.is_none()).count(),
        total_length: records.iter().map(|r| r.total_length).sum(),
        covered_length: records.iter().map(|r| r.covered_length).sum(),
    };
    let status = Status::combine(records.iter().map(|r| r.status));

    tracing::info!(
        status = status.as_str(),
        setbacks = summary.setbacks,
        non_compliant = summary.non_compliant,
        "frontage check complete"
    );

    Ok(FrontageReport {
        status,
        summary,
        setbacks: records,
        warnings: warnings.finish(),
        params: params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sitecheck_core::Geometry;

    fn model_with_building() -> Model {
        let mut model = Model::new();
        model.add("buildings", "B1", Geometry::block([0.0, 0.0, 0.0], [10.0, 8.0, 20.0]));
        model
    }

    #[test]
    fn coincident_setback_is_fully_covered() {
        let mut model = model_with_building();
        model.add("setbacks", "S1", Geometry::polyline(vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]));

        let params = FrontageParams {
            required_rate: Some(80.0),
            ..FrontageParams::default()
        };
        let report = check_frontage(&model, &params).unwrap();
        let s = &report.setbacks[0];
        assert_relative_eq!(s.frontage_rate, 1.0, epsilon = 1e-9);
        assert_eq!(s.required_rate, Some(0.8));
        assert_eq!(s.compliant, Some(true));
        assert_eq!(s.covered_runs.len(), 1);
        assert_eq!(s.covered_runs[0].first(), Some(&[0.0, 0.0, 0.0]));
        assert_eq!(s.covered_runs[0].last(), Some(&[10.0, 0.0, 0.0]));
        assert_eq!(report.status, Status::Pass);
    }

    #[test]
    fn setback_across_a_mesh_floor_is_not_covered() {
        let mut model = Model::new();
        // 10 x 10 mesh box; its floor is split along the (0,0)-(10,10) diagonal
        model.add(
            "buildings",
            "M1",
            Geometry::Mesh {
                vertices: vec![
                    [0.0, 0.0, 0.0],
                    [10.0, 0.0, 0.0],
                    [10.0, 10.0, 0.0],
                    [0.0, 10.0, 0.0],
                    [0.0, 0.0, 12.0],
                    [10.0, 0.0, 12.0],
                    [10.0, 10.0, 12.0],
                    [0.0, 10.0, 12.0],
                ],
                faces: vec![
                    [0, 2, 1],
                    [0, 3, 2],
                    [4, 5, 6],
                    [4, 6, 7],
                    [0, 1, 5],
                    [0, 5, 4],
                    [1, 2, 6],
                    [1, 6, 5],
                    [2, 3, 7],
                    [2, 7, 6],
                    [3, 0, 4],
                    [3, 4, 7],
                ],
            },
        );
        model.add("setbacks", "S1", Geometry::polyline(vec![[0.0, 0.0, 0.0], [10.0, 10.0, 0.0]]));

        let report = check_frontage(&model, &FrontageParams::default()).unwrap();
        // only the pieces touching the two corners are near a wall
        assert!(report.setbacks[0].frontage_rate < 0.2);
    }

    #[test]
    fn partial_cover_and_undetermined_requirement() {
        let mut model = model_with_building();
        // first 10 m along the building, then 10 m running away from it
        model.add(
            "setbacks",
            "S1",
            Geometry::polyline(vec![[0.0, -0.2, 0.0], [10.0, -0.2, 0.0], [20.0, -0.2, 0.0]]),
        );

        let report = check_frontage(&model, &FrontageParams::default()).unwrap();
        let s = &report.setbacks[0];
        assert_relative_eq!(s.total_length, 20.0, epsilon = 1e-9);
        // pieces with midpoint at x <= 10.46 are within 0.5 of the corner
        assert_relative_eq!(s.frontage_rate, 0.5, epsilon = 1e-9);
        assert_eq!(s.compliant, None);
        assert_eq!(s.status, Status::Unknown);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.code == WarningCode::MissingRequiredRate));
    }

    #[test]
    fn plot_attribute_supplies_requirement() {
        let mut model = model_with_building();
        model
            .add(
                "plots",
                "P1",
                Geometry::closed_curve(vec![
                    [-5.0, -5.0, 0.0],
                    [30.0, -5.0, 0.0],
                    [30.0, 20.0, 0.0],
                    [-5.0, 20.0, 0.0],
                ]),
            )
            .attributes
            .insert("required_frontage_rate", "0.9");
        model.add(
            "setbacks",
            "S1",
            Geometry::polyline(vec![[0.0, -0.2, 0.0], [20.0, -0.2, 0.0]]),
        );

        let report = check_frontage(&model, &FrontageParams::default()).unwrap();
        let s = &report.setbacks[0];
        assert_eq!(s.plot_name.as_deref(), Some("P1"));
        assert_eq!(s.required_rate, Some(0.9));
        assert_eq!(s.compliant, Some(false));
        assert_eq!(report.status, Status::Fail);
    }

    #[test]
    fn tiny_step_is_clamped() {
        let mut model = model_with_building();
        model.add("setbacks", "S1", Geometry::polyline(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]));
        let params = FrontageParams {
            sample_step: 0.001,
            ..FrontageParams::default()
        };
        let report = check_frontage(&model, &params).unwrap();
        assert!(report
            .warnings
            .iter()
            .any(|w| w.code == WarningCode::ParameterAdjusted));
        assert!(report.setbacks[0].frontage_rate <= 1.0);
    }

    #[test]
    fn runs_split_at_gaps() {
        let pieces: Vec<PolylinePiece> = (0..4)
            .map(|i| {
                let x = i as f64;
                PolylinePiece {
                    start: Point3::new(x, 0.0, 0.0),
                    end: Point3::new(x + 1.0, 0.0, 0.0),
                    length: 1.0,
                }
            })
            .collect();
        let runs = merge_runs(&pieces, &[true, true, false, true]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 3);
        assert_eq!(runs[1], vec![[3.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
    }
}
