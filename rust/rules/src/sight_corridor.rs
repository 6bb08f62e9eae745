// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sight-corridor checks: observer visibility and corridor collision.
//!
//! Visibility sweeps the full turn around an observer and reports which
//! buildings are in front for some bearing. Collision reports buildings that
//! genuinely overlap a protected view corridor; touching does not count.

use serde::{Deserialize, Serialize};
use sitecheck_core::{Error, LayerIndex, Model, Result};
use sitecheck_geometry::{
    adapt, point_in_solid, polygons_intersect_strict, project_hull, triangles_intersect,
    visibility_sweep, Axis, Point2, Polygon2D, Triangle, GEOMETRY_EPSILON,
};

use crate::entities::{load_buildings, require_buildings, Building};
use crate::params::{CollisionMode, CorridorCollisionParams, SightVisibilityParams};
use crate::report::{Status, XY};
use crate::warnings::{Warning, WarningCode, Warnings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingVisibility {
    pub building_id: String,
    pub building_name: String,
    pub visible: bool,
    /// Degrees of bearing over which the building is in front
    pub visible_angle: f64,
    /// Buildings in front of this one where it is hidden
    pub blocked_by: Vec<String>,
    /// Plan distance from the observer to the bounding box
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySummary {
    pub buildings: usize,
    pub visible: usize,
    pub hidden: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightVisibilityReport {
    /// Pass when every building is visible
    pub status: Status,
    pub observer: XY,
    pub summary: VisibilitySummary,
    /// Sorted by distance, then name
    pub buildings: Vec<BuildingVisibility>,
    pub warnings: Vec<Warning>,
    pub params: SightVisibilityParams,
}

/// Observer from the parameters, else the center of the first usable object
/// on the observer layer.
fn resolve_observer(index: &LayerIndex<'_>, params: &SightVisibilityParams) -> Result<Point2<f64>> {
    if let Some([x, y]) = params.observer {
        return Ok(Point2::new(x, y));
    }
    index
        .require_layer(&params.observer_layer)?
        .iter()
        .find_map(|object| adapt(object.geometry).bounding_box())
        .map(|bbox| bbox.center_2d())
        .ok_or_else(|| Error::MissingLayer(params.observer_layer.clone()))
}

/// Runs the observer visibility check.
pub fn check_sight_visibility(model: &Model, params: &SightVisibilityParams) -> Result<SightVisibilityReport> {
    let index = LayerIndex::new(model);
    let mut warnings = Warnings::new();

    let observer = resolve_observer(&index, params)?;
    let buildings = require_buildings(&index, &params.building_layer, &mut warnings)?;

    let footprints: Vec<Polygon2D> = buildings.iter().map(|b| b.footprint.clone()).collect();
    let sweep = visibility_sweep(&observer, &footprints, GEOMETRY_EPSILON);

    let mut records: Vec<BuildingVisibility> = buildings
        .iter()
        .enumerate()
        .map(|(i, building)| BuildingVisibility {
            building_id: building.id.clone(),
            building_name: building.name.clone(),
            visible: sweep.visible[i],
            visible_angle: sweep.visible_angle[i].to_degrees(),
            blocked_by: sweep.blockers[i]
                .iter()
                .map(|&j| buildings[j].name.clone())
                .collect(),
            distance: building.bbox.distance_2d(&observer),
        })
        .collect();
    records.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.building_name.cmp(&b.building_name))
            .then_with(|| a.building_id.cmp(&b.building_id))
    });

    let visible = records.iter().filter(|r| r.visible).count();
    let summary = VisibilitySummary {
        buildings: records.len(),
        visible,
        hidden: records.len() - visible,
    };
    let status = if summary.hidden == 0 { Status::Pass } else { Status::Fail };

    tracing::info!(
        status = status.as_str(),
        observer_x = observer.x,
        observer_y = observer.y,
        visible = summary.visible,
        hidden = summary.hidden,
        "sight visibility check complete"
    );

    Ok(SightVisibilityReport {
        status,
        observer: [observer.x, observer.y],
        summary,
        buildings: records,
        warnings: warnings.finish(),
        params: params.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blocker {
    pub building_id: String,
    pub building_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorCollision {
    pub corridor_id: String,
    pub corridor_name: String,
    pub status: Status,
    /// Buildings passing the bounding-box prefilter
    pub candidates: usize,
    pub blocked_by: Vec<Blocker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSummary {
    pub corridors: usize,
    pub blocked_corridors: usize,
    pub collisions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorCollisionReport {
    pub status: Status,
    pub summary: CollisionSummary,
    pub corridors: Vec<CorridorCollision>,
    pub warnings: Vec<Warning>,
    pub params: CorridorCollisionParams,
}

/// Outline compared in footprint mode
fn projected(volume: &Building, axis: Axis) -> Polygon2D {
    match axis {
        Axis::Z => volume.footprint.clone(),
        _ => project_hull(volume.adapter.as_ref(), axis),
    }
}

/// True when the two solids share volume: some pair of surface triangles
/// genuinely intersects, or one solid lies wholly inside the other.
///
/// `None` when either volume has no triangles.
fn solids_intersect(a: &Building, b: &Building, epsilon: f64) -> Option<bool> {
    let ta = a.adapter.triangles();
    let tb = b.adapter.triangles();
    if ta.is_empty() || tb.is_empty() {
        return None;
    }
    let boxes_b: Vec<_> = tb.iter().map(|t| t.bounding_box()).collect();
    let crossing = ta.iter().any(|x| {
        let bx = x.bounding_box();
        tb.iter()
            .zip(&boxes_b)
            .any(|(y, by)| bx.intersects(by, epsilon) && triangles_intersect(x, y, epsilon))
    });
    Some(crossing || encloses(&ta, b, &tb) || encloses(&tb, a, &ta))
}

/// With no surfaces crossing, `inner` is inside `outer` exactly when an
/// interior point of `inner` is.
fn encloses(outer: &[Triangle], inner: &Building, inner_surface: &[Triangle]) -> bool {
    let inside = inner.bbox.center();
    point_in_solid(&inside, inner_surface) && point_in_solid(&inside, outer)
}

/// Runs the corridor collision check.
pub fn check_corridor_collision(
    model: &Model,
    params: &CorridorCollisionParams,
) -> Result<CorridorCollisionReport> {
    let index = LayerIndex::new(model);
    let mut warnings = Warnings::new();

    let corridor_objects = index.require_layer(&params.corridor_layer)?;
    let corridors = load_buildings(&corridor_objects, &params.corridor_layer, &mut warnings);
    let buildings = require_buildings(&index, &params.building_layer, &mut warnings)?;

    let epsilon = params.epsilon.max(0.0);
    let axis = Axis::from(params.drop_axis);
    let building_outlines: Vec<Polygon2D> = match params.mode {
        CollisionMode::Footprint => buildings.iter().map(|b| projected(b, axis)).collect(),
        CollisionMode::Solid => Vec::new(),
    };

    let mut records = Vec::with_capacity(corridors.len());
    for corridor in &corridors {
        let outline = match params.mode {
            CollisionMode::Footprint => projected(corridor, axis),
            CollisionMode::Solid => Vec::new(),
        };

        let mut candidates = 0;
        let mut blocked_by = Vec::new();
        for (i, building) in buildings.iter().enumerate() {
            let blocked = match params.mode {
                CollisionMode::Footprint => {
                    if !corridor.bbox.overlaps_strict_projected(&building.bbox, axis, epsilon) {
                        continue;
                    }
                    candidates += 1;
                    polygons_intersect_strict(&outline, &building_outlines[i], epsilon)
                }
                CollisionMode::Solid => {
                    if !corridor.bbox.overlaps_strict(&building.bbox, epsilon) {
                        continue;
                    }
                    candidates += 1;
                    match solids_intersect(corridor, building, epsilon) {
                        Some(hit) => hit,
                        None => {
                            warnings.push(
                                WarningCode::SolidFallback,
                                format!(
                                    "corridor '{}' or building '{}' has no surface; footprints compared",
                                    corridor.name, building.name
                                ),
                            );
                            polygons_intersect_strict(&corridor.footprint, &building.footprint, epsilon)
                        }
                    }
                }
            };

            tracing::debug!(
                corridor = %corridor.name,
                building = %building.name,
                blocked,
                "corridor candidate tested"
            );

            if blocked {
                blocked_by.push(Blocker {
                    building_id: building.id.clone(),
                    building_name: building.name.clone(),
                });
            }
        }

        records.push(CorridorCollision {
            corridor_id: corridor.id.clone(),
            corridor_name: corridor.name.clone(),
            status: if blocked_by.is_empty() { Status::Pass } else { Status::Fail },
            candidates,
            blocked_by,
        });
    }

    let summary = CollisionSummary {
        corridors: records.len(),
        blocked_corridors: records.iter().filter(|r| !r.blocked_by.is_empty()).count(),
        collisions: records.iter().map(|r| r.blocked_by.len()).sum(),
    };
    let status = Status::combine(records.iter().map(|r| r.status));

    tracing::info!(
        status = status.as_str(),
        mode = ?params.mode,
        corridors = summary.corridors,
        collisions = summary.collisions,
        "corridor collision check complete"
    );

    Ok(CorridorCollisionReport {
        status,
        summary,
        corridors: records,
        warnings: warnings.finish(),
        params: params.clone(),
    })
}
