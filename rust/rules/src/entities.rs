// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domain entities loaded from layers.
//!
//! Each loader resolves the geometry adapter once per object and keeps the
//! derived shapes. Objects whose geometry cannot produce the needed shape are
//! counted as skipped in the [`Warnings`] collector.

use sitecheck_core::{Error, GeometryKind, LayerIndex, LayeredObject, Result};
use sitecheck_geometry::{
    adapt, polygon_area, polygon_centroid, polygon_edges, polygon_perimeter, BoundingBox,
    GeometryAdapter, Point2, Point3, Polygon2D, SegmentLoop2D, GEOMETRY_EPSILON,
};

use crate::warnings::Warnings;

/// Attribute keys holding a plot's height limit
pub const HEIGHT_LIMIT_KEYS: &[&str] = &["height_limit", "limit_height"];
/// Attribute keys holding a plot's required frontage rate
pub const FRONTAGE_RATE_KEYS: &[&str] = &["frontage_rate", "required_frontage_rate"];
/// Attribute keys naming the plot an object is declared to belong to
pub const DECLARED_PLOT_KEYS: &[&str] = &["plot_name", "plot"];
/// Attribute keys holding a plot's display name
pub const PLOT_NAME_KEYS: &[&str] = &["plot_name", "name"];
/// Attribute keys holding a building's display name
pub const BUILDING_NAME_KEYS: &[&str] = &["building_name", "name"];

fn display_name(object: &LayeredObject<'_>, keys: &[&str]) -> String {
    object
        .attributes
        .get_any(keys)
        .unwrap_or_else(|| object.label())
        .to_string()
}

/// Polygon usable as a boundary: at least a triangle with non-zero area
fn usable_boundary(polygon: &[Point2<f64>]) -> bool {
    polygon.len() >= 3 && polygon_area(polygon) > GEOMETRY_EPSILON
}

/// A parcel carrying development-control attributes.
#[derive(Debug, Clone)]
pub struct Plot {
    /// Position among the loaded plots (layer order)
    pub index: usize,
    pub id: String,
    pub name: String,
    pub boundary: Polygon2D,
    pub center: Point2<f64>,
    pub area: f64,
    pub bbox: BoundingBox,
    pub height_limit: Option<f64>,
    pub required_rate: Option<f64>,
}

/// Loads plots from already-resolved layer objects.
///
/// Closed curves are taken as they are; other solids contribute their
/// footprint. Open curves and degenerate outlines are skipped.
pub fn load_plots(objects: &[LayeredObject<'_>], layer: &str, warnings: &mut Warnings) -> Vec<Plot> {
    let mut plots = Vec::with_capacity(objects.len());
    for object in objects {
        let adapter = adapt(object.geometry);
        if adapter.kind() == GeometryKind::Curve && !adapter.is_closed_curve() {
            warnings.skip(layer, object.id(), "open curve cannot bound a plot");
            continue;
        }
        let boundary = adapter.footprint();
        let Some(bbox) = adapter.bounding_box() else {
            warnings.skip(layer, object.id(), "no finite points");
            continue;
        };
        if !usable_boundary(&boundary) {
            warnings.skip(layer, object.id(), "degenerate boundary");
            continue;
        }

        let center = polygon_centroid(&boundary).unwrap_or_else(|| bbox.center_2d());
        plots.push(Plot {
            index: plots.len(),
            id: object.id().to_string(),
            name: display_name(object, PLOT_NAME_KEYS),
            area: polygon_area(&boundary),
            boundary,
            center,
            bbox,
            height_limit: object.attributes.get_f64_any(HEIGHT_LIMIT_KEYS),
            required_rate: object.attributes.get_f64_any(FRONTAGE_RATE_KEYS),
        });
    }
    plots
}

/// Loads plots from a required layer.
///
/// Fails with [`Error::MissingLayer`] when the layer is empty and with
/// [`Error::NoValidBoundary`] when none of its objects is usable.
pub fn require_plots(index: &LayerIndex<'_>, layer: &str, warnings: &mut Warnings) -> Result<Vec<Plot>> {
    let objects = index.require_layer(layer)?;
    let plots = load_plots(&objects, layer, warnings);
    if plots.is_empty() {
        return Err(Error::NoValidBoundary(layer.to_string()));
    }
    Ok(plots)
}

/// A building volume reduced to the shapes the checks need.
#[derive(Debug)]
pub struct Building {
    pub id: String,
    pub name: String,
    pub adapter: Box<dyn GeometryAdapter>,
    pub footprint: Polygon2D,
    pub bottom_edges: SegmentLoop2D,
    pub bbox: BoundingBox,
    /// Plan center of the bounding box
    pub center: Point2<f64>,
    pub perimeter: f64,
    pub declared_plot: Option<String>,
}

impl Building {
    pub fn max_z(&self) -> f64 {
        self.bbox.max.z
    }
}

/// Loads buildings, skipping objects without finite points.
pub fn load_buildings(objects: &[LayeredObject<'_>], layer: &str, warnings: &mut Warnings) -> Vec<Building> {
    let mut buildings = Vec::with_capacity(objects.len());
    for object in objects {
        let adapter = adapt(object.geometry);
        let Some(bbox) = adapter.bounding_box() else {
            warnings.skip(layer, object.id(), "no finite points");
            continue;
        };
        let footprint = adapter.footprint();
        let bottom_edges = adapter.bottom_edge_loop();
        buildings.push(Building {
            id: object.id().to_string(),
            name: display_name(object, BUILDING_NAME_KEYS),
            perimeter: polygon_perimeter(&footprint),
            footprint,
            bottom_edges,
            center: bbox.center_2d(),
            bbox,
            declared_plot: object.attributes.get_any(DECLARED_PLOT_KEYS).map(str::to_string),
            adapter,
        });
    }
    buildings
}

/// Loads buildings from a required layer.
pub fn require_buildings(
    index: &LayerIndex<'_>,
    layer: &str,
    warnings: &mut Warnings,
) -> Result<Vec<Building>> {
    let objects = index.require_layer(layer)?;
    Ok(load_buildings(&objects, layer, warnings))
}

/// Property boundary used for fire access.
#[derive(Debug, Clone)]
pub struct Redline {
    pub id: String,
    pub name: String,
    pub boundary: Polygon2D,
}

/// Loads redlines from a required layer.
///
/// With `require_curves`, any non-curve object is an
/// [`Error::InvalidGeometryType`]; open curves are skipped either way.
pub fn require_redlines(
    index: &LayerIndex<'_>,
    layer: &str,
    require_curves: bool,
    warnings: &mut Warnings,
) -> Result<Vec<Redline>> {
    let objects = index.require_layer(layer)?;
    let mut redlines = Vec::with_capacity(objects.len());
    for object in &objects {
        let adapter = adapt(object.geometry);
        match adapter.kind() {
            GeometryKind::Curve if !adapter.is_closed_curve() => {
                warnings.skip(layer, object.id(), "open curve cannot bound a redline");
                continue;
            }
            GeometryKind::Curve => {}
            _ if require_curves => {
                return Err(Error::InvalidGeometryType {
                    layer: layer.to_string(),
                    object: object.id().to_string(),
                    expected: "closed curve",
                });
            }
            _ => {}
        }

        let boundary = adapter.footprint();
        if !usable_boundary(&boundary) {
            warnings.skip(layer, object.id(), "degenerate boundary");
            continue;
        }
        redlines.push(Redline {
            id: object.id().to_string(),
            name: object.label().to_string(),
            boundary,
        });
    }

    if redlines.is_empty() {
        return Err(Error::NoValidBoundary(layer.to_string()));
    }
    Ok(redlines)
}

/// Fire-ladder (aerial apparatus) standing area.
#[derive(Debug, Clone)]
pub struct Ladder {
    pub id: String,
    pub name: String,
    pub footprint: Polygon2D,
    pub center: Point2<f64>,
}

/// Loads ladder rectangles, skipping degenerate footprints.
pub fn load_ladders(objects: &[LayeredObject<'_>], layer: &str, warnings: &mut Warnings) -> Vec<Ladder> {
    let mut ladders = Vec::with_capacity(objects.len());
    for object in objects {
        let adapter = adapt(object.geometry);
        let footprint = adapter.footprint();
        if !usable_boundary(&footprint) {
            warnings.skip(layer, object.id(), "degenerate footprint");
            continue;
        }
        let Some(center) = polygon_centroid(&footprint) else {
            warnings.skip(layer, object.id(), "no centroid");
            continue;
        };
        ladders.push(Ladder {
            id: object.id().to_string(),
            name: object.label().to_string(),
            footprint,
            center,
        });
    }
    ladders
}

impl Ladder {
    pub fn edges(&self) -> SegmentLoop2D {
        polygon_edges(&self.footprint)
    }
}

/// Setback or property line: a polyline in 3D.
#[derive(Debug, Clone)]
pub struct Setback {
    pub id: String,
    pub name: String,
    /// Polyline vertices; closed curves repeat their first point at the end
    pub points: Vec<Point3<f64>>,
    pub bbox: BoundingBox,
    pub declared_plot: Option<String>,
}

impl Setback {
    /// Plan points used to find the enclosing plot
    pub fn samples(&self) -> Vec<Point2<f64>> {
        let mut samples = vec![self.bbox.center_2d()];
        samples.extend(self.points.iter().map(|p| Point2::new(p.x, p.y)));
        samples
    }
}

/// Loads setback lines, skipping objects with fewer than two points.
pub fn load_setbacks(objects: &[LayeredObject<'_>], layer: &str, warnings: &mut Warnings) -> Vec<Setback> {
    let mut setbacks = Vec::with_capacity(objects.len());
    for object in objects {
        let adapter = adapt(object.geometry);
        let points = adapter.outline();
        let Some(bbox) = adapter.bounding_box() else {
            warnings.skip(layer, object.id(), "no finite points");
            continue;
        };
        if points.len() < 2 {
            warnings.skip(layer, object.id(), "fewer than two points");
            continue;
        }
        setbacks.push(Setback {
            id: object.id().to_string(),
            name: object.label().to_string(),
            points,
            bbox,
            declared_plot: object.attributes.get_any(DECLARED_PLOT_KEYS).map(str::to_string),
        });
    }
    setbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sitecheck_core::{Geometry, Model};

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::closed_curve(vec![
            [x, y, 0.0],
            [x + size, y, 0.0],
            [x + size, y + size, 0.0],
            [x, y + size, 0.0],
        ])
    }

    #[test]
    fn plots_read_limits_and_skip_open_curves() {
        let mut model = Model::new();
        model
            .add("plots", "P1", square(0.0, 0.0, 10.0))
            .attributes
            .insert("Limit_Height", "18.5 m");
        model.add(
            "plots",
            "P2",
            Geometry::polyline(vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]),
        );

        let index = LayerIndex::new(&model);
        let mut warnings = Warnings::new();
        let plots = require_plots(&index, "plots", &mut warnings).unwrap();
        assert_eq!(plots.len(), 1);
        assert_eq!(plots[0].height_limit, Some(18.5));
        assert_relative_eq!(plots[0].area, 100.0);
        assert_relative_eq!(plots[0].center.x, 5.0);
        assert_eq!(warnings.skipped("plots"), 1);
    }

    #[test]
    fn plot_layer_without_usable_boundary_is_an_error() {
        let mut model = Model::new();
        model.add("plots", "P1", Geometry::polyline(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]));
        let index = LayerIndex::new(&model);
        let err = require_plots(&index, "plots", &mut Warnings::new()).unwrap_err();
        assert_eq!(err, Error::NoValidBoundary("plots".into()));

        let err = require_plots(&index, "parcels", &mut Warnings::new()).unwrap_err();
        assert_eq!(err.code(), "missing_layer");
    }

    #[test]
    fn strict_redlines_reject_solids() {
        let mut model = Model::new();
        model.add("redlines", "R1", Geometry::block([0.0, 0.0, 0.0], [10.0, 10.0, 1.0]));
        let index = LayerIndex::new(&model);

        let err = require_redlines(&index, "redlines", true, &mut Warnings::new()).unwrap_err();
        assert_eq!(err.code(), "invalid_geometry_type");

        let redlines = require_redlines(&index, "redlines", false, &mut Warnings::new()).unwrap();
        assert_relative_eq!(polygon_area(&redlines[0].boundary), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn buildings_carry_declared_plot_and_shapes() {
        let mut model = Model::new();
        let object = model.add("buildings", "B1", Geometry::block([0.0, 0.0, 0.0], [4.0, 2.0, 9.0]));
        object.name = Some("Tower".into());
        object.attributes.insert("plot", "P7");

        let index = LayerIndex::new(&model);
        let buildings = require_buildings(&index, "buildings", &mut Warnings::new()).unwrap();
        let b = &buildings[0];
        assert_eq!(b.name, "Tower");
        assert_eq!(b.declared_plot.as_deref(), Some("P7"));
        assert_relative_eq!(b.max_z(), 9.0);
        assert_relative_eq!(b.perimeter, 12.0, epsilon = 1e-9);
        assert_eq!(b.bottom_edges.len(), 4);
    }

    #[test]
    fn closed_setback_repeats_first_point() {
        let mut model = Model::new();
        model.add("setbacks", "S1", square(0.0, 0.0, 2.0));
        let index = LayerIndex::new(&model);
        let setbacks = load_setbacks(&index.objects_in_layer("setbacks"), "setbacks", &mut Warnings::new());
        assert_eq!(setbacks[0].points.len(), 5);
        assert_eq!(setbacks[0].samples().len(), 6);
    }
}
