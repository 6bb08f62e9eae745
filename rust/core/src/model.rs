// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed model snapshot.
//!
//! These types sit at the boundary with the CAD parser. They hold raw
//! coordinates only; geometric interpretation lives in `sitecheck-geometry`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;

/// Raw 3D coordinate as delivered by the parser.
pub type RawPoint = [f64; 3];

/// Separator between segments of a hierarchical layer path.
pub const LAYER_SEPARATOR: &str = "::";

/// A named layer, addressed by index from [`ModelObject::layer_index`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layer {
    /// Full hierarchical path, e.g. `"Site::Plots"`.
    pub full_path: String,
}

impl Layer {
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
        }
    }

    /// Last segment of the layer path.
    pub fn leaf(&self) -> &str {
        self.full_path
            .rsplit(LAYER_SEPARATOR)
            .next()
            .unwrap_or(&self.full_path)
    }
}

/// Primitive kind of a CAD geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GeometryKind {
    Curve,
    Brep,
    Mesh,
    Extrusion,
    Surface,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Curve => "curve",
            GeometryKind::Brep => "brep",
            GeometryKind::Mesh => "mesh",
            GeometryKind::Extrusion => "extrusion",
            GeometryKind::Surface => "surface",
        }
    }
}

/// A planar face of a boundary representation, given by its outer loop.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrepFace {
    pub outer: Vec<RawPoint>,
}

/// Raw CAD primitive.
///
/// Curves arrive already sampled into polylines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Geometry {
    Curve {
        points: Vec<RawPoint>,
        #[cfg_attr(feature = "serde", serde(default))]
        closed: bool,
    },
    Brep {
        faces: Vec<BrepFace>,
    },
    Mesh {
        vertices: Vec<RawPoint>,
        faces: Vec<[u32; 3]>,
    },
    /// Closed profile swept along `direction`.
    Extrusion {
        profile: Vec<RawPoint>,
        direction: RawPoint,
    },
    Surface {
        boundary: Vec<RawPoint>,
    },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Curve { .. } => GeometryKind::Curve,
            Geometry::Brep { .. } => GeometryKind::Brep,
            Geometry::Mesh { .. } => GeometryKind::Mesh,
            Geometry::Extrusion { .. } => GeometryKind::Extrusion,
            Geometry::Surface { .. } => GeometryKind::Surface,
        }
    }

    /// Closed polyline with the given points.
    pub fn closed_curve(points: Vec<RawPoint>) -> Self {
        Geometry::Curve {
            points,
            closed: true,
        }
    }

    /// Open polyline with the given points.
    pub fn polyline(points: Vec<RawPoint>) -> Self {
        Geometry::Curve {
            points,
            closed: false,
        }
    }

    /// Axis-aligned box as an extruded rectangle.
    pub fn block(min: RawPoint, max: RawPoint) -> Self {
        Geometry::Extrusion {
            profile: vec![
                [min[0], min[1], min[2]],
                [max[0], min[1], min[2]],
                [max[0], max[1], min[2]],
                [min[0], max[1], min[2]],
            ],
            direction: [0.0, 0.0, max[2] - min[2]],
        }
    }
}

/// One object of the parsed model.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelObject {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layer_index: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub geometry: Option<Geometry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
}

impl ModelObject {
    pub fn new(id: impl Into<String>, layer_index: usize, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            name: None,
            layer_index: Some(layer_index),
            geometry: Some(geometry),
            attributes: Attributes::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Display label: the object name when present, else its id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Read-only snapshot of a parsed design model.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    #[cfg_attr(feature = "serde", serde(default))]
    pub layers: Vec<Layer>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub objects: Vec<ModelObject>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the layer with this exact path, adding it if absent.
    pub fn layer(&mut self, full_path: &str) -> usize {
        if let Some(index) = self.layers.iter().position(|l| l.full_path == full_path) {
            return index;
        }
        self.layers.push(Layer::new(full_path));
        self.layers.len() - 1
    }

    /// Adds an object on the named layer and returns a mutable handle to it.
    pub fn add(&mut self, layer: &str, id: &str, geometry: Geometry) -> &mut ModelObject {
        let layer_index = self.layer(layer);
        self.objects.push(ModelObject::new(id, layer_index, geometry));
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    /// Path of the layer an object belongs to, if resolvable.
    pub fn layer_path(&self, object: &ModelObject) -> Option<&str> {
        object
            .layer_index
            .and_then(|i| self.layers.get(i))
            .map(|l| l.full_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_leaf_segment() {
        assert_eq!(Layer::new("Site::Zoning::Plots").leaf(), "Plots");
        assert_eq!(Layer::new("Plots").leaf(), "Plots");
    }

    #[test]
    fn model_reuses_layers() {
        let mut model = Model::new();
        model.add("plots", "P1", Geometry::closed_curve(vec![[0.0; 3]; 3]));
        model.add("plots", "P2", Geometry::closed_curve(vec![[0.0; 3]; 3]));
        model.add("buildings", "B1", Geometry::block([0.0; 3], [1.0, 1.0, 1.0]));

        assert_eq!(model.layers.len(), 2);
        assert_eq!(model.layer_path(&model.objects[2]), Some("buildings"));
    }

    #[test]
    fn block_is_vertical_extrusion() {
        let block = Geometry::block([0.0, 0.0, 2.0], [4.0, 3.0, 12.0]);
        match block {
            Geometry::Extrusion { profile, direction } => {
                assert_eq!(profile.len(), 4);
                assert_eq!(direction, [0.0, 0.0, 10.0]);
            }
            other => panic!("unexpected geometry {:?}", other.kind()),
        }
    }

    #[test]
    fn label_falls_back_to_id() {
        let object = ModelObject::new("obj-7", 0, Geometry::polyline(vec![]));
        assert_eq!(object.label(), "obj-7");
        assert_eq!(object.with_name("Tower A").label(), "Tower A");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_tagged_geometry() {
        let json = r#"{
            "layers": [{"full_path": "Site::Plots"}],
            "objects": [{
                "id": "P1",
                "layer_index": 0,
                "geometry": {"type": "curve", "points": [[0,0,0],[1,0,0],[1,1,0]], "closed": true},
                "attributes": [["height_limit", "24"]]
            }]
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.objects[0].geometry.as_ref().unwrap().kind(), GeometryKind::Curve);
        assert_eq!(model.objects[0].attributes.get("HEIGHT_LIMIT"), Some("24"));
    }
}
