// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer index: resolves the objects belonging to a named layer.
//!
//! A query matches a layer when it equals the full hierarchical path
//! (case-insensitive). A query without a `::` separator also matches every
//! layer whose leaf segment equals it, so `"plots"` finds `"Site::Plots"`.

use rustc_hash::FxHashMap;

use crate::attributes::Attributes;
use crate::error::{Error, Result};
use crate::model::{Geometry, Model, ModelObject, LAYER_SEPARATOR};

/// Borrowed view of an object resolved through its layer.
#[derive(Debug, Clone, Copy)]
pub struct LayeredObject<'a> {
    pub object: &'a ModelObject,
    pub geometry: &'a Geometry,
    pub layer_path: &'a str,
    pub attributes: &'a Attributes,
}

impl<'a> LayeredObject<'a> {
    pub fn id(&self) -> &'a str {
        &self.object.id
    }

    /// Object name when present, else its id.
    pub fn label(&self) -> &'a str {
        self.object.label()
    }
}

/// Case-folded lookup tables over a model's layers.
#[derive(Debug)]
pub struct LayerIndex<'a> {
    model: &'a Model,
    by_path: FxHashMap<String, Vec<usize>>,
    by_leaf: FxHashMap<String, Vec<usize>>,
}

impl<'a> LayerIndex<'a> {
    /// Builds the index once for repeated layer queries.
    pub fn new(model: &'a Model) -> Self {
        let mut by_path: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut by_leaf: FxHashMap<String, Vec<usize>> = FxHashMap::default();

        for (index, layer) in model.layers.iter().enumerate() {
            by_path
                .entry(fold(&layer.full_path))
                .or_default()
                .push(index);
            by_leaf.entry(fold(layer.leaf())).or_default().push(index);
        }

        Self {
            model,
            by_path,
            by_leaf,
        }
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Indices of the layers matched by `name`, ascending.
    pub fn matching_layers(&self, name: &str) -> Vec<usize> {
        let key = fold(name);
        let mut layers: Vec<usize> = self.by_path.get(&key).cloned().unwrap_or_default();

        if !name.contains(LAYER_SEPARATOR) {
            if let Some(leaf_matches) = self.by_leaf.get(&key) {
                layers.extend(leaf_matches.iter().copied());
            }
        }

        layers.sort_unstable();
        layers.dedup();
        layers
    }

    /// Objects on the layers matched by `name`, in model order.
    ///
    /// Objects without geometry or with an unresolved layer are skipped.
    pub fn objects_in_layer(&self, name: &str) -> Vec<LayeredObject<'a>> {
        let layers = self.matching_layers(name);
        if layers.is_empty() {
            return Vec::new();
        }

        let model = self.model;
        model
            .objects
            .iter()
            .filter_map(|object| {
                let layer_index = object.layer_index?;
                if layers.binary_search(&layer_index).is_err() {
                    return None;
                }
                let layer = model.layers.get(layer_index)?;
                let geometry = object.geometry.as_ref()?;
                Some(LayeredObject {
                    object,
                    geometry,
                    layer_path: layer.full_path.as_str(),
                    attributes: &object.attributes,
                })
            })
            .collect()
    }

    /// Like [`objects_in_layer`](Self::objects_in_layer), but an empty result
    /// is a [`Error::MissingLayer`].
    pub fn require_layer(&self, name: &str) -> Result<Vec<LayeredObject<'a>>> {
        let objects = self.objects_in_layer(name);
        if objects.is_empty() {
            return Err(Error::MissingLayer(name.to_string()));
        }
        Ok(objects)
    }
}

/// One-shot layer query without keeping an index around.
pub fn objects_in_layer<'a>(model: &'a Model, name: &str) -> Vec<LayeredObject<'a>> {
    LayerIndex::new(model).objects_in_layer(name)
}

#[inline]
fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
