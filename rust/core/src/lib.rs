// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SiteCheck Core
//!
//! Read-only model snapshot handed over by the CAD parser, plus the layer
//! index every compliance check uses to find its inputs.
//!
//! ## Overview
//!
//! - **Model**: layers with hierarchical `::` paths and objects carrying a raw
//!   geometry primitive and string attributes
//! - **Layer Index**: case-insensitive layer resolution by full path or leaf name
//! - **Attributes**: alias-aware, case-insensitive lookups with numeric parsing
//! - **Error**: the single error type raised by every check
//!
//! ## Quick Start
//!
//! ```rust
//! use sitecheck_core::{Geometry, LayerIndex, Model};
//!
//! let mut model = Model::new();
//! model
//!     .add("Site::Plots", "P1", Geometry::closed_curve(vec![
//!         [0.0, 0.0, 0.0], [50.0, 0.0, 0.0], [50.0, 40.0, 0.0], [0.0, 40.0, 0.0],
//!     ]))
//!     .attributes
//!     .insert("height_limit", "24m");
//!
//! let index = LayerIndex::new(&model);
//! let plots = index.objects_in_layer("plots");
//! assert_eq!(plots.len(), 1);
//! assert_eq!(plots[0].attributes.get_f64_any(&["height_limit"]), Some(24.0));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable (de)serialization of the model snapshot

pub mod attributes;
pub mod error;
pub mod layers;
pub mod model;

pub use attributes::{parse_leading_f64, Attributes};
pub use error::{Error, Result};
pub use layers::{objects_in_layer, LayerIndex, LayeredObject};
pub use model::{
    BrepFace, Geometry, GeometryKind, Layer, Model, ModelObject, RawPoint, LAYER_SEPARATOR,
};
