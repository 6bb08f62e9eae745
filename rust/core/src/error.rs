// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error type shared by every compliance check.
//!
//! A failing check aborts only its own invocation. The message is meant to be
//! shown to the caller verbatim, so every variant carries enough context to
//! locate the offending layer or object.

/// Result type alias for compliance operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a single check invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No objects resolved for a required layer.
    #[error("layer '{0}' not found or contains no geometry")]
    MissingLayer(String),

    /// A boundary layer produced no closed curve or usable polygon.
    #[error("layer '{0}' contains no valid closed boundary")]
    NoValidBoundary(String),

    /// An object on a boundary layer has the wrong primitive kind.
    #[error("object '{object}' on layer '{layer}' is not a {expected}")]
    InvalidGeometryType {
        layer: String,
        object: String,
        expected: &'static str,
    },

    /// The upstream model could not be read.
    #[error("unreadable model: {0}")]
    UnreadableModel(String),
}

impl Error {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingLayer(_) => "missing_layer",
            Error::NoValidBoundary(_) => "no_valid_boundary",
            Error::InvalidGeometryType { .. } => "invalid_geometry_type",
            Error::UnreadableModel(_) => "unreadable_model",
        }
    }
}
