// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing CAD geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),

    #[error("Core model error: {0}")]
    CoreError(#[from] sitecheck_core::Error),
}
