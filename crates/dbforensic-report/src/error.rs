// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The error taxonomy, as the one type every engine-facing call returns.

use thiserror::Error;

use dbforensic_catalog::CatalogError;

/// Result type alias for the orchestration boundary.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal errors the engine can return. Non-fatal diagnostics
/// (`ExtractorWarning`, `DiffMismatchWarning`) are never surfaced here:
/// they accumulate into the `Report`/`DiffReport` itself and are
/// summarized in the report footer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Surfaced from the connector unchanged; the core never originates
    /// one of these, it only re-emits them unchanged.
    #[error("connector error: {0}")]
    Connection(String),

    /// A catalog snapshot violates a structural invariant
    /// (`CatalogIntegrityError`, fatal for that analysis run).
    #[error(transparent)]
    CatalogIntegrity(#[from] CatalogError),

    /// The caller requested cancellation; the run was abandoned before a
    /// report was produced. A cancelled run leaves no partial report.
    #[error("analysis cancelled")]
    Cancelled,
}
