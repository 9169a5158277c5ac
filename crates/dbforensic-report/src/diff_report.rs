// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The reporter boundary output for the `diff` command: `DiffReport`
//! bundles a [`ChangeSet`] with enough catalog context for a reporter to
//! print a header without re-deriving it from two raw catalogs.

use serde::{Deserialize, Serialize};

use dbforensic_diff::{Change, ChangeSummary, DiffWarning};
use dbforensic_graph::RiskLevel;

use crate::report::CatalogSummary;

/// The full output of one `diff source target` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub source_info: CatalogSummary,
    pub target_info: CatalogSummary,
    pub changes: Vec<Change>,
    pub summary: ChangeSummary,
    pub overall_risk: RiskLevel,
    pub warnings: Vec<DiffWarning>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
