// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `MissingFKIndex`: an FK's leading local column has no index
//! starting on that column.

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct MissingFkIndex;

impl Detector for MissingFkIndex {
    fn name(&self) -> &'static str {
        "missing_fk_index"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for table in ctx.catalog.tables() {
            for fk in &table.foreign_keys {
                let Some(leading) = fk.local_columns.first() else {
                    continue;
                };
                let covered = table
                    .indexes
                    .iter()
                    .any(|idx| idx.leading_column().is_some_and(|c| c.eq_ignore_ascii_case(leading)));
                if covered {
                    continue;
                }
                issues.push(Issue::new(
                    IssueCategory::MissingFkIndex,
                    Severity::High,
                    &ObjectRef::table(table.fqn.clone()),
                    format!(
                        "foreign key {} on {}.{} has no leading index",
                        fk.name, table.fqn, leading
                    ),
                ));
            }
        }
        issues
    }
}
