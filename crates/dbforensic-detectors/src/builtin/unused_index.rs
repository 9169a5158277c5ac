// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `UnusedIndex`: a non-PK index with zero recorded seeks/scans over
//! the sampling window. Silently skips when usage stats are absent
//! rather than flagging; see [`dbforensic_catalog::Index::is_unused`].

use std::collections::HashSet;

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct UnusedIndex;

impl Detector for UnusedIndex {
    fn name(&self) -> &'static str {
        "unused_index"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for table in ctx.catalog.tables() {
            let pk_columns: HashSet<&str> = table
                .primary_key
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|s| s.as_str())
                .collect();
            for idx in &table.indexes {
                if !idx.is_unused() {
                    continue;
                }
                let idx_columns: HashSet<&str> = idx.columns.iter().map(|c| c.name.as_str()).collect();
                if !pk_columns.is_empty() && idx_columns == pk_columns {
                    continue;
                }
                issues.push(Issue::new(
                    IssueCategory::UnusedIndex,
                    Severity::Medium,
                    &ObjectRef::table(table.fqn.clone()),
                    format!("index {} on {} has zero seeks and zero scans", idx.name, table.fqn),
                ));
            }
        }
        issues
    }
}
