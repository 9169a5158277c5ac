// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `DeadTable`: a table nothing in the graph depends on: no FK, no
//! body reference, no join, no naming-implied edge points at it.

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct DeadTable;

impl Detector for DeadTable {
    fn name(&self) -> &'static str {
        "dead_table"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        ctx.catalog
            .tables()
            .map(|t| ObjectRef::table(t.fqn.clone()))
            .filter(|obj| ctx.graph.neighbors_in(obj).is_empty())
            .map(|obj| {
                Issue::new(
                    IssueCategory::DeadTable,
                    Severity::Medium,
                    &obj,
                    format!("table {} has no incoming references or foreign keys", obj.fqn),
                )
            })
            .collect()
    }
}
