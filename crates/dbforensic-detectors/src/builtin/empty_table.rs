// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `EmptyTable`: `row_count = 0`.

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct EmptyTable;

impl Detector for EmptyTable {
    fn name(&self) -> &'static str {
        "empty_table"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        ctx.catalog
            .tables()
            .filter(|t| t.row_count == 0)
            .map(|t| {
                Issue::new(
                    IssueCategory::EmptyTable,
                    Severity::Low,
                    &ObjectRef::table(t.fqn.clone()),
                    format!("table {} has zero rows", t.fqn),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Column, Fqn, Provider, Table};
    use dbforensic_graph::DependencyGraph;
    use std::collections::HashMap;

    #[test]
    fn flags_zero_row_table() {
        let t = Table::new(Fqn::new("dbo", "Empty"), vec![Column::new("Id", 0, "int")]);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let e = HashMap::new();
        let c = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &e, &c);
        assert_eq!(EmptyTable.detect(&ctx).len(), 1);
    }

    #[test]
    fn skips_populated_table() {
        let t = Table::new(Fqn::new("dbo", "Full"), vec![Column::new("Id", 0, "int")]).with_row_count(10);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let e = HashMap::new();
        let c = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &e, &c);
        assert!(EmptyTable.detect(&ctx).is_empty());
    }
}
