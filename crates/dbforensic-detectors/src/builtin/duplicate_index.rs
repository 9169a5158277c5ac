// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `DuplicateIndex`: two or more indexes on the same table share the
//! same leading column.

use std::collections::HashMap;

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct DuplicateIndex;

impl Detector for DuplicateIndex {
    fn name(&self) -> &'static str {
        "duplicate_index"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for table in ctx.catalog.tables() {
            let mut by_leading: HashMap<&str, Vec<&str>> = HashMap::new();
            for idx in &table.indexes {
                if let Some(leading) = idx.leading_column() {
                    by_leading.entry(leading).or_default().push(&idx.name);
                }
            }
            let mut leading_columns: Vec<&str> = by_leading.keys().copied().collect();
            leading_columns.sort();
            for leading in leading_columns {
                let names = &by_leading[leading];
                if names.len() < 2 {
                    continue;
                }
                issues.push(Issue::new(
                    IssueCategory::DuplicateIndex,
                    Severity::Medium,
                    &ObjectRef::table(table.fqn.clone()),
                    format!(
                        "indexes {} on {} share leading column {}",
                        names.join(", "),
                        table.fqn,
                        leading
                    ),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Column, Fqn, Index, IndexColumn, Provider, SortDirection, Table};
    use dbforensic_graph::DependencyGraph;
    use std::collections::HashMap as StdHashMap;

    #[test]
    fn flags_shared_leading_column() {
        let t = Table::new(Fqn::new("dbo", "Orders"), vec![Column::new("CustomerId", 0, "int")])
            .with_indexes(vec![
                Index::new("ix_a", vec![IndexColumn { name: "CustomerId".to_string(), direction: SortDirection::Asc }]),
                Index::new("ix_b", vec![IndexColumn { name: "CustomerId".to_string(), direction: SortDirection::Desc }]),
            ]);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let e = StdHashMap::new();
        let c = StdHashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &e, &c);
        assert_eq!(DuplicateIndex.detect(&ctx).len(), 1);
    }

    #[test]
    fn skips_distinct_leading_columns() {
        let t = Table::new(Fqn::new("dbo", "Orders"), vec![Column::new("A", 0, "int"), Column::new("B", 1, "int")])
            .with_indexes(vec![
                Index::new("ix_a", vec![IndexColumn { name: "A".to_string(), direction: SortDirection::Asc }]),
                Index::new("ix_b", vec![IndexColumn { name: "B".to_string(), direction: SortDirection::Asc }]),
            ]);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let e = StdHashMap::new();
        let c = StdHashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &e, &c);
        assert!(DuplicateIndex.detect(&ctx).is_empty());
    }
}
