// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `MissingPK`: a table with no primary key, excluding staging/temp
//! tables.

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct MissingPk;

impl Detector for MissingPk {
    fn name(&self) -> &'static str {
        "missing_pk"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        ctx.catalog
            .tables()
            .filter(|t| t.primary_key.is_none() && !t.is_staging)
            .map(|t| {
                Issue::new(
                    IssueCategory::MissingPk,
                    Severity::High,
                    &ObjectRef::table(t.fqn.clone()),
                    format!("table {} has no primary key", t.fqn),
                )
                .with_remediation_sql(format!(
                    "-- ALTER TABLE {} ADD CONSTRAINT PK_{} PRIMARY KEY (<column>);",
                    t.fqn, t.fqn.name
                ))
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
    fn flags_table_without_pk() {
        let t = Table::new(Fqn::new("dbo", "Orders"), vec![Column::new("Id", 0, "int")]);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let extractions = HashMap::new();
        let complexity = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);
        let issues = MissingPk.detect(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn skips_staging_table() {
        let t = Table::new(Fqn::new("dbo", "stg_Orders"), vec![Column::new("Id", 0, "int")])
            .with_staging(true);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let extractions = HashMap::new();
        let complexity = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);
        assert!(MissingPk.detect(&ctx).is_empty());
    }

    #[test]
    fn skips_table_with_pk() {
        let t = Table::new(Fqn::new("dbo", "Orders"), vec![Column::new("Id", 0, "int")])
            .with_primary_key(vec!["Id".to_string()]);
        let catalog = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let extractions = HashMap::new();
        let complexity = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);
        assert!(MissingPk.detect(&ctx).is_empty());
    }
}
