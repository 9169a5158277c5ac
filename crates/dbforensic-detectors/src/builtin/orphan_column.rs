// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `OrphanColumn`: a column on a referenced table that no scanned
//! routine/view body names, even via an alias.
//!
//! `ExtractionResult` only tracks table-level references, so this
//! detector re-tokenizes each candidate body with the extractor's own
//! scanner rather than widening that shape for one low-severity check.

use dbforensic_extractor::normalize::strip_comments_and_strings;
use dbforensic_extractor::scan::scan;
use dbforensic_extractor::token::Token;
use dbforensic_graph::{ObjectKind, ObjectRef};

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct OrphanColumn;

impl Detector for OrphanColumn {
    fn name(&self) -> &'static str {
        "orphan_column"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for table in ctx.catalog.tables() {
            let candidate_bodies: Vec<&str> = ctx
                .extractions
                .iter()
                .filter(|(_, result)| result.referenced.contains(&table.fqn))
                .filter_map(|(obj, _)| body_of(ctx, obj))
                .collect();

            for column in &table.columns {
                let referenced = candidate_bodies.iter().any(|body| body_mentions(body, &column.name));
                if referenced {
                    continue;
                }
                issues.push(Issue::new(
                    IssueCategory::OrphanColumn,
                    Severity::Low,
                    &ObjectRef::table(table.fqn.clone()),
                    format!("column {}.{} is never referenced by any routine or view body", table.fqn, column.name),
                ));
            }
        }
        issues
    }
}

fn body_of<'a>(ctx: &'a DetectionContext<'_>, obj: &ObjectRef) -> Option<&'a str> {
    match obj.kind {
        ObjectKind::Procedure | ObjectKind::Function => {
            ctx.catalog.routine(&obj.fqn).map(|r| r.body.as_str())
        }
        ObjectKind::View => ctx.catalog.view(&obj.fqn).map(|v| v.body.as_str()),
        ObjectKind::Table => None,
    }
}

fn body_mentions(body: &str, column_name: &str) -> bool {
    let normalized = strip_comments_and_strings(body);
    scan(&normalized)
        .iter()
        .any(|t| matches!(t, Token::Ident(name) if name.eq_ignore_ascii_case(column_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Column, Fqn, Provider, Routine, RoutineKind, Table};
    use dbforensic_extractor::ExtractionResult;
    use dbforensic_graph::DependencyGraph;
    use std::collections::HashMap;

    #[test]
    fn flags_column_never_mentioned_in_any_body() {
        let t = Table::new(
            Fqn::new("dbo", "Students"),
            vec![Column::new("Id", 0, "int"), Column::new("MiddleName", 1, "varchar")],
        );
        let r = Routine::new(
            Fqn::new("dbo", "sp_Report"),
            RoutineKind::Procedure,
            "SELECT Id FROM dbo.Students",
        );
        let catalog = Catalog::build(vec![t], vec![], vec![r.clone()], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();

        let mut result = ExtractionResult::default();
        result.referenced.insert(Fqn::new("dbo", "Students"));
        let mut extractions = HashMap::new();
        extractions.insert(
            ObjectRef::new(ObjectKind::Procedure, r.fqn.clone()),
            result,
        );
        let c = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &extractions, &c);

        let issues = OrphanColumn.detect(&ctx);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("MiddleName"));
    }
}
