// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `InconsistentNaming`: the same semantic column role (e.g.
//! `StudentId` vs `student_id`) spelled in more than one casing style
//! across the database.
//!
//! [`consistency_ratio`] reuses this detector's grouping to feed the
//! health scorer's `naming_consistency` bonus, so the two never
//! drift apart on what counts as "the same role".

use std::collections::HashMap;

use dbforensic_catalog::{Catalog, Fqn};
use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

/// Coarse casing-style classification; anything not cleanly one of the
/// three common forms is `"other"` and never compared.
fn naming_style(name: &str) -> &'static str {
    let has_underscore = name.contains('_');
    let starts_upper = name.chars().next().is_some_and(|c| c.is_uppercase());
    let has_upper = name.chars().any(|c| c.is_uppercase());

    if has_underscore && !has_upper {
        "snake_case"
    } else if !has_underscore && starts_upper {
        "PascalCase"
    } else if !has_underscore && !starts_upper && has_upper {
        "camelCase"
    } else {
        "other"
    }
}

/// The semantic key a column name collapses to once casing is erased:
/// underscores stripped, lowercased.
fn semantic_key(name: &str) -> String {
    name.chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase()
}

struct Group {
    table: Fqn,
    column: String,
    style: &'static str,
}

fn semantic_groups(catalog: &Catalog) -> HashMap<String, Vec<Group>> {
    let mut groups: HashMap<String, Vec<Group>> = HashMap::new();
    for table in catalog.tables() {
        for column in &table.columns {
            let style = naming_style(&column.name);
            if style == "other" {
                continue;
            }
            groups.entry(semantic_key(&column.name)).or_default().push(Group {
                table: table.fqn.clone(),
                column: column.name.clone(),
                style,
            });
        }
    }
    groups
}

/// The health-scorer bonus input: fraction of multi-member semantic
/// groups that use a single consistent casing style. `1.0` when there are
/// no groups with more than one member (vacuously consistent).
pub fn consistency_ratio(catalog: &Catalog) -> f64 {
    let groups = semantic_groups(catalog);
    let multi: Vec<&Vec<Group>> = groups.values().filter(|g| g.len() >= 2).collect();
    if multi.is_empty() {
        return 1.0;
    }
    let consistent = multi
        .iter()
        .filter(|g| g.iter().map(|m| m.style).collect::<std::collections::HashSet<_>>().len() == 1)
        .count();
    consistent as f64 / multi.len() as f64
}

pub struct InconsistentNaming;

impl Detector for InconsistentNaming {
    fn name(&self) -> &'static str {
        "inconsistent_naming"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut groups: Vec<(String, Vec<Group>)> = semantic_groups(ctx.catalog).into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let mut issues = Vec::new();
        for (key, members) in groups {
            if members.len() < 2 {
                continue;
            }
            let styles: std::collections::HashSet<&str> = members.iter().map(|m| m.style).collect();
            if styles.len() < 2 {
                continue;
            }
            let mut tables: Vec<Fqn> = members.iter().map(|m| m.table.clone()).collect();
            tables.sort();
            tables.dedup();
            let affected: Vec<ObjectRef> = tables.into_iter().map(ObjectRef::table).collect();
            let first = affected[0].clone();
            let mut spellings: Vec<String> = members.iter().map(|m| format!("{}.{}", m.table, m.column)).collect();
            spellings.sort();
            issues.push(
                Issue::new(
                    IssueCategory::InconsistentNaming,
                    Severity::Low,
                    &first,
                    format!("semantic role \"{key}\" spelled inconsistently: {}", spellings.join(", ")),
                )
                .with_affected(affected),
            );
        }
        issues
    }
}
