// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The three-step structural comparison (tables/columns, then indexes/FKs,
//! then routine/view bodies), assigning risk by consulting the target
//! catalog's dependency graph.

use std::collections::HashMap;

use dbforensic_catalog::{Catalog, Column, ForeignKey, Fqn, Table, View};
use dbforensic_extractor::normalize::strip_comments_and_strings;
use dbforensic_extractor::scan::scan;
use dbforensic_extractor::token::Token;
use dbforensic_graph::{DependencyGraph, ObjectKind, ObjectRef};

use crate::change::{Change, ChangeSet, ChangeSummary, ColumnModification, DiffWarning, TypeChangeClassification};
use crate::risk;

/// Compares two catalog snapshots and produces an ordered [`ChangeSet`].
///
/// `source` is the desired schema, `target` is the schema currently
/// deployed; a `Change` describes what must happen to `target` to reach
/// `source` (e.g. `ColumnRemoved` names a column present in `target` but
/// absent from `source`). `target_graph` must be the
/// dependency graph built from `target`, since every impact-based risk
/// band consults the graph of the schema being migrated away from.
pub struct DiffEngine;

impl DiffEngine {
    pub fn diff(source: &Catalog, target: &Catalog, target_graph: &DependencyGraph) -> ChangeSet {
        let mut changes = Vec::new();
        let mut warnings = Vec::new();

        diff_tables(source, target, target_graph, &mut changes, &mut warnings);
        diff_routines(source, target, target_graph, &mut changes);
        diff_views(source, target, target_graph, &mut changes);

        changes.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let summary = ChangeSummary::from_changes(&changes);
        tracing::info!(changes = changes.len(), risk = %summary.overall_risk, "diff complete");

        ChangeSet { changes, summary, warnings }
    }
}

fn by_fqn<'a, T>(items: impl Iterator<Item = &'a T>, fqn: impl Fn(&'a T) -> &'a Fqn) -> HashMap<Fqn, &'a T> {
    items.map(|item| (fqn(item).clone(), item)).collect()
}

fn diff_tables(
    source: &Catalog,
    target: &Catalog,
    target_graph: &DependencyGraph,
    changes: &mut Vec<Change>,
    warnings: &mut Vec<DiffWarning>,
) {
    let source_tables = by_fqn(source.tables(), |t| &t.fqn);
    let target_tables = by_fqn(target.tables(), |t| &t.fqn);

    for (fqn, _) in &source_tables {
        if !target_tables.contains_key(fqn) {
            changes.push(Change::TableAdded { table: fqn.clone(), risk: dbforensic_graph::RiskLevel::None });
        }
    }
    for (fqn, _) in &target_tables {
        if !source_tables.contains_key(fqn) {
            changes.push(Change::TableRemoved { table: fqn.clone(), risk: dbforensic_graph::RiskLevel::Critical });
        }
    }

    for (fqn, source_table) in &source_tables {
        let Some(target_table) = target_tables.get(fqn) else { continue };
        diff_columns(fqn, *source_table, *target_table, target, target_graph, changes, warnings);
        diff_indexes(fqn, *source_table, *target_table, changes);
        diff_foreign_keys(fqn, *source_table, *target_table, changes);
    }
}

fn diff_columns(
    fqn: &Fqn,
    source_table: &Table,
    target_table: &Table,
    target: &Catalog,
    target_graph: &DependencyGraph,
    changes: &mut Vec<Change>,
    warnings: &mut Vec<DiffWarning>,
) {
    let source_cols = by_fqn_like(&source_table.columns, |c| &c.name);
    let target_cols = by_fqn_like(&target_table.columns, |c| &c.name);

    for (name, column) in &source_cols {
        if !target_cols.contains_key(name) {
            let risk = risk::column_added(column.nullable, column.default_expr.is_some(), target_table.row_count > 0);
            changes.push(Change::ColumnAdded { table: fqn.clone(), column: (*column).clone(), risk });
        }
    }
    for (name, column) in &target_cols {
        if !source_cols.contains_key(name) {
            let (impact_count, contains_view) = column_impact(fqn, &column.name, target, target_graph);
            let risk = risk::impact_band(impact_count, contains_view);
            changes.push(Change::ColumnRemoved {
                table: fqn.clone(),
                column: (*column).clone(),
                impact_count,
                risk,
            });
        }
    }

    for (name, target_column) in &target_cols {
        let Some(source_column) = source_cols.get(name) else { continue };
        diff_one_column(fqn, name, *source_column, *target_column, warnings, changes);
    }
}

fn by_fqn_like<'a, T>(items: &'a [T], key: impl Fn(&'a T) -> &'a str) -> HashMap<String, &'a T> {
    items.iter().map(|item| (key(item).to_ascii_lowercase(), item)).collect()
}

fn diff_one_column(
    table: &Fqn,
    column_name: &str,
    source: &Column,
    target: &Column,
    warnings: &mut Vec<DiffWarning>,
    changes: &mut Vec<Change>,
) {
    if source.normalized_type != target.normalized_type {
        let classification = classify_type_change(target, source);
        if classification == TypeChangeClassification::Ambiguous {
            warnings.push(DiffWarning::AmbiguousTypeChange {
                table: table.clone(),
                column: column_name.to_string(),
            });
        }
        changes.push(Change::ColumnModified {
            table: table.clone(),
            column: source.name.clone(),
            modification: ColumnModification::Type {
                before: target.raw_type.clone(),
                after: source.raw_type.clone(),
                classification,
            },
            risk: risk::type_change(classification),
        });
    }

    if source.nullable != target.nullable {
        changes.push(Change::ColumnModified {
            table: table.clone(),
            column: source.name.clone(),
            modification: ColumnModification::Nullability { before: target.nullable, after: source.nullable },
            risk: risk::nullability_change(target.nullable, source.nullable),
        });
    }

    if source.is_identity != target.is_identity {
        // An identity flip is always a structural rebuild of the column,
        // never a safe in-place change in either dialect this tool targets.
        changes.push(Change::ColumnModified {
            table: table.clone(),
            column: source.name.clone(),
            modification: ColumnModification::Identity { before: target.is_identity, after: source.is_identity },
            risk: dbforensic_graph::RiskLevel::High,
        });
    }

    if source.default_expr != target.default_expr {
        changes.push(Change::DefaultChanged {
            table: table.clone(),
            column: source.name.clone(),
            before: target.default_expr.clone(),
            after: source.default_expr.clone(),
            risk: dbforensic_graph::RiskLevel::Low,
        });
    }
}

/// `before`/`after` here name the *target* (current) and *source*
/// (desired) normalized types respectively, matching the "before the
/// migration" / "after the migration" reading a reviewer expects.
fn classify_type_change(before: &Column, after: &Column) -> TypeChangeClassification {
    let b = &before.normalized_type;
    let a = &after.normalized_type;

    if b.kind == a.kind {
        if let (Some(bl), Some(al)) = (b.length, a.length) {
            return if al > bl {
                TypeChangeClassification::Widening
            } else if al < bl {
                TypeChangeClassification::Narrowing
            } else {
                TypeChangeClassification::Widening
            };
        }
        if let (Some(bp), Some(ap)) = (b.precision, a.precision) {
            return if ap > bp {
                TypeChangeClassification::Widening
            } else if ap < bp {
                TypeChangeClassification::Narrowing
            } else {
                TypeChangeClassification::Widening
            };
        }
        return TypeChangeClassification::Ambiguous;
    }

    if let (Some(bw), Some(aw)) = (b.kind.integer_width(), a.kind.integer_width()) {
        return if aw > bw {
            TypeChangeClassification::Widening
        } else {
            TypeChangeClassification::Narrowing
        };
    }

    TypeChangeClassification::KindChange
}

fn diff_indexes(fqn: &Fqn, source_table: &Table, target_table: &Table, changes: &mut Vec<Change>) {
    let source_idx = by_fqn_like(&source_table.indexes, |i| &i.name);
    let target_idx = by_fqn_like(&target_table.indexes, |i| &i.name);

    for (name, index) in &source_idx {
        if !target_idx.contains_key(name) {
            changes.push(Change::IndexAdded {
                table: fqn.clone(),
                index: (*index).clone(),
                risk: dbforensic_graph::RiskLevel::Low,
            });
        }
    }

    let source_removed_columns: Vec<String> =
        column_names_removed(&source_table.columns, &target_table.columns);

    for (name, index) in &target_idx {
        if !source_idx.contains_key(name) {
            let on_removed_column = index
                .columns
                .iter()
                .any(|c| source_removed_columns.iter().any(|rc| rc.eq_ignore_ascii_case(&c.name)));
            changes.push(Change::IndexRemoved {
                table: fqn.clone(),
                index: (*index).clone(),
                risk: risk::index_removed(on_removed_column),
            });
        }
    }
}

fn column_names_removed(source_columns: &[Column], target_columns: &[Column]) -> Vec<String> {
    let source_names: Vec<String> = source_columns.iter().map(|c| c.name.to_ascii_lowercase()).collect();
    target_columns
        .iter()
        .filter(|c| !source_names.contains(&c.name.to_ascii_lowercase()))
        .map(|c| c.name.clone())
        .collect()
}

fn diff_foreign_keys(fqn: &Fqn, source_table: &Table, target_table: &Table, changes: &mut Vec<Change>) {
    let source_fks = by_fqn_like(&source_table.foreign_keys, |f| &f.name);
    let target_fks = by_fqn_like(&target_table.foreign_keys, |f| &f.name);

    for (name, fk) in &source_fks {
        if !target_fks.contains_key(name) {
            changes.push(Change::ForeignKeyAdded {
                table: fqn.clone(),
                foreign_key: (*fk).clone(),
                orphan_check_predicate: orphan_check_predicate(fqn, *fk),
                risk: dbforensic_graph::RiskLevel::Low,
            });
        }
    }
    for (name, fk) in &target_fks {
        if !source_fks.contains_key(name) {
            changes.push(Change::ForeignKeyRemoved {
                table: fqn.clone(),
                foreign_key: (*fk).clone(),
                risk: dbforensic_graph::RiskLevel::Low,
            });
        }
    }
}

/// The anti-join predicate a migration step should run before enforcing a
/// newly added FK; the engine emits the predicate but defers the actual
/// check to the migration step. Single-column FKs render a simple
/// `NOT IN`; multi-column FKs list each pair for the reviewer to adapt.
fn orphan_check_predicate(table: &Fqn, fk: &ForeignKey) -> String {
    match fk.single_local_column() {
        Some(local) if fk.referenced_columns.len() == 1 => format!(
            "SELECT * FROM {table} WHERE {local} IS NOT NULL AND {local} NOT IN (SELECT {ref_col} FROM {ref_table})",
            ref_col = fk.referenced_columns[0],
            ref_table = fk.referenced_table,
        ),
        _ => format!(
            "SELECT * FROM {table} t LEFT JOIN {ref_table} r ON {conditions} WHERE r.{first_ref} IS NULL",
            ref_table = fk.referenced_table,
            conditions = fk
                .local_columns
                .iter()
                .zip(&fk.referenced_columns)
                .map(|(l, r)| format!("t.{l} = r.{r}"))
                .collect::<Vec<_>>()
                .join(" AND "),
            first_ref = fk.referenced_columns.first().cloned().unwrap_or_default(),
        ),
    }
}

fn diff_routines(
    source: &Catalog,
    target: &Catalog,
    target_graph: &DependencyGraph,
    changes: &mut Vec<Change>,
) {
    let source_routines = by_fqn(source.routines(), |r| &r.fqn);
    let target_routines = by_fqn(target.routines(), |r| &r.fqn);

    for (fqn, _) in &source_routines {
        if !target_routines.contains_key(fqn) {
            changes.push(Change::RoutineAdded { routine: fqn.clone(), risk: dbforensic_graph::RiskLevel::None });
        }
    }
    for (fqn, _) in &target_routines {
        if !source_routines.contains_key(fqn) {
            let impact_count = object_impact(target_graph, ObjectKind::Procedure, fqn);
            let contains_view = view_in_impact(target_graph, ObjectKind::Procedure, fqn);
            changes.push(Change::RoutineRemoved {
                routine: fqn.clone(),
                impact_count,
                risk: risk::impact_band(impact_count, contains_view),
            });
        }
    }

    for (fqn, source_routine) in &source_routines {
        let Some(target_routine) = target_routines.get(fqn) else { continue };
        if !bodies_equivalent(&source_routine.body, &target_routine.body) {
            let impact_count = object_impact(target_graph, ObjectKind::Procedure, fqn);
            changes.push(Change::RoutineBodyChanged { routine: fqn.clone(), risk: risk::body_changed(impact_count) });
        }
    }
}

fn diff_views(source: &Catalog, target: &Catalog, target_graph: &DependencyGraph, changes: &mut Vec<Change>) {
    let source_views = by_fqn(source.views(), |v| &v.fqn);
    let target_views = by_fqn(target.views(), |v| &v.fqn);

    for (fqn, _) in &source_views {
        if !target_views.contains_key(fqn) {
            changes.push(Change::ViewAdded { view: fqn.clone(), risk: dbforensic_graph::RiskLevel::None });
        }
    }
    for (fqn, _) in &target_views {
        if !source_views.contains_key(fqn) {
            let impact_count = object_impact(target_graph, ObjectKind::View, fqn);
            let contains_view = view_in_impact(target_graph, ObjectKind::View, fqn);
            changes.push(Change::ViewRemoved {
                view: fqn.clone(),
                impact_count,
                risk: risk::impact_band(impact_count, contains_view),
            });
        }
    }

    for (fqn, source_view) in &source_views {
        let Some(target_view) = target_views.get(fqn) else { continue };
        if !bodies_equivalent(&source_view.body, &target_view.body) {
            let impact_count = object_impact(target_graph, ObjectKind::View, fqn);
            changes.push(Change::ViewBodyChanged { view: fqn.clone(), risk: risk::body_changed(impact_count) });
        }
    }
}

fn object_impact(graph: &DependencyGraph, kind: ObjectKind, fqn: &Fqn) -> usize {
    graph.impact(&ObjectRef::new(kind, fqn.clone())).len()
}

fn view_in_impact(graph: &DependencyGraph, kind: ObjectKind, fqn: &Fqn) -> bool {
    graph.impact(&ObjectRef::new(kind, fqn.clone())).contains_view()
}

/// Compares bodies after normalization: strip comments, collapse whitespace,
/// lowercase keywords. Keyword-casing is folded by lowercasing the whole
/// normalized body, since the scanner already treats SQL as case-insensitive
/// and this never produces a false equivalence.
fn bodies_equivalent(a: &str, b: &str) -> bool {
    normalize_body(a) == normalize_body(b)
}

fn normalize_body(body: &str) -> String {
    let stripped = strip_comments_and_strings(body);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase()
}

/// Column-level impact for `ColumnRemoved`: the graph only tracks
/// object-level edges, so this re-tokenizes the bodies of every
/// routine/view the target graph already shows referencing `table` and
/// counts how many actually name `column` (same technique as
/// `dbforensic-detectors::builtin::orphan_column`). Returns the count of
/// distinct referencing objects plus whether any of them is a view.
fn column_impact(table: &Fqn, column: &str, target: &Catalog, target_graph: &DependencyGraph) -> (usize, bool) {
    let object = ObjectRef::table(table.clone());
    let mut count = 0usize;
    let mut contains_view = false;

    for referrer in target_graph.impact(&object).nodes {
        let body = match referrer.kind {
            ObjectKind::Procedure | ObjectKind::Function => target.routine(&referrer.fqn).map(|r| r.body.as_str()),
            ObjectKind::View => target.view(&referrer.fqn).map(|v| v.body.as_str()),
            ObjectKind::Table => None,
        };
        let Some(body) = body else { continue };
        if body_mentions_column(body, column) {
            count += 1;
            if referrer.kind == ObjectKind::View {
                contains_view = true;
            }
        }
    }

    (count, contains_view)
}

fn body_mentions_column(body: &str, column: &str) -> bool {
    let normalized = strip_comments_and_strings(body);
    scan(&normalized).iter().any(|t| matches!(t, Token::Ident(name) if name.eq_ignore_ascii_case(column)))
}
