// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Fuse explicit foreign keys, extractor join pairs, called routines,
//! plain references, and the column-naming heuristic into one typed
//! edge set.
//!
//! Edge direction convention used throughout: `source` is the *dependent*
//! object, `target` is the thing it depends on, the same direction as a
//! foreign key (the table holding the FK depends on the table it
//! references). [`crate::DependencyGraph::impact`] walks edges in
//! reverse, so "what depends on X" falls out of "who points at X".

use std::collections::HashMap;

use dbforensic_catalog::{Catalog, Column, Fqn};
use dbforensic_extractor::ExtractionResult;

use crate::edge::{Edge, ObjectKind, ObjectRef};

/// The built-in irregular-plural map: a small, overridable table of
/// singular→plural forms the naming heuristic checks in addition to
/// the regular `s`/`es` suffixes.
pub fn default_plural_overrides() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("person".to_string(), "people".to_string());
    m.insert("child".to_string(), "children".to_string());
    m
}

/// One body already scanned by the extractor, paired with the object it
/// came from.
pub struct ExtractedBody<'a> {
    pub object: ObjectRef,
    pub result: &'a ExtractionResult,
}

/// Fuse every source above into one edge set.
pub fn infer(
    catalog: &Catalog,
    extractions: &[ExtractedBody<'_>],
    plural_overrides: &HashMap<String, String>,
) -> Vec<Edge> {
    let mut edges = Vec::new();

    explicit_fk_edges(catalog, &mut edges);
    for body in extractions {
        join_edges(body, &mut edges);
        call_edges(catalog, body, &mut edges);
        reference_edges(catalog, body, &mut edges);
    }
    naming_heuristic_edges(catalog, plural_overrides, &mut edges);

    edges
}

fn relation_kind(catalog: &Catalog, fqn: &Fqn) -> Option<ObjectKind> {
    if catalog.table(fqn).is_some() {
        Some(ObjectKind::Table)
    } else if catalog.view(fqn).is_some() {
        Some(ObjectKind::View)
    } else {
        None
    }
}

fn explicit_fk_edges(catalog: &Catalog, edges: &mut Vec<Edge>) {
    for table in catalog.tables() {
        for fk in &table.foreign_keys {
            edges.push(Edge::foreign_key(
                ObjectRef::table(table.fqn.clone()),
                ObjectRef::table(fk.referenced_table.clone()),
            ));
        }
    }
}

fn join_edges(body: &ExtractedBody<'_>, edges: &mut Vec<Edge>) {
    for (a, b) in &body.result.joins {
        let routine = body.object.fqn.clone();
        edges.push(Edge::joins(ObjectRef::table(a.clone()), ObjectRef::table(b.clone()), routine.clone()));
        edges.push(Edge::joins(ObjectRef::table(b.clone()), ObjectRef::table(a.clone()), routine));
    }
}

fn call_edges(catalog: &Catalog, body: &ExtractedBody<'_>, edges: &mut Vec<Edge>) {
    if !matches!(body.object.kind, ObjectKind::Procedure | ObjectKind::Function) {
        return;
    }
    for called in &body.result.called_routines {
        let Some(routine) = catalog.routine(called) else {
            continue;
        };
        let target_kind = match routine.kind {
            dbforensic_catalog::RoutineKind::Procedure => ObjectKind::Procedure,
            dbforensic_catalog::RoutineKind::Function => ObjectKind::Function,
        };
        edges.push(Edge::calls(body.object.clone(), ObjectRef::new(target_kind, called.clone())));
    }
}

fn reference_edges(catalog: &Catalog, body: &ExtractedBody<'_>, edges: &mut Vec<Edge>) {
    let joined: std::collections::HashSet<&Fqn> = body
        .result
        .joins
        .iter()
        .flat_map(|(a, b)| [a, b])
        .collect();

    for fqn in &body.result.referenced {
        if joined.contains(fqn) {
            continue;
        }
        let Some(kind) = relation_kind(catalog, fqn) else {
            continue;
        };
        edges.push(Edge::references(
            body.object.clone(),
            ObjectRef::new(kind, fqn.clone()),
            body.object.fqn.clone(),
        ));
    }
}

/// `<Stem>Id` / `<Stem>_id` / `<Stem>ID` → `Stem`, or `None` if the
/// column name isn't shaped like an FK-candidate column at all.
fn extract_stem(column_name: &str) -> Option<&str> {
    let lower = column_name.to_ascii_lowercase();
    if lower.ends_with("_id") {
        return non_empty(&column_name[..column_name.len() - 3]);
    }
    if lower.ends_with("id") && column_name.len() > 2 {
        return non_empty(&column_name[..column_name.len() - 2]);
    }
    None
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Does `candidate_table_name` match `stem`, singular or plural? Returns
/// `Some(true)` for an exact singular match, `Some(false)` for a plural
/// match, `None` for no match.
fn stem_match(stem: &str, candidate_table_name: &str, plural_overrides: &HashMap<String, String>) -> Option<bool> {
    if candidate_table_name.eq_ignore_ascii_case(stem) {
        return Some(true);
    }
    let plural_s = format!("{stem}s");
    let plural_es = format!("{stem}es");
    if candidate_table_name.eq_ignore_ascii_case(&plural_s) || candidate_table_name.eq_ignore_ascii_case(&plural_es) {
        return Some(false);
    }
    if let Some(irregular) = plural_overrides.get(&stem.to_ascii_lowercase()) {
        if candidate_table_name.eq_ignore_ascii_case(irregular) {
            return Some(false);
        }
    }
    None
}

fn pk_ends_with_id(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with("id") // covers "_id" and "Id"/"ID" forms too
}

fn types_compatible(a: &Column, b: &Column) -> bool {
    let ak = a.normalized_type.kind;
    let bk = b.normalized_type.kind;
    if ak.is_integer() && bk.is_integer() {
        return true;
    }
    if ak.is_string() && bk.is_string() {
        return match (a.normalized_type.length, b.normalized_type.length) {
            (Some(la), Some(lb)) => la == lb,
            _ => true,
        };
    }
    false
}

fn naming_heuristic_edges(catalog: &Catalog, plural_overrides: &HashMap<String, String>, edges: &mut Vec<Edge>) {
    for table in catalog.tables() {
        for column in &table.columns {
            let Some(stem) = extract_stem(&column.name) else {
                continue;
            };
            if table.has_explicit_fk_on(&[column.name.clone()]) {
                continue;
            }

            let mut matches: Vec<(&dbforensic_catalog::Table, bool)> = Vec::new();
            for candidate in catalog.tables() {
                if candidate.fqn == table.fqn {
                    continue;
                }
                let Some(exact) = stem_match(stem, &candidate.fqn.name, plural_overrides) else {
                    continue;
                };
                let Some(pk_col_name) = candidate.single_primary_key_column() else {
                    continue;
                };
                if !pk_ends_with_id(pk_col_name) {
                    continue;
                }
                let Some(pk_col) = candidate.column(pk_col_name) else {
                    continue;
                };
                if !types_compatible(column, pk_col) {
                    continue;
                }
                matches.push((candidate, exact));
            }

            if let [(target, exact)] = matches.as_slice() {
                edges.push(Edge::naming_implied(
                    ObjectRef::table(table.fqn.clone()),
                    ObjectRef::table(target.fqn.clone()),
                    *exact,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Column, ForeignKey, Provider, Table};

    fn students_and_attendance() -> Catalog {
        let students = Table::new(Fqn::new("dbo", "Students"), vec![Column::new("StudentId", 0, "int")])
            .with_primary_key(vec!["StudentId".to_string()]);
        let attendance = Table::new(
            Fqn::new("dbo", "Attendance"),
            vec![Column::new("StudentId", 0, "int"), Column::new("Day", 1, "date")],
        );
        Catalog::build(vec![students, attendance], vec![], vec![], Provider::SqlServer, "dbo").unwrap()
    }

    #[test]
    fn scenario_c_naming_inference() {
        let catalog = students_and_attendance();
        let edges = infer(&catalog, &[], &default_plural_overrides());
        let edge = edges
            .iter()
            .find(|e| e.source.fqn.name == "Attendance" && e.target.fqn.name == "Students")
            .expect("expected naming-implied edge");
        assert_eq!(edge.confidence, 95);
    }

    #[test]
    fn skips_when_explicit_fk_already_present() {
        let students = Table::new(Fqn::new("dbo", "Students"), vec![Column::new("StudentId", 0, "int")])
            .with_primary_key(vec!["StudentId".to_string()]);
        let attendance = Table::new(
            Fqn::new("dbo", "Attendance"),
            vec![Column::new("StudentId", 0, "int")],
        )
        .with_foreign_keys(vec![ForeignKey::new(
            "fk_student",
            vec!["StudentId".to_string()],
            Fqn::new("dbo", "Students"),
            vec!["StudentId".to_string()],
        )]);
        let catalog = Catalog::build(vec![students, attendance], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let edges = infer(&catalog, &[], &default_plural_overrides());
        let naming_edges: Vec<_> = edges.iter().filter(|e| e.kind == crate::edge::EdgeKind::NamingImplied).collect();
        assert!(naming_edges.is_empty());
        let fk_edges: Vec<_> = edges.iter().filter(|e| e.kind == crate::edge::EdgeKind::ForeignKey).collect();
        assert_eq!(fk_edges.len(), 1);
    }

    #[test]
    fn plural_irregular_match() {
        let person = Table::new(Fqn::new("dbo", "Person"), vec![Column::new("PersonId", 0, "int")])
            .with_primary_key(vec!["PersonId".to_string()]);
        let pets = Table::new(Fqn::new("dbo", "Pets"), vec![Column::new("PersonId", 0, "int")]);
        let catalog = Catalog::build(vec![person, pets], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let edges = infer(&catalog, &[], &default_plural_overrides());
        assert!(edges
            .iter()
            .any(|e| e.source.fqn.name == "Pets" && e.target.fqn.name == "Person"));
    }

    #[test]
    fn join_edges_are_symmetric() {
        let mut result = ExtractionResult::default();
        result.joins.insert((Fqn::new("dbo", "A"), Fqn::new("dbo", "B")));
        let body = ExtractedBody {
            object: ObjectRef::new(ObjectKind::Procedure, Fqn::new("dbo", "sp_Foo")),
            result: &result,
        };
        let mut edges = Vec::new();
        join_edges(&body, &mut edges);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn reference_edges_skip_joined_tables() {
        let mut result = ExtractionResult::default();
        result.joins.insert((Fqn::new("dbo", "A"), Fqn::new("dbo", "B")));
        result.referenced.insert(Fqn::new("dbo", "A"));
        result.referenced.insert(Fqn::new("dbo", "C"));
        let students = Table::new(Fqn::new("dbo", "A"), vec![]);
        let b = Table::new(Fqn::new("dbo", "B"), vec![]);
        let c = Table::new(Fqn::new("dbo", "C"), vec![]);
        let catalog = Catalog::build(vec![students, b, c], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let body = ExtractedBody {
            object: ObjectRef::new(ObjectKind::Procedure, Fqn::new("dbo", "sp_Foo")),
            result: &result,
        };
        let mut edges = Vec::new();
        reference_edges(&catalog, &body, &mut edges);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target.fqn.name, "C");
    }
}
