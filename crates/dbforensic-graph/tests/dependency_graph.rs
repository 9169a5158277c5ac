// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end edge inference + graph queries over a small multi-table
//! catalog, exercising `infer` and `DependencyGraph` together.

use dbforensic_catalog::{Catalog, Column, ForeignKey, Fqn, Provider, Table};
use dbforensic_graph::{default_plural_overrides, infer, DependencyGraph, EdgeKind, ExtractedBody};

fn school_catalog() -> Catalog {
    let students = Table::new(Fqn::new("dbo", "Students"), vec![Column::new("Id", 0, "int")])
        .with_primary_key(vec!["Id".to_string()]);
    let enrollments = Table::new(
        Fqn::new("dbo", "Enrollments"),
        vec![Column::new("StudentId", 0, "int"), Column::new("CourseId", 1, "int")],
    )
    .with_foreign_keys(vec![ForeignKey::new(
        "fk_student",
        vec!["StudentId".to_string()],
        Fqn::new("dbo", "Students"),
        vec!["Id".to_string()],
    )]);
    let courses = Table::new(Fqn::new("dbo", "Courses"), vec![Column::new("Id", 0, "int")])
        .with_primary_key(vec!["Id".to_string()]);

    Catalog::build(vec![students, enrollments, courses], vec![], vec![], Provider::SqlServer, "dbo").unwrap()
}

#[test]
fn explicit_fk_and_naming_heuristic_coexist() {
    let catalog = school_catalog();
    let edges = infer(&catalog, &[] as &[ExtractedBody<'_>], &default_plural_overrides());
    let graph = DependencyGraph::build(edges);

    assert!(graph.edges().iter().any(|e| e.kind == EdgeKind::ForeignKey
        && e.source.fqn.name == "Enrollments"
        && e.target.fqn.name == "Students"));

    // Courses has no explicit FK from Enrollments.CourseId; the naming
    // heuristic should still infer one since Courses.Id is its PK.
    assert!(graph.edges().iter().any(|e| e.kind == EdgeKind::NamingImplied
        && e.source.fqn.name == "Enrollments"
        && e.target.fqn.name == "Courses"));
}

#[test]
fn impact_of_students_includes_enrollments_transitively() {
    let catalog = school_catalog();
    let edges = infer(&catalog, &[] as &[ExtractedBody<'_>], &default_plural_overrides());
    let graph = DependencyGraph::build(edges);

    let impact = graph.impact(&dbforensic_graph::ObjectRef::table(Fqn::new("dbo", "Students")));
    assert!(impact.nodes.iter().any(|n| n.fqn.name == "Enrollments"));
    assert!(!impact.nodes.iter().any(|n| n.fqn.name == "Students"));
}

#[test]
fn hotspots_rank_students_and_courses_above_isolated_tables() {
    let catalog = school_catalog();
    let edges = infer(&catalog, &[] as &[ExtractedBody<'_>], &default_plural_overrides());
    let graph = DependencyGraph::build(edges);

    let hotspots = graph.hotspots(10);
    let names: Vec<&str> = hotspots.iter().map(|h| h.object.fqn.name.as_str()).collect();
    assert!(names.contains(&"Students"));
    assert!(names.contains(&"Courses"));
}
