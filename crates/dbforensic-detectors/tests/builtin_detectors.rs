// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end detector runs over small hand-built catalogs, exercising
//! the registry + health scorer together rather than one detector at a
//! time (covered already by each builtin module's unit tests).

use std::collections::HashMap;

use dbforensic_catalog::{Catalog, Column, ForeignKey, Fqn, Provider, Routine, RoutineKind, Table};
use dbforensic_detectors::{DetectionContext, DetectorRegistry, HealthScorer, HealthWeights, IssueCategory, Severity};
use dbforensic_extractor::{complexity_score, extract, ComplexityScore, ExtractionResult};
use dbforensic_graph::{infer, DependencyGraph, ExtractedBody, ObjectKind, ObjectRef};

fn build_scenario() -> Catalog {
    let students = Table::new(
        Fqn::new("dbo", "Students"),
        vec![Column::new("Id", 0, "int"), Column::new("Name", 1, "varchar")],
    )
    .with_primary_key(vec!["Id".to_string()]);

    // No PK, no index on the FK column: should trip MissingPk and MissingFkIndex.
    let enrollments = Table::new(
        Fqn::new("dbo", "Enrollments"),
        vec![Column::new("StudentId", 0, "int"), Column::new("Grade", 1, "varchar")],
    )
    .with_foreign_keys(vec![ForeignKey::new(
        "fk_student",
        vec!["StudentId".to_string()],
        Fqn::new("dbo", "Students"),
        vec!["Id".to_string()],
    )]);

    let stale = Table::new(Fqn::new("dbo", "Stale"), vec![Column::new("Id", 0, "int")]);

    let sp = Routine::new(
        Fqn::new("dbo", "sp_ListStudents"),
        RoutineKind::Procedure,
        "SELECT * FROM dbo.Students",
    );

    Catalog::build(
        vec![students, enrollments, stale],
        vec![],
        vec![sp],
        Provider::SqlServer,
        "dbo",
    )
    .unwrap()
}

fn extractions_and_complexity(catalog: &Catalog) -> (HashMap<ObjectRef, ExtractionResult>, HashMap<Fqn, ComplexityScore>) {
    let known_relations: std::collections::HashSet<Fqn> = catalog.known_relations().cloned().collect();
    let known_routines: std::collections::HashSet<Fqn> = catalog.routines().map(|r| r.fqn.clone()).collect();

    let mut extractions = HashMap::new();
    let mut complexity = HashMap::new();
    for routine in catalog.routines() {
        let result = extract(&routine.body, "dbo", &known_relations, &known_routines);
        complexity.insert(routine.fqn.clone(), complexity_score(&routine.body));
        extractions.insert(
            ObjectRef::new(
                match routine.kind {
                    RoutineKind::Procedure => ObjectKind::Procedure,
                    RoutineKind::Function => ObjectKind::Function,
                },
                routine.fqn.clone(),
            ),
            result,
        );
    }
    (extractions, complexity)
}

#[test]
fn registry_surfaces_missing_pk_and_missing_fk_index() {
    let catalog = build_scenario();
    let (extractions, complexity) = extractions_and_complexity(&catalog);
    let bodies: Vec<ExtractedBody<'_>> = extractions
        .iter()
        .map(|(obj, result)| ExtractedBody { object: obj.clone(), result })
        .collect();
    let edges = infer(&catalog, &bodies, &dbforensic_graph::default_plural_overrides());
    let graph = DependencyGraph::build(edges);

    let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);
    let issues = DetectorRegistry::with_defaults().run(&ctx);

    assert!(issues.iter().any(|i| i.category == IssueCategory::MissingPk));
    assert!(issues.iter().any(|i| i.category == IssueCategory::MissingFkIndex));
    assert!(issues.iter().any(|i| i.category == IssueCategory::DeadTable));
    assert!(issues.iter().any(|i| i.category == IssueCategory::AntiPatterns));

    // Ordering guarantee: severity desc, id asc within a severity band.
    for pair in issues.windows(2) {
        assert!(pair[0].severity >= pair[1].severity);
    }
}

#[test]
fn health_score_drops_with_more_issues() {
    let catalog = build_scenario();
    let (extractions, complexity) = extractions_and_complexity(&catalog);
    let bodies: Vec<ExtractedBody<'_>> = extractions
        .iter()
        .map(|(obj, result)| ExtractedBody { object: obj.clone(), result })
        .collect();
    let edges = infer(&catalog, &bodies, &dbforensic_graph::default_plural_overrides());
    let graph = DependencyGraph::build(edges);

    let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);
    let issues = DetectorRegistry::with_defaults().run(&ctx);
    let report = HealthScorer::new(HealthWeights::default()).score(&ctx, &issues);

    assert!(report.score < 100, "scenario with issues must score below perfect");

    let empty_catalog = Catalog::build(vec![], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
    let empty_graph = DependencyGraph::new();
    let empty_extractions = HashMap::new();
    let empty_complexity = HashMap::new();
    let empty_ctx = DetectionContext::new(&empty_catalog, &empty_graph, &empty_extractions, &empty_complexity);
    let empty_report = HealthScorer::new(HealthWeights::default()).score(&empty_ctx, &[]);

    assert!(report.score < empty_report.score);
    assert_eq!(empty_report.score, 100);
}

#[test]
fn issue_ids_are_stable_across_repeated_runs() {
    let catalog = build_scenario();
    let (extractions, complexity) = extractions_and_complexity(&catalog);
    let bodies: Vec<ExtractedBody<'_>> = extractions
        .iter()
        .map(|(obj, result)| ExtractedBody { object: obj.clone(), result })
        .collect();
    let edges = infer(&catalog, &bodies, &dbforensic_graph::default_plural_overrides());
    let graph = DependencyGraph::build(edges);
    let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);

    let first: Vec<String> = DetectorRegistry::with_defaults().run(&ctx).into_iter().map(|i| i.id).collect();
    let second: Vec<String> = DetectorRegistry::with_defaults().run(&ctx).into_iter().map(|i| i.id).collect();
    assert_eq!(first, second);
}

#[test]
fn severity_ordinal_matches_ordering_used_for_sorting() {
    assert!(Severity::Critical > Severity::High);
    assert!(Severity::High > Severity::Medium);
    assert!(Severity::Medium > Severity::Low);
}
