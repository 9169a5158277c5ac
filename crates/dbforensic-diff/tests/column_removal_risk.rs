// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Removing a column referenced by two routines and a
//! view bands the `ColumnRemoved` change as `Critical`, independent of
//! the referencing-object count, purely because a view is among them.

use dbforensic_catalog::{Catalog, Column, Fqn, Provider, Routine, RoutineKind, Table, View};
use dbforensic_diff::{Change, DiffEngine};
use dbforensic_graph::{DependencyGraph, Edge, ObjectRef};

fn students_table(with_legacy_code: bool) -> Table {
    let mut columns = vec![Column::new("Id", 0, "int").with_identity(true)];
    if with_legacy_code {
        columns.push(Column::new("LegacyCode", 1, "varchar").with_nullable(true));
    }
    Table::new(Fqn::new("dbo", "Students"), columns)
}

fn search_students() -> Routine {
    Routine::new(
        Fqn::new("dbo", "sp_SearchStudents"),
        RoutineKind::Procedure,
        "SELECT Id, LegacyCode FROM dbo.Students WHERE LegacyCode = @code",
    )
}

fn migrate_legacy_codes() -> Routine {
    Routine::new(
        Fqn::new("dbo", "sp_MigrateLegacyCodes"),
        RoutineKind::Procedure,
        "UPDATE dbo.Students SET LegacyCode = NULL WHERE LegacyCode IS NOT NULL",
    )
}

fn student_overview() -> View {
    View::new(Fqn::new("dbo", "vw_StudentOverview"), "SELECT Id, LegacyCode FROM dbo.Students")
}

#[test]
fn removing_a_column_referenced_by_a_view_is_critical() {
    let target_table = students_table(true);
    let source_table = students_table(false);

    let sp_search = search_students();
    let sp_migrate = migrate_legacy_codes();
    let vw_overview = student_overview();

    let target = Catalog::build(
        vec![target_table],
        vec![vw_overview.clone()],
        vec![sp_search.clone(), sp_migrate.clone()],
        Provider::SqlServer,
        "dbo",
    )
    .unwrap();
    let source = Catalog::build(vec![source_table], vec![], vec![], Provider::SqlServer, "dbo").unwrap();

    let students = ObjectRef::table(Fqn::new("dbo", "Students"));
    let graph = DependencyGraph::build(vec![
        Edge::references(ObjectRef::new(dbforensic_graph::ObjectKind::Procedure, sp_search.fqn.clone()), students.clone(), sp_search.fqn.clone()),
        Edge::references(ObjectRef::new(dbforensic_graph::ObjectKind::Procedure, sp_migrate.fqn.clone()), students.clone(), sp_migrate.fqn.clone()),
        Edge::references(ObjectRef::view(vw_overview.fqn.clone()), students.clone(), vw_overview.fqn.clone()),
    ]);

    let result = DiffEngine::diff(&source, &target, &graph);

    let removal = result
        .changes
        .iter()
        .find(|c| matches!(c, Change::ColumnRemoved { column, .. } if column.name == "LegacyCode"))
        .expect("LegacyCode removal should be detected");

    match removal {
        Change::ColumnRemoved { impact_count, risk, .. } => {
            assert_eq!(*impact_count, 3);
            assert_eq!(*risk, dbforensic_graph::RiskLevel::Critical);
        }
        _ => unreachable!(),
    }
}
