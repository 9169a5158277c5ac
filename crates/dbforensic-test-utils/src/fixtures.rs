// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Sample catalogs for cross-crate integration tests, built from shared
//! concrete scenarios so every crate's tests exercise the same data
//! rather than each inventing its own toy schema.

use dbforensic_catalog::{
    Catalog, Column, ForeignKey, Fqn, Provider, Routine, RoutineKind, Table, View,
};

/// Scenario A/C: `Students` (PK `StudentId`) and `Enrollments` (FK-less
/// `StudentId` column, naming-implied to `Students`), plus
/// `sp_SearchStudents`, a routine joining the two.
pub fn students_enrollments_catalog() -> Catalog {
    let students = Table::new(
        Fqn::new("dbo", "Students"),
        vec![
            Column::new("StudentId", 0, "int"),
            Column::new("Name", 1, "varchar(100)"),
            Column::new("Active", 2, "bit"),
        ],
    )
    .with_primary_key(vec!["StudentId".to_string()]);

    let enrollments = Table::new(
        Fqn::new("dbo", "Enrollments"),
        vec![
            Column::new("EnrollmentId", 0, "int"),
            Column::new("StudentId", 1, "int"),
            Column::new("ClassId", 2, "int"),
        ],
    )
    .with_primary_key(vec!["EnrollmentId".to_string()]);

    let search_students = Routine::new(
        Fqn::new("dbo", "sp_SearchStudents"),
        RoutineKind::Procedure,
        "SELECT s.Name FROM dbo.Students s \
         INNER JOIN dbo.Enrollments e ON s.StudentId = e.StudentId \
         WHERE s.Active = 1",
    );

    Catalog::build(
        vec![students, enrollments],
        vec![],
        vec![search_students],
        Provider::SqlServer,
        "dbo",
    )
    .expect("fixture catalog must satisfy its own invariants")
}

/// Scenario E's *target* (currently deployed) snapshot: `Students` still
/// carries `LegacyCode`, referenced by two routines and one view.
pub fn catalog_with_legacy_code() -> Catalog {
    let students = Table::new(
        Fqn::new("dbo", "Students"),
        vec![
            Column::new("StudentId", 0, "int"),
            Column::new("Name", 1, "varchar(100)"),
            Column::new("LegacyCode", 2, "varchar(20)"),
        ],
    )
    .with_primary_key(vec!["StudentId".to_string()]);

    let search_students = Routine::new(
        Fqn::new("dbo", "sp_SearchStudents"),
        RoutineKind::Procedure,
        "SELECT Name, LegacyCode FROM dbo.Students WHERE LegacyCode IS NOT NULL",
    );
    let migrate_legacy_codes = Routine::new(
        Fqn::new("dbo", "sp_MigrateLegacyCodes"),
        RoutineKind::Procedure,
        "UPDATE dbo.Students SET LegacyCode = NULL WHERE LegacyCode = ''",
    );
    let overview = View::new(
        Fqn::new("dbo", "vw_StudentOverview"),
        "SELECT StudentId, Name, LegacyCode FROM dbo.Students",
    );

    Catalog::build(
        vec![students],
        vec![overview],
        vec![search_students, migrate_legacy_codes],
        Provider::SqlServer,
        "dbo",
    )
    .expect("fixture catalog must satisfy its own invariants")
}

/// Scenario E's *source* (desired) snapshot: identical except
/// `Students.LegacyCode` has already been dropped. Diffing this against
/// [`catalog_with_legacy_code`] should produce a `Critical`-risk
/// `ColumnRemoved`.
pub fn catalog_without_legacy_code() -> Catalog {
    let students = Table::new(
        Fqn::new("dbo", "Students"),
        vec![Column::new("StudentId", 0, "int"), Column::new("Name", 1, "varchar(100)")],
    )
    .with_primary_key(vec!["StudentId".to_string()]);

    Catalog::build(vec![students], vec![], vec![], Provider::SqlServer, "dbo")
        .expect("fixture catalog must satisfy its own invariants")
}

/// Scenario D: three routines in a calling cycle, `A -> B -> C -> A`.
pub fn circular_routines_catalog() -> Catalog {
    let a = Routine::new(Fqn::new("dbo", "A"), RoutineKind::Procedure, "EXEC dbo.B");
    let b = Routine::new(Fqn::new("dbo", "B"), RoutineKind::Procedure, "EXEC dbo.C");
    let c = Routine::new(Fqn::new("dbo", "C"), RoutineKind::Procedure, "EXEC dbo.A");

    Catalog::build(vec![], vec![], vec![a, b, c], Provider::SqlServer, "dbo")
        .expect("fixture catalog must satisfy its own invariants")
}

/// A table with no primary key, no indexes, and zero rows, exercising
/// `MissingPk` and `EmptyTable` together.
pub fn empty_unkeyed_table_catalog() -> Catalog {
    let staging = Table::new(Fqn::new("dbo", "StagingImport"), vec![Column::new("RawValue", 0, "varchar(max)")]);
    Catalog::build(vec![staging], vec![], vec![], Provider::SqlServer, "dbo")
        .expect("fixture catalog must satisfy its own invariants")
}

/// Two tables joined by an explicit FK, for tests that want a guaranteed
/// `ForeignKey`-origin edge rather than a naming-implied one.
pub fn explicit_fk_catalog() -> Catalog {
    let students = Table::new(Fqn::new("dbo", "Students"), vec![Column::new("StudentId", 0, "int")])
        .with_primary_key(vec!["StudentId".to_string()]);
    let enrollments = Table::new(
        Fqn::new("dbo", "Enrollments"),
        vec![Column::new("EnrollmentId", 0, "int"), Column::new("StudentId", 1, "int")],
    )
    .with_primary_key(vec!["EnrollmentId".to_string()])
    .with_foreign_keys(vec![ForeignKey::new(
        "fk_enrollments_students",
        vec!["StudentId".to_string()],
        Fqn::new("dbo", "Students"),
        vec!["StudentId".to_string()],
    )]);

    Catalog::build(vec![students, enrollments], vec![], vec![], Provider::SqlServer, "dbo")
        .expect("fixture catalog must satisfy its own invariants")
}
