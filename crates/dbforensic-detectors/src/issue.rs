// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The `Issue` record detectors emit, and the severity ordinal used both
//! to rank issues and to weight the health scorer.

use serde::{Deserialize, Serialize};

use dbforensic_graph::ObjectRef;

/// `Low < Medium < High < Critical`, so issues sort severity-descending
/// with a plain `.rev()` or `Reverse` wrapper, per the ordering guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Which built-in detector produced an issue, one variant per detector.
/// Doubles as the stable `detector_name` half of `Issue::id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    MissingPk,
    MissingFkIndex,
    UnusedIndex,
    DuplicateIndex,
    DeadTable,
    DeadRoutine,
    OrphanColumn,
    EmptyTable,
    CircularDependency,
    ComplexRoutine,
    AntiPatterns,
    InconsistentNaming,
}

impl IssueCategory {
    pub fn detector_name(self) -> &'static str {
        match self {
            IssueCategory::MissingPk => "missing_pk",
            IssueCategory::MissingFkIndex => "missing_fk_index",
            IssueCategory::UnusedIndex => "unused_index",
            IssueCategory::DuplicateIndex => "duplicate_index",
            IssueCategory::DeadTable => "dead_table",
            IssueCategory::DeadRoutine => "dead_routine",
            IssueCategory::OrphanColumn => "orphan_column",
            IssueCategory::EmptyTable => "empty_table",
            IssueCategory::CircularDependency => "circular_dependency",
            IssueCategory::ComplexRoutine => "complex_routine",
            IssueCategory::AntiPatterns => "anti_patterns",
            IssueCategory::InconsistentNaming => "inconsistent_naming",
        }
    }
}

/// One finding against a catalog + graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable across runs: `"{detector_name}:{primary_affected}"`,
    /// so two reports over unchanged input diff to nothing.
    pub id: String,
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    pub affected: Vec<ObjectRef>,
    pub remediation_sql: Option<String>,
}

impl Issue {
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        primary_affected: &ObjectRef,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}:{}", category.detector_name(), primary_affected.fqn),
            severity,
            category,
            message: message.into(),
            affected: vec![primary_affected.clone()],
            remediation_sql: None,
        }
    }

    pub fn with_affected(mut self, affected: Vec<ObjectRef>) -> Self {
        self.affected = affected;
        self
    }

    pub fn with_remediation_sql(mut self, sql: impl Into<String>) -> Self {
        self.remediation_sql = Some(sql.into());
        self
    }
}
