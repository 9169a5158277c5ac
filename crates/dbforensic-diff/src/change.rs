// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The `Change` record the diff engine emits, and the rolled-up
//! `ChangeSet`/`ChangeSummary` a `DiffReport` carries.

use serde::{Deserialize, Serialize};

use dbforensic_catalog::{Column, ForeignKey, Fqn, Index};
use dbforensic_graph::RiskLevel;

/// How a column's normalized type differs, once a `ColumnModified(Type)`
/// change has already been established ("widening / narrowing / kind_change"
/// classification). `Ambiguous` is the diff-mismatch-warning case: the engine
/// could not confidently classify the change and flags it for manual review
/// rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeChangeClassification {
    Widening,
    Narrowing,
    KindChange,
    Ambiguous,
}

/// The specific field of a column that changed, for `ColumnModified`
/// (type, nullability, and identity are the dimensions this variant
/// covers; default-expression changes get their own `DefaultChanged`
/// variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum ColumnModification {
    Type {
        before: String,
        after: String,
        classification: TypeChangeClassification,
    },
    Nullability {
        before: bool,
        after: bool,
    },
    Identity {
        before: bool,
        after: bool,
    },
}

/// One structural difference between two catalog snapshots, each already
/// carrying the risk the diff engine assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    TableAdded {
        table: Fqn,
        risk: RiskLevel,
    },
    TableRemoved {
        table: Fqn,
        risk: RiskLevel,
    },
    ColumnAdded {
        table: Fqn,
        column: Column,
        risk: RiskLevel,
    },
    ColumnRemoved {
        table: Fqn,
        column: Column,
        impact_count: usize,
        risk: RiskLevel,
    },
    ColumnModified {
        table: Fqn,
        column: String,
        modification: ColumnModification,
        risk: RiskLevel,
    },
    DefaultChanged {
        table: Fqn,
        column: String,
        before: Option<String>,
        after: Option<String>,
        risk: RiskLevel,
    },
    IndexAdded {
        table: Fqn,
        index: Index,
        risk: RiskLevel,
    },
    IndexRemoved {
        table: Fqn,
        index: Index,
        risk: RiskLevel,
    },
    ForeignKeyAdded {
        table: Fqn,
        foreign_key: ForeignKey,
        /// The orphan-row check hint: the predicate a migration step should
        /// run before enforcing the constraint. The core never executes it
        /// (no DDL execution is ever performed by this crate).
        orphan_check_predicate: String,
        risk: RiskLevel,
    },
    ForeignKeyRemoved {
        table: Fqn,
        foreign_key: ForeignKey,
        risk: RiskLevel,
    },
    RoutineAdded {
        routine: Fqn,
        risk: RiskLevel,
    },
    RoutineRemoved {
        routine: Fqn,
        impact_count: usize,
        risk: RiskLevel,
    },
    RoutineBodyChanged {
        routine: Fqn,
        risk: RiskLevel,
    },
    ViewAdded {
        view: Fqn,
        risk: RiskLevel,
    },
    ViewRemoved {
        view: Fqn,
        impact_count: usize,
        risk: RiskLevel,
    },
    ViewBodyChanged {
        view: Fqn,
        risk: RiskLevel,
    },
}

impl Change {
    pub fn risk(&self) -> RiskLevel {
        match self {
            Change::TableAdded { risk, .. }
            | Change::TableRemoved { risk, .. }
            | Change::ColumnAdded { risk, .. }
            | Change::ColumnRemoved { risk, .. }
            | Change::ColumnModified { risk, .. }
            | Change::DefaultChanged { risk, .. }
            | Change::IndexAdded { risk, .. }
            | Change::IndexRemoved { risk, .. }
            | Change::ForeignKeyAdded { risk, .. }
            | Change::ForeignKeyRemoved { risk, .. }
            | Change::RoutineAdded { risk, .. }
            | Change::RoutineRemoved { risk, .. }
            | Change::RoutineBodyChanged { risk, .. }
            | Change::ViewAdded { risk, .. }
            | Change::ViewRemoved { risk, .. }
            | Change::ViewBodyChanged { risk, .. } => *risk,
        }
    }

    /// The migration-script step this change belongs to: new tables, new
    /// columns, modified columns, new indexes, new foreign keys, routine/view
    /// changes, removed indexes, removed columns, in that order. Changes
    /// with no named step (`TableRemoved`, `ForeignKeyRemoved`) sort after
    /// every named step since dropping a table or a constraint is the most
    /// disruptive class of change a migration script can contain (see
    /// DESIGN.md open-question log).
    fn step_rank(&self) -> u8 {
        match self {
            Change::TableAdded { .. } => 1,
            Change::ColumnAdded { .. } => 2,
            Change::ColumnModified { .. } | Change::DefaultChanged { .. } => 3,
            Change::IndexAdded { .. } => 4,
            Change::ForeignKeyAdded { .. } => 5,
            Change::RoutineAdded { .. }
            | Change::RoutineRemoved { .. }
            | Change::RoutineBodyChanged { .. }
            | Change::ViewAdded { .. }
            | Change::ViewRemoved { .. }
            | Change::ViewBodyChanged { .. } => 6,
            Change::IndexRemoved { .. } => 7,
            Change::ColumnRemoved { .. } => 8,
            Change::ForeignKeyRemoved { .. } => 9,
            Change::TableRemoved { .. } => 10,
        }
    }

    /// The object this change is primarily about, for the tie-break half
    /// of the determinism guarantee.
    fn object_key(&self) -> (&Fqn, &str) {
        match self {
            Change::TableAdded { table, .. }
            | Change::TableRemoved { table, .. }
            | Change::ColumnAdded { table, .. }
            | Change::IndexAdded { table, .. }
            | Change::IndexRemoved { table, .. }
            | Change::ForeignKeyAdded { table, .. }
            | Change::ForeignKeyRemoved { table, .. } => (table, ""),
            Change::ColumnRemoved { table, column, .. } => (table, column.name.as_str()),
            Change::ColumnModified { table, column, .. } => (table, column.as_str()),
            Change::DefaultChanged { table, column, .. } => (table, column.as_str()),
            Change::RoutineAdded { routine, .. }
            | Change::RoutineRemoved { routine, .. }
            | Change::RoutineBodyChanged { routine, .. } => (routine, ""),
            Change::ViewAdded { view, .. }
            | Change::ViewRemoved { view, .. }
            | Change::ViewBodyChanged { view, .. } => (view, ""),
        }
    }

    /// `(step_rank, object_fqn, field)`, the canonical ordering key.
    pub fn sort_key(&self) -> (u8, &Fqn, &str) {
        let (fqn, field) = self.object_key();
        (self.step_rank(), fqn, field)
    }
}

/// Added/removed/modified tally for one object category, used by
/// [`ChangeSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

/// Per-category change counts plus the overall risk (the max risk across
/// all changes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub tables: ActionCounts,
    pub views: ActionCounts,
    pub routines: ActionCounts,
    pub columns: ActionCounts,
    pub indexes: ActionCounts,
    pub foreign_keys: ActionCounts,
    pub overall_risk: RiskLevel,
}

impl ChangeSummary {
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut summary = ChangeSummary::default();
        for change in changes {
            match change {
                Change::TableAdded { .. } => summary.tables.added += 1,
                Change::TableRemoved { .. } => summary.tables.removed += 1,
                Change::ColumnAdded { .. } => summary.columns.added += 1,
                Change::ColumnRemoved { .. } => summary.columns.removed += 1,
                Change::ColumnModified { .. } | Change::DefaultChanged { .. } => summary.columns.modified += 1,
                Change::IndexAdded { .. } => summary.indexes.added += 1,
                Change::IndexRemoved { .. } => summary.indexes.removed += 1,
                Change::ForeignKeyAdded { .. } => summary.foreign_keys.added += 1,
                Change::ForeignKeyRemoved { .. } => summary.foreign_keys.removed += 1,
                Change::RoutineAdded { .. } => summary.routines.added += 1,
                Change::RoutineRemoved { .. } => summary.routines.removed += 1,
                Change::RoutineBodyChanged { .. } => summary.routines.modified += 1,
                Change::ViewAdded { .. } => summary.views.added += 1,
                Change::ViewRemoved { .. } => summary.views.removed += 1,
                Change::ViewBodyChanged { .. } => summary.views.modified += 1,
            }
            summary.overall_risk = summary.overall_risk.max(change.risk());
        }
        summary
    }
}

/// Non-fatal diagnostics accumulated while diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffWarning {
    /// A type change could not be confidently classified widening vs.
    /// narrowing; the `ColumnModified` change is still emitted with
    /// [`TypeChangeClassification::Ambiguous`].
    AmbiguousTypeChange { table: Fqn, column: String },
}

/// The full output of one diff run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<Change>,
    pub summary: ChangeSummary,
    pub warnings: Vec<DiffWarning>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_tracks_max_risk() {
        let changes = vec![
            Change::TableAdded {
                table: Fqn::new("dbo", "A"),
                risk: RiskLevel::None,
            },
            Change::TableRemoved {
                table: Fqn::new("dbo", "B"),
                risk: RiskLevel::Critical,
            },
        ];
        let summary = ChangeSummary::from_changes(&changes);
        assert_eq!(summary.overall_risk, RiskLevel::Critical);
        assert_eq!(summary.tables.added, 1);
        assert_eq!(summary.tables.removed, 1);
    }

    #[test]
    fn step_rank_orders_additive_before_destructive() {
        let added = Change::TableAdded { table: Fqn::new("dbo", "A"), risk: RiskLevel::None };
        let removed = Change::TableRemoved { table: Fqn::new("dbo", "A"), risk: RiskLevel::Critical };
        assert!(added.sort_key().0 < removed.sort_key().0);
    }
}
