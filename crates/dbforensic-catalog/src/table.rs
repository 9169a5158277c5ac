// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Tables, foreign keys, unique constraints, and indexes.

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{CatalogError, CatalogResult};
use crate::fqn::Fqn;

/// Referential action taken on update/delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum CascadeAction {
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub local_columns: Vec<String>,
    pub referenced_table: Fqn,
    pub referenced_columns: Vec<String>,
    pub on_update: CascadeAction,
    pub on_delete: CascadeAction,
}

impl ForeignKey {
    pub fn new(
        name: impl Into<String>,
        local_columns: Vec<String>,
        referenced_table: Fqn,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            local_columns,
            referenced_table,
            referenced_columns,
            on_update: CascadeAction::NoAction,
            on_delete: CascadeAction::NoAction,
        }
    }

    pub fn with_cascade(mut self, on_update: CascadeAction, on_delete: CascadeAction) -> Self {
        self.on_update = on_update;
        self.on_delete = on_delete;
        self
    }

    /// The local column an FK uses if it is single-column (the common case
    /// for the foreign-key naming heuristic).
    pub fn single_local_column(&self) -> Option<&str> {
        match self.local_columns.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// A unique constraint (distinct from a unique index, though most
/// dialects back one with the other).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<String>,
}

/// Sort direction for an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A single column participating in an index, with its sort direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub direction: SortDirection,
}

/// An index on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<IndexColumn>,
    pub is_unique: bool,
    pub is_clustered: bool,
    pub included_columns: Vec<String>,
    pub filter_predicate: Option<String>,
    /// Absent on PostgreSQL, which does not track per-index last-use timestamps.
    pub last_used: Option<i64>,
    pub usage_seeks: Option<u64>,
    pub usage_scans: Option<u64>,
    pub usage_updates: Option<u64>,
}

impl Index {
    pub fn new(name: impl Into<String>, columns: Vec<IndexColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
            is_unique: false,
            is_clustered: false,
            included_columns: Vec::new(),
            filter_predicate: None,
            last_used: None,
            usage_seeks: None,
            usage_scans: None,
            usage_updates: None,
        }
    }

    pub fn with_unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    pub fn with_clustered(mut self, is_clustered: bool) -> Self {
        self.is_clustered = is_clustered;
        self
    }

    pub fn with_usage(mut self, seeks: u64, scans: u64, updates: u64) -> Self {
        self.usage_seeks = Some(seeks);
        self.usage_scans = Some(scans);
        self.usage_updates = Some(updates);
        self
    }

    /// The leading (first) column of the index, used by `MissingFKIndex`
    /// and `DuplicateIndex` detectors.
    pub fn leading_column(&self) -> Option<&str> {
        self.columns.first().map(|c| c.name.as_str())
    }

    /// Whether index usage stats indicate zero activity over the sampling
    /// window. Returns `false` (never flagged) when stats are absent,
    /// since detectors depending on optional stats skip silently.
    pub fn is_unused(&self) -> bool {
        matches!(
            (self.usage_seeks, self.usage_scans),
            (Some(0), Some(0))
        )
    }
}

/// A database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub fqn: Fqn,
    pub columns: Vec<Column>,
    pub primary_key: Option<Vec<String>>,
    pub foreign_keys: Vec<ForeignKey>,
    pub unique_constraints: Vec<UniqueConstraint>,
    pub indexes: Vec<Index>,
    pub row_count: u64,
    pub size_bytes: Option<u64>,
    /// True for staging/temp tables, exempted from `MissingPK`.
    pub is_staging: bool,
}

impl Table {
    pub fn new(fqn: Fqn, columns: Vec<Column>) -> Self {
        Self {
            fqn,
            columns,
            primary_key: None,
            foreign_keys: Vec::new(),
            unique_constraints: Vec::new(),
            indexes: Vec::new(),
            row_count: 0,
            size_bytes: None,
            is_staging: false,
        }
    }

    pub fn with_primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = Some(columns);
        self
    }

    pub fn with_foreign_keys(mut self, fks: Vec<ForeignKey>) -> Self {
        self.foreign_keys = fks;
        self
    }

    pub fn with_unique_constraints(mut self, uniques: Vec<UniqueConstraint>) -> Self {
        self.unique_constraints = uniques;
        self
    }

    pub fn with_indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_staging(mut self, is_staging: bool) -> Self {
        self.is_staging = is_staging;
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name_eq(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Single-column primary key name, if the PK is exactly one column
    /// (the naming heuristic only matches single-column PKs).
    pub fn single_primary_key_column(&self) -> Option<&str> {
        match self.primary_key.as_deref() {
            Some([only]) => Some(only.as_str()),
            _ => None,
        }
    }

    /// Whether this table already has an explicit FK whose local columns
    /// are exactly `columns` (used to suppress redundant naming-heuristic
    /// edges).
    pub fn has_explicit_fk_on(&self, columns: &[String]) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.local_columns == columns)
    }

    /// Validate the structural invariants for this table: every FK/PK/UQ/index
    /// column must exist on the table. Cross-table invariants (FK target
    /// existence) are validated by the owning [`crate::Catalog`].
    pub(crate) fn validate_local(&self) -> CatalogResult<()> {
        if let Some(pk) = &self.primary_key {
            for col in pk {
                if !self.has_column(col) {
                    return Err(CatalogError::UnknownConstraintColumn {
                        table: self.fqn.clone(),
                        constraint_kind: "primary key",
                        constraint_name: format!("PK_{}", self.fqn.name),
                        column: col.clone(),
                    });
                }
            }
        }
        for uq in &self.unique_constraints {
            for col in &uq.columns {
                if !self.has_column(col) {
                    return Err(CatalogError::UnknownConstraintColumn {
                        table: self.fqn.clone(),
                        constraint_kind: "unique constraint",
                        constraint_name: uq.name.clone(),
                        column: col.clone(),
                    });
                }
            }
        }
        for fk in &self.foreign_keys {
            for col in &fk.local_columns {
                if !self.has_column(col) {
                    return Err(CatalogError::UnknownForeignKeyColumn {
                        table: self.fqn.clone(),
                        fk_name: fk.name.clone(),
                        column: col.clone(),
                    });
                }
            }
            if fk.local_columns.len() != fk.referenced_columns.len() {
                return Err(CatalogError::ForeignKeyColumnCountMismatch {
                    table: self.fqn.clone(),
                    fk_name: fk.name.clone(),
                    local_count: fk.local_columns.len(),
                    referenced_count: fk.referenced_columns.len(),
                });
            }
        }
        for idx in &self.indexes {
            for col in &idx.columns {
                if !self.has_column(&col.name) {
                    return Err(CatalogError::UnknownIndexColumn {
                        table: self.fqn.clone(),
                        index_name: idx.name.clone(),
                        column: col.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_columns(names: &[&str]) -> Table {
        let cols: Vec<Column> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::new(*n, i as u32, "int"))
            .collect();
        Table::new(Fqn::new("dbo", "T"), cols)
    }

    #[test]
    fn rejects_fk_on_unknown_local_column() {
        let table = table_with_columns(&["id"]).with_foreign_keys(vec![ForeignKey::new(
            "fk1",
            vec!["missing".to_string()],
            Fqn::new("dbo", "Other"),
            vec!["id".to_string()],
        )]);
        assert!(table.validate_local().is_err());
    }

    #[test]
    fn accepts_valid_fk() {
        let table = table_with_columns(&["id", "other_id"]).with_foreign_keys(vec![ForeignKey::new(
            "fk1",
            vec!["other_id".to_string()],
            Fqn::new("dbo", "Other"),
            vec!["id".to_string()],
        )]);
        assert!(table.validate_local().is_ok());
    }

    #[test]
    fn rejects_column_count_mismatch() {
        let table = table_with_columns(&["a", "b"]).with_foreign_keys(vec![ForeignKey::new(
            "fk1",
            vec!["a".to_string(), "b".to_string()],
            Fqn::new("dbo", "Other"),
            vec!["id".to_string()],
        )]);
        assert!(matches!(
            table.validate_local(),
            Err(CatalogError::ForeignKeyColumnCountMismatch { .. })
        ));
    }

    #[test]
    fn index_unused_requires_both_stats_present_and_zero() {
        let idx = Index::new("ix", vec![IndexColumn { name: "a".into(), direction: SortDirection::Asc }]);
        assert!(!idx.is_unused(), "absent stats must not be flagged");
        let idx = idx.with_usage(0, 0, 0);
        assert!(idx.is_unused());
    }
}
