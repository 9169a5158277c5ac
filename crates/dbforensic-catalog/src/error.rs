// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for catalog construction.

use thiserror::Error;

use crate::fqn::Fqn;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while assembling an immutable [`crate::Catalog`]
/// from raw connector input. These are the core's `CatalogIntegrityError`
/// (fatal, per the error taxonomy), never originated by a connector, only
/// by the builder validating structural invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// A foreign key column does not exist on its own table.
    #[error("foreign key '{fk_name}' on {table} references unknown local column '{column}'")]
    UnknownForeignKeyColumn {
        table: Fqn,
        fk_name: String,
        column: String,
    },

    /// A foreign key targets a table that doesn't exist in the catalog.
    #[error("foreign key '{fk_name}' on {table} references unknown table {referenced}")]
    UnknownForeignKeyTarget {
        table: Fqn,
        fk_name: String,
        referenced: Fqn,
    },

    /// A foreign key targets a column that doesn't exist on the referenced table.
    #[error("foreign key '{fk_name}' on {table} references unknown column '{column}' on {referenced}")]
    UnknownForeignKeyReferencedColumn {
        table: Fqn,
        fk_name: String,
        referenced: Fqn,
        column: String,
    },

    /// A foreign key's local/referenced column counts do not match.
    #[error("foreign key '{fk_name}' on {table} has {local_count} local column(s) but {referenced_count} referenced column(s)")]
    ForeignKeyColumnCountMismatch {
        table: Fqn,
        fk_name: String,
        local_count: usize,
        referenced_count: usize,
    },

    /// A primary key or unique constraint names a column absent from the table.
    #[error("{constraint_kind} '{constraint_name}' on {table} references unknown column '{column}'")]
    UnknownConstraintColumn {
        table: Fqn,
        constraint_kind: &'static str,
        constraint_name: String,
        column: String,
    },

    /// An index names a column absent from the table.
    #[error("index '{index_name}' on {table} references unknown column '{column}'")]
    UnknownIndexColumn {
        table: Fqn,
        index_name: String,
        column: String,
    },

    /// The same FQN appears twice within one object collection (tables, views, or routines).
    #[error("duplicate {kind} {fqn}")]
    DuplicateObject { kind: &'static str, fqn: Fqn },
}
