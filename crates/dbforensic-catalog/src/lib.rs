// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # dbforensic-catalog
//!
//! Immutable database catalog model for the dbforensic analytical core.
//!
//! This crate owns the passive data types for tables, columns,
//! constraints, indexes, views, and routines, plus the connector boundary
//! ([`raw`]) that lets an external database connector hand the core a
//! validated [`Catalog`] snapshot.
//!
//! ## Design
//!
//! Every entity here is immutable once assembled: construction is
//! additive via the builder methods on each type (`Table::new(...).with_primary_key(...)`),
//! mirroring the rest of the pipeline's builder idiom. [`Catalog::build`]
//! is the single point where structural invariants (FK targets exist,
//! constraint columns exist, no duplicate FQNs) are checked; a
//! successfully built `Catalog` can be handed to the extractor, graph,
//! detector, and diff crates without further validation.

pub mod catalog;
pub mod column;
pub mod error;
pub mod fqn;
pub mod raw;
pub mod routine;
pub mod table;
pub mod view;

pub use catalog::{Catalog, Provider};
pub use column::{Column, NormalizedType, TypeKind};
pub use error::{CatalogError, CatalogResult};
pub use fqn::Fqn;
pub use raw::{RawRoutine, RawTable, RawView};
pub use routine::{Parameter, ParameterDirection, Routine, RoutineKind};
pub use table::{CascadeAction, ForeignKey, Index, IndexColumn, SortDirection, Table, UniqueConstraint};
pub use view::View;
