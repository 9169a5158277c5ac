// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Connector boundary.
//!
//! A connector is an external collaborator (out of scope for this crate:
//! it issues the actual database queries) that must hand the core a
//! `Vec<RawTable>` / `Vec<RawView>` / `Vec<RawRoutine>`, each carrying
//! exactly the fields the catalog model enumerates. Those shapes are
//! identical to the core's own frozen [`crate::Table`] / [`crate::View`] /
//! [`crate::Routine`]: the connector constructs them with the same
//! builders, so the raw types are aliases rather than a parallel struct
//! family. [`crate::Catalog::build`] is the one function that consumes
//! them and performs the validation a connector is not trusted to have
//! done itself.
//!
//! Row counts and index usage statistics are `Option`/default-zero on the
//! underlying types; detectors that depend on them (`UnusedIndex`,
//! `EmptyTable`) skip silently when a connector omitted them.

use crate::routine::Routine;
use crate::table::Table;
use crate::view::View;

pub type RawTable = Table;
pub type RawView = View;
pub type RawRoutine = Routine;
