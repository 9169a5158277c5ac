// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # dbforensic-diff
//!
//! Structural two-snapshot diff engine: compares a desired
//! `Catalog` against a currently-deployed one, table by table, then
//! index/FK by index/FK, then routine/view body, assigning risk to each
//! change by consulting the deployed snapshot's dependency graph.

pub mod change;
pub mod engine;
pub mod risk;

pub use change::{
    ActionCounts, Change, ChangeSet, ChangeSummary, ColumnModification, DiffWarning,
    TypeChangeClassification,
};
pub use engine::DiffEngine;
