// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Views.
//!
//! A view's "resolved underlying table references" are a computed
//! artifact of the SQL reference extractor, not stored on the view itself:
//! the catalog stays a pure, immutable snapshot of connector-reported
//! structure. See `dbforensic-extractor` and `dbforensic-graph::inference`
//! for where that analysis actually lives, and `DESIGN.md` for the
//! rationale.

use serde::{Deserialize, Serialize};

use crate::fqn::Fqn;

/// A database view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub fqn: Fqn,
    pub body: String,
}

impl View {
    pub fn new(fqn: Fqn, body: impl Into<String>) -> Self {
        Self {
            fqn,
            body: body.into(),
        }
    }
}
