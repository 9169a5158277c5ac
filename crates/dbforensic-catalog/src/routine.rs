// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Stored procedures and functions.

use serde::{Deserialize, Serialize};

use crate::column::NormalizedType;
use crate::fqn::Fqn;

/// Whether a routine is a stored procedure or a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    Procedure,
    Function,
}

/// A routine parameter (name + declared type; direction is SQL Server-only
/// and defaults to `In` for dialects without OUT parameters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub raw_type: String,
    pub normalized_type: NormalizedType,
    pub direction: ParameterDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
}

impl Parameter {
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        let normalized_type = NormalizedType::parse(&raw_type);
        Self {
            name: name.into(),
            raw_type,
            normalized_type,
            direction: ParameterDirection::In,
        }
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// A stored procedure or function. Computed artifacts (complexity score,
/// referenced tables, join pairs, CRUD map, anti-pattern hits) are
/// deliberately not fields here: they are pure functions of `body`
/// produced by `dbforensic-extractor` / `dbforensic-graph`, keeping the
/// catalog a frozen, side-effect-free snapshot of connector-reported
/// structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub fqn: Fqn,
    pub kind: RoutineKind,
    pub body: String,
    pub parameters: Vec<Parameter>,
}

impl Routine {
    pub fn new(fqn: Fqn, kind: RoutineKind, body: impl Into<String>) -> Self {
        Self {
            fqn,
            kind,
            body: body.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }
}
