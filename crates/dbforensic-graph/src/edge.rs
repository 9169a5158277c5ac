// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Typed nodes and edges of the dependency graph.

use serde::{Deserialize, Serialize};

use dbforensic_catalog::Fqn;

/// The kind of schema object a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Table,
    View,
    Procedure,
    Function,
}

/// `(ObjectKind, FQN)`, the node identity for the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub fqn: Fqn,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, fqn: Fqn) -> Self {
        Self { kind, fqn }
    }

    pub fn table(fqn: Fqn) -> Self {
        Self::new(ObjectKind::Table, fqn)
    }

    pub fn view(fqn: Fqn) -> Self {
        Self::new(ObjectKind::View, fqn)
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self.kind, self.fqn)
    }
}

/// The semantic relationship an edge expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    ForeignKey,
    Joins,
    References,
    Calls,
    NamingImplied,
}

/// Where an edge was derived from. Determines its confidence score,
/// except `NamingHeuristic`, which the builder may raise from 60 to 95
/// for an exact, singular-form name match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrigin {
    CatalogFK,
    BodyJoin,
    BodyReference,
    BodyCall,
    NamingHeuristic,
}

impl EdgeOrigin {
    /// The confidence fixed by origin. For
    /// `NamingHeuristic` this is the *base* (60); callers raise it to 95
    /// for an exact/singular match via [`Edge::naming_implied`].
    pub fn base_confidence(self) -> u8 {
        match self {
            EdgeOrigin::CatalogFK => 100,
            EdgeOrigin::BodyJoin => 80,
            EdgeOrigin::BodyReference => 70,
            EdgeOrigin::BodyCall => 90,
            EdgeOrigin::NamingHeuristic => 60,
        }
    }
}

/// One edge of the dependency multigraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: ObjectRef,
    pub target: ObjectRef,
    pub kind: EdgeKind,
    pub confidence: u8,
    pub origin: EdgeOrigin,
    /// The routine a `BodyJoin`/`BodyReference`/`BodyCall` edge was
    /// derived from, for provenance display.
    pub origin_routine: Option<Fqn>,
}

impl Edge {
    pub fn foreign_key(source: ObjectRef, target: ObjectRef) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::ForeignKey,
            confidence: EdgeOrigin::CatalogFK.base_confidence(),
            origin: EdgeOrigin::CatalogFK,
            origin_routine: None,
        }
    }

    pub fn joins(source: ObjectRef, target: ObjectRef, routine: Fqn) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::Joins,
            confidence: EdgeOrigin::BodyJoin.base_confidence(),
            origin: EdgeOrigin::BodyJoin,
            origin_routine: Some(routine),
        }
    }

    pub fn references(source: ObjectRef, target: ObjectRef, routine: Fqn) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::References,
            confidence: EdgeOrigin::BodyReference.base_confidence(),
            origin: EdgeOrigin::BodyReference,
            origin_routine: Some(routine),
        }
    }

    pub fn calls(source: ObjectRef, target: ObjectRef) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::Calls,
            confidence: EdgeOrigin::BodyCall.base_confidence(),
            origin: EdgeOrigin::BodyCall,
            origin_routine: None,
        }
    }

    pub fn naming_implied(source: ObjectRef, target: ObjectRef, exact_singular_match: bool) -> Self {
        let confidence = if exact_singular_match { 95 } else { EdgeOrigin::NamingHeuristic.base_confidence() };
        Self {
            source,
            target,
            kind: EdgeKind::NamingImplied,
            confidence,
            origin: EdgeOrigin::NamingHeuristic,
            origin_routine: None,
        }
    }

    /// The sort key for the ordering guarantee: `(source, target, origin)`.
    pub fn sort_key(&self) -> (&Fqn, &Fqn, u8) {
        (&self.source.fqn, &self.target.fqn, self.origin as u8)
    }
}
