// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # dbforensic-graph
//!
//! The typed dependency multigraph over schema objects, its
//! builder/relationship-inference pass, Tarjan SCC cycle
//! detection, reverse-reachable impact analysis, and in-degree hotspot
//! ranking.
//!
//! The graph is the sole owner of the `ObjectRef`
//! arena: everything downstream (`dbforensic-detectors`,
//! `dbforensic-diff`) borrows `&DependencyGraph` rather than holding its
//! own copy of the edge set.

pub mod edge;
pub mod graph;
pub mod inference;

pub use edge::{Edge, EdgeKind, EdgeOrigin, ObjectKind, ObjectRef};
pub use graph::{DependencyGraph, Hotspot, ImpactResult, RiskLevel};
pub use inference::{default_plural_overrides, infer, ExtractedBody};
