// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The reporter boundary output: the stable, immutable [`Report`] every
//! downstream reporter (console/HTML/Markdown/JSON/SQL, all out of scope
//! for this crate) consumes instead of touching the catalog/graph/detector
//! crates directly.
//!
//! Field names are already `snake_case` and every nested enum already
//! carries `#[serde(rename_all = "snake_case")]` at its definition site,
//! giving a stable schema with lowercase enum values throughout.

use serde::{Deserialize, Serialize};

use dbforensic_catalog::{Catalog, Fqn, Provider};
use dbforensic_detectors::{HealthBand, Issue};
use dbforensic_extractor::{AntiPattern, ComplexityCategory, CrudFlags, ExtractorWarning};
use dbforensic_graph::{Edge, Hotspot, ObjectRef};

/// A coarse summary of one catalog snapshot: the part of a `Catalog` a
/// reporter actually needs to print a header, without handing it the
/// whole frozen snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub provider: Provider,
    pub default_schema: String,
    pub table_count: usize,
    pub view_count: usize,
    pub routine_count: usize,
}

impl CatalogSummary {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            provider: catalog.provider,
            default_schema: catalog.default_schema.clone(),
            table_count: catalog.tables().count(),
            view_count: catalog.views().count(),
            routine_count: catalog.routines().count(),
        }
    }
}

/// The health score plus its band label, bundled for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub score: u8,
    pub band: HealthBand,
}

/// The dependency graph section of a [`Report`] (`graph: {nodes, edges}`),
/// extended with the precomputed cycle and hotspot views the
/// `graph`/`deadcode` CLI commands need. Recomputing them from a bare
/// edge list would mean every reporter re-implements Tarjan SCC and
/// in-degree ranking itself, which defeats the point of handing
/// reporters one frozen, owned graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSection {
    pub nodes: Vec<ObjectRef>,
    pub edges: Vec<Edge>,
    pub cycles: Vec<Vec<ObjectRef>>,
    pub hotspots: Vec<Hotspot>,
}

/// Per-routine computed artifacts: complexity score, referenced tables,
/// join pairs, CRUD map, anti-pattern hits. Views are not scored for
/// complexity (complexity scoring is routine-body-specific) but do get
/// an extraction result, surfaced
/// separately in `Report::view_references`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineStats {
    pub routine: ObjectRef,
    pub complexity: f64,
    pub category: ComplexityCategory,
    pub referenced_tables: Vec<Fqn>,
    pub joins: Vec<(Fqn, Fqn)>,
    /// `(table, crud_flags)` pairs rather than a `HashMap<Fqn, _>`: an
    /// `Fqn` is a two-field struct key and would not round-trip through a
    /// JSON object key the way a string or enum key does.
    pub crud: Vec<(Fqn, CrudFlags)>,
    pub called_routines: Vec<Fqn>,
    pub anti_patterns: Vec<AntiPattern>,
}

/// A non-fatal diagnostic attached to the object it was raised against.
/// Accumulated into the final report; warnings are summarized in the
/// report footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedWarning {
    pub object: Fqn,
    pub warning: ExtractorWarning,
}

/// The immutable bundle a reporter renders ("Report Assembler" output).
/// Owns its graph and issue set exclusively; external consumers only ever
/// borrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub catalog_summary: CatalogSummary,
    pub health: HealthSummary,
    pub issues: Vec<Issue>,
    pub graph: GraphSection,
    pub routine_stats: Vec<RoutineStats>,
    /// Reverse-reachability results precomputed for every node the graph
    /// knows about, so a reporter's `impact --table <name>` never
    /// re-walks the graph. `(object, impacted)` pairs rather than a
    /// `HashMap<ObjectRef, _>`: `ObjectRef` is a struct key and would not
    /// round-trip through a JSON object key the way a string or enum key
    /// does.
    pub impact_cache: Vec<(ObjectRef, Vec<ObjectRef>)>,
    pub warnings: Vec<AttachedWarning>,
}

impl Report {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn impact_of(&self, object: &ObjectRef) -> Option<&[ObjectRef]> {
        self.impact_cache
            .iter()
            .find(|(o, _)| o == object)
            .map(|(_, impacted)| impacted.as_slice())
    }
}
