// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The `Detector` trait and the registry of built-ins, grounded on
//! the analysis-pass idiom (`DagPass` + a pass manager running every pass
//! over one shared context and concatenating diagnostics).

use std::collections::HashMap;

use dbforensic_catalog::{Catalog, Fqn};
use dbforensic_extractor::{ComplexityScore, ExtractionResult};
use dbforensic_graph::{DependencyGraph, ObjectRef};

use crate::issue::Issue;

/// The shared, immutable snapshot every detector runs against: detectors
/// run sequentially over a shared immutable `(Catalog, Graph)` snapshot.
/// `extractions`/`complexity` are precomputed once by the
/// orchestrating engine so no detector re-scans a routine body twice.
pub struct DetectionContext<'a> {
    pub catalog: &'a Catalog,
    pub graph: &'a DependencyGraph,
    pub extractions: &'a HashMap<ObjectRef, ExtractionResult>,
    pub complexity: &'a HashMap<Fqn, ComplexityScore>,
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        catalog: &'a Catalog,
        graph: &'a DependencyGraph,
        extractions: &'a HashMap<ObjectRef, ExtractionResult>,
        complexity: &'a HashMap<Fqn, ComplexityScore>,
    ) -> Self {
        Self {
            catalog,
            graph,
            extractions,
            complexity,
        }
    }
}

/// A pure `(Catalog, Graph) -> Vec<Issue>` pass. Each built-in
/// detector is one implementor; detectors never see each other's output.
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue>;
}

/// Runs every registered detector and concatenates + orders the result:
/// issues ordered `(severity desc, id asc)`.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self { detectors: Vec::new() }
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) -> &mut Self {
        self.detectors.push(detector);
        self
    }

    /// The registry with all twelve built-in detectors registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(Box::new(crate::builtin::missing_pk::MissingPk))
            .register(Box::new(crate::builtin::missing_fk_index::MissingFkIndex))
            .register(Box::new(crate::builtin::unused_index::UnusedIndex))
            .register(Box::new(crate::builtin::duplicate_index::DuplicateIndex))
            .register(Box::new(crate::builtin::dead_table::DeadTable))
            .register(Box::new(crate::builtin::dead_routine::DeadRoutine))
            .register(Box::new(crate::builtin::orphan_column::OrphanColumn))
            .register(Box::new(crate::builtin::empty_table::EmptyTable))
            .register(Box::new(crate::builtin::circular_dependency::CircularDependency))
            .register(Box::new(crate::builtin::complex_routine::ComplexRoutine))
            .register(Box::new(crate::builtin::anti_patterns::AntiPatterns))
            .register(Box::new(crate::builtin::inconsistent_naming::InconsistentNaming));
        registry
    }

    /// The registered detectors in registration order, for callers that
    /// need a checkpoint (e.g. cooperative cancellation) between each
    /// one rather than running the whole registry as a single step.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn run(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut issues: Vec<Issue> = Vec::new();
        for detector in &self.detectors {
            let mut found = detector.detect(ctx);
            tracing::debug!(detector = detector.name(), issues = found.len(), "detector ran");
            issues.append(&mut found);
        }
        issues.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.id.cmp(&b.id)));
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueCategory, Severity};
    use dbforensic_catalog::{Catalog, Provider};
    use dbforensic_graph::ObjectKind;

    struct AlwaysFires;
    impl Detector for AlwaysFires {
        fn name(&self) -> &'static str {
            "always_fires"
        }
        fn detect(&self, _ctx: &DetectionContext<'_>) -> Vec<Issue> {
            vec![Issue::new(
                IssueCategory::MissingPk,
                Severity::Low,
                &ObjectRef::new(ObjectKind::Table, dbforensic_catalog::Fqn::new("dbo", "A")),
                "stub",
            )]
        }
    }

    #[test]
    fn registry_runs_every_registered_detector() {
        let catalog = Catalog::build(vec![], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let extractions = HashMap::new();
        let complexity = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);

        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(AlwaysFires));
        let issues = registry.run(&ctx);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn with_defaults_registers_twelve_detectors() {
        let registry = DetectorRegistry::with_defaults();
        assert_eq!(registry.detectors.len(), 12);
    }

    #[test]
    fn issues_sort_severity_desc_then_id_asc() {
        let catalog = Catalog::build(vec![], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let extractions = HashMap::new();
        let complexity = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &extractions, &complexity);

        struct Mixed;
        impl Detector for Mixed {
            fn name(&self) -> &'static str {
                "mixed"
            }
            fn detect(&self, _ctx: &DetectionContext<'_>) -> Vec<Issue> {
                let a = ObjectRef::new(ObjectKind::Table, dbforensic_catalog::Fqn::new("dbo", "A"));
                let b = ObjectRef::new(ObjectKind::Table, dbforensic_catalog::Fqn::new("dbo", "B"));
                vec![
                    Issue::new(IssueCategory::MissingPk, Severity::Low, &a, "low"),
                    Issue::new(IssueCategory::MissingPk, Severity::Critical, &b, "critical"),
                ]
            }
        }
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(Mixed));
        let issues = registry.run(&ctx);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[1].severity, Severity::Low);
    }
}
