// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The full analysis dataflow, orchestrated end to end, with cooperative
//! cancellation checkpoints between stages. Grounded on the shape (not
//! the protocol) of `crates/lsp/src/core.rs`'s request-dispatch
//! orchestrator: one facade that drives every pipeline stage in order
//! over borrowed, immutable inputs.

use std::collections::{HashMap, HashSet};

use dbforensic_catalog::{Catalog, Fqn, RoutineKind};
use dbforensic_detectors::{DetectionContext, DetectorRegistry, HealthScorer};
use dbforensic_extractor::{complexity_score, extract, ComplexityScore, ExtractionResult};
use dbforensic_graph::{inference, DependencyGraph, ObjectKind, ObjectRef};

use crate::boundary::RawCatalogSource;
use crate::config::EngineConfig;
use crate::diff_report::DiffReport;
use crate::error::{EngineError, EngineResult};
use crate::report::{AttachedWarning, CatalogSummary, GraphSection, HealthSummary, Report, RoutineStats};

/// Cooperative cancellation: checked between stages, never inside
/// one. A cancelled run returns `Err(EngineError::Cancelled)` before any
/// partial report is built.
pub trait CancellationToken: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// The default token for callers with no cancellation source of their own.
pub struct NeverCancelled;

impl CancellationToken for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

fn checkpoint(cancellation: &dyn CancellationToken, stage: &'static str) -> EngineResult<()> {
    if cancellation.is_cancelled() {
        tracing::warn!(stage, "analysis cancelled");
        return Err(EngineError::Cancelled);
    }
    Ok(())
}

fn routine_object_kind(kind: RoutineKind) -> ObjectKind {
    match kind {
        RoutineKind::Procedure => ObjectKind::Procedure,
        RoutineKind::Function => ObjectKind::Function,
    }
}

/// Orchestrates the full dataflow: catalog → extraction → graph → detectors
/// → health → report (and, for two snapshots, → diff).
pub struct AnalysisEngine {
    config: EngineConfig,
}

/// Precomputed analysis artifacts shared by both `analyze` and `diff`:
/// the extraction result per routine/view body, the complexity score per
/// routine, and the fused dependency graph.
struct Analyzed {
    graph: DependencyGraph,
    extractions: HashMap<ObjectRef, ExtractionResult>,
    complexity: HashMap<Fqn, ComplexityScore>,
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline against one connector-supplied catalog.
    pub async fn analyze(
        &self,
        source: &dyn RawCatalogSource,
        cancellation: &dyn CancellationToken,
    ) -> EngineResult<Report> {
        let tables = source.tables().await?;
        let views = source.views().await?;
        let routines = source.routines().await?;
        let catalog = Catalog::build(tables, views, routines, source.provider(), source.default_schema())?;

        let analyzed = self.analyze_catalog(&catalog)?;
        checkpoint(cancellation, "after extraction")?;
        checkpoint(cancellation, "after graph build")?;

        let registry = DetectorRegistry::with_defaults();
        let ctx = DetectionContext::new(&catalog, &analyzed.graph, &analyzed.extractions, &analyzed.complexity);
        let mut issues = Vec::new();
        for detector in registry.iter() {
            let mut found = detector.detect(&ctx);
            tracing::debug!(detector = detector.name(), issues = found.len(), "detector ran");
            issues.append(&mut found);
            checkpoint(cancellation, "after detector")?;
        }
        issues.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.id.cmp(&b.id)));

        let health_report = HealthScorer::new(self.config.health_weights).score(&ctx, &issues);

        let report = self.assemble_report(&catalog, analyzed, issues, health_report);
        tracing::info!(issues = report.issues.len(), score = report.health.score, "analysis complete");
        Ok(report)
    }

    /// Compare two already-built catalog snapshots. `source` is the
    /// desired schema, `target` is the currently deployed one; risk is
    /// assigned by consulting `target`'s dependency graph.
    pub fn diff(
        &self,
        source: &Catalog,
        target: &Catalog,
        cancellation: &dyn CancellationToken,
    ) -> EngineResult<DiffReport> {
        let target_analyzed = self.analyze_catalog(target)?;
        checkpoint(cancellation, "after graph build")?;

        let change_set = dbforensic_diff::DiffEngine::diff(source, target, &target_analyzed.graph);
        checkpoint(cancellation, "after diff")?;

        Ok(DiffReport {
            source_info: CatalogSummary::from_catalog(source),
            target_info: CatalogSummary::from_catalog(target),
            overall_risk: change_set.summary.overall_risk,
            summary: change_set.summary,
            changes: change_set.changes,
            warnings: change_set.warnings,
        })
    }

    /// Extraction over every routine/view body, then fusion into
    /// one dependency graph. Shared by `analyze` (source catalog)
    /// and `diff` (target catalog, for risk assignment).
    fn analyze_catalog(&self, catalog: &Catalog) -> EngineResult<Analyzed> {
        let known_relations: HashSet<Fqn> = catalog.known_relations().cloned().collect();
        let known_routines: HashSet<Fqn> = catalog.routines().map(|r| r.fqn.clone()).collect();

        let mut extractions: HashMap<ObjectRef, ExtractionResult> = HashMap::new();
        let mut complexity: HashMap<Fqn, ComplexityScore> = HashMap::new();

        for routine in catalog.routines() {
            let result = extract(&routine.body, &catalog.default_schema, &known_relations, &known_routines);
            for warning in &result.warnings {
                tracing::debug!(routine = %routine.fqn, ?warning, "extractor warning");
            }
            complexity.insert(routine.fqn.clone(), complexity_score(&routine.body));
            let kind = routine_object_kind(routine.kind);
            extractions.insert(ObjectRef::new(kind, routine.fqn.clone()), result);
        }
        for view in catalog.views() {
            let result = extract(&view.body, &catalog.default_schema, &known_relations, &known_routines);
            extractions.insert(ObjectRef::view(view.fqn.clone()), result);
        }

        let bodies: Vec<inference::ExtractedBody<'_>> = extractions
            .iter()
            .map(|(object, result)| inference::ExtractedBody { object: object.clone(), result })
            .collect();
        let edges = inference::infer(catalog, &bodies, &self.config.plural_overrides);
        let graph = DependencyGraph::build(edges);

        Ok(Analyzed { graph, extractions, complexity })
    }

    /// Folds the graph, the detector run, and the health score into one
    /// immutable [`Report`]. Every schema object appears in
    /// `graph.nodes` even if it has no edges: `DependencyGraph::edges`
    /// only enumerates connected nodes, so isolated tables/routines are
    /// added back in from the catalog directly.
    fn assemble_report(
        &self,
        catalog: &Catalog,
        analyzed: Analyzed,
        issues: Vec<dbforensic_detectors::Issue>,
        health_report: dbforensic_detectors::HealthReport,
    ) -> Report {
        let Analyzed { graph, extractions, complexity } = analyzed;

        let mut node_set: HashSet<ObjectRef> = HashSet::new();
        for table in catalog.tables() {
            node_set.insert(ObjectRef::table(table.fqn.clone()));
        }
        for view in catalog.views() {
            node_set.insert(ObjectRef::view(view.fqn.clone()));
        }
        for routine in catalog.routines() {
            node_set.insert(ObjectRef::new(routine_object_kind(routine.kind), routine.fqn.clone()));
        }
        let mut nodes: Vec<ObjectRef> = node_set.into_iter().collect();
        nodes.sort_by(|a, b| a.fqn.cmp(&b.fqn));

        let edges: Vec<_> = graph.edges().into_iter().cloned().collect();
        let cycles = graph.cycles();
        let hotspots = graph.hotspots(10);

        let impact_cache: Vec<(ObjectRef, Vec<ObjectRef>)> = nodes
            .iter()
            .map(|object| (object.clone(), graph.impact(object).nodes.into_iter().collect()))
            .collect();

        let mut routine_stats: Vec<RoutineStats> = Vec::new();
        let mut warnings = Vec::new();
        for routine in catalog.routines() {
            let object = ObjectRef::new(routine_object_kind(routine.kind), routine.fqn.clone());
            let (Some(result), Some(score)) = (extractions.get(&object), complexity.get(&routine.fqn)) else {
                continue;
            };
            for warning in &result.warnings {
                warnings.push(AttachedWarning { object: routine.fqn.clone(), warning: warning.clone() });
            }
            routine_stats.push(RoutineStats {
                routine: object,
                complexity: score.total,
                category: score.category,
                referenced_tables: result.referenced.iter().cloned().collect(),
                joins: result.joins.iter().cloned().collect(),
                crud: result.crud.iter().map(|(k, v)| (k.clone(), *v)).collect(),
                called_routines: result.called_routines.iter().cloned().collect(),
                anti_patterns: result.anti_patterns.iter().cloned().collect(),
            });
        }
        routine_stats.sort_by(|a, b| a.routine.fqn.cmp(&b.routine.fqn));
        warnings.sort_by(|a, b| a.object.cmp(&b.object));

        Report {
            catalog_summary: CatalogSummary::from_catalog(catalog),
            health: HealthSummary { score: health_report.score, band: health_report.band },
            issues,
            graph: GraphSection { nodes, edges, cycles, hotspots },
            routine_stats,
            impact_cache,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Column, Provider, Table};

    fn sample_catalog() -> Catalog {
        let students = Table::new(Fqn::new("dbo", "Students"), vec![Column::new("StudentId", 0, "int")])
            .with_primary_key(vec!["StudentId".to_string()]);
        let enrollments = Table::new(
            Fqn::new("dbo", "Enrollments"),
            vec![Column::new("StudentId", 0, "int"), Column::new("ClassId", 1, "int")],
        );
        Catalog::build(vec![students, enrollments], vec![], vec![], Provider::SqlServer, "dbo").unwrap()
    }

    #[tokio::test]
    async fn analyze_produces_a_report_with_nodes_for_every_table() {
        struct Source(Catalog);

        #[async_trait::async_trait]
        impl RawCatalogSource for Source {
            async fn tables(&self) -> EngineResult<Vec<dbforensic_catalog::RawTable>> {
                Ok(self.0.tables().cloned().collect())
            }
            async fn views(&self) -> EngineResult<Vec<dbforensic_catalog::RawView>> {
                Ok(Vec::new())
            }
            async fn routines(&self) -> EngineResult<Vec<dbforensic_catalog::RawRoutine>> {
                Ok(Vec::new())
            }
            fn provider(&self) -> Provider {
                Provider::SqlServer
            }
            fn default_schema(&self) -> String {
                "dbo".to_string()
            }
        }

        let engine = AnalysisEngine::new(EngineConfig::default());
        let report = engine.analyze(&Source(sample_catalog()), &NeverCancelled).await.unwrap();
        assert_eq!(report.graph.nodes.len(), 2);
        assert_eq!(report.catalog_summary.table_count, 2);
    }

    #[test]
    fn diff_of_identical_catalogs_is_empty() {
        let catalog = sample_catalog();
        let engine = AnalysisEngine::new(EngineConfig::default());
        let report = engine.diff(&catalog, &catalog, &NeverCancelled).unwrap();
        assert!(report.is_empty());
    }

    struct AlwaysCancelled;
    impl CancellationToken for AlwaysCancelled {
        fn is_cancelled(&self) -> bool {
            true
        }
    }

    #[test]
    fn diff_honors_cancellation() {
        let catalog = sample_catalog();
        let engine = AnalysisEngine::new(EngineConfig::default());
        let err = engine.diff(&catalog, &catalog, &AlwaysCancelled).unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
    }
}
