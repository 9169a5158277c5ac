// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The weighted penalty/bonus health score, clamped to `[0, 100]`.

use serde::{Deserialize, Serialize};

use dbforensic_graph::EdgeKind;

use crate::builtin::inconsistent_naming::consistency_ratio;
use crate::detector::DetectionContext;
use crate::issue::{Issue, IssueCategory};

/// Band label assigned from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => HealthBand::Critical,
            40..=59 => HealthBand::Poor,
            60..=74 => HealthBand::Fair,
            75..=89 => HealthBand::Good,
            _ => HealthBand::Excellent,
        }
    }
}

/// The per-category penalty weights, overridable at construction so
/// a caller can tune scoring without forking the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    pub missing_pk: f64,
    pub missing_fk_index: f64,
    pub dead_routine: f64,
    pub circular_dependency: f64,
    pub complex_routine: f64,
    pub duplicate_index: f64,
    pub anti_patterns: f64,
    pub dead_table: f64,
    pub good_fk_coverage_threshold: f64,
    pub good_fk_coverage_bonus: f64,
    pub naming_consistency_threshold: f64,
    pub naming_consistency_bonus: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            missing_pk: 5.0,
            missing_fk_index: 2.0,
            dead_routine: 1.0,
            circular_dependency: 10.0,
            complex_routine: 2.0,
            duplicate_index: 1.0,
            anti_patterns: 0.5,
            dead_table: 2.0,
            good_fk_coverage_threshold: 0.8,
            good_fk_coverage_bonus: 5.0,
            naming_consistency_threshold: 0.9,
            naming_consistency_bonus: 3.0,
        }
    }
}

/// The integer score plus its band label and the raw penalty/bonus
/// breakdown, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: u8,
    pub band: HealthBand,
    pub penalty: f64,
    pub bonus: f64,
}

/// Weighted aggregator over a detector run's `Vec<Issue>` plus two catalog
/// ratios no single detector exposes on its own (the bonus inputs).
pub struct HealthScorer {
    weights: HealthWeights,
}

impl HealthScorer {
    pub fn new(weights: HealthWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, ctx: &DetectionContext<'_>, issues: &[Issue]) -> HealthReport {
        let w = &self.weights;
        let count = |cat: IssueCategory| issues.iter().filter(|i| i.category == cat).count() as f64;

        let penalty = count(IssueCategory::MissingPk) * w.missing_pk
            + count(IssueCategory::MissingFkIndex) * w.missing_fk_index
            + count(IssueCategory::DeadRoutine) * w.dead_routine
            + count(IssueCategory::CircularDependency) * w.circular_dependency
            + count(IssueCategory::ComplexRoutine) * w.complex_routine
            + count(IssueCategory::DuplicateIndex) * w.duplicate_index
            + count(IssueCategory::AntiPatterns) * w.anti_patterns
            + count(IssueCategory::DeadTable) * w.dead_table;

        let mut bonus = 0.0;
        if let Some(ratio) = fk_coverage_ratio(ctx) {
            if ratio >= w.good_fk_coverage_threshold {
                bonus += w.good_fk_coverage_bonus;
            }
        }
        if consistency_ratio(ctx.catalog) >= w.naming_consistency_threshold {
            bonus += w.naming_consistency_bonus;
        }

        let raw = 100.0 + bonus - penalty;
        let score = raw.round().clamp(0.0, 100.0) as u8;

        HealthReport {
            score,
            band: HealthBand::from_score(score),
            penalty,
            bonus,
        }
    }
}

/// `fks_defined / expected_fks_from_naming`: every `ForeignKey`
/// edge is a defined FK; every `NamingImplied` edge is a case the naming
/// heuristic expected one but none was declared, so the two kinds
/// together are the denominator. `None` when there is nothing to divide
/// by (no FK-shaped relationships at all).
fn fk_coverage_ratio(ctx: &DetectionContext<'_>) -> Option<f64> {
    let edges = ctx.graph.edges();
    let defined = edges.iter().filter(|e| e.kind == EdgeKind::ForeignKey).count();
    let implied = edges.iter().filter(|e| e.kind == EdgeKind::NamingImplied).count();
    let expected = defined + implied;
    if expected == 0 {
        None
    } else {
        Some(defined as f64 / expected as f64)
    }
}
