// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `CircularDependency`: one issue per strongly-connected component
//! reported by [`dbforensic_graph::DependencyGraph::cycles`].

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct CircularDependency;

impl Detector for CircularDependency {
    fn name(&self) -> &'static str {
        "circular_dependency"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        ctx.graph
            .cycles()
            .into_iter()
            .filter_map(|cycle| {
                let first = cycle.first()?.clone();
                let names: Vec<String> = cycle.iter().map(|o| o.fqn.to_string()).collect();
                Some(
                    Issue::new(
                        IssueCategory::CircularDependency,
                        Severity::High,
                        &first,
                        format!("circular dependency among {}", names.join(" -> ")),
                    )
                    .with_affected(cycle),
                )
            })
            .collect()
    }
}
