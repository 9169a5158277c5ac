// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `DeadRoutine`: a routine nothing calls, directly or via a view.

use dbforensic_graph::ObjectRef;

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct DeadRoutine;

impl Detector for DeadRoutine {
    fn name(&self) -> &'static str {
        "dead_routine"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        ctx.catalog
            .routines()
            .map(|r| {
                let kind = match r.kind {
                    dbforensic_catalog::RoutineKind::Procedure => dbforensic_graph::ObjectKind::Procedure,
                    dbforensic_catalog::RoutineKind::Function => dbforensic_graph::ObjectKind::Function,
                };
                ObjectRef::new(kind, r.fqn.clone())
            })
            .filter(|obj| ctx.graph.neighbors_in(obj).is_empty())
            .map(|obj| {
                Issue::new(
                    IssueCategory::DeadRoutine,
                    Severity::Medium,
                    &obj,
                    format!("routine {} is never called", obj.fqn),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Fqn, Provider, Routine, RoutineKind};
    use dbforensic_graph::{infer, DependencyGraph, ExtractedBody};
    use std::collections::HashMap;

    #[test]
    fn flags_uncalled_routine() {
        let r = Routine::new(Fqn::new("dbo", "sp_Unused"), RoutineKind::Procedure, "SELECT 1");
        let catalog = Catalog::build(vec![], vec![], vec![r], Provider::SqlServer, "dbo").unwrap();
        let edges = infer(&catalog, &[] as &[ExtractedBody<'_>], &Default::default());
        let graph = DependencyGraph::build(edges);
        let e = HashMap::new();
        let c = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &e, &c);
        assert_eq!(DeadRoutine.detect(&ctx).len(), 1);
    }
}
