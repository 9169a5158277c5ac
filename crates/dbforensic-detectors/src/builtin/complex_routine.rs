// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `ComplexRoutine`: routine complexity score exceeds 50 (the
//! `Complex` category boundary).

use dbforensic_extractor::ComplexityCategory;
use dbforensic_graph::{ObjectKind, ObjectRef};

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct ComplexRoutine;

impl Detector for ComplexRoutine {
    fn name(&self) -> &'static str {
        "complex_routine"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        ctx.catalog
            .routines()
            .filter_map(|r| {
                let score = ctx.complexity.get(&r.fqn)?;
                if score.category != ComplexityCategory::Complex {
                    return None;
                }
                let kind = match r.kind {
                    dbforensic_catalog::RoutineKind::Procedure => ObjectKind::Procedure,
                    dbforensic_catalog::RoutineKind::Function => ObjectKind::Function,
                };
                Some(Issue::new(
                    IssueCategory::ComplexRoutine,
                    Severity::Medium,
                    &ObjectRef::new(kind, r.fqn.clone()),
                    format!("routine {} has complexity score {:.1}", r.fqn, score.total),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Fqn, Provider, Routine, RoutineKind};
    use dbforensic_extractor::{complexity_score, ExtractionResult};
    use dbforensic_graph::DependencyGraph;
    use std::collections::HashMap;

    #[test]
    fn flags_complex_routine() {
        let mut body = "SELECT 1 FROM A INNER JOIN B ON 1=1 LEFT JOIN C ON 1=1\n".repeat(50);
        body.push_str("DECLARE c CURSOR FOR SELECT 1; EXEC sp_executesql @sql; IF 1=1 BEGIN SELECT 1 END\n");
        let r = Routine::new(Fqn::new("dbo", "sp_Big"), RoutineKind::Procedure, body.clone());
        let catalog = Catalog::build(vec![], vec![], vec![r.clone()], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let e: HashMap<dbforensic_graph::ObjectRef, ExtractionResult> = HashMap::new();
        let mut complexity = HashMap::new();
        complexity.insert(r.fqn.clone(), complexity_score(&body));
        let ctx = DetectionContext::new(&catalog, &graph, &e, &complexity);
        assert_eq!(ComplexRoutine.detect(&ctx).len(), 1);
    }
}
