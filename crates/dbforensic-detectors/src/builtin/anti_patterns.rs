// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `AntiPatterns`: any anti-pattern flag set on a routine/view body
//! (`SELECT *`, `NOLOCK`, cursor, dynamic SQL, global temp table).

use crate::detector::{DetectionContext, Detector};
use crate::issue::{Issue, IssueCategory, Severity};

pub struct AntiPatterns;

impl Detector for AntiPatterns {
    fn name(&self) -> &'static str {
        "anti_patterns"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for (obj, result) in ctx.extractions {
            if result.anti_patterns.is_empty() {
                continue;
            }
            let mut names: Vec<String> = result.anti_patterns.iter().map(|p| format!("{p:?}")).collect();
            names.sort();
            issues.push(Issue::new(
                IssueCategory::AntiPatterns,
                Severity::Low,
                obj,
                format!("{} contains anti-patterns: {}", obj.fqn, names.join(", ")),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::{Catalog, Fqn, Provider};
    use dbforensic_extractor::{AntiPattern, ExtractionResult};
    use dbforensic_graph::{DependencyGraph, ObjectKind, ObjectRef};
    use std::collections::HashMap;

    #[test]
    fn flags_body_with_anti_pattern() {
        let catalog = Catalog::build(vec![], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        let graph = DependencyGraph::new();
        let mut result = ExtractionResult::default();
        result.anti_patterns.insert(AntiPattern::SelectStar);
        let mut e = HashMap::new();
        e.insert(ObjectRef::new(ObjectKind::Procedure, Fqn::new("dbo", "sp_Foo")), result);
        let c = HashMap::new();
        let ctx = DetectionContext::new(&catalog, &graph, &e, &c);
        assert_eq!(AntiPatterns.detect(&ctx).len(), 1);
    }
}
