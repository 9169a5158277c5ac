// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertion helpers for cross-crate tests: a struct of static
//! `panic!`-on-mismatch methods, checking `Report`/`DiffReport`
//! properties instead of parsed SQL nodes.

use dbforensic_detectors::IssueCategory;
use dbforensic_diff::Change;
use dbforensic_graph::ObjectRef;
use dbforensic_report::{DiffReport, Report};

pub struct ReportAssertions;

impl ReportAssertions {
    /// Panics unless `report` carries at least one issue of `category`.
    pub fn assert_has_issue(report: &Report, category: IssueCategory) {
        let found = report.issues.iter().any(|issue| issue.category == category);
        assert!(
            found,
            "expected an issue of category {:?}, found categories: {:?}",
            category,
            report.issues.iter().map(|i| i.category).collect::<Vec<_>>()
        );
    }

    /// Panics if `report` carries any issue of `category`.
    pub fn assert_no_issue(report: &Report, category: IssueCategory) {
        let matches: Vec<_> = report.issues.iter().filter(|i| i.category == category).collect();
        assert!(matches.is_empty(), "expected no {:?} issues, found: {:?}", category, matches);
    }

    /// Panics unless `report.graph` contains a node for `object`.
    pub fn assert_has_node(report: &Report, object: &ObjectRef) {
        assert!(
            report.graph.nodes.contains(object),
            "expected graph to contain node {object}, nodes were: {:?}",
            report.graph.nodes
        );
    }

    /// Panics unless the health score falls within `[low, high]`.
    pub fn assert_score_in_range(report: &Report, low: u8, high: u8) {
        let score = report.health.score;
        assert!(
            (low..=high).contains(&score),
            "expected health score in [{low}, {high}], got {score}"
        );
    }
}

pub struct DiffAssertions;

impl DiffAssertions {
    /// Panics unless `diff` contains a change matching `predicate`.
    pub fn assert_has_change(diff: &DiffReport, predicate: impl Fn(&Change) -> bool) {
        let found = diff.changes.iter().any(predicate);
        assert!(found, "expected a matching change, found: {:?}", diff.changes);
    }

    /// Panics unless `diff` reports no changes at all.
    pub fn assert_empty(diff: &DiffReport) {
        assert!(diff.is_empty(), "expected no changes, found: {:?}", diff.changes);
    }
}
