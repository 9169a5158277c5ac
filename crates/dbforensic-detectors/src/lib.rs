// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # dbforensic-detectors
//!
//! The built-in issue detectors and the weighted health scorer
//! that runs over their combined output. Grounded on the
//! analysis-pass idiom: one independent, pure pass per detector, run
//! sequentially over a shared immutable snapshot and concatenated.

pub mod builtin;
pub mod detector;
pub mod health;
pub mod issue;

pub use builtin::inconsistent_naming::consistency_ratio;
pub use detector::{DetectionContext, Detector, DetectorRegistry};
pub use health::{HealthBand, HealthReport, HealthScorer, HealthWeights};
pub use issue::{Issue, IssueCategory, Severity};
