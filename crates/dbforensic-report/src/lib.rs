// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # dbforensic-report
//!
//! The orchestrating analysis engine ("Report Assembler") plus the
//! narrow boundary types external collaborators implement against:
//! a [`boundary::RawCatalogSource`] a connector must satisfy, and the
//! [`report::Report`] / [`diff_report::DiffReport`] a reporter consumes.
//!
//! This crate owns no analysis logic of its own: every stage it calls
//! lives in `dbforensic-catalog`/`-extractor`/`-graph`/`-detectors`/
//! `-diff`. [`engine::AnalysisEngine`] only sequences those stages in
//! order and inserts cancellation checkpoints between them.

pub mod boundary;
pub mod config;
pub mod diff_report;
pub mod engine;
pub mod error;
pub mod report;

pub use boundary::RawCatalogSource;
pub use config::EngineConfig;
pub use diff_report::DiffReport;
pub use engine::{AnalysisEngine, CancellationToken, NeverCancelled};
pub use error::{EngineError, EngineResult};
pub use report::{AttachedWarning, CatalogSummary, GraphSection, HealthSummary, Report, RoutineStats};
