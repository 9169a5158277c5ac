// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The connector boundary: the input contract a connector must satisfy
//! to hand the engine a catalog it can build and analyze.

use dbforensic_catalog::{Provider, RawRoutine, RawTable, RawView};

use crate::error::EngineResult;

/// What a connector must yield. The core only ever issues read-only
/// queries through this trait; enforcement is the connector's
/// responsibility, not the core's. This is a contract, not something
/// the core enforces.
#[async_trait::async_trait]
pub trait RawCatalogSource: Send + Sync {
    async fn tables(&self) -> EngineResult<Vec<RawTable>>;

    async fn views(&self) -> EngineResult<Vec<RawView>>;

    async fn routines(&self) -> EngineResult<Vec<RawRoutine>>;

    fn provider(&self) -> Provider;

    fn default_schema(&self) -> String;
}
