// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! An in-memory [`RawCatalogSource`] for engine tests that need to drive
//! [`dbforensic_report::AnalysisEngine`] end to end without a real
//! connector. Follows the same builder-plus-trait-impl shape as other
//! mock connectors in this codebase, wrapping an already-built
//! [`Catalog`] instead of a CST.

use dbforensic_catalog::{Catalog, Provider, RawRoutine, RawTable, RawView};
use dbforensic_report::{EngineResult, RawCatalogSource};

/// Replays a fixed [`Catalog`] as a connector would, for tests that only
/// care about the pipeline downstream of catalog assembly.
pub struct MockCatalogSource {
    catalog: Catalog,
}

impl MockCatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait::async_trait]
impl RawCatalogSource for MockCatalogSource {
    async fn tables(&self) -> EngineResult<Vec<RawTable>> {
        Ok(self.catalog.tables().cloned().collect())
    }

    async fn views(&self) -> EngineResult<Vec<RawView>> {
        Ok(self.catalog.views().cloned().collect())
    }

    async fn routines(&self) -> EngineResult<Vec<RawRoutine>> {
        Ok(self.catalog.routines().cloned().collect())
    }

    fn provider(&self) -> Provider {
        self.catalog.provider
    }

    fn default_schema(&self) -> String {
        self.catalog.default_schema.clone()
    }
}
