// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Shared catalog fixtures, a mock connector, and assertion helpers used
//! by the cross-crate integration tests in the other `dbforensic-*`
//! crates.

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

pub use assertions::{DiffAssertions, ReportAssertions};
pub use mock_catalog::MockCatalogSource;
