// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! One module per built-in detector.

pub mod anti_patterns;
pub mod circular_dependency;
pub mod complex_routine;
pub mod dead_routine;
pub mod dead_table;
pub mod duplicate_index;
pub mod empty_table;
pub mod inconsistent_naming;
pub mod missing_fk_index;
pub mod missing_pk;
pub mod orphan_column;
pub mod unused_index;
