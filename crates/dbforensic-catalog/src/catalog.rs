// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The frozen catalog snapshot and the builder that assembles and
//! validates one from raw connector input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::fqn::Fqn;
use crate::raw::{RawRoutine, RawTable, RawView};
use crate::routine::Routine;
use crate::table::Table;
use crate::view::View;

/// Source database engine. Only the two dialects the catalog-query layer
/// targets are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    SqlServer,
    Postgres,
}

/// An immutable snapshot of one database's structural metadata.
///
/// Built once via [`Catalog::build`], then frozen: every downstream stage
/// (extractor, graph, detectors, diff) takes `&Catalog` and never mutates
/// it. Two `Catalog` values (source/target) feed the diff engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    tables: HashMap<Fqn, Table>,
    views: HashMap<Fqn, View>,
    routines: HashMap<Fqn, Routine>,
    pub default_schema: String,
    pub provider: Provider,
}

impl Catalog {
    /// Assemble and validate a catalog from raw connector output.
    ///
    /// Validates, in order: no duplicate FQN within a single collection,
    /// every table's own local invariants (FK/PK/UQ/index columns must
    /// exist), then every FK's cross-table target (referenced table and
    /// columns exist, column counts match).
    pub fn build(
        tables: Vec<RawTable>,
        views: Vec<RawView>,
        routines: Vec<RawRoutine>,
        provider: Provider,
        default_schema: impl Into<String>,
    ) -> CatalogResult<Self> {
        let mut table_map = HashMap::with_capacity(tables.len());
        for table in tables {
            table.validate_local()?;
            if table_map.contains_key(&table.fqn) {
                return Err(CatalogError::DuplicateObject {
                    kind: "table",
                    fqn: table.fqn,
                });
            }
            table_map.insert(table.fqn.clone(), table);
        }

        let mut view_map = HashMap::with_capacity(views.len());
        for view in views {
            if view_map.contains_key(&view.fqn) {
                return Err(CatalogError::DuplicateObject {
                    kind: "view",
                    fqn: view.fqn,
                });
            }
            view_map.insert(view.fqn.clone(), view);
        }

        let mut routine_map = HashMap::with_capacity(routines.len());
        for routine in routines {
            if routine_map.contains_key(&routine.fqn) {
                return Err(CatalogError::DuplicateObject {
                    kind: "routine",
                    fqn: routine.fqn,
                });
            }
            routine_map.insert(routine.fqn.clone(), routine);
        }

        for table in table_map.values() {
            for fk in &table.foreign_keys {
                let referenced = table_map.get(&fk.referenced_table).ok_or_else(|| {
                    CatalogError::UnknownForeignKeyTarget {
                        table: table.fqn.clone(),
                        fk_name: fk.name.clone(),
                        referenced: fk.referenced_table.clone(),
                    }
                })?;
                for col in &fk.referenced_columns {
                    if !referenced.has_column(col) {
                        return Err(CatalogError::UnknownForeignKeyReferencedColumn {
                            table: table.fqn.clone(),
                            fk_name: fk.name.clone(),
                            referenced: fk.referenced_table.clone(),
                            column: col.clone(),
                        });
                    }
                }
            }
        }

        let catalog = Catalog {
            tables: table_map,
            views: view_map,
            routines: routine_map,
            default_schema: default_schema.into(),
            provider,
        };

        tracing::info!(
            tables = catalog.tables.len(),
            views = catalog.views.len(),
            routines = catalog.routines.len(),
            "catalog assembled"
        );

        Ok(catalog)
    }

    pub fn table(&self, fqn: &Fqn) -> Option<&Table> {
        self.tables.get(fqn)
    }

    pub fn view(&self, fqn: &Fqn) -> Option<&View> {
        self.views.get(fqn)
    }

    pub fn routine(&self, fqn: &Fqn) -> Option<&Routine> {
        self.routines.get(fqn)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.routines.values()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// All table and view FQNs known to this catalog, the resolution
    /// universe the extractor disambiguates unqualified names against.
    pub fn known_relations(&self) -> impl Iterator<Item = &Fqn> {
        self.tables.keys().chain(self.views.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::table::{ForeignKey, Table};

    fn simple_table(schema: &str, name: &str) -> Table {
        Table::new(Fqn::new(schema, name), vec![Column::new("id", 0, "int")])
    }

    #[test]
    fn builds_empty_catalog() {
        let catalog = Catalog::build(vec![], vec![], vec![], Provider::Postgres, "public").unwrap();
        assert_eq!(catalog.table_count(), 0);
    }

    #[test]
    fn rejects_duplicate_table() {
        let t = simple_table("dbo", "Students");
        let err = Catalog::build(vec![t.clone(), t], vec![], vec![], Provider::SqlServer, "dbo").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateObject { kind: "table", .. }));
    }

    #[test]
    fn rejects_fk_to_unknown_table() {
        let t = simple_table("dbo", "Enrollments").with_foreign_keys(vec![ForeignKey::new(
            "fk_student",
            vec!["id".to_string()],
            Fqn::new("dbo", "Students"),
            vec!["id".to_string()],
        )]);
        let err = Catalog::build(vec![t], vec![], vec![], Provider::SqlServer, "dbo").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownForeignKeyTarget { .. }));
    }

    #[test]
    fn accepts_valid_fk_across_tables() {
        let students = simple_table("dbo", "Students");
        let enrollments =
            simple_table("dbo", "Enrollments").with_foreign_keys(vec![ForeignKey::new(
                "fk_student",
                vec!["id".to_string()],
                Fqn::new("dbo", "Students"),
                vec!["id".to_string()],
            )]);
        let catalog =
            Catalog::build(vec![students, enrollments], vec![], vec![], Provider::SqlServer, "dbo").unwrap();
        assert_eq!(catalog.table_count(), 2);
    }

    #[test]
    fn case_insensitive_schema_default_still_distinct_fqns() {
        let dbo_users = simple_table("dbo", "Users");
        let sales_users = simple_table("sales", "Users");
        let catalog = Catalog::build(
            vec![dbo_users, sales_users],
            vec![],
            vec![],
            Provider::SqlServer,
            "dbo",
        )
        .unwrap();
        assert_eq!(catalog.table_count(), 2);
    }
}
