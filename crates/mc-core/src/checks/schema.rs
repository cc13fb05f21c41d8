//! Column-level schema checks (C001, C002, C007)

use super::{CatalogCheck, CheckCode, CheckContext, Diagnostic, Severity};
use crate::domain::DomainCatalog;
use std::collections::HashSet;

/// Every declared primary-key field must be a column of the table
pub struct PrimaryKeyColumns;

impl CatalogCheck for PrimaryKeyColumns {
    fn name(&self) -> &'static str {
        "primary_key_columns"
    }

    fn description(&self) -> &'static str {
        "Declared primary-key fields must exist in the table's schema"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for table in catalog.tables() {
            // Schema-less tables are reported by C007
            if !table.has_schema() {
                continue;
            }
            for key in &table.primary_key {
                if table.column(key).is_none() {
                    diagnostics.push(
                        Diagnostic::new(
                            self,
                            CheckCode::C001,
                            Severity::Error,
                            catalog,
                            format!(
                                "Primary key '{}' of '{}' is not a column of the table",
                                key, table.name
                            ),
                        )
                        .with_table(table.name.as_str())
                        .with_column(key.as_str()),
                    );
                }
            }
        }
        diagnostics
    }
}

/// Column names must be unique within a table
pub struct DuplicateColumns;

impl CatalogCheck for DuplicateColumns {
    fn name(&self) -> &'static str {
        "duplicate_columns"
    }

    fn description(&self) -> &'static str {
        "Column names must be unique within a table"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for table in catalog.tables() {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for column in &table.columns {
                let key = column.name.to_lowercase();
                if !seen.insert(key.clone()) && reported.insert(key) {
                    diagnostics.push(
                        Diagnostic::new(
                            self,
                            CheckCode::C002,
                            Severity::Error,
                            catalog,
                            format!(
                                "Column '{}' is declared more than once in '{}'",
                                column.name, table.name
                            ),
                        )
                        .with_table(table.name.as_str())
                        .with_column(column.name.as_str()),
                    );
                }
            }
        }
        diagnostics
    }
}

/// Tables should declare their columns
pub struct EmptySchema;

impl CatalogCheck for EmptySchema {
    fn name(&self) -> &'static str {
        "empty_schema"
    }

    fn description(&self) -> &'static str {
        "Tables without any declared column"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        catalog
            .tables()
            .filter(|t| !t.has_schema())
            .map(|table| {
                Diagnostic::new(
                    self,
                    CheckCode::C007,
                    Severity::Warning,
                    catalog,
                    format!("Table '{}' has no schema", table.name),
                )
                .with_table(table.name.as_str())
                .with_hint("Add a 'schema' map of column definitions")
            })
            .collect()
    }
}
