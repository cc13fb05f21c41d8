//! Explicit reference check (C009)

use super::{CatalogCheck, CheckCode, CheckContext, Diagnostic, Severity};
use crate::domain::DomainCatalog;

/// Explicit column references must point at a table of the domain
pub struct UnknownReferences;

impl CatalogCheck for UnknownReferences {
    fn name(&self) -> &'static str {
        "unknown_references"
    }

    fn description(&self) -> &'static str {
        "Column references to tables the domain does not define"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for table in catalog.tables() {
            for column in &table.columns {
                let Some(target) = &column.references else {
                    continue;
                };
                if catalog.table(&target.table).is_some() {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::new(
                        self,
                        CheckCode::C009,
                        Severity::Error,
                        catalog,
                        format!(
                            "Column '{}.{}' references unknown table '{}'",
                            table.name, column.name, target.table
                        ),
                    )
                    .with_table(table.name.as_str())
                    .with_column(column.name.as_str()),
                );
            }
        }
        diagnostics
    }
}
