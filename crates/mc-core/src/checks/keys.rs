//! Bronze/silver key and lineage checks (C003, C004)

use super::{CatalogCheck, CheckCode, CheckContext, Diagnostic, Severity};
use crate::domain::DomainCatalog;
use crate::layer::Layer;

/// Bronze tables must carry the configured audit columns
pub struct AuditColumns;

impl CatalogCheck for AuditColumns {
    fn name(&self) -> &'static str {
        "audit_columns"
    }

    fn description(&self) -> &'static str {
        "Bronze tables must carry the configured audit columns"
    }

    fn run(&self, catalog: &DomainCatalog, ctx: &CheckContext) -> Vec<Diagnostic> {
        if ctx.required_audit_columns.is_empty() {
            return Vec::new();
        }
        let Some(bronze) = catalog.layer(Layer::Bronze) else {
            return Vec::new();
        };

        bronze
            .tables
            .iter()
            .filter(|t| t.has_schema())
            .filter_map(|table| {
                let missing: Vec<&str> = ctx
                    .required_audit_columns
                    .iter()
                    .filter(|c| table.column(c).is_none())
                    .map(String::as_str)
                    .collect();
                if missing.is_empty() {
                    return None;
                }
                Some(
                    Diagnostic::new(
                        self,
                        CheckCode::C003,
                        Severity::Warning,
                        catalog,
                        format!(
                            "Bronze table '{}' is missing audit column(s): {}",
                            table.name,
                            missing.join(", ")
                        ),
                    )
                    .with_table(table.name.as_str()),
                )
            })
            .collect()
    }
}

/// Bronze and silver tables need a primary key
pub struct MissingPrimaryKey;

impl CatalogCheck for MissingPrimaryKey {
    fn name(&self) -> &'static str {
        "missing_primary_key"
    }

    fn description(&self) -> &'static str {
        "Bronze and silver tables without a primary key"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        [Layer::Bronze, Layer::Silver]
            .into_iter()
            .filter_map(|layer| catalog.layer(layer))
            .flat_map(|l| l.tables.iter())
            .filter(|t| t.has_schema() && t.primary_key_columns().is_empty())
            .map(|table| {
                Diagnostic::new(
                    self,
                    CheckCode::C004,
                    Severity::Warning,
                    catalog,
                    format!("Table '{}' has no primary key", table.name),
                )
                .with_table(table.name.as_str())
                .with_hint("Declare 'primary_key' or mark a column PRIMARY KEY")
            })
            .collect()
    }
}
