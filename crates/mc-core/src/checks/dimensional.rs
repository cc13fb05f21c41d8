//! Gold dimensional-model check (C005)

use super::{CatalogCheck, CheckCode, CheckContext, Diagnostic, Severity};
use crate::domain::DomainCatalog;
use crate::layer::Layer;

/// Facts need a grain and dimensions an SCD type
pub struct DimensionalModel;

impl CatalogCheck for DimensionalModel {
    fn name(&self) -> &'static str {
        "dimensional_model"
    }

    fn description(&self) -> &'static str {
        "Gold facts must declare a grain and dimensions an SCD type"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        let Some(gold) = catalog.layer(Layer::Gold) else {
            return Vec::new();
        };
        let mut diagnostics = Vec::new();

        for fact in gold.facts() {
            if !fact.grain.as_deref().is_some_and(|g| !g.trim().is_empty()) {
                diagnostics.push(
                    Diagnostic::new(
                        self,
                        CheckCode::C005,
                        Severity::Warning,
                        catalog,
                        format!("Fact '{}' does not declare its grain", fact.name),
                    )
                    .with_table(fact.name.as_str())
                    .with_hint("State what one row represents, e.g. 'Account x Day'"),
                );
            }
        }
        for dim in gold.dimensions() {
            if dim.scd_type.is_none() {
                diagnostics.push(
                    Diagnostic::new(
                        self,
                        CheckCode::C005,
                        Severity::Warning,
                        catalog,
                        format!("Dimension '{}' does not declare an SCD type", dim.name),
                    )
                    .with_table(dim.name.as_str()),
                );
            }
        }
        diagnostics
    }
}
