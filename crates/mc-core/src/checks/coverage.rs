//! Metric and coverage checks (C006, C008)

use super::{CatalogCheck, CheckCode, CheckContext, Diagnostic, Severity};
use crate::domain::DomainCatalog;
use crate::layer::Layer;

/// Metrics should carry a formula
pub struct MetricFormulas;

impl CatalogCheck for MetricFormulas {
    fn name(&self) -> &'static str {
        "metric_formulas"
    }

    fn description(&self) -> &'static str {
        "Metrics without a formula"
    }

    fn run(&self, catalog: &DomainCatalog, _ctx: &CheckContext) -> Vec<Diagnostic> {
        catalog
            .metrics()
            .filter(|m| !m.formula.as_deref().is_some_and(|f| !f.trim().is_empty()))
            .map(|metric| {
                Diagnostic::new(
                    self,
                    CheckCode::C006,
                    Severity::Info,
                    catalog,
                    format!(
                        "Metric '{}' in category '{}' has no formula",
                        metric.name, metric.category
                    ),
                )
            })
            .collect()
    }
}

/// Bronze table and metric counts must reach the configured minimums
pub struct MinimumCoverage;

impl CatalogCheck for MinimumCoverage {
    fn name(&self) -> &'static str {
        "minimum_coverage"
    }

    fn description(&self) -> &'static str {
        "Bronze table and metric counts below the configured minimum"
    }

    fn run(&self, catalog: &DomainCatalog, ctx: &CheckContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        let bronze_tables = catalog.layer(Layer::Bronze).map_or(0, |l| l.tables.len());
        if bronze_tables < ctx.min_bronze_tables {
            diagnostics.push(Diagnostic::new(
                self,
                CheckCode::C008,
                Severity::Warning,
                catalog,
                format!(
                    "Domain '{}' has {} bronze table(s), expected at least {}",
                    catalog.domain.id, bronze_tables, ctx.min_bronze_tables
                ),
            ));
        }

        let metrics = catalog.metric_count();
        if metrics < ctx.min_metrics {
            diagnostics.push(Diagnostic::new(
                self,
                CheckCode::C008,
                Severity::Warning,
                catalog,
                format!(
                    "Domain '{}' has {} metric(s), expected at least {}",
                    catalog.domain.id, metrics, ctx.min_metrics
                ),
            ));
        }
        diagnostics
    }
}
