//! Integrity checks over a loaded domain catalog

pub mod coverage;
pub mod dimensional;
pub mod keys;
pub mod references;
pub mod schema;

use crate::config::ValidationConfig;
use crate::domain::DomainCatalog;
use serde::{Deserialize, Serialize};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckCode {
    /// Primary-key column missing from the schema
    C001,
    /// Duplicate column name
    C002,
    /// Bronze table missing audit columns
    C003,
    /// Bronze/silver table without primary key
    C004,
    /// Fact without grain or dimension without SCD type
    C005,
    /// Metric without formula
    C006,
    /// Table without schema
    C007,
    /// Layer or metric count below the configured minimum
    C008,
    /// Reference to an unknown table
    C009,
}

impl std::fmt::Display for CheckCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A finding produced by a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: CheckCode,
    pub severity: Severity,
    pub message: String,
    pub domain: String,
    pub table: Option<String>,
    pub column: Option<String>,
    /// Optional hint for how to fix
    pub hint: Option<String>,
    /// Name of the check that produced this diagnostic
    pub check_name: String,
}

impl Diagnostic {
    pub(crate) fn new(
        check: &dyn CatalogCheck,
        code: CheckCode,
        severity: Severity,
        catalog: &DomainCatalog,
        message: String,
    ) -> Self {
        Self {
            code,
            severity,
            message,
            domain: catalog.domain.id.to_string(),
            table: None,
            column: None,
            hint: None,
            check_name: check.name().to_string(),
        }
    }

    pub(crate) fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub(crate) fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub(crate) fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message)
    }
}

/// Thresholds shared by all checks
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    pub required_audit_columns: Vec<String>,
    pub min_bronze_tables: usize,
    pub min_metrics: usize,
}

impl From<&ValidationConfig> for CheckContext {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            required_audit_columns: config.required_audit_columns.clone(),
            min_bronze_tables: config.min_bronze_tables,
            min_metrics: config.min_metrics,
        }
    }
}

/// A check over one domain catalog
pub trait CatalogCheck: Send + Sync {
    /// Check name (used for filtering and display)
    fn name(&self) -> &'static str;
    /// Human-readable description
    fn description(&self) -> &'static str;
    fn run(&self, catalog: &DomainCatalog, ctx: &CheckContext) -> Vec<Diagnostic>;
}

/// Registry of checks
pub struct CheckManager {
    checks: Vec<Box<dyn CatalogCheck>>,
}

impl CheckManager {
    /// Create a manager with all built-in checks registered
    pub fn with_defaults() -> Self {
        Self {
            checks: vec![
                Box::new(schema::PrimaryKeyColumns),
                Box::new(schema::DuplicateColumns),
                Box::new(keys::AuditColumns),
                Box::new(keys::MissingPrimaryKey),
                Box::new(dimensional::DimensionalModel),
                Box::new(coverage::MetricFormulas),
                Box::new(schema::EmptySchema),
                Box::new(coverage::MinimumCoverage),
                Box::new(references::UnknownReferences),
            ],
        }
    }

    /// Run the registered checks on one domain.
    ///
    /// With a filter, only checks whose name is listed run. Diagnostics keep
    /// check registration order.
    pub fn run(
        &self,
        catalog: &DomainCatalog,
        ctx: &CheckContext,
        filter: Option<&[String]>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for check in &self.checks {
            if let Some(filter) = filter {
                if !filter.iter().any(|f| f == check.name()) {
                    continue;
                }
            }
            let found = check.run(catalog, ctx);
            log::debug!(
                "Check '{}' on '{}': {} diagnostic(s)",
                check.name(),
                catalog.domain.id,
                found.len()
            );
            diagnostics.extend(found);
        }
        diagnostics
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// (name, description) of every registered check
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.checks
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }
}

#[cfg(test)]
#[path = "checks_test.rs"]
mod tests;
