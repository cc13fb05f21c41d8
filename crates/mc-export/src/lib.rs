//! mc-export - Export formats for the medallion catalog
//!
//! Every exporter renders one [`DomainCatalog`] to a string. Output is
//! byte-for-byte deterministic unless a generation time is supplied in
//! [`ExportOptions`].

pub mod csv;
pub mod dbml;
pub mod ddl;
pub mod drawio;
pub mod error;
pub mod html;
pub mod rows;
pub mod xlsx;

#[cfg(test)]
pub(crate) mod test_utils;

use chrono::{DateTime, SecondsFormat, Utc};
use mc_core::{Config, Domain, DomainCatalog, ExportFormat};

pub use dbml::{parse_dbml_tables, DbmlTable};
pub use ddl::validate_ddl;
pub use error::{ExportError, ExportResult};

/// Settings shared by all exporters
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Embedded as the generation time when set
    pub generated_at: Option<DateTime<Utc>>,
    /// Database label for the DBML project header
    pub database_type: String,
    /// Maximum columns drawn per Draw.io table (0 = all)
    pub drawio_max_columns: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            generated_at: None,
            database_type: "Generic".to_string(),
            drawio_max_columns: 0,
        }
    }
}

impl ExportOptions {
    /// Options from the project config. The generation time is taken now
    /// when `stamp` is set.
    pub fn from_config(config: &Config, stamp: bool) -> Self {
        Self {
            generated_at: (stamp || config.export.stamp).then(Utc::now),
            database_type: config.database_type.clone(),
            drawio_max_columns: config.export.drawio_max_columns,
        }
    }

    pub(crate) fn stamp(&self) -> Option<String> {
        self.generated_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Renders a domain catalog in one format
pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;
    fn export(&self, catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String>;
}

/// The exporter for `format`.
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Csv => Box::new(csv::CsvExporter),
        ExportFormat::Xlsx => Box::new(xlsx::XlsxExporter),
        ExportFormat::Dbml => Box::new(dbml::DbmlExporter),
        ExportFormat::Drawio => Box::new(drawio::DrawioExporter),
        ExportFormat::Pdf => Box::new(html::HtmlExporter),
        ExportFormat::Ddl => Box::new(ddl::DdlExporter),
    }
}

/// Render `catalog` in `format`.
pub fn export(
    catalog: &DomainCatalog,
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportResult<String> {
    log::debug!("Exporting '{}' as {}", catalog.domain.id, format.as_str());
    exporter_for(format).export(catalog, options)
}

/// `<safe_domain_name>_data_model.<ext>`
pub fn export_file_name(domain: &Domain, format: ExportFormat) -> String {
    format!(
        "{}_data_model.{}",
        rows::safe_name(&domain.name),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let domain: Domain =
            serde_yaml::from_str("id: customer-core\nname: Customer Core\n").unwrap();
        assert_eq!(
            export_file_name(&domain, ExportFormat::Pdf),
            "customer_core_data_model.html"
        );
        assert_eq!(
            export_file_name(&domain, ExportFormat::Dbml),
            "customer_core_data_model.dbml"
        );
    }

    #[test]
    fn test_exporter_for_every_format() {
        for format in ExportFormat::ALL {
            assert_eq!(exporter_for(format).format(), format);
        }
    }

    #[test]
    fn test_options_stamp() {
        let options = ExportOptions {
            generated_at: DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            ..ExportOptions::default()
        };
        assert_eq!(options.stamp().as_deref(), Some("2024-03-01T12:00:00Z"));
        assert!(ExportOptions::default().stamp().is_none());
    }
}
