//! CSV export: one row per column

use crate::error::ExportResult;
use crate::rows::{column_rows, yes_no};
use crate::{ExportOptions, Exporter};
use mc_core::{DomainCatalog, ExportFormat};

pub const CSV_HEADER: &str = "table,column,type,comment,primary_key,foreign_key,nullable,layer";

pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn export(&self, catalog: &DomainCatalog, _options: &ExportOptions) -> ExportResult<String> {
        Ok(to_csv(catalog))
    }
}

/// Quote a field when it contains a separator, a quote or a line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn to_csv(catalog: &DomainCatalog) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for row in column_rows(catalog) {
        let fields = [
            csv_field(row.table_name()),
            csv_field(&row.column.name),
            csv_field(&row.column.data_type),
            csv_field(row.column.comment_or_empty()),
            yes_no(row.is_primary_key()).to_string(),
            yes_no(row.is_foreign_key()).to_string(),
            yes_no(row.is_nullable()).to_string(),
            row.layer().to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "csv_test.rs"]
mod tests;
