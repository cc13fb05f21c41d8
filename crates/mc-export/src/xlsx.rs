//! Excel-compatible tab-delimited workbook
//!
//! Three sheets, each introduced by a `### <SHEET> ###` line: table summary,
//! columns and metrics.

use crate::error::ExportResult;
use crate::rows::{column_rows, yes_no};
use crate::{ExportOptions, Exporter};
use mc_core::{DomainCatalog, ExportFormat};

const SUMMARY_HEADER: [&str; 10] = [
    "Layer",
    "Table Name",
    "Type",
    "Description",
    "Grain",
    "Source System",
    "Load Type",
    "Columns",
    "Primary Keys",
    "SCD/Fact Type",
];

const COLUMNS_HEADER: [&str; 8] = [
    "Table",
    "Column",
    "Type",
    "Comment",
    "Primary Key",
    "Foreign Key",
    "Nullable",
    "Layer",
];

const METRICS_HEADER: [&str; 7] = [
    "Category",
    "Metric ID",
    "Metric Name",
    "Description",
    "Formula",
    "Unit",
    "Aggregation",
];

pub struct XlsxExporter;

impl Exporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn export(&self, catalog: &DomainCatalog, _options: &ExportOptions) -> ExportResult<String> {
        Ok(to_workbook(catalog))
    }
}

/// Tabs and line breaks would split the cell.
pub fn cell(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let row: Vec<String> = cells.iter().map(|c| cell(c.as_ref())).collect();
    out.push_str(&row.join("\t"));
    out.push('\n');
}

pub fn to_workbook(catalog: &DomainCatalog) -> String {
    let mut out = String::new();

    out.push_str("### SUMMARY ###\n");
    push_row(&mut out, &SUMMARY_HEADER);
    for table in catalog.tables() {
        push_row(
            &mut out,
            &[
                table.layer.to_string(),
                table.name.to_string(),
                table.kind.to_string(),
                table.description_or_empty().to_string(),
                table.grain.clone().unwrap_or_default(),
                table.source_system.clone().unwrap_or_default(),
                table
                    .load_type
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                table.columns.len().to_string(),
                table.primary_key_columns().join(", "),
                table.type_label(),
            ],
        );
    }

    out.push_str("\n### COLUMNS ###\n");
    push_row(&mut out, &COLUMNS_HEADER);
    for row in column_rows(catalog) {
        push_row(
            &mut out,
            &[
                row.table_name(),
                row.column.name.as_str(),
                row.column.data_type.as_str(),
                row.column.comment_or_empty(),
                yes_no(row.is_primary_key()),
                yes_no(row.is_foreign_key()),
                yes_no(row.is_nullable()),
                row.layer().as_str(),
            ],
        );
    }

    out.push_str("\n### METRICS ###\n");
    push_row(&mut out, &METRICS_HEADER);
    for metric in catalog.metrics() {
        push_row(
            &mut out,
            &[
                metric.category.clone(),
                metric.id.clone().unwrap_or_default(),
                metric.name.clone(),
                metric.description.clone().unwrap_or_default(),
                metric.formula.clone().unwrap_or_default(),
                metric.unit.clone().unwrap_or_default(),
                metric
                    .aggregation
                    .map(|a| a.to_string())
                    .unwrap_or_default(),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_catalog;

    fn sheet<'a>(workbook: &'a str, name: &str) -> Vec<&'a str> {
        let marker = format!("### {} ###", name);
        workbook
            .lines()
            .skip_while(|l| *l != marker)
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_sheets() {
        let workbook = to_workbook(&sample_catalog());

        let summary = sheet(&workbook, "SUMMARY");
        assert_eq!(summary[0], SUMMARY_HEADER.join("\t"));
        assert_eq!(summary.len(), 1 + 5);
        assert_eq!(
            summary[1],
            "bronze\tbronze.customer_raw\ttable\tRaw customer master from core banking\t\tFIS\tCDC\t4\tcustomer_id\t"
        );
        assert!(summary[5].ends_with("\t3\t\tPeriodic Snapshot"));

        let columns = sheet(&workbook, "COLUMNS");
        assert_eq!(columns.len(), 1 + 14);
        assert_eq!(columns[1], "bronze.customer_raw\tcustomer_id\tBIGINT\tSource customer id\tYES\tNO\tNO\tbronze");

        let metrics = sheet(&workbook, "METRICS");
        assert_eq!(metrics.len(), 3);
        assert_eq!(
            metrics[2],
            "Balances\tDEP-002\tAverage Balance\t\tAVG(ending_balance)\tUSD\tAVG"
        );
    }

    #[test]
    fn test_cell_strips_separators() {
        assert_eq!(cell("a\tb\nc"), "a b c");
    }
}
