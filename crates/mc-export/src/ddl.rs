//! SQL DDL export
//!
//! One `CREATE TABLE IF NOT EXISTS` per table with columns re-emitted from
//! their parsed definitions, followed by any declared indexes.

use crate::error::{ExportError, ExportResult};
use crate::{ExportOptions, Exporter};
use mc_core::{catalog_fingerprint, Column, DomainCatalog, ExportFormat, TableDef};
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::ALL_KEYWORDS;
use sqlparser::parser::Parser;

/// Columns appended to SCD2 tables that do not declare them.
const SCD2_COLUMNS: [(&str, &str); 3] = [
    ("valid_from", "TIMESTAMP"),
    ("valid_to", "TIMESTAMP"),
    ("is_current", "BOOLEAN"),
];

pub struct DdlExporter;

impl Exporter for DdlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Ddl
    }

    fn export(&self, catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
        to_ddl(catalog, options)
    }
}

/// Bare identifier when it is a plain word and not a SQL keyword, otherwise
/// double-quoted.
fn quote_ident(s: &str) -> String {
    let plain = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && ALL_KEYWORDS
            .binary_search(&s.to_ascii_uppercase().as_str())
            .is_err();
    if plain {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('"', "\"\""))
    }
}

fn table_ident(table: &TableDef) -> String {
    match table.name.schema() {
        Some(schema) => format!(
            "{}.{}",
            quote_ident(schema),
            quote_ident(table.name.unqualified())
        ),
        None => quote_ident(table.name.as_str()),
    }
}

fn sql_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Text for a `--` line comment
fn line_comment(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn column_line(column: &Column) -> String {
    let mut line = format!("{} {}", quote_ident(&column.name), column.data_type);
    if !column.nullable {
        line.push_str(" NOT NULL");
    }
    if column.unique {
        line.push_str(" UNIQUE");
    }
    if let Some(default) = &column.default {
        line.push_str(&format!(" DEFAULT {}", default));
    }
    if let Some(r) = &column.references {
        line.push_str(&format!(" REFERENCES {}({})", r.table, quote_ident(&r.column)));
    }
    if let Some(comment) = column.comment.as_deref().filter(|c| !c.is_empty()) {
        line.push_str(&format!(" COMMENT {}", sql_string(comment)));
    }
    line
}

/// Column list of one `indexes` entry: `customer_id`, `(a, b)` or `idx(a, b)`.
fn index_columns(entry: &str) -> Vec<String> {
    let inner = match (entry.find('('), entry.rfind(')')) {
        (Some(open), Some(close)) if open < close => &entry[open + 1..close],
        _ => entry,
    };
    inner
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn create_table(table: &TableDef) -> String {
    let mut lines: Vec<String> = table.columns.iter().map(column_line).collect();
    if table.is_scd2() {
        for (name, data_type) in SCD2_COLUMNS {
            if table.column(name).is_none() {
                lines.push(format!("{} {}", name, data_type));
            }
        }
    }
    let pk = table.primary_key_columns();
    if !pk.is_empty() {
        let cols: Vec<String> = pk.iter().map(|c| quote_ident(c)).collect();
        lines.push(format!("PRIMARY KEY ({})", cols.join(", ")));
    }

    let mut out = String::new();
    if let Some(desc) = table.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("-- {}\n", line_comment(desc)));
    }
    out.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);\n",
        table_ident(table),
        lines.join(",\n    ")
    ));

    for entry in &table.indexes {
        let cols = index_columns(entry);
        if cols.is_empty() {
            continue;
        }
        let name = format!(
            "idx_{}_{}",
            table.name.unqualified(),
            cols.join("_")
        )
        .replace(|c: char| !c.is_ascii_alphanumeric() && c != '_', "_");
        let quoted: Vec<String> = cols.iter().map(|c| quote_ident(c)).collect();
        out.push_str(&format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({});\n",
            name,
            table_ident(table),
            quoted.join(", ")
        ));
    }
    out
}

pub fn to_ddl(catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
    let domain = &catalog.domain;
    let mut out = String::new();
    out.push_str(&format!("-- {} Data Model DDL\n", line_comment(&domain.name)));
    out.push_str(&format!("-- Domain ID: {}\n", domain.id));
    out.push_str(&format!("-- Fingerprint: {}\n", catalog_fingerprint(catalog)?));
    if let Some(stamp) = options.stamp() {
        out.push_str(&format!("-- Generated: {}\n", stamp));
    }

    for layer in catalog.layers().filter(|l| !l.is_empty()) {
        out.push_str(&format!("\n-- {} LAYER\n", layer.layer.as_str().to_uppercase()));
        for table in &layer.tables {
            out.push('\n');
            if table.has_schema() {
                out.push_str(&create_table(table));
            } else {
                out.push_str(&format!("-- {}: no columns defined\n", table.name));
            }
        }
    }
    Ok(out)
}

/// Parse DDL with the generic SQL dialect, returning the statement count.
pub fn validate_ddl(sql: &str) -> ExportResult<usize> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql).map_err(|e| {
        ExportError::InvalidDdl {
            message: e.to_string(),
        }
    })?;
    Ok(statements.len())
}
