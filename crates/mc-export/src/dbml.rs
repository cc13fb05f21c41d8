//! DBML (dbdiagram.io) export and a reader for the subset it emits

use crate::error::{ExportError, ExportResult};
use crate::{ExportOptions, Exporter};
use mc_core::{
    catalog_fingerprint, infer_relationships, Column, DomainCatalog, ExportFormat, Layer, TableDef,
    TableKind,
};

pub struct DbmlExporter;

impl Exporter for DbmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Dbml
    }

    fn export(&self, catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
        to_dbml(catalog, options)
    }
}

fn is_plain_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Double-quote identifiers DBML would not accept bare.
fn ident(s: &str) -> String {
    if is_plain_ident(s) {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('"', ""))
    }
}

/// `schema.table`, each part quoted as needed
pub fn table_ref(table: &TableDef) -> String {
    match table.name.schema() {
        Some(schema) => format!("{}.{}", ident(schema), ident(table.name.unqualified())),
        None => ident(table.name.as_str()),
    }
}

fn data_type(ty: &str) -> String {
    let plain = ty
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')' | ','));
    if plain {
        ty.to_string()
    } else {
        format!("\"{}\"", ty.replace('"', ""))
    }
}

/// Single-quoted DBML string
fn note(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(['\r', '\n'], " ");
    format!("'{}'", escaped)
}

fn default_value(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    let literal = raw.starts_with('\'')
        || raw.parse::<f64>().is_ok()
        || matches!(lower.as_str(), "true" | "false" | "null");
    if literal {
        raw.to_string()
    } else {
        format!("`{}`", raw.replace('`', ""))
    }
}

fn column_settings(table: &TableDef, column: &Column) -> String {
    let mut settings = Vec::new();
    let pk = column.primary_key || table.is_primary_key(&column.name);
    if pk {
        settings.push("pk".to_string());
    } else if !column.nullable {
        settings.push("not null".to_string());
    }
    if column.unique {
        settings.push("unique".to_string());
    }
    if let Some(default) = &column.default {
        settings.push(format!("default: {}", default_value(default)));
    }
    if let Some(comment) = column.comment.as_deref().filter(|c| !c.is_empty()) {
        settings.push(format!("note: {}", note(comment)));
    }
    if settings.is_empty() {
        String::new()
    } else {
        format!(" [{}]", settings.join(", "))
    }
}

fn table_note(table: &TableDef) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(desc) = table.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(desc.to_string());
    }
    if let Some(grain) = &table.grain {
        parts.push(format!("Grain: {}", grain));
    }
    let label = table.type_label();
    if !label.is_empty() {
        parts.push(label);
    }
    let measures: Vec<&str> = table
        .measures
        .iter()
        .map(String::as_str)
        .filter(|m| table.column(m).is_none())
        .collect();
    if !measures.is_empty() {
        parts.push(format!("Measures: {}", measures.join(", ")));
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}

fn layer_banner(layer: Layer) -> &'static str {
    match layer {
        Layer::Bronze => "BRONZE LAYER - Raw Data",
        Layer::Silver => "SILVER LAYER - Curated Data",
        Layer::Gold => "GOLD LAYER - Dimensional Model",
    }
}

pub fn to_dbml(catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
    let domain = &catalog.domain;
    let mut out = String::new();

    out.push_str(&format!("// {} Data Model\n", domain.name));
    out.push_str(&format!("// Domain ID: {}\n", domain.id));
    out.push_str(&format!("// Fingerprint: {}\n", catalog_fingerprint(catalog)?));
    if let Some(stamp) = options.stamp() {
        out.push_str(&format!("// Generated: {}\n", stamp));
    }
    out.push('\n');

    out.push_str(&format!("Project {} {{\n", domain.id.as_str().replace('-', "_")));
    out.push_str(&format!("  database_type: {}\n", note(&options.database_type)));
    if let Some(desc) = domain.description.as_deref() {
        out.push_str(&format!("  Note: {}\n", note(desc)));
    }
    out.push_str("}\n\n");

    for layer_catalog in catalog.layers().filter(|l| !l.is_empty()) {
        out.push_str("// ==============================\n");
        out.push_str(&format!("// {}\n", layer_banner(layer_catalog.layer)));
        out.push_str("// ==============================\n\n");

        for table in &layer_catalog.tables {
            let header_color = match table.kind {
                TableKind::Fact => " [headercolor: #DAE8FC]",
                TableKind::Dimension => " [headercolor: #FFE6CC]",
                TableKind::Table => "",
            };
            out.push_str(&format!("Table {}{} {{\n", table_ref(table), header_color));
            for column in &table.columns {
                out.push_str(&format!(
                    "  {} {}{}\n",
                    ident(&column.name),
                    data_type(&column.data_type),
                    column_settings(table, column)
                ));
            }
            if let Some(text) = table_note(table) {
                out.push_str(&format!("\n  Note: {}\n", note(&text)));
            }
            out.push_str("}\n\n");
        }
    }

    let relationships = infer_relationships(catalog);
    if !relationships.is_empty() {
        out.push_str("// Relationships\n");
        for rel in &relationships {
            let (Some(from), Some(to)) = (catalog.table(&rel.from_table), catalog.table(&rel.to_table))
            else {
                continue;
            };
            out.push_str(&format!(
                "Ref: {}.{} {} {}.{}\n",
                table_ref(from),
                ident(&rel.from_column),
                rel.cardinality.dbml_operator(),
                table_ref(to),
                ident(&rel.to_column)
            ));
        }
    }
    Ok(out)
}

/// A table read back from DBML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbmlTable {
    /// Name as written, quotes removed (`bronze.customer_raw`)
    pub name: String,
    pub columns: Vec<String>,
}

enum ReadState {
    Top,
    Table { table: DbmlTable, nested: usize, start: usize },
    Block { depth: usize },
}

fn unquote(s: &str) -> String {
    s.split('.')
        .map(|part| part.trim().trim_matches('"'))
        .collect::<Vec<_>>()
        .join(".")
}

fn table_header(rest: &str, line_no: usize) -> ExportResult<String> {
    let end = rest.find(['[', '{']).unwrap_or(rest.len());
    if !rest.trim_end().ends_with('{') {
        return Err(ExportError::DbmlParse {
            line: line_no,
            message: "expected '{' after table name".to_string(),
        });
    }
    let name = rest[..end].trim();
    let name = match name.split_once(" as ") {
        Some((name, _alias)) => name.trim(),
        None => name,
    };
    if name.is_empty() {
        return Err(ExportError::DbmlParse {
            line: line_no,
            message: "missing table name".to_string(),
        });
    }
    Ok(unquote(name))
}

fn is_note(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("note:") || lower.starts_with("note {") || lower.starts_with("note{")
}

fn column_name(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix('"') {
        return rest.split_once('"').map(|(name, _)| name.to_string());
    }
    line.split_whitespace().next().map(str::to_string)
}

/// Read table and column names from DBML text.
///
/// Understands `Table` blocks, nested `indexes`/`Note` blocks, `Ref` lines
/// and other top-level blocks such as `Project`, which are skipped.
pub fn parse_dbml_tables(input: &str) -> ExportResult<Vec<DbmlTable>> {
    let mut tables = Vec::new();
    let mut state = ReadState::Top;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        state = match state {
            ReadState::Top => {
                if let Some(rest) = line.strip_prefix("Table ") {
                    ReadState::Table {
                        table: DbmlTable {
                            name: table_header(rest, line_no)?,
                            columns: Vec::new(),
                        },
                        nested: 0,
                        start: line_no,
                    }
                } else if line.ends_with('{') {
                    ReadState::Block { depth: 1 }
                } else {
                    ReadState::Top
                }
            }
            ReadState::Block { depth } => {
                if line == "}" {
                    if depth == 1 {
                        ReadState::Top
                    } else {
                        ReadState::Block { depth: depth - 1 }
                    }
                } else if line.ends_with('{') {
                    ReadState::Block { depth: depth + 1 }
                } else {
                    ReadState::Block { depth }
                }
            }
            ReadState::Table {
                mut table,
                nested,
                start,
            } => {
                if line == "}" {
                    if nested == 0 {
                        tables.push(table);
                        ReadState::Top
                    } else {
                        ReadState::Table {
                            table,
                            nested: nested - 1,
                            start,
                        }
                    }
                } else if nested > 0 || is_note(line) {
                    let nested = if line.ends_with('{') { nested + 1 } else { nested };
                    ReadState::Table {
                        table,
                        nested,
                        start,
                    }
                } else if line.ends_with('{') {
                    ReadState::Table {
                        table,
                        nested: nested + 1,
                        start,
                    }
                } else {
                    let name = column_name(line).ok_or_else(|| ExportError::DbmlParse {
                        line: line_no,
                        message: "unterminated quoted column name".to_string(),
                    })?;
                    table.columns.push(name);
                    ReadState::Table {
                        table,
                        nested,
                        start,
                    }
                }
            }
        };
    }

    match state {
        ReadState::Top => Ok(tables),
        ReadState::Table { table, start, .. } => Err(ExportError::DbmlParse {
            line: start,
            message: format!("table '{}' is not closed", table.name),
        }),
        ReadState::Block { .. } => Err(ExportError::DbmlParse {
            line: input.lines().count(),
            message: "unclosed block".to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "dbml_test.rs"]
mod tests;
