//! Print-ready HTML data model document
//!
//! Rendered through minijinja. The template name ends in `.html`, so every
//! interpolated value is HTML-escaped.

use crate::error::ExportResult;
use crate::rows::yes_no;
use crate::{ExportOptions, Exporter};
use mc_core::{infer_relationships, DomainCatalog, ExportFormat, LayerSummary, TableDef, TableKind};
use minijinja::Environment;
use serde::Serialize;

const TEMPLATE_NAME: &str = "data_model.html";
const TEMPLATE: &str = include_str!("../templates/data_model.html");

pub struct HtmlExporter;

impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(&self, catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
        to_html(catalog, options)
    }
}

#[derive(Serialize)]
struct DocumentView {
    domain: DomainView,
    layers: Vec<LayerSummary>,
    total_tables: usize,
    total_columns: usize,
    tables: Vec<TableView>,
    dimensions: Vec<TableView>,
    facts: Vec<TableView>,
    metrics: Vec<MetricView>,
    relationships: Vec<RelationshipView>,
    generated_at: Option<String>,
}

#[derive(Serialize)]
struct DomainView {
    id: String,
    name: String,
    priority: String,
    area: String,
    description: String,
    complexity: String,
    business_value: String,
    key_entities: Vec<String>,
}

#[derive(Serialize)]
struct TableView {
    name: String,
    layer: String,
    kind: String,
    description: String,
    grain: String,
    type_label: String,
    source_system: String,
    primary_key: String,
    measures: String,
    column_count: usize,
    columns: Vec<ColumnView>,
}

#[derive(Serialize)]
struct ColumnView {
    name: String,
    data_type: String,
    comment: String,
    primary_key: &'static str,
    foreign_key: &'static str,
    nullable: &'static str,
    default: String,
}

#[derive(Serialize)]
struct MetricView {
    category: String,
    id: String,
    name: String,
    description: String,
    formula: String,
    unit: String,
    aggregation: String,
}

#[derive(Serialize)]
struct RelationshipView {
    from: String,
    to: String,
    cardinality: String,
}

fn table_view(table: &TableDef) -> TableView {
    TableView {
        name: table.name.to_string(),
        layer: table.layer.label().to_string(),
        kind: table.kind.to_string(),
        description: table.description_or_empty().to_string(),
        grain: table.grain.clone().unwrap_or_default(),
        type_label: table.type_label(),
        source_system: table.source_system.clone().unwrap_or_default(),
        primary_key: table.primary_key_columns().join(", "),
        measures: table.measures.join(", "),
        column_count: table.columns.len(),
        columns: table
            .columns
            .iter()
            .map(|c| {
                let pk = c.primary_key || table.is_primary_key(&c.name);
                ColumnView {
                    name: c.name.clone(),
                    data_type: c.data_type.clone(),
                    comment: c.comment_or_empty().to_string(),
                    primary_key: yes_no(pk),
                    foreign_key: yes_no(c.foreign_key),
                    nullable: yes_no(c.nullable && !pk),
                    default: c.default_unquoted().unwrap_or_default(),
                }
            })
            .collect(),
    }
}

fn document(catalog: &DomainCatalog, options: &ExportOptions) -> DocumentView {
    let domain = &catalog.domain;
    let summary = catalog.summary();
    let tables: Vec<&TableDef> = catalog.tables().collect();
    let of_kind = |kind: TableKind| {
        tables
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| table_view(t))
            .collect::<Vec<_>>()
    };

    DocumentView {
        domain: DomainView {
            id: domain.id.to_string(),
            name: domain.name.clone(),
            priority: domain.priority.to_string(),
            area: domain.area.clone().unwrap_or_default(),
            description: domain.description.clone().unwrap_or_default(),
            complexity: domain.complexity.clone().unwrap_or_default(),
            business_value: domain.business_value.clone().unwrap_or_default(),
            key_entities: domain.key_entities.clone(),
        },
        total_tables: summary.total_tables,
        total_columns: summary.total_columns,
        layers: summary.layers,
        dimensions: of_kind(TableKind::Dimension),
        facts: of_kind(TableKind::Fact),
        tables: tables.iter().map(|t| table_view(t)).collect(),
        metrics: catalog
            .metrics()
            .map(|m| MetricView {
                category: m.category.clone(),
                id: m.id.clone().unwrap_or_default(),
                name: m.name.clone(),
                description: m.description.clone().unwrap_or_default(),
                formula: m.formula.clone().unwrap_or_default(),
                unit: m.unit.clone().unwrap_or_default(),
                aggregation: m.aggregation.map(|a| a.to_string()).unwrap_or_default(),
            })
            .collect(),
        relationships: infer_relationships(catalog)
            .into_iter()
            .map(|r| RelationshipView {
                from: format!("{}.{}", r.from_table, r.from_column),
                to: format!("{}.{}", r.to_table, r.to_column),
                cardinality: r.cardinality.to_string(),
            })
            .collect(),
        generated_at: options.stamp(),
    }
}

pub fn to_html(catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;
    Ok(template.render(document(catalog, options))?)
}
