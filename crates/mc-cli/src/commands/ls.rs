//! List command implementation

use anyhow::Result;
use mc_core::{DomainCatalog, Project};
use serde::Serialize;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::{load_project, print_json, print_table};

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    match &args.domain {
        Some(id) => {
            let catalog = project.require_domain(id)?;
            let tables = table_rows(catalog);
            match args.output {
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = tables
                        .iter()
                        .map(|t| {
                            vec![
                                t.name.clone(),
                                t.layer.to_string(),
                                t.kind.clone(),
                                t.columns.to_string(),
                                t.primary_key.join(", "),
                                t.type_label.clone(),
                            ]
                        })
                        .collect();
                    print_table(&["TABLE", "LAYER", "KIND", "COLUMNS", "PRIMARY KEY", "TYPE"], &rows);
                    println!("\n{} tables in {}", tables.len(), catalog.domain.name);
                }
                OutputFormat::Json => print_json(&tables)?,
            }
        }
        None => list_domains(&project, args.output)?,
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct TableRow {
    name: String,
    layer: mc_core::Layer,
    kind: String,
    columns: usize,
    primary_key: Vec<String>,
    type_label: String,
}

fn table_rows(catalog: &DomainCatalog) -> Vec<TableRow> {
    catalog
        .tables()
        .map(|t| TableRow {
            name: t.name.to_string(),
            layer: t.layer,
            kind: t.kind.to_string(),
            columns: t.columns.len(),
            primary_key: t.primary_key_columns().iter().map(|c| c.to_string()).collect(),
            type_label: t.type_label(),
        })
        .collect()
}

fn list_domains(project: &Project, output: OutputFormat) -> Result<()> {
    let summaries: Vec<_> = project.domains.values().map(DomainCatalog::summary).collect();
    match output {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = summaries
                .iter()
                .map(|s| {
                    let layers: Vec<String> = s
                        .layers
                        .iter()
                        .map(|l| format!("{}:{}", l.layer, l.table_count))
                        .collect();
                    vec![
                        s.id.clone(),
                        s.name.clone(),
                        s.priority.to_string(),
                        layers.join(" "),
                        s.total_tables.to_string(),
                        s.total_columns.to_string(),
                        s.metric_count.to_string(),
                    ]
                })
                .collect();
            print_table(
                &["DOMAIN", "NAME", "PRIORITY", "LAYERS", "TABLES", "COLUMNS", "METRICS"],
                &rows,
            );
            println!("\n{} domains in {}", summaries.len(), project.config.name);
        }
    }
    Ok(())
}
