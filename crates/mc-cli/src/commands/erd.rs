//! ERD command implementation

use anyhow::Result;
use mc_core::{infer_relationships, logical_relationships, ErdGraph, LogicalRelationship, Relationship};
use serde::Serialize;

use crate::cli::{ErdArgs, ErdOutput, GlobalArgs};
use crate::commands::common::{load_project, print_json, print_table};

#[derive(Serialize)]
struct ErdReport {
    domain: String,
    table_count: usize,
    relationships: Vec<Relationship>,
    components: Vec<Vec<String>>,
    orphans: Vec<String>,
    logical_relationships: Vec<LogicalRelationship>,
}

/// Execute the erd command
pub async fn execute(args: &ErdArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let catalog = project.require_domain(&args.domain)?;

    let relationships = infer_relationships(catalog);
    let graph = ErdGraph::build(catalog, &relationships);

    match args.output {
        ErdOutput::Dot => print!("{}", graph.to_dot(catalog)),
        ErdOutput::Json => print_json(&ErdReport {
            domain: catalog.domain.id.to_string(),
            table_count: graph.table_count(),
            components: graph.connected_components(),
            orphans: graph.orphans(),
            logical_relationships: logical_relationships(&catalog.domain.key_entities),
            relationships,
        })?,
        ErdOutput::Table => {
            let rows: Vec<Vec<String>> = relationships
                .iter()
                .map(|r| {
                    vec![
                        format!("{}.{}", r.from_table, r.from_column),
                        format!("{}.{}", r.to_table, r.to_column),
                        r.cardinality.to_string(),
                    ]
                })
                .collect();
            print_table(&["FROM", "TO", "CARDINALITY"], &rows);

            let components = graph.connected_components();
            let orphans = graph.orphans();
            println!(
                "\n{} tables, {} relationships, {} components, {} orphans",
                graph.table_count(),
                graph.relationship_count(),
                components.len(),
                orphans.len()
            );
            for orphan in &orphans {
                println!("  orphan: {}", orphan);
            }
            let logical = logical_relationships(&catalog.domain.key_entities);
            if !logical.is_empty() {
                println!("\nLogical model:");
                for rel in &logical {
                    println!("  {} {} {} ({})", rel.from, rel.label, rel.to, rel.cardinality);
                }
            }
        }
    }
    Ok(())
}
