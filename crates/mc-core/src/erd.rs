//! ERD relationship inference
//!
//! Physical relationships are inferred from column names and explicit
//! references; logical relationships between business entities come from a
//! fixed list of banking patterns.

use crate::column::Column;
use crate::domain::{DomainCatalog, LayerCatalog};
use crate::layer::Layer;
use crate::table::{TableDef, TableKind};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Relationship cardinality, read from the `from` side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    ManyToOne,
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    /// DBML relationship operator.
    pub fn dbml_operator(&self) -> &'static str {
        match self {
            Cardinality::ManyToOne => ">",
            Cardinality::OneToMany => "<",
            Cardinality::OneToOne => "-",
            Cardinality::ManyToMany => "<>",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "M:1"),
            Cardinality::OneToOne => write!(f, "1:1"),
            Cardinality::OneToMany => write!(f, "1:M"),
            Cardinality::ManyToMany => write!(f, "M:M"),
        }
    }
}

/// A physical relationship between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    pub cardinality: Cardinality,
}

/// Column names that end in `_id`/`_key` but are never foreign keys.
const AUDIT_ID_COLUMNS: &[&str] = &[
    "source_record_id",
    "batch_id",
    "load_id",
    "run_id",
    "job_id",
    "ingestion_id",
    "etl_batch_id",
    "record_hash_key",
];

const NON_FK_SUFFIXES: &[&str] = &[
    "_date",
    "_timestamp",
    "_time",
    "_flag",
    "_status",
    "_type",
    "_code",
    "_name",
    "_text",
    "_amount",
    "_balance",
    "_rate",
    "_pct",
    "_percent",
];

const NON_FK_PREFIXES: &[&str] = &[
    "created_",
    "updated_",
    "modified_",
    "deleted_",
    "ingestion_",
    "record_",
];

const ENTITY_PREFIXES: &[&str] = &["source_", "parent_", "primary_", "related_"];

const TABLE_SUFFIXES: &[&str] = &[
    "_raw",
    "_master",
    "_golden",
    "_cleansed",
    "_history",
    "_daily",
    "_current",
    "_enriched",
];

/// Dimensions every fact is assumed to reference when it declares no columns.
const CONFORMED_DIMENSIONS: &[&str] = &[
    "date", "time", "calendar", "customer", "account", "branch", "channel", "product",
];

fn key_suffix(name: &str, layer: Layer) -> Option<&'static str> {
    let suffixes: &[&'static str] = if layer == Layer::Gold {
        &["_key", "_id", "_sk"]
    } else {
        &["_id", "_key"]
    };
    suffixes.iter().copied().find(|s| name.ends_with(s))
}

/// Whether `column` of `table` looks like a foreign key.
pub fn is_foreign_key_candidate(table: &TableDef, column: &Column) -> bool {
    if column.foreign_key || column.references.is_some() {
        return true;
    }
    let name = column.name.to_ascii_lowercase();
    if name == "id" || key_suffix(&name, table.layer).is_none() {
        return false;
    }
    if AUDIT_ID_COLUMNS.contains(&name.as_str())
        || name == "source_system"
        || NON_FK_SUFFIXES.iter().any(|s| name.ends_with(s))
        || NON_FK_PREFIXES.iter().any(|p| name.starts_with(p))
    {
        return false;
    }
    let pk = table.primary_key_columns();
    !(pk.len() == 1 && pk[0] == column.name)
}

/// Business entity a key column points at (`parent_account_id` -> `account`).
pub fn column_entity(column: &str, layer: Layer) -> String {
    let lower = column.to_ascii_lowercase();
    let mut entity = match key_suffix(&lower, layer) {
        Some(suffix) => &lower[..lower.len() - suffix.len()],
        None => lower.as_str(),
    };
    for prefix in ENTITY_PREFIXES {
        if let Some(rest) = entity.strip_prefix(prefix) {
            if !rest.is_empty() {
                entity = rest;
                break;
            }
        }
    }
    entity.to_string()
}

/// Entity a table holds (`silver.customer_master` -> `customer`,
/// `gold.dim_customer` -> `customer`).
pub fn table_entity(table: &TableDef) -> String {
    let mut name = table.name.unqualified().to_ascii_lowercase();
    for prefix in ["dim_", "fact_"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.to_string();
        }
    }
    for suffix in TABLE_SUFFIXES {
        if let Some(rest) = name.strip_suffix(suffix) {
            if !rest.is_empty() {
                name = rest.to_string();
                break;
            }
        }
    }
    name
}

fn plural(entity: &str) -> String {
    match entity.strip_suffix('y') {
        Some(stem) if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) => format!("{}ies", stem),
        _ if entity.ends_with('s') || entity.ends_with('x') => format!("{}es", entity),
        _ => format!("{}s", entity),
    }
}

fn is_preferred_target(table: &TableDef) -> bool {
    let name = table.name.unqualified();
    name.contains("_master") || name.contains("_golden")
}

fn single_primary_key(table: &TableDef) -> Option<&str> {
    match table.primary_key_columns().as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Bronze/silver inference within one layer.
fn layer_target<'a>(
    layer: &'a LayerCatalog,
    from: &TableDef,
    column: &Column,
) -> Option<(&'a TableDef, String)> {
    let others = || layer.tables.iter().filter(move |t| t.name != from.name);

    if let Some(t) = others().find(|t| single_primary_key(t) == Some(column.name.as_str())) {
        return Some((t, column.name.clone()));
    }

    let entity = column_entity(&column.name, layer.layer);
    let entity_plural = plural(&entity);
    let mut matches = others().filter(|t| {
        let e = table_entity(t);
        e == entity || e == entity_plural
    });
    let first = matches.next();
    let preferred = first
        .filter(|t| is_preferred_target(t))
        .or_else(|| matches.find(|t| is_preferred_target(t)))
        .or(first);
    if let Some(t) = preferred {
        let to_column = single_primary_key(t).unwrap_or(&column.name).to_string();
        return Some((t, to_column));
    }

    others()
        .find(|t| t.primary_key_columns().contains(&column.name.as_str()))
        .map(|t| (t, column.name.clone()))
}

/// Gold star-schema inference: key columns point at the dimension with the
/// same base name.
fn gold_target<'a>(gold: &'a LayerCatalog, column: &Column) -> Option<(&'a TableDef, String)> {
    let base = column_entity(&column.name, Layer::Gold);
    let base_plural = plural(&base);
    gold.dimensions()
        .find(|d| {
            let e = table_entity(d);
            e == base || e == base_plural
        })
        .map(|d| {
            let to_column = single_primary_key(d)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}_key", table_entity(d)));
            (d, to_column)
        })
}

/// Resolve an explicit reference by qualified or bare table name.
fn explicit_target<'a>(catalog: &'a DomainCatalog, table: &str) -> Option<&'a TableDef> {
    catalog.table(table)
}

/// Name-only star schema for facts that declare no columns.
fn fact_name_relationships(gold: &LayerCatalog, fact: &TableDef) -> Vec<Relationship> {
    let fact_base = table_entity(fact);
    gold.dimensions()
        .filter_map(|dim| {
            let dim_base = table_entity(dim);
            let connect = fact_base.contains(&dim_base) || CONFORMED_DIMENSIONS.contains(&dim_base.as_str());
            connect.then(|| {
                let key = format!("{}_key", dim_base);
                Relationship {
                    from_table: fact.name.to_string(),
                    from_column: key.clone(),
                    to_table: dim.name.to_string(),
                    to_column: single_primary_key(dim).map(str::to_string).unwrap_or(key),
                    cardinality: Cardinality::ManyToOne,
                }
            })
        })
        .collect()
}

/// Infer physical relationships for a domain.
///
/// Output follows table order, then column order. Self-references and
/// duplicates are dropped.
pub fn infer_relationships(catalog: &DomainCatalog) -> Vec<Relationship> {
    let mut relationships = Vec::new();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    let mut push = |rel: Relationship, relationships: &mut Vec<Relationship>| {
        if rel.from_table == rel.to_table {
            return;
        }
        let key = (rel.from_table.clone(), rel.from_column.clone(), rel.to_table.clone());
        if seen.insert(key) {
            relationships.push(rel);
        }
    };

    for table in catalog.tables() {
        if table.layer == Layer::Gold && table.kind == TableKind::Fact && !table.has_schema() {
            if let Some(gold) = catalog.layer(Layer::Gold) {
                for rel in fact_name_relationships(gold, table) {
                    push(rel, &mut relationships);
                }
            }
            continue;
        }

        for column in &table.columns {
            if !is_foreign_key_candidate(table, column) {
                continue;
            }

            let target = match &column.references {
                Some(r) => explicit_target(catalog, &r.table).map(|t| (t, r.column.clone())),
                None => catalog.layer(table.layer).and_then(|layer| match table.layer {
                    Layer::Gold => gold_target(layer, column),
                    _ => layer_target(layer, table, column),
                }),
            };

            match target {
                Some((to, to_column)) => push(
                    Relationship {
                        from_table: table.name.to_string(),
                        from_column: column.name.clone(),
                        to_table: to.name.to_string(),
                        to_column,
                        cardinality: Cardinality::ManyToOne,
                    },
                    &mut relationships,
                ),
                None => log::debug!(
                    "No target found for {}.{}",
                    table.name,
                    column.name
                ),
            }
        }
    }

    relationships
}

/// Undirected table graph used for component and orphan analysis.
#[derive(Debug)]
pub struct ErdGraph {
    graph: UnGraph<String, Relationship>,
    node_map: HashMap<String, NodeIndex>,
}

impl ErdGraph {
    /// Build the graph over every table of the domain.
    pub fn build(catalog: &DomainCatalog, relationships: &[Relationship]) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut node_map = HashMap::new();
        for table in catalog.tables() {
            let idx = graph.add_node(table.name.to_string());
            node_map.insert(table.name.to_string(), idx);
        }
        for rel in relationships {
            if let (Some(&a), Some(&b)) = (node_map.get(&rel.from_table), node_map.get(&rel.to_table)) {
                graph.add_edge(a, b, rel.clone());
            }
        }
        Self { graph, node_map }
    }

    pub fn table_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Groups of connected tables, in table order. Singletons included.
    pub fn connected_components(&self) -> Vec<Vec<String>> {
        let mut sets = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut order: Vec<usize> = Vec::new();
        let mut groups: HashMap<usize, Vec<String>> = HashMap::new();
        for idx in self.graph.node_indices() {
            let root = sets.find(idx.index());
            let group = groups.entry(root).or_insert_with(|| {
                order.push(root);
                Vec::new()
            });
            group.push(self.graph[idx].clone());
        }
        order
            .into_iter()
            .filter_map(|root| groups.remove(&root))
            .collect()
    }

    /// Tables with no relationships at all.
    pub fn orphans(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors(idx).next().is_none())
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Tables directly related to `table`, sorted.
    pub fn neighbors(&self, table: &str) -> Vec<String> {
        let Some(&idx) = self.node_map.get(table) else {
            return Vec::new();
        };
        let mut names: Vec<String> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Graphviz DOT rendering, one cluster per layer.
    pub fn to_dot(&self, catalog: &DomainCatalog) -> String {
        let mut out = String::new();
        out.push_str(&format!("digraph \"{}\" {{\n", dot_escape(catalog.id())));
        out.push_str("  rankdir=LR;\n");
        out.push_str("  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n\n");

        for layer in catalog.layers() {
            out.push_str(&format!("  subgraph cluster_{} {{\n", layer.layer));
            out.push_str(&format!("    label=\"{}\";\n", layer.layer.label()));
            for table in &layer.tables {
                out.push_str(&format!(
                    "    \"{}\" [fillcolor=\"{}\"];\n",
                    dot_escape(&table.name),
                    layer.layer.fill_color()
                ));
            }
            out.push_str("  }\n");
        }

        out.push('\n');
        for edge in self.graph.edge_references() {
            let rel = edge.weight();
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                dot_escape(&rel.from_table),
                dot_escape(&rel.to_table),
                dot_escape(&rel.from_column)
            ));
        }
        out.push_str("}\n");
        out
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Relationship between business entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalRelationship {
    pub from: String,
    pub to: String,
    pub cardinality: Cardinality,
    pub label: String,
}

/// (from keyword, to keyword, cardinality, label)
const LOGICAL_PATTERNS: &[(&str, &str, Cardinality, &str)] = &[
    ("customer", "account", Cardinality::OneToMany, "owns"),
    ("customer", "household", Cardinality::ManyToMany, "member of"),
    ("customer", "contact", Cardinality::OneToOne, "has"),
    ("customer", "product", Cardinality::ManyToMany, "holds"),
    ("customer", "loan", Cardinality::OneToMany, "borrows"),
    ("customer", "card", Cardinality::OneToMany, "holds"),
    ("account", "transaction", Cardinality::OneToMany, "has"),
    ("account", "balance", Cardinality::OneToMany, "has"),
    ("account", "product", Cardinality::ManyToOne, "is of type"),
    ("loan", "collateral", Cardinality::OneToMany, "secured by"),
    ("loan", "payment", Cardinality::OneToMany, "has"),
    ("loan", "borrower", Cardinality::ManyToOne, "belongs to"),
    ("card", "transaction", Cardinality::OneToMany, "has"),
    ("card", "account", Cardinality::ManyToOne, "linked to"),
    ("payment", "account", Cardinality::ManyToOne, "from"),
    ("transaction", "account", Cardinality::ManyToOne, "on"),
    ("branch", "account", Cardinality::OneToMany, "manages"),
    ("channel", "transaction", Cardinality::OneToMany, "processes"),
];

fn normalize_entity(entity: &str) -> String {
    entity
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Relationships between a domain's key entities from the banking pattern
/// list. An entity matches a keyword when either contains the other.
pub fn logical_relationships(entities: &[String]) -> Vec<LogicalRelationship> {
    let normalized: Vec<(&String, String)> = entities
        .iter()
        .map(|e| (e, normalize_entity(e)))
        .filter(|(_, n)| !n.is_empty())
        .collect();
    let find = |keyword: &str| {
        normalized
            .iter()
            .find(|(_, n)| n.contains(keyword) || keyword.contains(n.as_str()))
            .map(|(e, _)| (*e).clone())
    };

    let mut out: Vec<LogicalRelationship> = Vec::new();
    for (from_kw, to_kw, cardinality, label) in LOGICAL_PATTERNS {
        let (Some(from), Some(to)) = (find(from_kw), find(to_kw)) else {
            continue;
        };
        if from == to || out.iter().any(|r| r.from == from && r.to == to) {
            continue;
        }
        out.push(LogicalRelationship {
            from,
            to,
            cardinality: *cardinality,
            label: label.to_string(),
        });
    }
    out
}

#[cfg(test)]
#[path = "erd_test.rs"]
mod tests;
