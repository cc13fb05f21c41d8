//! Table definitions for all three medallion layers

use crate::column::Column;
use crate::error::CoreResult;
use crate::layer::Layer;
use crate::names::TableName;
use crate::serde_helpers::{deserialize_columns, deserialize_opt_scalar_string, deserialize_string_or_vec};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of a table in its layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Bronze/silver table
    Table,
    /// Gold dimension
    Dimension,
    /// Gold fact
    Fact,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Table => write!(f, "table"),
            TableKind::Dimension => write!(f, "dimension"),
            TableKind::Fact => write!(f, "fact"),
        }
    }
}

/// How a bronze table is loaded. Unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoadType {
    /// Change data capture
    Cdc,
    /// Scheduled batch extract
    Batch,
    /// Continuous streaming ingestion
    Streaming,
    /// Anything else (`API`, `File drop`, ...)
    Other(String),
}

impl From<String> for LoadType {
    fn from(s: String) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.contains("cdc") || lower.contains("change data") {
            LoadType::Cdc
        } else if lower.contains("stream") || lower.contains("real-time") || lower.contains("realtime") {
            LoadType::Streaming
        } else if lower.contains("batch") || lower.contains("daily") || lower.contains("full") {
            LoadType::Batch
        } else {
            LoadType::Other(s)
        }
    }
}

impl From<LoadType> for String {
    fn from(l: LoadType) -> Self {
        l.to_string()
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadType::Cdc => write!(f, "CDC"),
            LoadType::Batch => write!(f, "Batch"),
            LoadType::Streaming => write!(f, "Streaming"),
            LoadType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Slowly changing dimension strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScdType {
    /// Overwrite in place
    #[serde(rename = "SCD1")]
    Scd1,
    /// Versioned history rows
    #[serde(rename = "SCD2")]
    Scd2,
}

impl FromStr for ScdType {
    type Err = String;

    /// Accepts `SCD2`, `Type 2`, `SCD Type 2`, `Type 2 SCD`, `2`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let has_marker = upper.contains("SCD") || upper.contains("TYPE") || upper.trim().len() == 1;
        if has_marker && upper.contains('2') {
            Ok(ScdType::Scd2)
        } else if has_marker && upper.contains('1') {
            Ok(ScdType::Scd1)
        } else {
            Err(format!("unrecognised SCD type '{}'", s))
        }
    }
}

impl std::fmt::Display for ScdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScdType::Scd1 => write!(f, "SCD Type 1"),
            ScdType::Scd2 => write!(f, "SCD Type 2"),
        }
    }
}

/// Fact table flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactType {
    Transaction,
    PeriodicSnapshot,
    AccumulatingSnapshot,
    Factless,
    Aggregate,
}

impl FromStr for FactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower.contains("accumulat") {
            Ok(FactType::AccumulatingSnapshot)
        } else if lower.contains("snapshot") || lower.contains("periodic") {
            Ok(FactType::PeriodicSnapshot)
        } else if lower.contains("factless") {
            Ok(FactType::Factless)
        } else if lower.contains("aggregat") {
            Ok(FactType::Aggregate)
        } else if lower.contains("transaction") {
            Ok(FactType::Transaction)
        } else {
            Err(format!("unrecognised fact type '{}'", s))
        }
    }
}

impl std::fmt::Display for FactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactType::Transaction => write!(f, "Transaction"),
            FactType::PeriodicSnapshot => write!(f, "Periodic Snapshot"),
            FactType::AccumulatingSnapshot => write!(f, "Accumulating Snapshot"),
            FactType::Factless => write!(f, "Factless"),
            FactType::Aggregate => write!(f, "Aggregate"),
        }
    }
}

/// Drill hierarchy declared on a gold dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub name: String,
    pub levels: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HierarchySpec {
    /// `"Time (Year > Quarter > Month)"`
    Inline(String),
    Full {
        name: String,
        #[serde(default)]
        levels: Vec<String>,
    },
}

impl From<HierarchySpec> for Hierarchy {
    fn from(spec: HierarchySpec) -> Self {
        match spec {
            HierarchySpec::Full { name, levels } => Hierarchy { name, levels },
            HierarchySpec::Inline(text) => match text.split_once('(') {
                Some((name, rest)) => Hierarchy {
                    name: name.trim().to_string(),
                    levels: rest
                        .trim_end_matches(')')
                        .split('>')
                        .map(|l| l.trim().to_string())
                        .filter(|l| !l.is_empty())
                        .collect(),
                },
                None => Hierarchy {
                    name: text.trim().to_string(),
                    levels: Vec::new(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MeasureSpec {
    Name(String),
    Entry { name: String },
}

/// Raw YAML record for one table; converted to [`TableDef`] once the layer
/// and role are known.
#[derive(Debug, Deserialize)]
pub(crate) struct TableRecord {
    #[serde(alias = "table_name")]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "sourceSystem")]
    source_system: Option<String>,
    #[serde(default, alias = "sourceTable")]
    source_table: Option<String>,
    #[serde(default, alias = "loadType")]
    load_type: Option<LoadType>,
    #[serde(default)]
    grain: Option<String>,
    #[serde(
        default,
        alias = "primaryKey",
        alias = "key_fields",
        alias = "keyFields",
        deserialize_with = "deserialize_string_or_vec"
    )]
    primary_key: Vec<String>,
    #[serde(default, alias = "columns", deserialize_with = "deserialize_columns")]
    schema: Vec<Column>,
    #[serde(default, alias = "scdType")]
    scd_type: Option<String>,
    #[serde(default)]
    scd2: Option<bool>,
    #[serde(default, alias = "factType")]
    fact_type: Option<String>,
    /// Free-form `type:` label (`SCD Type 2`, `Transaction`)
    #[serde(default, rename = "type")]
    type_label: Option<String>,
    #[serde(default)]
    measures: Vec<MeasureSpec>,
    #[serde(default)]
    hierarchies: Vec<HierarchySpec>,
    #[serde(default, deserialize_with = "deserialize_opt_scalar_string")]
    partitioning: Option<String>,
    #[serde(default)]
    transformations: Vec<String>,
    #[serde(default, alias = "dataQualityRules")]
    data_quality_rules: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    indexes: Vec<String>,
    #[serde(
        default,
        alias = "estimatedRows",
        alias = "row_count",
        deserialize_with = "deserialize_opt_scalar_string"
    )]
    estimated_rows: Option<String>,
}

/// One entry of a layer file's table list. Entries that do not fit the
/// table shape are kept as `Malformed` so the rest of the file still loads.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TableSlot {
    Record(TableRecord),
    Malformed(serde::de::IgnoredAny),
}

/// A table in one of the medallion layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Layer-qualified name (`bronze.customer_raw`)
    pub name: TableName,
    pub layer: Layer,
    pub kind: TableKind,
    pub description: Option<String>,
    pub source_system: Option<String>,
    pub source_table: Option<String>,
    pub load_type: Option<LoadType>,
    pub grain: Option<String>,
    /// Declared primary key, in declaration order
    pub primary_key: Vec<String>,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    pub scd_type: Option<ScdType>,
    pub fact_type: Option<FactType>,
    pub measures: Vec<String>,
    pub hierarchies: Vec<Hierarchy>,
    pub partitioning: Option<String>,
    pub transformations: Vec<String>,
    pub data_quality_rules: Vec<String>,
    pub indexes: Vec<String>,
    pub estimated_rows: Option<String>,
}

impl TableDef {
    /// Convert a raw record into a table of the given layer and role.
    pub(crate) fn from_record(record: TableRecord, layer: Layer, kind: TableKind) -> CoreResult<Self> {
        let name = TableName::qualified(record.name.trim(), layer)?;

        let mut scd_type = match record.scd_type.as_deref() {
            Some(s) => parse_or_warn::<ScdType>(s, &name),
            None => record
                .scd2
                .map(|is_scd2| if is_scd2 { ScdType::Scd2 } else { ScdType::Scd1 }),
        };
        let mut fact_type = record
            .fact_type
            .as_deref()
            .and_then(|s| parse_or_warn::<FactType>(s, &name));

        if let Some(label) = record.type_label.as_deref() {
            if scd_type.is_none() && kind != TableKind::Fact {
                scd_type = label.parse().ok();
            }
            if fact_type.is_none() && kind == TableKind::Fact {
                fact_type = label.parse().ok();
            }
        }

        Ok(Self {
            name,
            layer,
            kind,
            description: record.description,
            source_system: record.source_system,
            source_table: record.source_table,
            load_type: record.load_type,
            grain: record.grain,
            primary_key: record.primary_key,
            columns: record.schema,
            scd_type,
            fact_type,
            measures: record
                .measures
                .into_iter()
                .map(|m| match m {
                    MeasureSpec::Name(n) | MeasureSpec::Entry { name: n } => n,
                })
                .collect(),
            hierarchies: record.hierarchies.into_iter().map(Hierarchy::from).collect(),
            partitioning: record.partitioning,
            transformations: record.transformations,
            data_quality_rules: record.data_quality_rules,
            indexes: record.indexes,
            estimated_rows: record.estimated_rows,
        })
    }

    /// Parse a single table record from a YAML value.
    pub fn from_value(value: serde_yaml::Value, layer: Layer, kind: TableKind) -> CoreResult<Self> {
        let record: TableRecord = serde_yaml::from_value(value)?;
        Self::from_record(record, layer, kind)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether any columns are declared.
    pub fn has_schema(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Declared primary key, or the columns flagged `PRIMARY KEY` when none
    /// is declared.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        if !self.primary_key.is_empty() {
            return self.primary_key.iter().map(String::as_str).collect();
        }
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Whether `column` is part of the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key_columns().contains(&column)
    }

    /// Whether this table keeps versioned history.
    pub fn is_scd2(&self) -> bool {
        self.scd_type == Some(ScdType::Scd2)
    }

    /// Description or an empty string.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Short label for the SCD/fact type column of tabular exports.
    pub fn type_label(&self) -> String {
        match (self.kind, self.scd_type, self.fact_type) {
            (TableKind::Fact, _, Some(f)) => f.to_string(),
            (_, Some(s), _) => s.to_string(),
            _ => String::new(),
        }
    }
}

fn parse_or_warn<T: FromStr<Err = String>>(value: &str, table: &TableName) -> Option<T> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Table '{}': {}, ignoring", table, e);
            None
        }
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
