//! Banking domains and their per-layer catalogs

use crate::layer::Layer;
use crate::metric::{Metric, MetricCategory};
use crate::names::DomainId;
use crate::semantic::SemanticLayer;
use crate::table::{TableDef, TableKind};
use serde::{Deserialize, Serialize};

/// Delivery priority of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    #[default]
    P2,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::P0 => write!(f, "P0"),
            Priority::P1 => write!(f, "P1"),
            Priority::P2 => write!(f, "P2"),
        }
    }
}

/// Domain metadata from the `kind: domain` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    /// Banking area (`retail`, `commercial`, `enterprise`)
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
    #[serde(default, alias = "businessValue")]
    pub business_value: Option<String>,
    #[serde(default, alias = "keyEntities")]
    pub key_entities: Vec<String>,
    /// Declared metric count, used when the catalog lists no metrics
    #[serde(default, alias = "keyMetricsCount", alias = "keyMetrics")]
    pub key_metrics_count: usize,
}

/// Tables of one layer of one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerCatalog {
    pub layer: Layer,
    pub tables: Vec<TableDef>,
    pub estimated_size: Option<String>,
}

/// Counts for one layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub layer: Layer,
    pub table_count: usize,
    pub dimension_count: usize,
    pub fact_count: usize,
    pub column_count: usize,
    pub estimated_size: Option<String>,
}

impl LayerCatalog {
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            tables: Vec::new(),
            estimated_size: None,
        }
    }

    pub fn summary(&self) -> LayerSummary {
        let count_kind = |kind: TableKind| self.tables.iter().filter(|t| t.kind == kind).count();
        LayerSummary {
            layer: self.layer,
            table_count: self.tables.len(),
            dimension_count: count_kind(TableKind::Dimension),
            fact_count: count_kind(TableKind::Fact),
            column_count: self.tables.iter().map(|t| t.columns.len()).sum(),
            estimated_size: self.estimated_size.clone(),
        }
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.iter().filter(|t| t.kind == TableKind::Dimension)
    }

    pub fn facts(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.iter().filter(|t| t.kind == TableKind::Fact)
    }

    /// Whether at least one table declares columns.
    pub fn has_schema(&self) -> bool {
        self.tables.iter().any(TableDef::has_schema)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Everything the catalog knows about one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCatalog {
    pub domain: Domain,
    pub bronze: Option<LayerCatalog>,
    pub silver: Option<LayerCatalog>,
    pub gold: Option<LayerCatalog>,
    pub metrics: Vec<MetricCategory>,
    pub semantic: Option<SemanticLayer>,
}

/// Per-domain totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub id: String,
    pub name: String,
    pub priority: Priority,
    pub layers: Vec<LayerSummary>,
    pub total_tables: usize,
    pub total_columns: usize,
    pub metric_count: usize,
    pub semantic_measure_count: usize,
}

impl DomainCatalog {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            bronze: None,
            silver: None,
            gold: None,
            metrics: Vec::new(),
            semantic: None,
        }
    }

    pub fn id(&self) -> &DomainId {
        &self.domain.id
    }

    /// The catalog of `layer`, if the domain defines it.
    pub fn layer(&self, layer: Layer) -> Option<&LayerCatalog> {
        match layer {
            Layer::Bronze => self.bronze.as_ref(),
            Layer::Silver => self.silver.as_ref(),
            Layer::Gold => self.gold.as_ref(),
        }
    }

    pub(crate) fn layer_mut(&mut self, layer: Layer) -> &mut LayerCatalog {
        let slot = match layer {
            Layer::Bronze => &mut self.bronze,
            Layer::Silver => &mut self.silver,
            Layer::Gold => &mut self.gold,
        };
        slot.get_or_insert_with(|| LayerCatalog::new(layer))
    }

    /// Defined layers in bronze, silver, gold order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerCatalog> {
        [&self.bronze, &self.silver, &self.gold]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    /// Whether `layer` is defined and has at least one table.
    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layer(layer).is_some_and(|l| !l.is_empty())
    }

    /// All tables: bronze, silver, gold; declaration order within a layer.
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.layers().flat_map(|l| l.tables.iter())
    }

    /// Find a table by qualified or bare name.
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables()
            .find(|t| t.name == name)
            .or_else(|| self.tables().find(|t| t.name.matches(name)))
    }

    /// All metrics, flattened across categories.
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter().flat_map(|c| c.metrics.iter())
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.iter().map(|c| c.metrics.len()).sum()
    }

    pub fn summary(&self) -> DomainSummary {
        let layers: Vec<LayerSummary> = self.layers().map(LayerCatalog::summary).collect();
        DomainSummary {
            id: self.domain.id.to_string(),
            name: self.domain.name.clone(),
            priority: self.domain.priority,
            total_tables: layers.iter().map(|l| l.table_count).sum(),
            total_columns: layers.iter().map(|l| l.column_count).sum(),
            layers,
            metric_count: self.metric_count(),
            semantic_measure_count: self.semantic.as_ref().map_or(0, |s| s.measures.len()),
        }
    }
}

#[cfg(test)]
#[path = "domain_test.rs"]
mod tests;
