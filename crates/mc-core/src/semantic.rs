//! Semantic layer definitions: BI measures, attributes and drill paths

use crate::metric::Aggregation;
use serde::{Deserialize, Serialize};

/// BI-facing measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticMeasure {
    pub name: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub technical_name: Option<String>,
    #[serde(default, alias = "aggregationMethod")]
    pub aggregation: Option<Aggregation>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "formula")]
    pub sql: Option<String>,
    #[serde(default, alias = "category")]
    pub folder: Option<String>,
}

/// BI-facing attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticAttribute {
    pub name: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub technical_name: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "dataType", alias = "data_type")]
    pub datatype: Option<String>,
    #[serde(default, alias = "category")]
    pub folder: Option<String>,
    #[serde(default)]
    pub lookup: Option<String>,
}

/// Drill path through attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillPath {
    pub name: String,
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Semantic layer of one domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticLayer {
    #[serde(default)]
    pub measures: Vec<SemanticMeasure>,
    #[serde(default)]
    pub attributes: Vec<SemanticAttribute>,
    #[serde(default, alias = "drill_paths", alias = "drillPaths")]
    pub hierarchies: Vec<DrillPath>,
}

impl SemanticLayer {
    /// Merge another file's definitions into this layer.
    pub fn extend(&mut self, other: SemanticLayer) {
        self.measures.extend(other.measures);
        self.attributes.extend(other.attributes);
        self.hierarchies.extend(other.hierarchies);
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty() && self.attributes.is_empty() && self.hierarchies.is_empty()
    }
}
