//! Business metric catalog
//!
//! Metrics are grouped into named categories. A category may list fully
//! described metrics or just metric names.

use serde::{Deserialize, Serialize};

/// Aggregation applied by a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    CountDistinct,
    Min,
    Max,
    Distinct,
    /// Derived from other metrics or a custom expression
    Calculated,
}

impl Aggregation {
    /// Recognise an aggregation label (`SUM`, `average`, `COUNT DISTINCT`).
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "SUM" | "TOTAL" => Some(Aggregation::Sum),
            "AVG" | "AVERAGE" | "MEAN" => Some(Aggregation::Avg),
            "COUNT" => Some(Aggregation::Count),
            "COUNT DISTINCT" | "DISTINCT COUNT" => Some(Aggregation::CountDistinct),
            "MIN" | "MINIMUM" => Some(Aggregation::Min),
            "MAX" | "MAXIMUM" => Some(Aggregation::Max),
            "DISTINCT" => Some(Aggregation::Distinct),
            "CALCULATED" | "DERIVED" | "RATIO" => Some(Aggregation::Calculated),
            _ => None,
        }
    }
}

impl From<String> for Aggregation {
    fn from(s: String) -> Self {
        Aggregation::from_label(&s).unwrap_or_else(|| {
            log::debug!("Treating aggregation '{}' as calculated", s);
            Aggregation::Calculated
        })
    }
}

impl From<Aggregation> for String {
    fn from(a: Aggregation) -> Self {
        a.to_string()
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Count => "COUNT",
            Aggregation::CountDistinct => "COUNT_DISTINCT",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Distinct => "DISTINCT",
            Aggregation::Calculated => "CALCULATED",
        };
        write!(f, "{}", s)
    }
}

/// A business metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Stable identifier (`DEP-001`)
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// SQL or arithmetic definition
    pub formula: Option<String>,
    pub unit: Option<String>,
    pub aggregation: Option<Aggregation>,
    /// Name of the owning category
    pub category: String,
}

impl Metric {
    /// A metric is detailed when it carries both an id and a formula.
    pub fn is_detailed(&self) -> bool {
        self.id.is_some() && self.formula.as_deref().is_some_and(|f| !f.trim().is_empty())
    }
}

/// Named group of metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCategory {
    pub name: String,
    pub metrics: Vec<Metric>,
}

/// Raw YAML shape of one metric entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MetricRecord {
    Name(String),
    Full(MetricFields),
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricFields {
    #[serde(default, alias = "metricId", alias = "metric_id")]
    id: Option<String>,
    #[serde(alias = "displayName")]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "calculation", alias = "sql", alias = "sqlDefinition")]
    formula: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default, alias = "aggregationMethod")]
    aggregation: Option<Aggregation>,
}

/// Raw YAML shape of one category.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRecord {
    #[serde(alias = "category")]
    name: String,
    #[serde(default)]
    metrics: Vec<MetricRecord>,
}

impl From<CategoryRecord> for MetricCategory {
    fn from(record: CategoryRecord) -> Self {
        let category = record.name;
        let metrics = record
            .metrics
            .into_iter()
            .map(|m| match m {
                MetricRecord::Name(name) => Metric {
                    id: None,
                    name,
                    description: None,
                    formula: None,
                    unit: None,
                    aggregation: None,
                    category: category.clone(),
                },
                MetricRecord::Full(f) => Metric {
                    id: f.id,
                    name: f.name,
                    description: f.description,
                    formula: f.formula,
                    unit: f.unit,
                    aggregation: f.aggregation,
                    category: category.clone(),
                },
            })
            .collect();
        MetricCategory {
            name: category,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_with_mixed_entries() {
        let record: CategoryRecord = serde_yaml::from_str(
            r#"
name: Balances
metrics:
  - Total Deposits
  - metricId: DEP-001
    name: Average Balance
    calculation: "SUM(balance) / COUNT(DISTINCT account_id)"
    aggregationMethod: AVG
    unit: USD
"#,
        )
        .unwrap();
        let category = MetricCategory::from(record);
        assert_eq!(category.metrics.len(), 2);
        assert_eq!(category.metrics[0].name, "Total Deposits");
        assert!(!category.metrics[0].is_detailed());
        assert_eq!(category.metrics[1].aggregation, Some(Aggregation::Avg));
        assert!(category.metrics[1].is_detailed());
        assert_eq!(category.metrics[1].category, "Balances");
    }

    #[test]
    fn test_aggregation_labels() {
        assert_eq!(Aggregation::from_label("COUNT DISTINCT"), Some(Aggregation::CountDistinct));
        assert_eq!(Aggregation::from_label("count_distinct"), Some(Aggregation::CountDistinct));
        assert_eq!(Aggregation::from_label("average"), Some(Aggregation::Avg));
        assert_eq!(Aggregation::from_label("weighted_avg"), None);
        assert_eq!(Aggregation::from("weighted_avg".to_string()), Aggregation::Calculated);
    }
}
