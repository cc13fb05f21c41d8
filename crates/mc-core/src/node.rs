//! File kinds found in a catalog project.
//!
//! Every YAML file below a domain directory carries a `kind` field. The
//! [`CatalogKind`] enum is the discriminator used during discovery.

use crate::layer::Layer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Content kind of a catalog file.
///
/// | kind       | content                                  |
/// |------------|------------------------------------------|
/// | `domain`   | domain metadata (one per domain)         |
/// | `bronze`   | raw tables                               |
/// | `silver`   | cleansed tables                          |
/// | `gold`     | dimensions and facts                     |
/// | `metrics`  | metric categories                        |
/// | `semantic` | BI measures, attributes and drill paths  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Domain,
    Bronze,
    Silver,
    Gold,
    Metrics,
    Semantic,
}

impl CatalogKind {
    /// The layer a table file belongs to, `None` for non-table kinds.
    pub fn layer(&self) -> Option<Layer> {
        match self {
            CatalogKind::Bronze => Some(Layer::Bronze),
            CatalogKind::Silver => Some(Layer::Silver),
            CatalogKind::Gold => Some(Layer::Gold),
            _ => None,
        }
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "domain" => Ok(CatalogKind::Domain),
            "bronze" => Ok(CatalogKind::Bronze),
            "silver" => Ok(CatalogKind::Silver),
            "gold" => Ok(CatalogKind::Gold),
            "metrics" | "metric" => Ok(CatalogKind::Metrics),
            "semantic" => Ok(CatalogKind::Semantic),
            other => Err(format!("unknown kind '{}'", other)),
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CatalogKind::Domain => "domain",
            CatalogKind::Bronze => "bronze",
            CatalogKind::Silver => "silver",
            CatalogKind::Gold => "gold",
            CatalogKind::Metrics => "metrics",
            CatalogKind::Semantic => "semantic",
        };
        f.write_str(s)
    }
}

/// Lightweight probe that deserializes only the `kind` field.
///
/// Kept as a raw string so an unknown kind can be reported and skipped
/// instead of failing the whole load.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogKindProbe {
    #[serde(default)]
    pub(crate) kind: Option<String>,
}
