//! Medallion layers

use serde::{Deserialize, Serialize};

/// One of the three medallion tiers, ordered by refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Raw ingestion
    Bronze,
    /// Cleansed, conformed
    Silver,
    /// Business-ready dimensional model
    Gold,
}

impl Layer {
    /// All layers in refinement order.
    pub const ALL: [Layer; 3] = [Layer::Bronze, Layer::Silver, Layer::Gold];

    /// Lowercase name (`bronze`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Bronze => "bronze",
            Layer::Silver => "silver",
            Layer::Gold => "gold",
        }
    }

    /// Schema prefix used for qualified table names (`bronze.`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Layer::Bronze => "bronze.",
            Layer::Silver => "silver.",
            Layer::Gold => "gold.",
        }
    }

    /// Title-case label for documents (`Bronze`).
    pub fn label(&self) -> &'static str {
        match self {
            Layer::Bronze => "Bronze",
            Layer::Silver => "Silver",
            Layer::Gold => "Gold",
        }
    }

    /// Diagram fill colour.
    pub fn fill_color(&self) -> &'static str {
        match self {
            Layer::Bronze => "#FFE6CC",
            Layer::Silver => "#D5E8D4",
            Layer::Gold => "#DAE8FC",
        }
    }

    /// Diagram stroke colour.
    pub fn stroke_color(&self) -> &'static str {
        match self {
            Layer::Bronze => "#D79B00",
            Layer::Silver => "#82B366",
            Layer::Gold => "#6C8EBF",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order() {
        assert!(Layer::Bronze < Layer::Silver);
        assert!(Layer::Silver < Layer::Gold);
        assert_eq!(Layer::ALL.to_vec(), vec![Layer::Bronze, Layer::Silver, Layer::Gold]);
    }

    #[test]
    fn test_layer_display_and_prefix() {
        assert_eq!(Layer::Silver.to_string(), "silver");
        assert_eq!(Layer::Gold.prefix(), "gold.");
    }
}
