//! Configuration types and parsing for mcat.yml

use crate::error::{CoreError, CoreResult};
use crate::format::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default output directory for exports
pub const DEFAULT_TARGET_DIR: &str = "target";

/// Main catalog project configuration from mcat.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Directories holding one sub-directory per domain
    #[serde(default = "default_catalog_paths")]
    pub catalog_paths: Vec<String>,

    /// Output directory for exports
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Database label written into the DBML project header
    #[serde(default = "default_database_type")]
    pub database_type: String,

    /// Export defaults
    #[serde(default)]
    pub export: ExportConfig,

    /// Thresholds for `mcat validate`
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Export defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Formats written by `mcat export` when none are given
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,

    /// Embed the generation time in exported documents
    #[serde(default)]
    pub stamp: bool,

    /// Maximum columns drawn per Draw.io table (0 = all)
    #[serde(default)]
    pub drawio_max_columns: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            stamp: false,
            drawio_max_columns: 0,
        }
    }
}

/// Thresholds used by the integrity checks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Audit columns every bronze table must carry
    #[serde(default)]
    pub required_audit_columns: Vec<String>,

    /// Minimum number of bronze tables per domain
    #[serde(default)]
    pub min_bronze_tables: usize,

    /// Minimum number of metrics per domain
    #[serde(default)]
    pub min_metrics: usize,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_catalog_paths() -> Vec<String> {
    vec!["domains".to_string()]
}

fn default_target_path() -> String {
    DEFAULT_TARGET_DIR.to_string()
}

fn default_database_type() -> String {
    "Generic".to_string()
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string(), "dbml".to_string()]
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for mcat.yml or mcat.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("mcat.yml");
        let yaml_path = dir.join("mcat.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.catalog_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one catalog_paths entry must be specified".to_string(),
            });
        }

        for format in &self.export.formats {
            if let Err(e) = format.parse::<ExportFormat>() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("export.formats: {}", e),
                });
            }
        }

        Ok(())
    }

    /// Catalog directories as absolute paths
    pub fn catalog_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.catalog_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Export output directory as an absolute path
    pub fn target_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }

    /// Default export formats, parsed
    pub fn export_formats(&self) -> Vec<ExportFormat> {
        self.export
            .formats
            .iter()
            .filter_map(|f| f.parse().ok())
            .collect()
    }
}
