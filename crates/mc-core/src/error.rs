//! Error types for mc-core

use thiserror::Error;

/// Core error type for the medallion catalog
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: Domain not found in the catalog
    #[error("[E005] Domain not found: {id}")]
    DomainNotFound { id: String },

    /// E006: Domain directory without a `kind: domain` file
    #[error("[E006] Domain directory '{path}' has no domain file. Add a YAML file with `kind: domain`")]
    DomainFileMissing { path: String },

    /// E007: Two domain directories declare the same id
    #[error("[E007] Duplicate domain id '{id}' in {path1} and {path2}")]
    DuplicateDomain {
        id: String,
        path1: String,
        path2: String,
    },

    /// E008: More than one domain file inside one domain directory
    #[error("[E008] Domain directory '{path}' contains more than one `kind: domain` file")]
    DuplicateDomainFile { path: String },

    /// E009: Duplicate table name within a domain
    #[error("[E009] Duplicate table '{table}' in domain '{domain}'")]
    DuplicateTable { table: String, domain: String },

    /// E010: Catalog file could not be parsed
    #[error("[E010] Failed to parse catalog file {path}: {details}")]
    CatalogParse { path: String, details: String },

    /// E011: Invalid identifier
    #[error("[E011] Invalid {what} '{value}': {reason}")]
    InvalidName {
        what: &'static str,
        value: String,
        reason: String,
    },

    /// E012: Unknown export format
    #[error("[E012] Unsupported export format '{format}'. Expected one of: pdf, xlsx, csv, drawio, dbml, ddl")]
    UnsupportedFormat { format: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
