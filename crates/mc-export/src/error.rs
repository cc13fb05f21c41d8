//! Error types for mc-export

use mc_core::CoreError;
use thiserror::Error;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Template render error (X001)
    #[error("[X001] Template render error: {0}")]
    Template(String),

    /// Generated DDL rejected by the SQL parser (X002)
    #[error("[X002] Generated DDL does not parse: {message}")]
    InvalidDdl { message: String },

    /// Malformed DBML input (X003)
    #[error("[X003] DBML parse error at line {line}: {message}")]
    DbmlParse { line: usize, message: String },

    /// Catalog error surfaced while exporting
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for ExportError
pub type ExportResult<T> = Result<T, ExportError>;

impl From<minijinja::Error> for ExportError {
    fn from(err: minijinja::Error) -> Self {
        ExportError::Template(err.to_string())
    }
}
