//! Export format identifiers

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Target format of a catalog export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Print-ready HTML document
    Pdf,
    /// Tab-delimited Excel workbook
    Xlsx,
    Csv,
    /// Draw.io (mxGraph) diagram
    Drawio,
    /// dbdiagram.io markup
    Dbml,
    /// CREATE TABLE statements
    Ddl,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Pdf,
        ExportFormat::Xlsx,
        ExportFormat::Csv,
        ExportFormat::Drawio,
        ExportFormat::Dbml,
        ExportFormat::Ddl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Drawio => "drawio",
            ExportFormat::Dbml => "dbml",
            ExportFormat::Ddl => "ddl",
        }
    }

    /// File extension of the written document.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "html",
            ExportFormat::Xlsx => "xls",
            ExportFormat::Csv => "csv",
            ExportFormat::Drawio => "drawio",
            ExportFormat::Dbml => "dbml",
            ExportFormat::Ddl => "sql",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "text/html",
            ExportFormat::Xlsx => "application/vnd.ms-excel",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Drawio => "application/xml",
            ExportFormat::Dbml => "text/plain",
            ExportFormat::Ddl => "application/sql",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "xls" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "drawio" => Ok(ExportFormat::Drawio),
            "dbml" | "dbdiagram" => Ok(ExportFormat::Dbml),
            "ddl" | "sql" => Ok(ExportFormat::Ddl),
            _ => Err(CoreError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("dbdiagram".parse::<ExportFormat>().unwrap(), ExportFormat::Dbml);
        assert_eq!("SQL".parse::<ExportFormat>().unwrap(), ExportFormat::Ddl);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn test_unknown_format() {
        let err = "parquet".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { ref format } if format == "parquet"));
        assert!(err.to_string().starts_with("[E012]"));
    }

    #[test]
    fn test_extensions_and_mime() {
        assert_eq!(ExportFormat::Pdf.extension(), "html");
        assert_eq!(ExportFormat::Xlsx.extension(), "xls");
        assert_eq!(ExportFormat::Drawio.mime_type(), "application/xml");
        assert_eq!(ExportFormat::Ddl.extension(), "sql");
    }
}
