//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mc_core::{Config, DomainCatalog, Project};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main exits with the code and prints nothing.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the catalog project named by the global arguments.
///
/// `--config` replaces the project's own `mcat.yml`.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = Path::new(&global.project_dir);
    let project = match &global.config {
        Some(config_path) => {
            let config = Config::load(Path::new(config_path))
                .with_context(|| format!("Failed to load config {}", config_path))?;
            let root = std::fs::canonicalize(root)
                .with_context(|| format!("Project directory {} not found", root.display()))?;
            Project::load_with_config(root, config)
        }
        None => Project::load(root),
    };
    project.context("Failed to load catalog project")
}

/// The requested domain, or every domain when none is named.
pub(crate) fn select_domains<'a>(
    project: &'a Project,
    domain: Option<&str>,
) -> Result<Vec<&'a DomainCatalog>> {
    match domain {
        Some(id) => Ok(vec![project.require_domain(id)?]),
        None => Ok(project.domains.values().collect()),
    }
}

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a left-aligned table with a dashed separator under the header.
/// Columns are separated by two spaces.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

/// Pretty-print a value as JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths() {
        let rows = vec![
            vec!["deposits".to_string(), "P0".to_string()],
            vec!["customer-core".to_string(), "P1".to_string()],
        ];
        assert_eq!(calculate_column_widths(&["ID", "PRIORITY"], &rows), vec![13, 8]);
    }

    #[test]
    fn test_exit_code_prints_nothing() {
        assert_eq!(ExitCode(2).to_string(), "");
    }
}
