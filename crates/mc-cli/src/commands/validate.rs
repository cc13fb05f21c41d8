//! Validate command implementation

use anyhow::{bail, Result};
use mc_core::{CheckContext, CheckManager, Diagnostic, ExportFormat, Severity};
use mc_export::{export, validate_ddl, ExportOptions};

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{load_project, select_domains, ExitCode};

/// Diagnostic counts by severity
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    errors: usize,
    warnings: usize,
    infos: usize,
}

impl Tally {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.infos += 1,
        }
    }

    fn failed(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }
}

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let manager = CheckManager::with_defaults();

    if let Some(filter) = &args.checks {
        if let Some(message) = unknown_checks(&manager, filter) {
            bail!(message);
        }
    }

    let ctx = CheckContext::from(&project.config.validation);
    let domains = select_domains(&project, args.domain.as_deref())?;
    println!("Validating catalog: {}\n", project.config.name);

    let mut tally = Tally::default();
    for catalog in domains {
        let diagnostics = manager.run(catalog, &ctx, args.checks.as_deref());
        for d in &diagnostics {
            tally.add(d.severity);
        }

        let mut ddl_error = None;
        if args.ddl {
            let checked = export(catalog, ExportFormat::Ddl, &ExportOptions::default())
                .map_err(anyhow::Error::from)
                .and_then(|sql| validate_ddl(&sql).map_err(anyhow::Error::from));
            if let Err(e) = checked {
                tally.errors += 1;
                ddl_error = Some(e);
            }
        }

        if diagnostics.is_empty() && ddl_error.is_none() {
            println!("  ✓ {}", catalog.domain.id);
            continue;
        }
        println!("  {} ({} finding(s))", catalog.domain.id, diagnostics.len());
        for d in &diagnostics {
            print_diagnostic(d);
        }
        if let Some(e) = ddl_error {
            println!("    [DDL] error: {:#}", e);
        }
    }

    println!(
        "\n{} errors, {} warnings, {} info",
        tally.errors, tally.warnings, tally.infos
    );

    if tally.failed(args.strict) {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Error text naming the unknown entries of a check filter and listing the
/// registered checks, or `None` when every name is known.
fn unknown_checks(manager: &CheckManager, filter: &[String]) -> Option<String> {
    let known = manager.check_names();
    let unknown: Vec<&str> = filter
        .iter()
        .map(String::as_str)
        .filter(|name| !known.contains(name))
        .collect();
    if unknown.is_empty() {
        return None;
    }
    let available = manager.describe();
    let width = available.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut message = format!("Unknown check(s): {}. Available checks:", unknown.join(", "));
    for (name, description) in available {
        message.push_str(&format!("\n  {:<width$}  {}", name, description, width = width));
    }
    Some(message)
}

fn print_diagnostic(d: &Diagnostic) {
    let location = match (&d.table, &d.column) {
        (Some(table), Some(column)) => format!(" {}.{}", table, column),
        (Some(table), None) => format!(" {}", table),
        _ => String::new(),
    };
    println!("    {}{}", d, location);
    if let Some(hint) = &d.hint {
        println!("      hint: {}", hint);
    }
}
