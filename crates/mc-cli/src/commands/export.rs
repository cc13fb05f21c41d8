//! Export command implementation

use anyhow::{bail, Context, Result};
use futures::future::try_join_all;
use mc_core::{evaluate_domain, ExportFormat};
use mc_export::{export_file_name, ExportOptions};
use std::path::PathBuf;

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::common::load_project;

/// Execute the export command
pub async fn execute(args: &ExportArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let catalog = project.require_domain(&args.domain)?;

    let formats = requested_formats(&args.formats, project.config.export_formats())?;
    if formats.is_empty() {
        bail!("No export formats requested. Pass --format or set export.formats in mcat.yml");
    }

    let readiness = evaluate_domain(catalog).readiness;
    let not_ready: Vec<&str> = formats
        .iter()
        .filter(|f| !readiness.is_ready(**f))
        .map(|f| f.as_str())
        .collect();
    if !not_ready.is_empty() {
        if !args.force {
            bail!(
                "Domain '{}' is not ready for {} export (use --force to export anyway)",
                catalog.domain.id,
                not_ready.join(", ")
            );
        }
        log::warn!(
            "Exporting '{}' as {} despite incomplete content",
            catalog.domain.id,
            not_ready.join(", ")
        );
    }

    let out_dir = match &args.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => project.target_dir(),
    };
    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let options = ExportOptions::from_config(&project.config, args.stamp);
    let jobs = formats.iter().map(|&format| {
        let path = out_dir.join(export_file_name(&catalog.domain, format));
        let options = &options;
        async move {
            let content = mc_export::export(catalog, format, options)
                .with_context(|| format!("Export failed ({})", format))?;
            tokio::fs::write(&path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok::<_, anyhow::Error>((format, path))
        }
    });
    let written = try_join_all(jobs).await?;

    println!("Exported {} ({}):", catalog.domain.name, catalog.domain.id);
    for (format, path) in &written {
        println!("  {:<7} {}", format.as_str(), path.display());
    }
    Ok(())
}

/// Formats from the command line, or the configured defaults. Duplicates
/// are dropped; order is preserved.
fn requested_formats(args: &[String], defaults: Vec<ExportFormat>) -> Result<Vec<ExportFormat>> {
    let parsed = if args.is_empty() {
        defaults
    } else {
        args.iter()
            .map(|f| f.parse::<ExportFormat>())
            .collect::<Result<Vec<_>, _>>()?
    };
    let mut formats = Vec::with_capacity(parsed.len());
    for format in parsed {
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_formats() {
        let args = vec!["DBML".to_string(), "csv".to_string(), "dbdiagram".to_string()];
        assert_eq!(
            requested_formats(&args, vec![]).unwrap(),
            vec![ExportFormat::Dbml, ExportFormat::Csv]
        );
        assert_eq!(
            requested_formats(&[], vec![ExportFormat::Pdf]).unwrap(),
            vec![ExportFormat::Pdf]
        );
        assert!(requested_formats(&["png".to_string()], vec![]).is_err());
    }
}
