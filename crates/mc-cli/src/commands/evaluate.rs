//! Evaluate command implementation

use anyhow::Result;
use mc_core::evaluation::summarize;
use mc_core::{evaluate_domain, DomainEvaluation, EvaluationSummary, ExportFormat, Layer};
use serde::Serialize;

use crate::cli::{EvaluateArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{load_project, print_json, print_table, select_domains};

#[derive(Serialize)]
struct EvaluationReport<'a> {
    domains: &'a [DomainEvaluation],
    summary: &'a EvaluationSummary,
}

/// Execute the evaluate command
pub async fn execute(args: &EvaluateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let evaluations: Vec<DomainEvaluation> = select_domains(&project, args.domain.as_deref())?
        .into_iter()
        .map(evaluate_domain)
        .collect();
    let summary = summarize(&evaluations);

    match args.output {
        OutputFormat::Json => print_json(&EvaluationReport {
            domains: &evaluations,
            summary: &summary,
        })?,
        OutputFormat::Table => {
            print_evaluations(&evaluations);
            print_summary(&summary);
        }
    }
    Ok(())
}

fn layer_cell(evaluation: &DomainEvaluation, layer: Layer) -> String {
    match evaluation.layer(layer) {
        Some(l) => format!("{} ({}%)", l.table_count, l.completeness),
        None => "-".to_string(),
    }
}

fn ready_formats(evaluation: &DomainEvaluation) -> String {
    let ready: Vec<&str> = ExportFormat::ALL
        .iter()
        .filter(|f| evaluation.readiness.is_ready(**f))
        .map(|f| f.as_str())
        .collect();
    if ready.is_empty() {
        "-".to_string()
    } else {
        ready.join(",")
    }
}

fn print_evaluations(evaluations: &[DomainEvaluation]) {
    let rows: Vec<Vec<String>> = evaluations
        .iter()
        .map(|e| {
            vec![
                e.domain_id.clone(),
                e.priority.to_string(),
                e.score.to_string(),
                e.grade.to_string(),
                layer_cell(e, Layer::Bronze),
                layer_cell(e, Layer::Silver),
                layer_cell(e, Layer::Gold),
                e.metrics_count.to_string(),
                ready_formats(e),
            ]
        })
        .collect();
    print_table(
        &[
            "DOMAIN", "PRIORITY", "SCORE", "GRADE", "BRONZE", "SILVER", "GOLD", "METRICS", "READY",
        ],
        &rows,
    );

    for e in evaluations {
        if e.issues.is_empty() && e.recommendations.is_empty() {
            continue;
        }
        println!("\n{} ({})", e.domain_name, e.domain_id);
        for issue in &e.issues {
            println!("  issue: {}", issue);
        }
        for rec in &e.recommendations {
            println!("  recommendation: {}", rec);
        }
    }
}

fn print_summary(summary: &EvaluationSummary) {
    let grades = &summary.grade_distribution;
    println!("\nSummary");
    println!("  Domains:        {}", summary.total_domains);
    println!("  Average score:  {:.1}", summary.average_score);
    println!(
        "  Complete:       P0 {}, P1 {}, P2 {}",
        summary.p0_complete, summary.p1_complete, summary.p2_complete
    );
    println!(
        "  Coverage:       bronze {}, silver {}, gold {}, metrics {}",
        summary.domains_with_bronze,
        summary.domains_with_silver,
        summary.domains_with_gold,
        summary.domains_with_metrics
    );
    println!(
        "  Export ready:   {} (ERD ready {})",
        summary.export_ready, summary.erd_ready
    );
    println!(
        "  Grades:         A {}, B {}, C {}, D {}, F {}",
        grades.a, grades.b, grades.c, grades.d, grades.f
    );
    for issue in &summary.critical_issues {
        println!("  critical: {}", issue);
    }
    for rec in &summary.recommendations {
        println!("  recommendation: {}", rec);
    }
}
