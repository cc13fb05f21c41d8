//! Domain completeness scoring and export readiness
//!
//! Scores are computed from the loaded catalog: layer presence, declared
//! schemas, inferred relationships, metric coverage and key entities.

use crate::domain::{DomainCatalog, Priority};
use crate::erd::{infer_relationships, logical_relationships, Relationship};
use crate::format::ExportFormat;
use crate::layer::Layer;
use crate::project::Project;
use serde::Serialize;

/// Letter grade derived from the completeness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => Grade::A,
            s if s >= 80 => Grade::B,
            s if s >= 70 => Grade::C,
            s if s >= 60 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Per-layer evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerEvaluation {
    pub layer: Layer,
    pub table_count: usize,
    pub has_schema: bool,
    pub has_primary_keys: bool,
    pub relationship_count: usize,
    /// 0 (no tables), 50 (tables without schemas) or 100
    pub completeness: u8,
}

impl LayerEvaluation {
    pub fn has_relationships(&self) -> bool {
        self.relationship_count > 0
    }
}

/// Whether a domain has enough content for each export format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub pdf: bool,
    pub xlsx: bool,
    pub csv: bool,
    pub drawio: bool,
    pub dbml: bool,
    pub ddl: bool,
}

impl Readiness {
    pub fn is_ready(&self, format: ExportFormat) -> bool {
        match format {
            ExportFormat::Pdf => self.pdf,
            ExportFormat::Xlsx => self.xlsx,
            ExportFormat::Csv => self.csv,
            ExportFormat::Drawio => self.drawio,
            ExportFormat::Dbml => self.dbml,
            ExportFormat::Ddl => self.ddl,
        }
    }
}

/// Evaluation of one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvaluation {
    pub domain_id: String,
    pub domain_name: String,
    pub priority: Priority,
    pub bronze: Option<LayerEvaluation>,
    pub silver: Option<LayerEvaluation>,
    pub gold: Option<LayerEvaluation>,
    pub metrics_count: usize,
    pub has_detailed_metrics: bool,
    pub logical_entities_count: usize,
    pub logical_relationships_count: usize,
    pub physical_tables_count: usize,
    pub physical_columns_count: usize,
    pub readiness: Readiness,
    /// 0 to 100
    pub score: u32,
    pub grade: Grade,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl DomainEvaluation {
    pub fn layer(&self, layer: Layer) -> Option<&LayerEvaluation> {
        match layer {
            Layer::Bronze => self.bronze.as_ref(),
            Layer::Silver => self.silver.as_ref(),
            Layer::Gold => self.gold.as_ref(),
        }
    }
}

/// Count of domains per grade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
    pub f: usize,
}

/// Totals across all evaluated domains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub total_domains: usize,
    pub average_score: f64,
    pub p0_complete: usize,
    pub p1_complete: usize,
    pub p2_complete: usize,
    pub domains_with_bronze: usize,
    pub domains_with_silver: usize,
    pub domains_with_gold: usize,
    pub domains_with_metrics: usize,
    pub export_ready: usize,
    pub erd_ready: usize,
    pub grade_distribution: GradeDistribution,
    pub critical_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

fn evaluate_layer(
    catalog: &DomainCatalog,
    layer: Layer,
    relationships: &[Relationship],
) -> Option<LayerEvaluation> {
    let layer_catalog = catalog.layer(layer).filter(|l| !l.is_empty())?;
    let table_count = layer_catalog.tables.len();
    let has_schema = layer_catalog.has_schema();
    let relationship_count = relationships
        .iter()
        .filter(|r| layer_catalog.tables.iter().any(|t| t.name == r.from_table))
        .count();
    Some(LayerEvaluation {
        layer,
        table_count,
        has_schema,
        has_primary_keys: layer_catalog
            .tables
            .iter()
            .any(|t| !t.primary_key_columns().is_empty()),
        relationship_count,
        completeness: if has_schema { 100 } else { 50 },
    })
}

/// Evaluate one domain.
pub fn evaluate_domain(catalog: &DomainCatalog) -> DomainEvaluation {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let relationships = infer_relationships(catalog);
    let bronze = evaluate_layer(catalog, Layer::Bronze, &relationships);
    let silver = evaluate_layer(catalog, Layer::Silver, &relationships);
    let gold = evaluate_layer(catalog, Layer::Gold, &relationships);

    if bronze.is_none() {
        issues.push("Missing Bronze Layer definition".to_string());
        recommendations.push("Define Bronze Layer raw tables with schemas".to_string());
    }
    if silver.is_none() {
        issues.push("Missing Silver Layer definition".to_string());
        recommendations.push("Define Silver Layer curated/cleansed tables".to_string());
    }
    if gold.is_none() {
        issues.push("Missing Gold Layer definition".to_string());
        recommendations.push("Define Gold Layer dimensional model (facts & dimensions)".to_string());
    }

    let catalog_metrics = catalog.metric_count();
    let metrics_count = if catalog_metrics > 0 {
        catalog_metrics
    } else {
        catalog.domain.key_metrics_count
    };
    let has_detailed_metrics = catalog.metrics().any(|m| m.is_detailed());

    if metrics_count == 0 {
        issues.push("No metrics defined".to_string());
        recommendations.push("Define key business metrics for this domain".to_string());
    } else if metrics_count < 50 {
        recommendations.push(format!(
            "Expand metrics catalog (current: {}, target: 200+)",
            metrics_count
        ));
    }
    if !has_detailed_metrics && metrics_count > 0 {
        issues.push("Metrics lack detailed definitions (IDs, formulas, units)".to_string());
        recommendations.push(
            "Convert metrics from simple names to detailed entries with IDs, formulas, and units"
                .to_string(),
        );
    }

    let logical_entities_count = catalog.domain.key_entities.len();
    let logical_relationships_count = logical_relationships(&catalog.domain.key_entities).len();

    let physical_tables_count = catalog.tables().count();
    let physical_columns_count = catalog.tables().map(|t| t.columns.len()).sum();

    let any_layer = bronze.is_some() || silver.is_some() || gold.is_some();
    let readiness = Readiness {
        pdf: bronze.is_some() && silver.is_some() && gold.is_some() && metrics_count > 0,
        xlsx: any_layer,
        csv: any_layer,
        drawio: gold.is_some() && logical_entities_count > 0,
        dbml: bronze.as_ref().is_some_and(|b| b.has_schema),
        ddl: catalog.tables().any(|t| t.has_schema()),
    };

    if !readiness.drawio {
        recommendations.push("Define entity relationships for ERD diagram generation".to_string());
    }
    if !readiness.dbml {
        recommendations.push("Add detailed table schemas for database diagram generation".to_string());
    }

    let mut score = 0u32;
    let mut add = |condition: bool, points: u32| {
        if condition {
            score += points;
        }
    };
    add(bronze.is_some(), 10);
    add(bronze.as_ref().is_some_and(|l| l.has_schema), 10);
    add(silver.is_some(), 8);
    add(silver.as_ref().is_some_and(|l| l.has_schema), 7);
    add(gold.is_some(), 10);
    add(gold.as_ref().is_some_and(LayerEvaluation::has_relationships), 10);
    add(metrics_count > 0, 5);
    add(metrics_count >= 50, 5);
    add(metrics_count >= 100, 5);
    add(metrics_count >= 200, 5);
    add(has_detailed_metrics, 5);
    add(logical_entities_count > 0, 5);
    add(logical_entities_count >= 10, 5);
    add(readiness.pdf, 3);
    add(readiness.xlsx, 2);
    add(readiness.drawio, 3);
    add(readiness.dbml, 2);

    DomainEvaluation {
        domain_id: catalog.domain.id.to_string(),
        domain_name: catalog.domain.name.clone(),
        priority: catalog.domain.priority,
        bronze,
        silver,
        gold,
        metrics_count,
        has_detailed_metrics,
        logical_entities_count,
        logical_relationships_count,
        physical_tables_count,
        physical_columns_count,
        readiness,
        score,
        grade: Grade::from_score(score),
        issues,
        recommendations,
    }
}

/// Summarise a set of evaluations.
pub fn summarize(evaluations: &[DomainEvaluation]) -> EvaluationSummary {
    let total = evaluations.len();
    let count = |pred: fn(&DomainEvaluation) -> bool| evaluations.iter().filter(|&e| pred(e)).count();
    let complete = |p: Priority| {
        evaluations
            .iter()
            .filter(|e| e.priority == p && e.score >= 90)
            .count()
    };

    let grade_distribution = GradeDistribution {
        a: count(|e| e.grade == Grade::A),
        b: count(|e| e.grade == Grade::B),
        c: count(|e| e.grade == Grade::C),
        d: count(|e| e.grade == Grade::D),
        f: count(|e| e.grade == Grade::F),
    };

    let domains_with_bronze = count(|e| e.bronze.is_some());
    let domains_with_gold = count(|e| e.gold.is_some());
    let erd_ready = count(|e| e.readiness.drawio && e.readiness.dbml);

    let critical_issues = evaluations
        .iter()
        .filter(|e| e.priority == Priority::P0 && e.score < 80)
        .map(|e| {
            format!(
                "{} (P0): Completeness {}% - {}",
                e.domain_name,
                e.score,
                e.issues.join(", ")
            )
        })
        .collect();

    let mut recommendations = Vec::new();
    if grade_distribution.f > 0 {
        recommendations.push(format!(
            "{} domain(s) need immediate attention (Grade F)",
            grade_distribution.f
        ));
    }
    if domains_with_bronze < total {
        recommendations.push(format!(
            "{} domain(s) missing Bronze Layer",
            total - domains_with_bronze
        ));
    }
    if domains_with_gold < total {
        recommendations.push(format!(
            "{} domain(s) missing Gold Layer (dimensional model)",
            total - domains_with_gold
        ));
    }
    // erd_ready < 80% of domains
    if erd_ready * 5 < total * 4 {
        recommendations.push("Enhance entity relationships for better ERD diagram generation".to_string());
    }

    let average_score = if total == 0 {
        0.0
    } else {
        evaluations.iter().map(|e| f64::from(e.score)).sum::<f64>() / total as f64
    };

    EvaluationSummary {
        total_domains: total,
        average_score,
        p0_complete: complete(Priority::P0),
        p1_complete: complete(Priority::P1),
        p2_complete: complete(Priority::P2),
        domains_with_bronze,
        domains_with_silver: count(|e| e.silver.is_some()),
        domains_with_gold,
        domains_with_metrics: count(|e| e.metrics_count > 0),
        export_ready: count(|e| e.readiness.pdf),
        erd_ready,
        grade_distribution,
        critical_issues,
        recommendations,
    }
}

/// Evaluate every domain of a project, in domain id order.
pub fn evaluate_all(project: &Project) -> (Vec<DomainEvaluation>, EvaluationSummary) {
    let evaluations: Vec<DomainEvaluation> = project.domains.values().map(evaluate_domain).collect();
    let summary = summarize(&evaluations);
    (evaluations, summary)
}

#[cfg(test)]
#[path = "evaluation_test.rs"]
mod tests;
