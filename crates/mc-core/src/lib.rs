//! mc-core - Core library for the medallion catalog
//!
//! This crate provides the catalog model (layers, tables, columns, metrics,
//! semantic layer), configuration parsing, catalog project discovery, ERD
//! relationship inference, domain evaluation and integrity checks used by the
//! exporters and the CLI.

pub mod checks;
pub mod checksum;
pub mod column;
pub mod config;
pub mod domain;
pub mod erd;
pub mod error;
pub mod evaluation;
pub mod format;
pub mod layer;
pub mod metric;
mod names;
pub mod node;
pub mod project;
pub mod semantic;
pub(crate) mod serde_helpers;
pub mod table;

pub use checks::{CatalogCheck, CheckCode, CheckContext, CheckManager, Diagnostic, Severity};
pub use checksum::{catalog_fingerprint, compute_checksum};
pub use column::{Column, ColumnRef};
pub use config::Config;
pub use domain::{Domain, DomainCatalog, DomainSummary, LayerCatalog, LayerSummary, Priority};
pub use erd::{
    infer_relationships, logical_relationships, Cardinality, ErdGraph, LogicalRelationship,
    Relationship,
};
pub use error::{CoreError, CoreResult};
pub use evaluation::{
    evaluate_all, evaluate_domain, DomainEvaluation, EvaluationSummary, Grade, LayerEvaluation,
    Readiness,
};
pub use format::ExportFormat;
pub use layer::Layer;
pub use metric::{Aggregation, Metric, MetricCategory};
pub use names::{DomainId, TableName};
pub use node::CatalogKind;
pub use project::Project;
pub use semantic::{DrillPath, SemanticAttribute, SemanticLayer, SemanticMeasure};
pub use table::{FactType, Hierarchy, LoadType, ScdType, TableDef, TableKind};
