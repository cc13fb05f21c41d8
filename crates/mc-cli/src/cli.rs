//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// mcat - Medallion catalog of banking data models
#[derive(Parser, Debug)]
#[command(name = "mcat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to catalog project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List domains, or the tables of one domain
    Ls(LsArgs),

    /// Export a domain's data model to files
    Export(ExportArgs),

    /// Run catalog integrity checks
    Validate(ValidateArgs),

    /// Score domain completeness and export readiness
    Evaluate(EvaluateArgs),

    /// Show inferred table relationships
    Erd(ErdArgs),
}

/// Table or JSON output
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Show the tables of this domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Domain to export
    #[arg(short, long)]
    pub domain: String,

    /// Formats to write (repeatable; default: export.formats from config)
    #[arg(short, long = "format")]
    pub formats: Vec<String>,

    /// Override output directory (default: target_path from config)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Export formats the readiness evaluation marks as not ready
    #[arg(long)]
    pub force: bool,

    /// Embed the generation time in the exported documents
    #[arg(long)]
    pub stamp: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Only validate this domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Checks to run (comma-separated names, default: all)
    #[arg(long, value_delimiter = ',')]
    pub checks: Option<Vec<String>>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub strict: bool,

    /// Also generate and parse each domain's DDL
    #[arg(long)]
    pub ddl: bool,
}

/// Arguments for the evaluate command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Only evaluate this domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the erd command
#[derive(Args, Debug)]
pub struct ErdArgs {
    /// Domain to analyse
    #[arg(short, long)]
    pub domain: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: ErdOutput,
}

/// ERD output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErdOutput {
    /// Relationship table with components and orphans
    Table,
    /// JSON output
    Json,
    /// Graphviz DOT
    Dot,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
