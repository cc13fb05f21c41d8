//! End-to-end tests of the mcat binary

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/bank_catalog";

/// Path to the compiled mcat binary
fn mcat_bin() -> String {
    env!("CARGO_BIN_EXE_mcat").to_string()
}

/// Run an `mcat` command and return (stdout, stderr, success).
fn run_mcat(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(mcat_bin())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute mcat with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Project with one bronze-only domain whose primary key names a missing column
fn incomplete_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "mcat.yml", "name: incomplete\n");
    write(
        dir.path(),
        "domains/cards/domain.yml",
        "kind: domain\nid: cards\nname: Cards\npriority: P1\n",
    );
    write(
        dir.path(),
        "domains/cards/bronze.yml",
        r#"
kind: bronze
tables:
  - name: card_raw
    primary_key: [card_number]
    schema:
      card_id: "BIGINT NOT NULL"
      expiry_date: DATE
"#,
    );
    dir
}

// ── ls ──────────────────────────────────────────────────────────────────

#[test]
fn test_ls_domains() {
    let (stdout, stderr, ok) = run_mcat(&["ls", "-p", FIXTURE]);
    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.contains("customer-core"));
    assert!(stdout.contains("deposits"));
    assert!(stdout.contains("2 domains in bank_catalog"));
}

#[test]
fn test_ls_domain_tables_json() {
    let (stdout, stderr, ok) = run_mcat(&["ls", "-p", FIXTURE, "-d", "deposits", "-o", "json"]);
    assert!(ok, "stderr: {}", stderr);
    let tables: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let tables = tables.as_array().unwrap();
    assert_eq!(tables.len(), 6);
    assert_eq!(tables[0]["name"], "bronze.account_raw");
    assert_eq!(tables[0]["layer"], "bronze");
}

#[test]
fn test_unknown_domain_fails() {
    let (_, stderr, ok) = run_mcat(&["ls", "-p", FIXTURE, "-d", "mortgages"]);
    assert!(!ok);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("mortgages"));
}

// ── export ──────────────────────────────────────────────────────────────

#[test]
fn test_export_writes_requested_formats() {
    let out = TempDir::new().unwrap();
    let out_dir = out.path().to_str().unwrap();
    let (stdout, stderr, ok) = run_mcat(&[
        "export", "-p", FIXTURE, "-d", "deposits", "-f", "csv", "-f", "dbml", "-o", out_dir,
    ]);
    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.contains("Exported Deposits (deposits)"));

    let csv = std::fs::read_to_string(out.path().join("deposits_data_model.csv")).unwrap();
    assert!(csv.starts_with("table,column,type,comment,primary_key,foreign_key,nullable,layer\n"));
    assert_eq!(csv.lines().count(), 1 + 22);

    let dbml = std::fs::read_to_string(out.path().join("deposits_data_model.dbml")).unwrap();
    assert!(dbml.contains("Table bronze.account_raw {"));
    assert!(!out.path().join("deposits_data_model.html").exists());
}

#[test]
fn test_export_every_format() {
    let out = TempDir::new().unwrap();
    let out_dir = out.path().to_str().unwrap();
    let mut args = vec!["export", "-p", FIXTURE, "-d", "customer-core", "-o", out_dir];
    for format in ["pdf", "xlsx", "csv", "drawio", "dbml", "ddl"] {
        args.extend(["-f", format]);
    }
    let (_, stderr, ok) = run_mcat(&args);
    assert!(ok, "stderr: {}", stderr);
    for ext in ["html", "xls", "csv", "drawio", "dbml", "sql"] {
        let path = out.path().join(format!("customer_core_data_model.{}", ext));
        assert!(path.exists(), "missing {}", path.display());
    }
}

#[test]
fn test_export_is_reproducible() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    for dir in [&first, &second] {
        let (_, stderr, ok) = run_mcat(&[
            "export",
            "-p",
            FIXTURE,
            "-d",
            "deposits",
            "-f",
            "drawio",
            "-o",
            dir.path().to_str().unwrap(),
        ]);
        assert!(ok, "stderr: {}", stderr);
    }
    let read = |dir: &TempDir| {
        std::fs::read(dir.path().join("deposits_data_model.drawio")).unwrap()
    };
    assert_eq!(read(&first), read(&second));
}

#[test]
fn test_export_refuses_not_ready_format_without_force() {
    let project = incomplete_project();
    let project_dir = project.path().to_str().unwrap();
    let out = TempDir::new().unwrap();
    let out_dir = out.path().to_str().unwrap();

    let (_, stderr, ok) = run_mcat(&["export", "-p", project_dir, "-d", "cards", "-f", "pdf", "-o", out_dir]);
    assert!(!ok);
    assert!(stderr.contains("not ready for pdf export"), "stderr: {}", stderr);
    assert!(!out.path().join("cards_data_model.html").exists());

    let (_, stderr, ok) = run_mcat(&[
        "export", "-p", project_dir, "-d", "cards", "-f", "pdf", "-o", out_dir, "--force",
    ]);
    assert!(ok, "stderr: {}", stderr);
    assert!(out.path().join("cards_data_model.html").exists());
}

#[test]
fn test_export_unknown_format_fails() {
    let out = TempDir::new().unwrap();
    let (_, stderr, ok) = run_mcat(&[
        "export",
        "-p",
        FIXTURE,
        "-d",
        "deposits",
        "-f",
        "png",
        "-o",
        out.path().to_str().unwrap(),
    ]);
    assert!(!ok);
    assert!(stderr.contains("png"), "stderr: {}", stderr);
}

// ── validate ────────────────────────────────────────────────────────────

#[test]
fn test_validate_fixture_is_clean() {
    let (stdout, stderr, ok) = run_mcat(&["validate", "-p", FIXTURE, "--strict", "--ddl"]);
    assert!(ok, "stdout: {}\nstderr: {}", stdout, stderr);
    assert!(stdout.contains("Validating catalog: bank_catalog"));
    assert!(stdout.contains("0 errors, 0 warnings, 0 info"));
}

#[test]
fn test_validate_reports_missing_primary_key_column() {
    let project = incomplete_project();
    let (stdout, _, ok) = run_mcat(&["validate", "-p", project.path().to_str().unwrap()]);
    assert!(!ok);
    assert!(stdout.contains("[C001] error:"), "stdout: {}", stdout);
    assert!(stdout.contains("card_number"));
}

#[test]
fn test_validate_check_filter() {
    let project = incomplete_project();
    let project_dir = project.path().to_str().unwrap();

    let (stdout, _, ok) = run_mcat(&["validate", "-p", project_dir, "--checks", "empty_schema"]);
    assert!(ok, "stdout: {}", stdout);
    assert!(stdout.contains("0 errors, 0 warnings, 0 info"));

    let (_, stderr, ok) = run_mcat(&["validate", "-p", project_dir, "--checks", "bogus"]);
    assert!(!ok);
    assert!(stderr.contains("Unknown check(s): bogus"));
    assert!(stderr.contains("  empty_schema "), "stderr: {}", stderr);
}

// ── evaluate / erd ──────────────────────────────────────────────────────

#[test]
fn test_evaluate_json() {
    let (stdout, stderr, ok) = run_mcat(&["evaluate", "-p", FIXTURE, "-o", "json"]);
    assert!(ok, "stderr: {}", stderr);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let domains = report["domains"].as_array().unwrap();
    assert_eq!(domains.len(), 2);
    assert_eq!(domains[0]["domain_id"], "customer-core");
    assert_eq!(domains[0]["readiness"]["pdf"], true);
    assert_eq!(report["summary"]["total_domains"], 2);
}

#[test]
fn test_evaluate_table() {
    let (stdout, stderr, ok) = run_mcat(&["evaluate", "-p", FIXTURE, "-d", "deposits"]);
    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.starts_with("DOMAIN"));
    assert!(stdout.contains("pdf,xlsx,csv,drawio,dbml,ddl"));
    assert!(stdout.contains("Summary"));
}

#[test]
fn test_erd_json() {
    let (stdout, stderr, ok) = run_mcat(&["erd", "-p", FIXTURE, "-d", "deposits", "-o", "json"]);
    assert!(ok, "stderr: {}", stderr);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let relationships = report["relationships"].as_array().unwrap();
    assert_eq!(relationships.len(), 3);
    assert_eq!(relationships[0]["from_table"], "bronze.transaction_raw");
    assert_eq!(relationships[0]["to_table"], "bronze.account_raw");
    assert_eq!(report["table_count"], 6);
}

#[test]
fn test_erd_dot() {
    let (stdout, stderr, ok) = run_mcat(&["erd", "-p", FIXTURE, "-d", "customer-core", "-o", "dot"]);
    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.starts_with("digraph \"customer-core\" {"));
    assert!(stdout.contains("\"gold.fact_customer_activity\" -> \"gold.dim_customer\""));
}
