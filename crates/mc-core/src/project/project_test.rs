use super::*;
use crate::checks::{CheckCode, CheckContext, CheckManager};
use crate::layer::Layer;
use crate::table::TableKind;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup_test_project() -> TempDir {
    let dir = TempDir::new().unwrap();

    write(dir.path(), "mcat.yml", "name: test_bank\n");
    write(
        dir.path(),
        "domains/deposits/domain.yml",
        r#"
kind: domain
id: deposits
name: Deposits
priority: P0
keyEntities: [Account, Customer]
"#,
    );
    write(
        dir.path(),
        "domains/deposits/bronze.yml",
        r#"
kind: bronze
estimated_size: 2TB
tables:
  - name: account_raw
    schema:
      account_id: "BIGINT PRIMARY KEY"
      customer_id: "BIGINT NOT NULL"
  - description: "record without a name"
  - name: bronze.balance_raw
"#,
    );
    write(
        dir.path(),
        "domains/deposits/gold/model.yml",
        r#"
kind: gold
dimensions:
  - name: dim_account
facts:
  - name: fact_balance
    grain: Account x Date
"#,
    );
    write(
        dir.path(),
        "domains/deposits/metrics.yml",
        r#"
kind: metrics
categories:
  - name: Balances
    metrics:
      - Total Deposits
      - id: DEP-002
        name: Average Balance
        formula: AVG(balance)
"#,
    );
    write(dir.path(), "domains/deposits/notes.yml", "kind: notes\ntext: ignored\n");
    write(dir.path(), "domains/deposits/readme.md", "# not yaml\n");
    write(
        dir.path(),
        "domains/loans/domain.yml",
        "kind: domain\nid: loans\nname: Loans\n",
    );

    dir
}

#[test]
fn test_load_project() {
    let dir = setup_test_project();
    let project = Project::load(dir.path()).unwrap();

    assert_eq!(project.config.name, "test_bank");
    assert_eq!(project.domain_ids(), vec!["deposits", "loans"]);
    assert_eq!(project.target_dir(), dir.path().join("target"));
}

#[test]
fn test_domain_content() {
    let dir = setup_test_project();
    let project = Project::load(dir.path()).unwrap();
    let deposits = project.get_domain("deposits").unwrap();

    let bronze = deposits.layer(Layer::Bronze).unwrap();
    // The record without a name is skipped, the rest still load.
    assert_eq!(bronze.tables.len(), 2);
    assert_eq!(bronze.tables[0].name, "bronze.account_raw");
    assert_eq!(bronze.tables[1].name, "bronze.balance_raw");
    assert_eq!(bronze.estimated_size.as_deref(), Some("2TB"));

    let gold = deposits.layer(Layer::Gold).unwrap();
    assert_eq!(gold.tables[0].kind, TableKind::Dimension);
    assert_eq!(gold.tables[1].kind, TableKind::Fact);
    assert!(deposits.silver.is_none());

    assert_eq!(deposits.metric_count(), 2);
    let loans = project.get_domain("loans").unwrap();
    assert_eq!(loans.tables().count(), 0);
}

#[test]
fn test_missing_domain_file() {
    let dir = setup_test_project();
    write(dir.path(), "domains/cards/bronze.yml", "kind: bronze\ntables: []\n");
    let err = Project::load(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::DomainFileMissing { .. }));
}

#[test]
fn test_duplicate_domain_id() {
    let dir = setup_test_project();
    write(
        dir.path(),
        "domains/loans-copy/domain.yml",
        "kind: domain\nid: loans\nname: Loans again\n",
    );
    let err = Project::load(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateDomain { ref id, .. } if id == "loans"));
}

#[test]
fn test_duplicate_table() {
    let dir = setup_test_project();
    write(
        dir.path(),
        "domains/deposits/bronze_extra.yml",
        "kind: bronze\ntables:\n  - name: account_raw\n",
    );
    let err = Project::load(dir.path()).unwrap_err();
    assert!(
        matches!(err, CoreError::DuplicateTable { ref table, .. } if table == "bronze.account_raw")
    );
}

#[test]
fn test_unparseable_file() {
    let dir = setup_test_project();
    write(dir.path(), "domains/loans/silver.yml", "kind: silver\ntables: [\n");
    let err = Project::load(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::CatalogParse { .. }));
}

#[test]
fn test_project_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Project::load(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CoreError::ProjectNotFound { .. }));
}

#[test]
fn test_require_domain() {
    let dir = setup_test_project();
    let project = Project::load(dir.path()).unwrap();
    assert!(project.require_domain("deposits").is_ok());
    assert!(matches!(
        project.require_domain("treasury"),
        Err(CoreError::DomainNotFound { .. })
    ));
}

#[test]
fn test_duplicate_schema_key_loads_and_is_reported() {
    let dir = setup_test_project();
    write(
        dir.path(),
        "domains/loans/bronze.yml",
        r#"
kind: bronze
tables:
  - name: loan_raw
    primary_key: [loan_id]
    schema:
      loan_id: "BIGINT NOT NULL"
      principal: DECIMAL(18,2)
      principal: STRING
  - name: repayment_raw
    schema:
      repayment_id: "BIGINT PRIMARY KEY"
  - name: [not, a, name]
"#,
    );
    let project = Project::load(dir.path()).unwrap();
    let loans = project.get_domain("loans").unwrap();

    let bronze = loans.layer(Layer::Bronze).unwrap();
    assert_eq!(bronze.tables.len(), 2);
    assert_eq!(
        bronze.tables[0].column_names(),
        vec!["loan_id", "principal", "principal"]
    );
    assert_eq!(bronze.tables[1].name, "bronze.repayment_raw");

    let filter = vec!["duplicate_columns".to_string()];
    let diags = CheckManager::with_defaults().run(loans, &CheckContext::default(), Some(&filter));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, CheckCode::C002);
    assert_eq!(diags[0].table.as_deref(), Some("bronze.loan_raw"));
    assert_eq!(diags[0].column.as_deref(), Some("principal"));
}
