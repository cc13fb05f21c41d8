use super::*;
use crate::domain::Domain;
use crate::layer::Layer;
use crate::metric::{CategoryRecord, MetricCategory};
use crate::table::{TableDef, TableKind};

fn table(yaml: &str, layer: Layer, kind: TableKind) -> TableDef {
    TableDef::from_value(serde_yaml::from_str(yaml).unwrap(), layer, kind).unwrap()
}

fn catalog() -> DomainCatalog {
    let domain: Domain = serde_yaml::from_str("id: deposits\nname: Deposits\n").unwrap();
    let mut c = DomainCatalog::new(domain);

    let bronze = c.layer_mut(Layer::Bronze);
    bronze.tables.push(table(
        r#"
name: account_raw
primary_key: [account_id, as_of_date]
schema:
  account_id: BIGINT
  customer_id: BIGINT REFERENCES customer_raw(customer_id)
  branch_id: BIGINT COMMENT 'FK to bronze.branch_raw'
  source_system: STRING
"#,
        Layer::Bronze,
        TableKind::Table,
    ));
    bronze.tables.push(table(
        r#"
name: customer_raw
columns:
  - name: customer_id
    type: BIGINT
    primary_key: true
  - name: customer_name
    type: STRING
  - name: customer_name
    type: VARCHAR(100)
  - name: source_system
    type: STRING
  - name: load_timestamp
    type: TIMESTAMP
"#,
        Layer::Bronze,
        TableKind::Table,
    ));
    c.layer_mut(Layer::Silver).tables.push(table(
        "name: account_master\nschema:\n  account_sk: BIGINT\n",
        Layer::Silver,
        TableKind::Table,
    ));

    let gold = c.layer_mut(Layer::Gold);
    gold.tables.push(table(
        "name: dim_account\nscd_type: SCD2\nschema:\n  account_key: BIGINT PRIMARY KEY\n",
        Layer::Gold,
        TableKind::Dimension,
    ));
    gold.tables.push(table("name: dim_branch\n", Layer::Gold, TableKind::Dimension));
    gold.tables.push(table(
        "name: fact_balance\ngrain: Account x Day\nschema:\n  account_key: BIGINT\n",
        Layer::Gold,
        TableKind::Fact,
    ));
    gold.tables.push(table(
        "name: fact_transactions\nschema:\n  account_key: BIGINT\n",
        Layer::Gold,
        TableKind::Fact,
    ));

    let category: CategoryRecord = serde_yaml::from_str(
        r#"
name: Balances
metrics:
  - Total Deposits
  - id: DEP-002
    name: Average Balance
    formula: AVG(balance)
"#,
    )
    .unwrap();
    c.metrics.push(MetricCategory::from(category));
    c
}

fn run_one(name: &str, ctx: &CheckContext) -> Vec<Diagnostic> {
    let filter = vec![name.to_string()];
    CheckManager::with_defaults().run(&catalog(), ctx, Some(&filter))
}

#[test]
fn test_check_names() {
    let manager = CheckManager::with_defaults();
    let names = manager.check_names();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"primary_key_columns"));
    assert!(names.contains(&"unknown_references"));
    assert_eq!(manager.describe().len(), 9);
}

#[test]
fn test_primary_key_columns() {
    let diags = run_one("primary_key_columns", &CheckContext::default());
    assert_eq!(diags.len(), 1);
    let d = &diags[0];
    assert_eq!(d.code, CheckCode::C001);
    assert_eq!(d.severity, Severity::Error);
    assert_eq!(d.domain, "deposits");
    assert_eq!(d.table.as_deref(), Some("bronze.account_raw"));
    assert_eq!(d.column.as_deref(), Some("as_of_date"));
    assert_eq!(d.check_name, "primary_key_columns");
}

#[test]
fn test_duplicate_columns() {
    let diags = run_one("duplicate_columns", &CheckContext::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, CheckCode::C002);
    assert_eq!(diags[0].table.as_deref(), Some("bronze.customer_raw"));
    assert_eq!(diags[0].column.as_deref(), Some("customer_name"));
}

#[test]
fn test_audit_columns() {
    assert!(run_one("audit_columns", &CheckContext::default()).is_empty());

    let ctx = CheckContext {
        required_audit_columns: vec!["source_system".to_string(), "load_timestamp".to_string()],
        ..CheckContext::default()
    };
    let diags = run_one("audit_columns", &ctx);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].table.as_deref(), Some("bronze.account_raw"));
    assert!(diags[0].message.ends_with("load_timestamp"));
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn test_missing_primary_key() {
    let diags = run_one("missing_primary_key", &CheckContext::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, CheckCode::C004);
    assert_eq!(diags[0].table.as_deref(), Some("silver.account_master"));
}

#[test]
fn test_dimensional_model() {
    let diags = run_one("dimensional_model", &CheckContext::default());
    let tables: Vec<_> = diags.iter().filter_map(|d| d.table.as_deref()).collect();
    assert_eq!(tables, vec!["gold.fact_transactions", "gold.dim_branch"]);
}

#[test]
fn test_metric_formulas() {
    let diags = run_one("metric_formulas", &CheckContext::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Info);
    assert!(diags[0].message.contains("Total Deposits"));
}

#[test]
fn test_empty_schema() {
    let diags = run_one("empty_schema", &CheckContext::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, CheckCode::C007);
    assert_eq!(diags[0].table.as_deref(), Some("gold.dim_branch"));
}

#[test]
fn test_minimum_coverage() {
    assert!(run_one("minimum_coverage", &CheckContext::default()).is_empty());
    let ctx = CheckContext {
        min_bronze_tables: 3,
        min_metrics: 5,
        ..CheckContext::default()
    };
    let diags = run_one("minimum_coverage", &ctx);
    assert_eq!(diags.len(), 2);
    assert!(diags[0].message.contains("2 bronze table(s)"));
    assert!(diags[1].message.contains("2 metric(s)"));
}

#[test]
fn test_unknown_references() {
    let diags = run_one("unknown_references", &CheckContext::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, CheckCode::C009);
    assert_eq!(diags[0].column.as_deref(), Some("branch_id"));
    assert!(diags[0].message.contains("bronze.branch_raw"));
}

#[test]
fn test_filter_and_order() {
    let all = CheckManager::with_defaults().run(&catalog(), &CheckContext::default(), None);
    let codes: Vec<_> = all.iter().map(|d| d.code).collect();
    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted);
    assert!(all.iter().any(|d| d.severity == Severity::Error));

    let filter: Vec<String> = vec![];
    assert!(CheckManager::with_defaults()
        .run(&catalog(), &CheckContext::default(), Some(&filter))
        .is_empty());
}

#[test]
fn test_diagnostic_display() {
    let diags = run_one("empty_schema", &CheckContext::default());
    assert_eq!(
        diags[0].to_string(),
        "[C007] warning: Table 'gold.dim_branch' has no schema"
    );
}
