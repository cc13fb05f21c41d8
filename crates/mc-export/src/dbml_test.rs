use super::*;
use crate::test_utils::sample_catalog;
use chrono::{TimeZone, Utc};

fn dbml() -> String {
    to_dbml(&sample_catalog(), &ExportOptions::default()).unwrap()
}

#[test]
fn test_project_header() {
    let out = dbml();
    assert!(out.starts_with("// Deposits Data Model\n// Domain ID: deposits\n// Fingerprint: "));
    assert!(out.contains(
        "Project deposits {\n  database_type: 'Generic'\n  Note: 'Deposit accounts and balances'\n}\n"
    ));
    assert!(!out.contains("Generated"));
}

#[test]
fn test_layer_banners_in_order() {
    let out = dbml();
    let bronze = out.find("// BRONZE LAYER - Raw Data").unwrap();
    let silver = out.find("// SILVER LAYER - Curated Data").unwrap();
    let gold = out.find("// GOLD LAYER - Dimensional Model").unwrap();
    assert!(bronze < silver && silver < gold);
}

#[test]
fn test_column_settings() {
    let out = dbml();
    assert!(out.contains("  customer_id BIGINT [pk, note: 'Source customer id']\n"));
    assert!(out.contains("  full_name VARCHAR(200) [not null, note: 'Name, as \\'registered\\'']\n"));
    assert!(out.contains("  status STRING [default: 'ACTIVE']\n"));
    assert!(out.contains("  account_id BIGINT [pk]\n"));
    assert!(out.contains("  date_key INT\n"));
}

#[test]
fn test_gold_tables() {
    let out = dbml();
    assert!(out.contains("Table gold.fact_account_balance [headercolor: #DAE8FC] {\n"));
    assert!(out.contains("Table gold.dim_customer [headercolor: #FFE6CC] {\n"));
    assert!(out.contains(
        "  Note: 'Daily balance <snapshot> & accruals | Grain: Account x Day | Periodic Snapshot | Measures: interest_accrued'\n"
    ));
    // measures are documented, never added as columns
    assert!(!out.contains("  interest_accrued "));
}

#[test]
fn test_refs() {
    let out = dbml();
    assert!(out.contains("// Relationships\n"));
    assert!(out.contains("Ref: bronze.account_raw.customer_id > bronze.customer_raw.customer_id\n"));
    assert!(out.contains(
        "Ref: gold.fact_account_balance.customer_key > gold.dim_customer.customer_key\n"
    ));
}

#[test]
fn test_round_trip_table_names_and_column_counts() {
    let catalog = sample_catalog();
    let tables = parse_dbml_tables(&dbml()).unwrap();

    let expected: Vec<(String, usize)> = catalog
        .tables()
        .map(|t| (t.name.to_string(), t.columns.len()))
        .collect();
    let parsed: Vec<(String, usize)> = tables
        .iter()
        .map(|t| (t.name.clone(), t.columns.len()))
        .collect();
    assert_eq!(parsed, expected);
    assert_eq!(
        tables[0].columns,
        vec!["customer_id", "full_name", "status", "load_timestamp"]
    );
}

#[test]
fn test_stamp() {
    let options = ExportOptions {
        generated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        ..ExportOptions::default()
    };
    let out = to_dbml(&sample_catalog(), &options).unwrap();
    assert!(out.contains("// Generated: 2024-03-01T12:00:00Z\n"));
}

#[test]
fn test_deterministic() {
    assert_eq!(dbml(), dbml());
}

#[test]
fn test_reader_handles_quotes_and_nested_blocks() {
    let input = r#"
Project p {
  Note: 'skip me'
}

Table "odd schema"."my table" as T {
  "col one" int
  id int [pk]

  indexes {
    (id) [pk]
  }
  Note: 'a table'
}

Ref: T.id > other.id
"#;
    let tables = parse_dbml_tables(input).unwrap();
    assert_eq!(
        tables,
        vec![DbmlTable {
            name: "odd schema.my table".to_string(),
            columns: vec!["col one".to_string(), "id".to_string()],
        }]
    );
}

#[test]
fn test_reader_errors() {
    let err = parse_dbml_tables("Table a {\n  id int\n").unwrap_err();
    assert!(matches!(err, ExportError::DbmlParse { line: 1, .. }));

    let err = parse_dbml_tables("\nTable a\n").unwrap_err();
    assert!(matches!(err, ExportError::DbmlParse { line: 2, .. }));
}
