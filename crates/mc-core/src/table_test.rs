use super::*;

fn table(yaml: &str, layer: Layer, kind: TableKind) -> TableDef {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    TableDef::from_value(value, layer, kind).unwrap()
}

#[test]
fn test_bronze_table_with_schema() {
    let t = table(
        r#"
name: bronze.x
schema:
  a: "BIGINT PRIMARY KEY"
  b: "STRING"
primaryKey: [a]
sourceSystem: FIS
loadType: CDC
"#,
        Layer::Bronze,
        TableKind::Table,
    );
    assert_eq!(t.name, "bronze.x");
    assert_eq!(t.column_names(), vec!["a", "b"]);
    assert_eq!(t.primary_key_columns(), vec!["a"]);
    assert_eq!(t.source_system.as_deref(), Some("FIS"));
    assert_eq!(t.load_type, Some(LoadType::Cdc));
    assert!(t.has_schema());
}

#[test]
fn test_missing_schema_is_zero_columns() {
    let t = table("name: customer_raw\n", Layer::Bronze, TableKind::Table);
    assert_eq!(t.name, "bronze.customer_raw");
    assert!(!t.has_schema());
    assert!(t.columns.is_empty());
    assert!(t.primary_key_columns().is_empty());
}

#[test]
fn test_key_fields_alias_and_string_form() {
    let t = table(
        "name: silver.account_master\nkey_fields: account_id, effective_date\n",
        Layer::Silver,
        TableKind::Table,
    );
    assert_eq!(t.primary_key, vec!["account_id", "effective_date"]);
}

#[test]
fn test_primary_key_from_column_flags() {
    let t = table(
        r#"
name: silver.customer_master
columns:
  customer_sk: "BIGINT PRIMARY KEY"
  customer_id: "STRING NOT NULL"
"#,
        Layer::Silver,
        TableKind::Table,
    );
    assert_eq!(t.primary_key_columns(), vec!["customer_sk"]);
    assert!(t.is_primary_key("customer_sk"));
    assert!(!t.is_primary_key("customer_id"));
}

#[test]
fn test_scd_type_labels() {
    let t = table(
        "name: gold.dim_customer\ntype: SCD Type 2\n",
        Layer::Gold,
        TableKind::Dimension,
    );
    assert!(t.is_scd2());

    let t = table("name: silver.x\nscd2: false\n", Layer::Silver, TableKind::Table);
    assert_eq!(t.scd_type, Some(ScdType::Scd1));

    let t = table("name: silver.y\nscdType: Type 2\n", Layer::Silver, TableKind::Table);
    assert_eq!(t.scd_type, Some(ScdType::Scd2));
}

#[test]
fn test_unrecognised_scd_type_is_ignored() {
    let t = table("name: silver.y\nscd_type: whatever\n", Layer::Silver, TableKind::Table);
    assert_eq!(t.scd_type, None);
}

#[test]
fn test_fact_with_measures_and_hierarchies() {
    let t = table(
        r#"
name: fact_deposit_balance_daily
grain: Account x Date
factType: Periodic Snapshot
measures:
  - ending_balance
  - name: interest_accrued
hierarchies:
  - "Time (Year > Quarter > Month)"
  - name: Product
    levels: [Family, Product]
"#,
        Layer::Gold,
        TableKind::Fact,
    );
    assert_eq!(t.name, "gold.fact_deposit_balance_daily");
    assert_eq!(t.fact_type, Some(FactType::PeriodicSnapshot));
    assert_eq!(t.measures, vec!["ending_balance", "interest_accrued"]);
    assert_eq!(t.hierarchies[0].name, "Time");
    assert_eq!(t.hierarchies[0].levels, vec!["Year", "Quarter", "Month"]);
    assert_eq!(t.hierarchies[1].levels.len(), 2);
    assert_eq!(t.type_label(), "Periodic Snapshot");
}

#[test]
fn test_missing_name_is_an_error() {
    let value: serde_yaml::Value = serde_yaml::from_str("description: no name\n").unwrap();
    assert!(TableDef::from_value(value, Layer::Bronze, TableKind::Table).is_err());
}

#[test]
fn test_load_type_other_is_kept() {
    assert_eq!(LoadType::from("API pull".to_string()), LoadType::Other("API pull".to_string()));
    assert_eq!(LoadType::from("Daily batch".to_string()), LoadType::Batch);
    assert_eq!(LoadType::Other("API pull".to_string()).to_string(), "API pull");
}

#[test]
fn test_estimated_rows_accepts_numbers() {
    let t = table("name: bronze.z\nestimated_rows: 2500000\n", Layer::Bronze, TableKind::Table);
    assert_eq!(t.estimated_rows.as_deref(), Some("2500000"));
}

#[test]
fn test_raw_record_debug_includes_measures_and_hierarchies() {
    let record: TableRecord = serde_yaml::from_str(
        "name: dim_date\nmeasures: [balance, {name: accrual}]\nhierarchies:\n  - Calendar (Year > Month)\n",
    )
    .unwrap();
    let debug = format!("{:?}", record);
    assert!(debug.contains("accrual"));
    assert!(debug.contains("Calendar (Year > Month)"));
}
