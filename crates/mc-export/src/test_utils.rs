//! Shared test utilities for mc-export

use mc_core::{
    Aggregation, Domain, DomainCatalog, Layer, LayerCatalog, Metric, MetricCategory, TableDef,
    TableKind,
};

/// Parse one table record
pub(crate) fn table(yaml: &str, layer: Layer, kind: TableKind) -> TableDef {
    TableDef::from_value(serde_yaml::from_str(yaml).unwrap(), layer, kind).unwrap()
}

/// Build a catalog from a domain record and tables, grouped by their layer
pub(crate) fn catalog_with(domain_yaml: &str, tables: Vec<TableDef>) -> DomainCatalog {
    let domain: Domain = serde_yaml::from_str(domain_yaml).unwrap();
    let mut catalog = DomainCatalog::new(domain);
    for table in tables {
        let slot = match table.layer {
            Layer::Bronze => &mut catalog.bronze,
            Layer::Silver => &mut catalog.silver,
            Layer::Gold => &mut catalog.gold,
        };
        slot.get_or_insert_with(|| LayerCatalog::new(table.layer))
            .tables
            .push(table);
    }
    catalog
}

/// Small deposits domain touching every exporter feature
pub(crate) fn sample_catalog() -> DomainCatalog {
    let tables = vec![
        table(
            r#"
name: customer_raw
description: Raw customer master from core banking
source_system: FIS
load_type: CDC
schema:
  customer_id: "BIGINT PRIMARY KEY COMMENT 'Source customer id'"
  full_name: "VARCHAR(200) NOT NULL COMMENT 'Name, as ''registered'''"
  status: "STRING DEFAULT 'ACTIVE'"
  load_timestamp: "TIMESTAMP NOT NULL"
"#,
            Layer::Bronze,
            TableKind::Table,
        ),
        table(
            r#"
name: account_raw
primary_key: [account_id]
indexes: [customer_id]
schema:
  account_id: BIGINT
  customer_id: "BIGINT NOT NULL COMMENT 'FK to bronze.customer_raw.customer_id'"
  balance: DECIMAL(18,2)
"#,
            Layer::Bronze,
            TableKind::Table,
        ),
        table(
            r#"
name: customer_master
description: Golden customer record
scd_type: SCD2
schema:
  customer_sk: BIGINT PRIMARY KEY
  customer_id: BIGINT NOT NULL
"#,
            Layer::Silver,
            TableKind::Table,
        ),
        table(
            r#"
name: dim_customer
scd_type: SCD2
schema:
  customer_key: BIGINT PRIMARY KEY
  customer_name: STRING
"#,
            Layer::Gold,
            TableKind::Dimension,
        ),
        table(
            r#"
name: fact_account_balance
description: Daily balance <snapshot> & accruals
grain: Account x Day
fact_type: periodic snapshot
measures: [ending_balance, interest_accrued]
schema:
  customer_key: BIGINT NOT NULL
  date_key: INT
  ending_balance: DECIMAL(18,2)
"#,
            Layer::Gold,
            TableKind::Fact,
        ),
    ];

    let mut catalog = catalog_with(
        r#"
id: deposits
name: Deposits
priority: P0
description: Deposit accounts and balances
complexity: High
businessValue: Critical
keyEntities: [Customer, Account]
"#,
        tables,
    );
    let category = MetricCategory {
        name: "Balances".to_string(),
        metrics: vec![
            metric(None, "Total Deposits", None, None, None),
            metric(
                Some("DEP-002"),
                "Average Balance",
                Some("AVG(ending_balance)"),
                Some("USD"),
                Some(Aggregation::Avg),
            ),
        ],
    };
    catalog.metrics.push(category);
    catalog
}

fn metric(
    id: Option<&str>,
    name: &str,
    formula: Option<&str>,
    unit: Option<&str>,
    aggregation: Option<Aggregation>,
) -> Metric {
    Metric {
        id: id.map(String::from),
        name: name.to_string(),
        description: None,
        formula: formula.map(String::from),
        unit: unit.map(String::from),
        aggregation,
        category: "Balances".to_string(),
    }
}
