use super::*;

#[test]
fn test_parse_primary_key_column() {
    let col = Column::parse("a", "BIGINT PRIMARY KEY");
    assert_eq!(col.name, "a");
    assert_eq!(col.data_type, "BIGINT");
    assert!(col.primary_key);
    assert!(!col.nullable);
    assert!(!col.foreign_key);
    assert_eq!(col.comment, None);
    assert_eq!(col.definition, "BIGINT PRIMARY KEY");
}

#[test]
fn test_parse_bare_type_is_nullable() {
    let col = Column::parse("b", "STRING");
    assert_eq!(col.data_type, "STRING");
    assert!(col.nullable);
    assert!(!col.primary_key);
}

#[test]
fn test_parse_parameterized_types() {
    assert_eq!(Column::parse("x", "DECIMAL(18, 2) NOT NULL").data_type, "DECIMAL(18, 2)");
    assert_eq!(Column::parse("x", "VARCHAR(100)").data_type, "VARCHAR(100)");
    assert_eq!(Column::parse("x", "ARRAY<STRING>").data_type, "ARRAY<STRING>");
    assert_eq!(
        Column::parse("x", "TIMESTAMP WITH TIME ZONE NOT NULL").data_type,
        "TIMESTAMP WITH TIME ZONE"
    );
}

#[test]
fn test_parse_empty_definition_defaults_to_string() {
    let col = Column::parse("x", "");
    assert_eq!(col.data_type, "STRING");
    assert!(col.nullable);

    let col = Column::parse("y", "NOT NULL COMMENT 'no type'");
    assert_eq!(col.data_type, "STRING");
    assert!(!col.nullable);
}

#[test]
fn test_parse_not_null_and_comment() {
    let col = Column::parse(
        "customer_name",
        "STRING NOT NULL COMMENT 'Customer''s legal name'",
    );
    assert!(!col.nullable);
    assert_eq!(col.comment.as_deref(), Some("Customer's legal name"));
}

#[test]
fn test_keywords_inside_comment_are_ignored() {
    let col = Column::parse("note", "STRING COMMENT 'may be NOT NULL later, never a PRIMARY KEY'");
    assert!(col.nullable);
    assert!(!col.primary_key);
}

#[test]
fn test_parse_default_and_unique() {
    let col = Column::parse("status", "STRING NOT NULL DEFAULT 'ACTIVE' UNIQUE");
    assert!(col.unique);
    assert_eq!(col.default.as_deref(), Some("'ACTIVE'"));
    assert_eq!(col.default_unquoted().as_deref(), Some("ACTIVE"));

    let col = Column::parse("amount", "DECIMAL(18,2) DEFAULT 0");
    assert_eq!(col.default.as_deref(), Some("0"));
}

#[test]
fn test_parse_references_clause() {
    let col = Column::parse("account_id", "BIGINT NOT NULL REFERENCES silver.account_master(account_id)");
    assert!(col.foreign_key);
    let r = col.references.unwrap();
    assert_eq!(r.table, "silver.account_master");
    assert_eq!(r.column, "account_id");
}

#[test]
fn test_parse_fk_comment() {
    let col = Column::parse(
        "customer_key",
        "BIGINT NOT NULL COMMENT 'FK to gold.dim_customer.customer_key'",
    );
    assert!(col.foreign_key);
    assert_eq!(
        col.references,
        Some(ColumnRef {
            table: "gold.dim_customer".to_string(),
            column: "customer_key".to_string(),
        })
    );
}

#[test]
fn test_fk_comment_without_target() {
    let col = Column::parse("branch_id", "BIGINT COMMENT 'FK - branch'");
    assert!(col.foreign_key);
    assert!(col.references.is_none());
}

#[test]
fn test_parse_dotted_layer_table() {
    let r = ColumnRef::parse_dotted("bronze.customer_raw", "customer_id").unwrap();
    assert_eq!(r.table, "bronze.customer_raw");
    assert_eq!(r.column, "customer_id");

    let r = ColumnRef::parse_dotted("dim_customer.customer_key", "x").unwrap();
    assert_eq!(r.table, "dim_customer");
    assert_eq!(r.column, "customer_key");
}

#[test]
fn test_from_entry() {
    let entry = ColumnEntry {
        name: Some("customer_id".to_string()),
        data_type: Some("BIGINT".to_string()),
        description: Some("Natural key".to_string()),
        nullable: Some(false),
        primary_key: true,
        ..Default::default()
    };
    let col = Column::from_entry("customer_id", entry);
    assert_eq!(col.data_type, "BIGINT");
    assert!(col.primary_key);
    assert!(!col.nullable);
    assert_eq!(col.definition, "BIGINT PRIMARY KEY COMMENT 'Natural key'");

    let reparsed = Column::parse("customer_id", &col.definition);
    assert_eq!(reparsed.primary_key, col.primary_key);
    assert_eq!(reparsed.comment, col.comment);
}
