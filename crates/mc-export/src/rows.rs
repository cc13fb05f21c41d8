//! Flattened column rows shared by the tabular exporters

use mc_core::{Column, DomainCatalog, Layer, TableDef};

/// One column of one table, in catalog order
#[derive(Debug, Clone, Copy)]
pub struct ColumnRow<'a> {
    pub table: &'a TableDef,
    pub column: &'a Column,
}

impl<'a> ColumnRow<'a> {
    pub fn table_name(&self) -> &'a str {
        self.table.name.as_str()
    }

    pub fn layer(&self) -> Layer {
        self.table.layer
    }

    /// Flagged `PRIMARY KEY` or listed in the table's declared key
    pub fn is_primary_key(&self) -> bool {
        self.column.primary_key || self.table.is_primary_key(&self.column.name)
    }

    pub fn is_foreign_key(&self) -> bool {
        self.column.foreign_key
    }

    /// Key columns are never nullable, whatever the definition says
    pub fn is_nullable(&self) -> bool {
        self.column.nullable && !self.is_primary_key()
    }
}

/// Every column of every table: bronze, silver, gold, then declaration order.
/// Tables without a schema contribute no rows.
pub fn column_rows(catalog: &DomainCatalog) -> Vec<ColumnRow<'_>> {
    catalog
        .tables()
        .flat_map(|table| table.columns.iter().map(move |column| ColumnRow { table, column }))
        .collect()
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Lowercase file-system safe form of a display name.
pub(crate) fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("Customer Core"), "customer_core");
        assert_eq!(safe_name("Treasury & ALM"), "treasury___alm");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "YES");
        assert_eq!(yes_no(false), "NO");
    }
}
