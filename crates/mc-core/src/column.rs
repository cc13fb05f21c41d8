//! Column definitions and the declarative definition-string parser
//!
//! Catalog tables describe columns either as `name: "TYPE [constraints]"`
//! map entries or as structured entries. Both shapes end up as [`Column`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Target of a foreign key (`silver.customer_master.customer_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Referenced table, possibly layer-qualified
    pub table: String,
    /// Referenced column
    pub column: String,
}

impl ColumnRef {
    /// Parse a dotted reference. A trailing segment is treated as the column
    /// unless the reference is just `<layer>.<table>`, in which case
    /// `default_column` names the column.
    pub fn parse_dotted(target: &str, default_column: &str) -> Option<Self> {
        let target = target.trim().trim_end_matches('.');
        if target.is_empty() {
            return None;
        }
        let dots = target.matches('.').count();
        let (table, column) = match target.rsplit_once('.') {
            Some((head, _)) if dots == 1 && is_layer_name(head) => (target, default_column),
            Some((table, column)) => (table, column),
            None => (target, default_column),
        };
        Some(Self {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

fn is_layer_name(s: &str) -> bool {
    matches!(s, "bronze" | "silver" | "gold")
}

/// A parsed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Leading data type (`DECIMAL(18,2)`), `STRING` when none is given
    pub data_type: String,
    /// Text of `COMMENT '...'`
    pub comment: Option<String>,
    /// `PRIMARY KEY` present
    pub primary_key: bool,
    /// Marked as a foreign key (`REFERENCES`, `FOREIGN KEY`, or an `FK ...` comment)
    pub foreign_key: bool,
    /// Foreign key target, when one can be read from the definition
    pub references: Option<ColumnRef>,
    /// Neither `NOT NULL` nor `PRIMARY KEY` present
    pub nullable: bool,
    /// `UNIQUE` present
    pub unique: bool,
    /// `DEFAULT` value as written (quotes included)
    pub default: Option<String>,
    /// Original definition text
    pub definition: String,
}

/// Keywords that may start the constraint part of a definition.
const CONSTRAINT_KEYWORDS: &[&str] = &[
    "NOT",
    "NULL",
    "PRIMARY",
    "UNIQUE",
    "DEFAULT",
    "REFERENCES",
    "COMMENT",
    "FOREIGN",
    "CHECK",
];

/// Words that continue a multi-word type (`TIMESTAMP WITH TIME ZONE`).
const TYPE_CONTINUATIONS: &[&str] = &["WITH", "WITHOUT", "TIME", "ZONE", "LOCAL", "PRECISION", "VARYING"];

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bCOMMENT\s+'((?:[^']|'')*)'").expect("valid regex"))
}

fn not_null_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bNOT\s+NULL\b").expect("valid regex"))
}

fn primary_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").expect("valid regex"))
}

fn foreign_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bFOREIGN\s+KEY\b").expect("valid regex"))
}

fn unique_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bUNIQUE\b").expect("valid regex"))
}

fn default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bDEFAULT\s+('(?:[^']|'')*'|\S+)").expect("valid regex"))
}

fn references_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bREFERENCES\s+([A-Za-z0-9_.]+)\s*(?:\(\s*([A-Za-z0-9_]+)\s*\))?")
            .expect("valid regex")
    })
}

fn fk_to_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bFK\s+to\s+([A-Za-z0-9_.]+)").expect("valid regex"))
}

/// Split off the leading data type. Balanced `()`/`<>` groups stay part of
/// the type. Returns `None` when the definition starts with a constraint
/// keyword or is empty.
fn split_data_type(definition: &str) -> (Option<String>, &str) {
    let text = definition.trim_start();
    let mut depth = 0i32;
    let mut end = text.len();
    for (i, c) in text.char_indices() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth -= 1,
            c if c.is_whitespace() && depth <= 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let first = &text[..end];
    if first.is_empty() || CONSTRAINT_KEYWORDS.contains(&first.to_ascii_uppercase().as_str()) {
        return (None, text);
    }

    let mut data_type = first.to_string();
    let mut rest = &text[end..];
    loop {
        let trimmed = rest.trim_start();
        let word_end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let word = &trimmed[..word_end];
        if word.is_empty() || !TYPE_CONTINUATIONS.contains(&word.to_ascii_uppercase().as_str()) {
            break;
        }
        data_type.push(' ');
        data_type.push_str(word);
        rest = &trimmed[word_end..];
    }
    (Some(data_type), rest)
}

impl Column {
    /// Parse a column from its declarative definition string.
    ///
    /// ```
    /// # use mc_core::Column;
    /// let col = Column::parse("customer_id", "BIGINT PRIMARY KEY COMMENT 'Customer id'");
    /// assert_eq!(col.data_type, "BIGINT");
    /// assert!(col.primary_key);
    /// assert!(!col.nullable);
    /// assert_eq!(col.comment.as_deref(), Some("Customer id"));
    /// ```
    pub fn parse(name: &str, definition: &str) -> Self {
        let (data_type, rest) = split_data_type(definition);

        let comment = comment_re()
            .captures(rest)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace("''", "'"));
        // Keywords inside the comment text must not count as constraints.
        let constraints = comment_re().replace_all(rest, " ");

        let primary_key = primary_key_re().is_match(&constraints);
        let not_null = not_null_re().is_match(&constraints);
        let unique = unique_re().is_match(&constraints);
        let default = default_re()
            .captures(&constraints)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let mut references = references_re().captures(&constraints).and_then(|c| {
            let table = c.get(1)?.as_str();
            match c.get(2) {
                Some(col) => Some(ColumnRef {
                    table: table.to_string(),
                    column: col.as_str().to_string(),
                }),
                None => ColumnRef::parse_dotted(table, name),
            }
        });

        let fk_comment = comment
            .as_deref()
            .is_some_and(|c| c.trim_start().to_ascii_uppercase().starts_with("FK"));
        if references.is_none() {
            references = comment
                .as_deref()
                .and_then(|c| fk_to_re().captures(c))
                .and_then(|c| c.get(1))
                .and_then(|m| ColumnRef::parse_dotted(m.as_str(), name));
        }
        let foreign_key =
            references.is_some() || fk_comment || foreign_key_re().is_match(&constraints);

        Self {
            name: name.to_string(),
            data_type: data_type.unwrap_or_else(|| "STRING".to_string()),
            comment,
            primary_key,
            foreign_key,
            references,
            nullable: !(not_null || primary_key),
            unique,
            default,
            definition: definition.to_string(),
        }
    }

    /// Build a column from a structured entry.
    pub fn from_entry(name: &str, entry: ColumnEntry) -> Self {
        let data_type = entry
            .data_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "STRING".to_string());
        let references = entry
            .references
            .as_deref()
            .and_then(|r| ColumnRef::parse_dotted(r, name));
        let nullable = entry.nullable.unwrap_or(true) && !entry.primary_key;

        let mut definition = data_type.clone();
        if !nullable && !entry.primary_key {
            definition.push_str(" NOT NULL");
        }
        if entry.primary_key {
            definition.push_str(" PRIMARY KEY");
        }
        if entry.unique {
            definition.push_str(" UNIQUE");
        }
        if let Some(default) = &entry.default {
            definition.push_str(&format!(" DEFAULT {}", default));
        }
        if let Some(r) = &references {
            definition.push_str(&format!(" REFERENCES {}({})", r.table, r.column));
        }
        if let Some(comment) = &entry.description {
            definition.push_str(&format!(" COMMENT '{}'", comment.replace('\'', "''")));
        }

        Self {
            name: name.to_string(),
            data_type,
            comment: entry.description,
            primary_key: entry.primary_key,
            foreign_key: entry.foreign_key || references.is_some(),
            references,
            nullable,
            unique: entry.unique,
            default: entry.default,
            definition,
        }
    }

    /// Comment text or an empty string.
    pub fn comment_or_empty(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Default value with surrounding single quotes removed.
    pub fn default_unquoted(&self) -> Option<String> {
        self.default.as_deref().map(|d| {
            d.strip_prefix('\'')
                .and_then(|d| d.strip_suffix('\''))
                .map(|d| d.replace("''", "'"))
                .unwrap_or_else(|| d.to_string())
        })
    }
}

/// Structured column entry (`{name, type, description, nullable, ...}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnEntry {
    /// Required in list form, taken from the key in map form
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type", alias = "data_type", alias = "dataType")]
    pub data_type: Option<String>,
    #[serde(default, alias = "comment")]
    pub description: Option<String>,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default, alias = "primaryKey", alias = "pk")]
    pub primary_key: bool,
    #[serde(default, alias = "foreignKey", alias = "fk")]
    pub foreign_key: bool,
    #[serde(default)]
    pub references: Option<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub default: Option<String>,
}

#[cfg(test)]
#[path = "column_test.rs"]
mod tests;
