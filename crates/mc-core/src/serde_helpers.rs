//! Shared serde helpers used across the catalog model.

use crate::column::{Column, ColumnEntry};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Column value in map form: a definition string, a structured entry, or
/// nothing at all (`col:` with no value).
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpec {
    Definition(String),
    Entry(ColumnEntry),
}

struct ColumnsVisitor;

impl<'de> Visitor<'de> for ColumnsVisitor {
    type Value = Vec<Column>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of column definitions or a list of column entries")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut columns = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, spec)) = map.next_entry::<String, Option<ColumnSpec>>()? {
            let column = match spec {
                Some(ColumnSpec::Definition(def)) => Column::parse(&name, &def),
                Some(ColumnSpec::Entry(entry)) => Column::from_entry(&name, entry),
                None => Column::parse(&name, ""),
            };
            columns.push(column);
        }
        Ok(columns)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut columns = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<ColumnEntry>()? {
            let name = entry
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| de::Error::missing_field("name"))?;
            columns.push(Column::from_entry(&name, entry));
        }
        Ok(columns)
    }
}

/// Deserialize a column collection, keeping declaration order.
///
/// Accepts a YAML mapping (`name: "TYPE ..."`), a sequence of structured
/// entries, or null.
pub(crate) fn deserialize_columns<'de, D>(deserializer: D) -> Result<Vec<Column>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ColumnsVisitor)
}

/// Accept either a single string or a list of strings.
pub(crate) fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}

/// Accept a string or any other YAML scalar, keeping its text.
///
/// Row estimates show up as `~2.5M` as often as `2500000`.
pub(crate) fn deserialize_opt_scalar_string<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
        Some(serde_yaml::Value::Null) | None => None,
        Some(_) => return Err(de::Error::custom("expected a scalar value")),
    })
}
