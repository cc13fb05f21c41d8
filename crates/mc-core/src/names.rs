//! Strongly-typed string newtypes for catalog identifiers.
//!
//! Every newtype is generated by [`define_name`], which takes a validation
//! function so each identifier can enforce its own shape while sharing the
//! same trait surface (Display, Deref, AsRef, Borrow, TryFrom, PartialEq,
//! Serialize, Deserialize).

use crate::error::{CoreError, CoreResult};
use crate::layer::Layer;

macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident, $label:literal, $validate:path;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::parse(s).map_err(serde::de::Error::custom)
            }
        }

        impl $Name {
            /// Validate and wrap a name.
            pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
                let s = name.into();
                match $validate(&s) {
                    Ok(()) => Ok(Self(s)),
                    Err(reason) => Err(CoreError::InvalidName {
                        what: $label,
                        value: s,
                        reason: reason.to_string(),
                    }),
                }
            }

            /// Return the underlying name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl TryFrom<String> for $Name {
            type Error = CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = CoreError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }

        impl PartialEq<String> for $Name {
            fn eq(&self, other: &String) -> bool { self.0 == *other }
        }
    };
}

fn validate_domain_id(s: &str) -> Result<(), &'static str> {
    if s.is_empty() {
        return Err("must not be empty");
    }
    if s.starts_with('-') || s.ends_with('-') {
        return Err("must not start or end with '-'");
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("only lowercase letters, digits and '-' are allowed");
    }
    Ok(())
}

fn validate_table_name(s: &str) -> Result<(), &'static str> {
    if s.trim().is_empty() {
        return Err("must not be empty");
    }
    if s.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace");
    }
    if s.starts_with('.') || s.ends_with('.') {
        return Err("must not start or end with '.'");
    }
    Ok(())
}

define_name! {
    /// Kebab-case identifier of a banking domain (`customer-core`, `deposits`).
    pub struct DomainId, "domain id", validate_domain_id;
}

define_name! {
    /// Table name, usually qualified with its layer (`bronze.customer_raw`).
    pub struct TableName, "table name", validate_table_name;
}

impl TableName {
    /// Qualify a bare name with the layer prefix. Names that already contain a
    /// `.` are kept as written.
    pub fn qualified(name: &str, layer: Layer) -> CoreResult<Self> {
        if name.contains('.') {
            Self::parse(name)
        } else {
            Self::parse(format!("{}{}", layer.prefix(), name))
        }
    }

    /// Schema part of a qualified name (`bronze` for `bronze.customer_raw`).
    pub fn schema(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(schema, _)| schema)
    }

    /// Name without its schema qualifier.
    pub fn unqualified(&self) -> &str {
        self.0
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }

    /// Whether `other` names this table, with or without a schema qualifier.
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other || (!other.contains('.') && self.unqualified() == other)
    }
}
