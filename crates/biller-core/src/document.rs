//! In-memory shape of a billing document.
//!
//! The loader hands over a [`Document`] already parsed from YAML or JSON.
//! Every mapping whose order matters (families, activity dates, the members
//! acting on a date) is kept as an [`Ordered`] list of pairs.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::day::Day;

/// A mapping that keeps its entries in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered<K, V>(pub Vec<(K, V)>);

impl<K, V> Default for Ordered<K, V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<K, V> FromIterator<(K, V)> for Ordered<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, K, V> Deserialize<'de> for Ordered<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for OrderedVisitor<K, V>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
        {
            type Value = Ordered<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(Ordered(entries))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                // An empty YAML key (`activities:`) parses as null.
                Ok(Ordered::default())
            }
        }

        deserializer.deserialize_any(OrderedVisitor(PhantomData))
    }
}

/// Template text, either shared by every bill or chosen per bill description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Scalar(String),
    PerDescription(BTreeMap<String, String>),
}

impl Template {
    /// Picks the template text that applies to the bill named `description`.
    pub fn select(&self, description: &str) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            Self::PerDescription(by_description) => {
                by_description.get(description).map(String::as_str)
            }
        }
    }
}

/// A family as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyEntry {
    pub persons: Vec<String>,
    #[serde(default, rename = "tmpl", alias = "template")]
    pub template: Option<Template>,
}

/// A bill that can be computed over any period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDefinition {
    #[serde(rename = "desc", alias = "description")]
    pub description: String,
    /// Allocation mode name; unknown names are reported at compute time.
    pub mode: String,
    #[serde(default, rename = "tmpl", alias = "template")]
    pub template: Option<Template>,
}

/// An action code as written in the document.
///
/// Only integers can be valid actions. Anything else is kept so replaying the
/// log can report it with its date and member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCode {
    Int(i64),
    Other(String),
}

impl From<i64> for ActionCode {
    fn from(code: i64) -> Self {
        Self::Int(code)
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(code) => write!(f, "{code}"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for ActionCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ActionCodeVisitor;

        impl Visitor<'_> for ActionCodeVisitor {
            type Value = ActionCode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an action code")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ActionCode, E> {
                Ok(ActionCode::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ActionCode, E> {
                Ok(i64::try_from(v)
                    .map_or_else(|_| ActionCode::Other(v.to_string()), ActionCode::Int))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<ActionCode, E> {
                Ok(ActionCode::Other(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<ActionCode, E> {
                Ok(ActionCode::Other(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ActionCode, E> {
                Ok(ActionCode::Other(format!("{v:?}")))
            }

            fn visit_unit<E: de::Error>(self) -> Result<ActionCode, E> {
                Ok(ActionCode::Other("null".to_string()))
            }
        }

        deserializer.deserialize_any(ActionCodeVisitor)
    }
}

/// Raw activity log: date, then member, then action code.
pub type Activities = Ordered<Day, Ordered<String, ActionCode>>;

/// Everything the biller needs, as loaded from a data file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    pub families: Ordered<String, FamilyEntry>,
    #[serde(default)]
    pub bills: Vec<BillDefinition>,
    #[serde(default)]
    pub activities: Activities,
}
