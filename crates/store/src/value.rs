//! Typed column values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A column value with its SQL type, possibly null.
///
/// Nulls stay typed so a parameterised statement can bind them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(Option<String>),
    Int(Option<i64>),
    Timestamp(Option<DateTime<Utc>>),
    Json(Option<serde_json::Value>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Text(v) => v.is_none(),
            Value::Int(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::Json(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => *v,
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(v) => *v,
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => v.as_ref(),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(v) => *v,
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(Some(v)) => write!(f, "{v}"),
            Value::Int(Some(v)) => write!(f, "{v}"),
            Value::Timestamp(Some(v)) => write!(f, "{}", v.to_rfc3339()),
            Value::Json(Some(v)) => write!(f, "{v}"),
            Value::Uuid(Some(v)) => write!(f, "{v}"),
            _ => write!(f, "NULL"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(Some(v))
            }
        }

        impl From<Option<$ty>> for Value {
            fn from(v: Option<$ty>) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_from!(Text, String);
impl_from!(Int, i64);
impl_from!(Timestamp, DateTime<Utc>);
impl_from!(Json, serde_json::Value);
impl_from!(Uuid, Uuid);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(Some(v.to_string()))
    }
}

/// A stored row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: BTreeMap<&'static str, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn set(&mut self, column: &'static str, value: Value) {
        self.columns.insert(column, value);
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_int)
    }

    pub fn timestamp(&self, column: &str) -> Option<DateTime<Utc>> {
        self.get(column).and_then(Value::as_timestamp)
    }

    pub fn json(&self, column: &str) -> Option<&serde_json::Value> {
        self.get(column).and_then(Value::as_json)
    }

    pub fn uuid(&self, column: &str) -> Option<Uuid> {
        self.get(column).and_then(Value::as_uuid)
    }

    /// Iterates columns in name order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.columns.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(&'static str, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (&'static str, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
