//! Crate-private payload types shared by the storage engine and the provider.
//!
//! The provider re-exports these so callers build payloads as
//! `inventory::provider::{ContentValues, Selection, Value}`.

use inventory_contract::Column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single SQLite cell as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the cell. Text is parsed after trimming; anything
    /// that does not parse yields `None`, same as `Null`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Text view of the cell; integers are rendered in decimal.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(v) => Some(v.to_string()),
            Value::Null => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Column-keyed write payload.
///
/// A key mapped to `Value::Null` is different from a missing key: the first
/// writes NULL, the second leaves the column alone (update) or to its
/// default (insert).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentValues {
    inner: BTreeMap<Column, Value>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: Column, value: impl Into<Value>) -> &mut Self {
        self.inner.insert(column, value.into());
        self
    }

    pub fn put_null(&mut self, column: Column) -> &mut Self {
        self.inner.insert(column, Value::Null);
        self
    }

    /// Builder-style `put`.
    #[must_use]
    pub fn with(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.inner.get(&column)
    }

    pub fn contains_key(&self, column: Column) -> bool {
        self.inner.contains_key(&column)
    }

    pub fn remove(&mut self, column: Column) -> Option<Value> {
        self.inner.remove(&column)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        self.inner.iter().map(|(c, v)| (*c, v))
    }
}

impl<V: Into<Value>> FromIterator<(Column, V)> for ContentValues {
    fn from_iter<I: IntoIterator<Item = (Column, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(c, v)| (c, v.into())).collect(),
        }
    }
}

/// Row filter: a SQL `WHERE` fragment using `?` placeholders plus its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<Value>,
}

impl Selection {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, V>(clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: Some(clause.into()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn by_id(id: i64) -> Self {
        Self::new(format!("{} = ?", Column::Id), [id])
    }

    pub fn is_all(&self) -> bool {
        self.clause.as_deref().is_none_or(|c| c.trim().is_empty())
    }
}
