//! # Schemaless documents
//!
//! The document store holds loosely typed records grouped into named collections.
//! A [`Document`] is an opaque store-assigned `id` plus a map of field names to
//! [`Value`]s. Nothing here knows about recipes; the `api` crate decodes documents
//! into its own domain types.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Value`] | A single field value. Timestamps are kept as seconds + nanos so that they survive a round trip through JSON without precision loss. |
//! | [`Fields`] | The field map of a document, also used as the payload for create and partial update. |
//! | [`Document`] | A stored record with its id. Provides typed getters that return `None` on absence or type mismatch. |
//!
//! ## Ordering
//!
//! [`Value::total_cmp`] defines the order used by `order_by`:
//! `Null < Bool < numbers < Timestamp < String < Array < Map`. Integers and floats
//! compare numerically with each other.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Field map of a document.
pub type Fields = BTreeMap<String, Value>;

/// A point in time as stored by the document store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            seconds: at.timestamp(),
            nanos: at.timestamp_subsec_nanos(),
        }
    }

    /// Convert to a structured date, dropping sub-second precision.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, 0).single()
    }
}

/// A single field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Timestamp(Timestamp),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Timestamp(_) => 3,
            Value::String(_) => 4,
            Value::Array(_) => 5,
            Value::Map(_) => 6,
        }
    }

    /// Total order across all value kinds.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.total_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Map(a), Value::Map(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let ord = ka.cmp(kb).then_with(|| va.total_cmp(vb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Timestamp(Timestamp::from_datetime(at))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// A stored record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier, unique within its collection
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    pub fn get_timestamp(&self, field: &str) -> Option<Timestamp> {
        self.get(field).and_then(Value::as_timestamp)
    }

    pub fn get_array(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_array)
    }

    /// Overwrite the listed fields, keeping every other field as is.
    pub fn merge(&mut self, patch: Fields) {
        self.fields.extend(patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_order_across_kinds() {
        let mut values = vec![
            Value::from("b"),
            Value::Timestamp(Timestamp::new(10, 0)),
            Value::Int(3),
            Value::Null,
            Value::Bool(true),
            Value::Float(2.5),
        ];
        values.sort_by(Value::total_cmp);
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Float(2.5),
                Value::Int(3),
                Value::Timestamp(Timestamp::new(10, 0)),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn test_timestamp_to_datetime_drops_nanos() {
        let ts = Timestamp::new(1_700_000_000, 999);
        let at = ts.to_datetime().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(at.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut doc = Document::new(
            "a",
            Fields::from([
                ("name".to_string(), Value::from("Soup")),
                ("isPublished".to_string(), Value::from(true)),
            ]),
        );
        doc.merge(Fields::from([("isPublished".to_string(), Value::from(false))]));
        assert_eq!(doc.get_str("name"), Some("Soup"));
        assert_eq!(doc.get_bool("isPublished"), Some(false));
    }

    #[test]
    fn test_json_form_is_tagged() {
        let json = serde_json::to_string(&Value::Timestamp(Timestamp::new(5, 0))).unwrap();
        assert_eq!(json, r#"{"type":"timestamp","value":{"seconds":5,"nanos":0}}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Timestamp(Timestamp::new(5, 0)));
    }
}
