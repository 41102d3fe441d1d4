//! Structured history payloads and their JSON sanitization.
//!
//! Callers assemble payloads from typed [`PayloadValue`]s. Before storage the
//! payload is converted to plain JSON, with decimals, dates, timestamps, and
//! UUIDs stringified at every nesting level so the stored document never
//! depends on a non-JSON scalar type.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::types::Timestamp;

/// One value inside a history payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(Timestamp),
    Uuid(Uuid),
    List(Vec<PayloadValue>),
    Map(BTreeMap<String, PayloadValue>),
}

/// Key → value payload attached to a history entry.
pub type Payload = BTreeMap<String, PayloadValue>;

impl PayloadValue {
    /// Convert to JSON, stringifying non-JSON scalars recursively.
    pub fn sanitize(&self) -> Value {
        match self {
            PayloadValue::Null => Value::Null,
            PayloadValue::Bool(b) => Value::Bool(*b),
            PayloadValue::Int(n) => Value::from(*n),
            PayloadValue::Text(s) => Value::String(s.clone()),
            PayloadValue::Decimal(d) => Value::String(d.to_string()),
            PayloadValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            PayloadValue::DateTime(t) => Value::String(t.to_rfc3339()),
            PayloadValue::Uuid(u) => Value::String(u.to_string()),
            PayloadValue::List(items) => Value::Array(items.iter().map(Self::sanitize).collect()),
            PayloadValue::Map(map) => Value::Object(sanitize_map(map)),
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Text(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Int(value)
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Bool(value)
    }
}

impl From<Decimal> for PayloadValue {
    fn from(value: Decimal) -> Self {
        PayloadValue::Decimal(value)
    }
}

impl From<NaiveDate> for PayloadValue {
    fn from(value: NaiveDate) -> Self {
        PayloadValue::Date(value)
    }
}

impl From<Timestamp> for PayloadValue {
    fn from(value: Timestamp) -> Self {
        PayloadValue::DateTime(value)
    }
}

impl From<Uuid> for PayloadValue {
    fn from(value: Uuid) -> Self {
        PayloadValue::Uuid(value)
    }
}

impl<T: Into<PayloadValue>> From<Option<T>> for PayloadValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PayloadValue::Null, Into::into)
    }
}

fn sanitize_map(map: &BTreeMap<String, PayloadValue>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), v.sanitize())).collect()
}

/// Convert a whole payload to a JSON object ready for storage.
pub fn sanitize_payload(payload: &Payload) -> Value {
    Value::Object(sanitize_map(payload))
}

/// Build a payload from `(key, value)` pairs.
pub fn payload<const N: usize>(pairs: [(&str, PayloadValue); N]) -> Payload {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
