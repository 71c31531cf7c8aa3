//! # Value Model
//!
//! [`Value`] is the loosely-typed representation of an input model and of
//! the instances the schema engine produces. It is deliberately close to
//! JSON, with two additions:
//!
//! - `Date` holds a UTC instant, so date-typed fields survive a second pass
//!   through coercion without being re-parsed.
//! - `Deferred` holds a zero-argument provider. Coercion resolves it before
//!   looking at the value, which lets callers hand in values that are
//!   expensive or only valid to compute at coercion time.
//!
//! Objects are [`Record`]s: insertion-ordered string maps.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::temporal::format_date;

/// A loosely-typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number. Integral values serialize as JSON integers.
    Number(f64),
    /// UTF-8 text.
    String(String),
    /// UTC instant.
    Date(DateTime<Utc>),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Insertion-ordered string map.
    Object(Record),
    /// Value computed on demand.
    Deferred(Deferred),
}

impl Value {
    /// Wrap a provider as a deferred value.
    pub fn deferred(provider: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Value::Deferred(Deferred::new(provider))
    }

    /// Resolve deferred values until a concrete value is reached.
    pub fn resolved(self) -> Value {
        let mut current = self;
        while let Value::Deferred(d) = current {
            current = d.resolve();
        }
        current
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }

    /// Field lookup on object values. `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|record| record.get(key))
    }

    /// Text form used by coercion.
    ///
    /// - null → `""`
    /// - integral numbers render without a decimal point
    /// - dates render as RFC 3339 with milliseconds
    /// - arrays join their elements' text with `,`
    /// - records render as compact JSON
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Date(dt) => format_date(dt),
            Value::Array(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => serde_json::to_string(self).unwrap_or_default(),
            Value::Deferred(d) => d.resolve().to_text(),
        }
    }

    /// Convert into a `serde_json::Value`. Dates become RFC 3339 strings,
    /// deferred values are resolved, non-finite numbers become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(dt) => serde_json::Value::String(format_date(dt)),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(record) => serde_json::Value::Object(
                record
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Deferred(d) => d.resolve().to_json(),
        }
    }
}

fn integral_i64(n: f64) -> Option<i64> {
    // 2^53: beyond this not every integer is representable.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        Some(n as i64)
    } else {
        None
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    match integral_i64(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    match integral_i64(n) {
        Some(i) => serde_json::Value::from(i),
        None => serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match integral_i64(*n) {
                Some(i) => serializer.serialize_i64(i),
                None if n.is_finite() => serializer.serialize_f64(*n),
                None => serializer.serialize_unit(),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(dt) => serializer.serialize_str(&format_date(dt)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(record) => record.serialize(serializer),
            Value::Deferred(d) => d.resolve().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
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

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Date(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// A zero-argument value provider.
///
/// Equality is identity: two `Deferred`s are equal only if they share the
/// same provider.
#[derive(Clone)]
pub struct Deferred(Arc<dyn Fn() -> Value + Send + Sync>);

impl Deferred {
    pub fn new(provider: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(provider))
    }

    /// Invoke the provider.
    pub fn resolve(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Insertion-ordered map from field name to [`Value`].
///
/// Lookups are linear; records produced from schemas are small and the
/// order guarantee matters more than lookup cost.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value. An existing key keeps its position and the previous
    /// value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("zeta", 1);
        record.insert("alpha", 2);
        record.insert("mid", 3);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        // Replacing keeps the slot.
        assert_eq!(record.insert("zeta", 9), Some(Value::Number(1.0)));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(record.get("zeta"), Some(&Value::Number(9.0)));
    }

    #[test]
    fn test_record_remove() {
        let mut record: Record = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(record.remove("a"), Some(Value::Number(1.0)));
        assert!(record.remove("a").is_none());
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_serialize_record_in_order() {
        let record: Record = [("b", Value::from(1)), ("a", Value::from("x"))]
            .into_iter()
            .collect();
        let text = serde_json::to_string(&Value::Object(record)).unwrap();
        assert_eq!(text, r#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Value::Number(42.0)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&Value::Number(4.5)).unwrap(), "4.5");
        assert_eq!(serde_json::to_string(&Value::Number(f64::NAN)).unwrap(), "null");
    }

    #[test]
    fn test_dates_serialize_as_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(
            serde_json::to_string(&Value::Date(dt)).unwrap(),
            r#""2026-01-15T12:00:00.000Z""#
        );
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"n": 3, "s": "x", "a": [true, null]}));
        assert_eq!(value.get("n"), Some(&Value::Number(3.0)));
        assert_eq!(value.get("s").and_then(Value::as_str), Some("x"));
        assert_eq!(
            value.get("a"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_to_json_roundtrip() {
        let source = json!({"name": "a", "tags": ["x", "y"], "n": 1.5, "ok": false});
        assert_eq!(Value::from(source.clone()).to_json(), source);
    }

    #[test]
    fn test_to_text_forms() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Number(42.0).to_text(), "42");
        assert_eq!(Value::Number(-0.5).to_text(), "-0.5");
        assert_eq!(
            Value::Array(vec![Value::from(1), Value::from("b")]).to_text(),
            "1,b"
        );
        let record: Record = [("k", 1)].into_iter().collect();
        assert_eq!(Value::Object(record).to_text(), r#"{"k":1}"#);
    }

    #[test]
    fn test_deferred_resolution() {
        let lazy = Value::deferred(|| Value::deferred(|| Value::from("inner")));
        assert_eq!(lazy.to_text(), "inner");
        assert_eq!(lazy.resolved(), Value::from("inner"));
    }

    #[test]
    fn test_deferred_equality_is_identity() {
        let a = Deferred::new(|| Value::Null);
        let b = Deferred::new(|| Value::Null);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_deserialize_from_yaml_like_json() {
        let value: Value = serde_json::from_str(r#"{"a": {"b": [1, 2]}}"#).unwrap();
        assert_eq!(
            value.get("a").and_then(|a| a.get("b")),
            Some(&Value::Array(vec![Value::from(1), Value::from(2)]))
        );
    }

    #[test]
    fn test_deserialize_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": {"y": 2, "b": 3}}"#).unwrap();
        let record = value.as_object().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        let inner = record.get("alpha").and_then(Value::as_object).unwrap();
        assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["y", "b"]);

        let record: Record = serde_json::from_str(r#"{"c": 1, "a": 2, "b": 3}"#).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"c":1,"a":2,"b":3}"#);
    }
}
