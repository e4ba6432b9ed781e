//! Ordered parameter records and their canonical renderings.
//!
//! A [`ParameterRecord`] keeps the order its fields were inserted in. That
//! order drives the solution signature and the JSON output, while
//! [`ParameterRecord::canonical_key`] ignores it so that records built with
//! different key orders still compare equal.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;

/// Ordered mapping from parameter name to JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterRecord {
    fields: SmallVec<[(String, Value); 4]>,
}

impl ParameterRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field. An existing field keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Stable comparison key: compact JSON with object keys sorted at every depth.
    pub fn canonical_key(&self) -> String {
        let mut entries: Vec<&(String, Value)> = self.fields.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = String::new();
        out.push('{');
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_json_string(&mut out, key);
            out.push(':');
            write_canonical(&mut out, value);
        }
        out.push('}');
        out
    }

    /// Human-readable call rendering in insertion order, e.g. `sol(s="ab", n=3)`.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("sol({})", args.join(", "))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ParameterRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

fn write_json_string(out: &mut String, s: &str) {
    // Serializing a str into JSON cannot fail
    out.push_str(&Value::String(s.to_string()).to_string());
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json_string(out, key);
                out.push(':');
                write_canonical(out, item);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

impl fmt::Display for ParameterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_key())
    }
}

impl Serialize for ParameterRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = ParameterRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of parameter names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = ParameterRecord::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            record.insert(key, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for ParameterRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_position() {
        let mut record = ParameterRecord::new().with("a", 1).with("b", 2);
        record.insert("a", 10);
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&json!(10)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_canonical_key_ignores_order() {
        let a = ParameterRecord::new()
            .with("n", 3)
            .with("s", "ab")
            .with("opts", json!({"z": 1, "a": [1, {"y": 2, "b": 3}]}));
        let b = ParameterRecord::new()
            .with("opts", json!({"a": [1, {"b": 3, "y": 2}], "z": 1}))
            .with("s", "ab")
            .with("n", 3);
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(
            a.canonical_key(),
            r#"{"n":3,"opts":{"a":[1,{"b":3,"y":2}],"z":1},"s":"ab"}"#
        );
    }

    #[test]
    fn test_canonical_key_distinguishes_values() {
        let a = ParameterRecord::new().with("nums", json!([1, 2]));
        let b = ParameterRecord::new().with("nums", json!([2, 1]));
        assert_ne!(a.canonical_key(), b.canonical_key());
        assert_eq!(ParameterRecord::new().canonical_key(), "{}");
    }

    #[test]
    fn test_signature_uses_insertion_order() {
        let record = ParameterRecord::new().with("s", "ab").with("n", 3);
        assert_eq!(record.signature(), r#"sol(s="ab", n=3)"#);
        assert_eq!(ParameterRecord::new().signature(), "sol()");
    }

    #[test]
    fn test_serde_preserves_order() {
        let record: ParameterRecord = serde_json::from_str(r#"{"z": 1, "a": "x"}"#).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn test_from_iterator() {
        let record: ParameterRecord = vec![("x", json!(1)), ("y", json!(2))].into_iter().collect();
        assert_eq!(record.canonical_key(), r#"{"x":1,"y":2}"#);
    }
}
