// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values flowing in and out of compiled types.

use crate::error::{Error, Result};
use crate::types::{Encoder, RecordType};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A dynamic value.
///
/// `Object` is a loose structured value (typically parsed JSON); `Record` is
/// an instance produced by a [`RecordType`] and remembers its type. A record
/// equals an object holding exactly its present fields with equal values.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Record(Record),
}

impl Value {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as record.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Look up a member of a structured value by name.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(r) => r.get(name),
            Self::Object(map) => map.get(name),
            _ => None,
        }
    }

    /// `true` for values a record type may accept.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Record(_) | Self::Object(_))
    }

    /// Render without schema guidance.
    ///
    /// Records render their present fields in declaration order. Non-finite
    /// doubles render as `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::Long(n) => JsonValue::from(*n),
            Self::Double(d) => serde_json::Number::from_f64(*d)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Record(r) => r.to_json(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Record(r), Self::Object(map)) | (Self::Object(map), Self::Record(r)) => {
                r.matches_object(map)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Long(i),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

/// An instance of a [`RecordType`].
///
/// Holds one slot per declared field; a slot is empty when the field was
/// neither supplied nor defaulted at construction.
#[derive(Clone)]
pub struct Record {
    ty: Arc<RecordType>,
    values: Vec<Option<Value>>,
}

impl Record {
    pub(crate) fn from_parts(ty: Arc<RecordType>, values: Vec<Option<Value>>) -> Self {
        Self { ty, values }
    }

    /// The record's type.
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    pub(crate) fn is_instance_of(&self, ty: &RecordType) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.ty), ty)
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.ty.field_index(name)?;
        self.get_index(index)
    }

    /// Get a field value by declaration index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Set a field value by name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .ty
            .field_index(name)
            .ok_or_else(|| Error::invalid_value(self.ty.name(), format!("no field {:?}", name)))?;
        self.values[index] = Some(value.into());
        Ok(())
    }

    /// Clear a field, so that encoding falls back to its default.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        let index = self.ty.field_index(name)?;
        self.values[index].take()
    }

    /// Iterate over `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.ty
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name(), value.as_ref()))
    }

    fn matches_object(&self, map: &BTreeMap<String, Value>) -> bool {
        let mut present = 0;
        for (name, value) in self.iter() {
            if let Some(value) = value {
                present += 1;
                if map.get(name) != Some(value) {
                    return false;
                }
            }
        }
        present == map.len()
    }

    /// Encode with the record's own type.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Encoder::new().encode_with(|cursor| self.ty.write_fields(cursor, self))
    }

    /// Validate against the record's own type.
    pub fn validate(&self) -> bool {
        self.ty.check_fields(self, None)
    }

    /// Render present fields as a JSON object in declaration order.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.iter()
                .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_json())))
                .collect(),
        )
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ty.name() == other.ty.name() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.ty.name())?;
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let v = Value::from(json!({"a": [1, "x", 2.5, null, true]}));
        let items = v.get_field("a").and_then(Value::as_array).expect("array");
        assert_eq!(items[0], Value::Long(1));
        assert_eq!(items[1].as_str(), Some("x"));
        assert_eq!(items[2], Value::Double(2.5));
        assert!(items[3].is_null());
        assert_eq!(items[4], Value::Boolean(true));
    }

    #[test]
    fn test_to_json_roundtrip() {
        let json = json!({"name": "n", "tags": ["a", "b"], "count": 3});
        assert_eq!(Value::from(json.clone()).to_json(), json);
    }

    #[test]
    fn test_non_finite_double_renders_null() {
        assert_eq!(Value::Double(f64::NAN).to_json(), JsonValue::Null);
    }

    #[test]
    fn test_display() {
        let v = Value::from(vec!["a", "b"]);
        assert_eq!(v.to_string(), r#"["a","b"]"#);
    }

    #[test]
    fn test_record_equals_matching_object() {
        let ty = crate::parse_record(
            &json!({
                "type": "record",
                "name": "Pair",
                "fields": [
                    {"name": "a", "type": "string"},
                    {"name": "b", "type": {"type": "array", "items": "string"}, "default": []}
                ]
            }),
            &mut crate::schema::ParseOptions::default(),
        )
        .unwrap();
        let record = Value::Record(ty.construct([Some(Value::from("x"))]));

        let same = Value::from(json!({"a": "x", "b": []}));
        assert_eq!(record, same);
        assert_eq!(same, record);

        assert_ne!(record, Value::from(json!({"a": "y", "b": []})));
        assert_ne!(record, Value::from(json!({"a": "x"})));
        assert_ne!(record, Value::from(json!({"a": "x", "b": [], "c": 1})));
    }

    #[test]
    fn test_nested_record_equals_nested_object() {
        let ty = crate::schema::parse(&json!({
            "type": "record",
            "name": "Outer",
            "fields": [{"name": "inner", "type": {
                "type": "record",
                "name": "Inner",
                "fields": [{"name": "s", "type": "string"}]
            }}]
        }))
        .unwrap();
        let json = json!({"inner": {"s": "v"}});
        let typed = ty.from_json(&json).unwrap();
        assert!(matches!(typed, Value::Record(_)));
        assert_eq!(typed, Value::from(json));
    }

    #[test]
    fn test_structured() {
        assert!(Value::Object(BTreeMap::new()).is_structured());
        assert!(!Value::Null.is_structured());
        assert!(!Value::from("x").is_structured());
    }
}
