//! JSON interop for dynamic values
//!
//! Decoding follows the shape of untyped JSON: arrays become `Vec<any>`,
//! objects become `Map<string, any>`. Encoding fails for values that have no
//! JSON form (opaque handles, non-finite floats, non-scalar map keys).
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::{FieldMap, FieldType, FloatWidth, IntWidth, RecordValue, Value};
use crate::error::{Error, Result};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(IntWidth::W64, i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(IntWidth::W64, u)
                } else {
                    Value::Float(FloatWidth::F64, n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Seq(FieldType::Any, items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                FieldType::String,
                FieldType::Any,
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Decode a JSON object into a field map
pub fn field_map_from_json(json: &str) -> Result<FieldMap> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    match document {
        serde_json::Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()),
        other => Err(Error::shape(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn map_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(_, v) => Some(v.to_string()),
        Value::Uint(_, v) => Some(v.to_string()),
        Value::Optional(_, Some(inner)) => map_key(inner),
        _ => None,
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(_, v) => serializer.serialize_i64(*v),
            Value::Uint(_, v) => serializer.serialize_u64(*v),
            Value::Float(_, v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Float(_, v) => Err(S::Error::custom(format!(
                "unsupported float value: {}",
                v
            ))),
            Value::String(s) => serializer.serialize_str(s),
            Value::Optional(_, None) => serializer.serialize_none(),
            Value::Optional(_, Some(inner)) => serializer.serialize_some(inner.as_ref()),
            Value::Seq(_, items) => serializer.collect_seq(items),
            Value::Map(_, _, entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    let key = map_key(key).ok_or_else(|| {
                        S::Error::custom(format!("unsupported map key type: {}", key.type_of()))
                    })?;
                    map.serialize_entry(&key, value)?;
                }
                map.end()
            }
            Value::Record(record) => record.serialize(serializer),
            Value::Opaque(kind) => Err(S::Error::custom(format!(
                "unsupported value: {} cannot be encoded",
                kind
            ))),
        }
    }
}

/// Records encode as objects keyed by external name; fields aliased `-`
/// are left out.
impl Serialize for RecordValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let schema = self.record_type().schema();
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.fields() {
            let key = match schema.field(name) {
                Some(descriptor) => match descriptor.external_name() {
                    Some(key) => key,
                    None => continue,
                },
                None => name.as_str(),
            };
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::OpaqueKind;
    use serde_json::json;

    #[test]
    fn test_decode_untyped_json() {
        let value = Value::from(json!({"tags": ["a", 1], "score": 1.5, "id": 7, "gone": null}));
        let Value::Map(FieldType::String, FieldType::Any, entries) = value else {
            panic!("expected a map");
        };
        let lookup = |key: &str| {
            entries
                .iter()
                .find(|(k, _)| k == &Value::from(key))
                .map(|(_, v)| v.clone())
        };
        assert_eq!(
            lookup("tags"),
            Some(Value::any_seq(vec![Value::from("a"), Value::Int(IntWidth::W64, 1)]))
        );
        assert_eq!(lookup("score"), Some(Value::Float(FloatWidth::F64, 1.5)));
        assert_eq!(lookup("id"), Some(Value::Int(IntWidth::W64, 7)));
        assert_eq!(lookup("gone"), Some(Value::Nil));
    }

    #[test]
    fn test_field_map_requires_object() {
        let map = field_map_from_json(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("Ada")));

        let err = field_map_from_json("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Shape);
    }

    #[test]
    fn test_encode_values() {
        let value = Value::Map(
            FieldType::Int(IntWidth::W32),
            FieldType::optional(FieldType::String),
            vec![
                (Value::Int(IntWidth::W32, 2), Value::none(FieldType::String)),
                (
                    Value::Int(IntWidth::W32, 1),
                    Value::some(FieldType::String, Value::from("x")),
                ),
            ],
        );
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"1": "x", "2": null}));
    }

    #[test]
    fn test_unencodable_values() {
        assert!(serde_json::to_string(&Value::Opaque(OpaqueKind::Function)).is_err());
        assert!(serde_json::to_string(&Value::Float(FloatWidth::F64, f64::NAN)).is_err());
        let bad_key = Value::Map(
            FieldType::seq(FieldType::Bool),
            FieldType::Bool,
            vec![(Value::Seq(FieldType::Bool, vec![]), Value::Bool(true))],
        );
        assert!(serde_json::to_string(&bad_key).is_err());
    }
}
