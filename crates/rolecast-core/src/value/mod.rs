//! Dynamic values and type descriptors
//!
//! [`Value`] is the tagged union that carries field contents across record
//! boundaries, and [`FieldType`] describes the declared type of a field.
//! Every value knows its own runtime type through [`Value::type_of`].
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

mod field;
mod json;

pub use field::FieldValue;
pub use json::field_map_from_json;

use crate::schema::{RecordSchema, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Generic string-keyed map of values
pub type FieldMap = BTreeMap<String, Value>;

/// Integer width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// Pointer-sized (`isize` / `usize`)
    Size,
}

/// Float width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Kinds that are observable but can never be moved between records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpaqueKind {
    Channel,
    Function,
    Interface,
}

/// Declared type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    String,
    Optional(Box<FieldType>),
    Seq(Box<FieldType>),
    Map(Box<FieldType>, Box<FieldType>),
    Record(RecordType),
    /// Dynamic element type; as a field type this is the interface kind
    Any,
    Channel,
    Function,
}

impl FieldType {
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    pub fn seq(elem: FieldType) -> Self {
        FieldType::Seq(Box::new(elem))
    }

    pub fn map(key: FieldType, value: FieldType) -> Self {
        FieldType::Map(Box::new(key), Box::new(value))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::Int(_) | FieldType::Uint(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, FieldType::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// The opaque kind of channel, function and interface types
    pub fn opaque_kind(&self) -> Option<OpaqueKind> {
        match self {
            FieldType::Channel => Some(OpaqueKind::Channel),
            FieldType::Function => Some(OpaqueKind::Function),
            FieldType::Any => Some(OpaqueKind::Interface),
            _ => None,
        }
    }

    /// The zero value of this type
    pub fn zero_value(&self) -> Value {
        match self {
            FieldType::Bool => Value::Bool(false),
            FieldType::Int(width) => Value::Int(*width, 0),
            FieldType::Uint(width) => Value::Uint(*width, 0),
            FieldType::Float(width) => Value::Float(*width, 0.0),
            FieldType::String => Value::String(String::new()),
            FieldType::Optional(inner) => Value::Optional((**inner).clone(), None),
            FieldType::Seq(elem) => Value::Seq((**elem).clone(), Vec::new()),
            FieldType::Map(key, value) => {
                Value::Map((**key).clone(), (**value).clone(), Vec::new())
            }
            FieldType::Record(record) => Value::Record(RecordValue::zero(record)),
            FieldType::Any => Value::Nil,
            FieldType::Channel => Value::Opaque(OpaqueKind::Channel),
            FieldType::Function => Value::Opaque(OpaqueKind::Function),
        }
    }
}

/// Where a record type finds its schema
#[derive(Clone)]
enum SchemaSource {
    /// Derived records; resolved lazily so self-referential types work
    Static(fn() -> Arc<Schema>),
    Shared(Arc<Schema>),
}

/// A named record type with its schema
#[derive(Clone)]
pub struct RecordType {
    name: Arc<str>,
    source: SchemaSource,
}

impl RecordType {
    /// The record type of a derived record
    pub fn of<R: RecordSchema>() -> Self {
        Self {
            name: Arc::from(R::record_name()),
            source: SchemaSource::Static(R::record_schema),
        }
    }

    /// A record type backed by a runtime schema
    pub fn shared(schema: Arc<Schema>) -> Self {
        Self {
            name: Arc::from(schema.name()),
            source: SchemaSource::Shared(schema),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Arc<Schema> {
        match &self.source {
            SchemaSource::Static(load) => load(),
            SchemaSource::Shared(schema) => Arc::clone(schema),
        }
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name {
            return false;
        }
        let (left, right) = (self.schema(), other.schema());
        Arc::ptr_eq(&left, &right) || left.same_shape(&right)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name).finish()
    }
}

/// Captured field values of one record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    ty: RecordType,
    fields: Vec<(String, Value)>,
}

impl RecordValue {
    pub fn new(ty: RecordType, fields: Vec<(String, Value)>) -> Self {
        Self { ty, fields }
    }

    /// A record of the given type with every exported field zeroed
    pub fn zero(ty: &RecordType) -> Self {
        let fields = ty
            .schema()
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), field.ty().zero_value()))
            .collect();
        Self {
            ty: ty.clone(),
            fields,
        }
    }

    /// Capture every exported field of a derived record
    pub fn capture<R: crate::Record + RecordSchema>(record: &R) -> Self {
        let ty = RecordType::of::<R>();
        let fields = ty
            .schema()
            .fields()
            .iter()
            .filter_map(|field| {
                record
                    .get(field.name())
                    .map(|value| (field.name().to_string(), value))
            })
            .collect();
        Self { ty, fields }
    }

    /// Rebuild a derived record from a captured value
    pub fn restore<R>(value: Value) -> std::result::Result<R, crate::CoercionError>
    where
        R: crate::Record + RecordSchema + Default,
    {
        let expected = FieldType::Record(RecordType::of::<R>());
        let found = value.type_of();
        match value {
            Value::Record(captured) if found == expected => {
                let mut record = R::default();
                for (name, value) in captured.fields {
                    record
                        .set(&name, value)
                        .map_err(|_| crate::CoercionError::mismatch(&expected, found.clone()))?;
                }
                Ok(record)
            }
            _ => Err(crate::CoercionError::mismatch(&expected, found)),
        }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

/// Dynamic value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Untyped absent value
    #[default]
    Nil,
    Bool(bool),
    Int(IntWidth, i64),
    Uint(IntWidth, u64),
    Float(FloatWidth, f64),
    String(String),
    /// Optional of the given inner type, `None` when absent
    Optional(FieldType, Option<Box<Value>>),
    Seq(FieldType, Vec<Value>),
    Map(FieldType, FieldType, Vec<(Value, Value)>),
    Record(RecordValue),
    /// Channel, function or interface handle
    Opaque(OpaqueKind),
}

impl Value {
    /// Convert any field value into a dynamic value
    pub fn of<T: FieldValue>(value: T) -> Self {
        value.to_value()
    }

    /// A present optional value
    pub fn some(inner: FieldType, value: Value) -> Self {
        Value::Optional(inner, Some(Box::new(value)))
    }

    /// An absent optional value
    pub fn none(inner: FieldType) -> Self {
        Value::Optional(inner, None)
    }

    /// A sequence of dynamic elements
    pub fn any_seq(items: Vec<Value>) -> Self {
        Value::Seq(FieldType::Any, items)
    }

    /// Runtime type of this value; `Nil` reports [`FieldType::Any`]
    pub fn type_of(&self) -> FieldType {
        match self {
            Value::Nil => FieldType::Any,
            Value::Bool(_) => FieldType::Bool,
            Value::Int(width, _) => FieldType::Int(*width),
            Value::Uint(width, _) => FieldType::Uint(*width),
            Value::Float(width, _) => FieldType::Float(*width),
            Value::String(_) => FieldType::String,
            Value::Optional(inner, _) => FieldType::optional(inner.clone()),
            Value::Seq(elem, _) => FieldType::seq(elem.clone()),
            Value::Map(key, value, _) => FieldType::map(key.clone(), value.clone()),
            Value::Record(record) => FieldType::Record(record.ty.clone()),
            Value::Opaque(OpaqueKind::Channel) => FieldType::Channel,
            Value::Opaque(OpaqueKind::Function) => FieldType::Function,
            Value::Opaque(OpaqueKind::Interface) => FieldType::Any,
        }
    }

    /// `Nil` or an absent optional
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil | Value::Optional(_, None))
    }

    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !b,
            Value::Int(_, v) => *v == 0,
            Value::Uint(_, v) => *v == 0,
            Value::Float(_, v) => *v == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Optional(_, inner) => inner.is_none(),
            Value::Seq(_, items) => items.is_empty(),
            Value::Map(_, _, entries) => entries.is_empty(),
            Value::Record(record) => record.fields.iter().all(|(_, value)| value.is_zero()),
            Value::Opaque(_) => false,
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

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(_, v) => Some(*v),
            Value::Uint(_, v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(_, v) => Some(*v),
            _ => None,
        }
    }

    /// Elements of a sequence
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(_, items) => Some(items),
            _ => None,
        }
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

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntWidth::W8 => write!(f, "8"),
            IntWidth::W16 => write!(f, "16"),
            IntWidth::W32 => write!(f, "32"),
            IntWidth::W64 => write!(f, "64"),
            IntWidth::Size => write!(f, "size"),
        }
    }
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueKind::Channel => write!(f, "channel"),
            OpaqueKind::Function => write!(f, "function"),
            OpaqueKind::Interface => write!(f, "interface"),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int(width) => write!(f, "i{}", width),
            FieldType::Uint(width) => write!(f, "u{}", width),
            FieldType::Float(FloatWidth::F32) => write!(f, "f32"),
            FieldType::Float(FloatWidth::F64) => write!(f, "f64"),
            FieldType::String => write!(f, "string"),
            FieldType::Optional(inner) => write!(f, "Option<{}>", inner),
            FieldType::Seq(elem) => write!(f, "Vec<{}>", elem),
            FieldType::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            FieldType::Record(record) => write!(f, "{}", record.name()),
            FieldType::Any => write!(f, "any"),
            FieldType::Channel => write!(f, "channel"),
            FieldType::Function => write!(f, "function"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(FieldType::Int(IntWidth::W8).to_string(), "i8");
        assert_eq!(FieldType::Uint(IntWidth::Size).to_string(), "usize");
        assert_eq!(
            FieldType::map(FieldType::String, FieldType::seq(FieldType::Float(FloatWidth::F64)))
                .to_string(),
            "Map<string, Vec<f64>>"
        );
        assert_eq!(FieldType::optional(FieldType::Bool).to_string(), "Option<bool>");
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Int(IntWidth::W8, 5).type_of(), FieldType::Int(IntWidth::W8));
        assert_eq!(
            Value::none(FieldType::String).type_of(),
            FieldType::optional(FieldType::String)
        );
        assert_eq!(Value::Nil.type_of(), FieldType::Any);
        assert_eq!(Value::Opaque(OpaqueKind::Channel).type_of(), FieldType::Channel);
    }

    #[test]
    fn test_zero_values() {
        assert!(FieldType::String.zero_value().is_zero());
        assert!(FieldType::seq(FieldType::Bool).zero_value().is_zero());
        assert!(FieldType::optional(FieldType::Bool).zero_value().is_nil());
        assert!(!Value::some(FieldType::Bool, Value::Bool(false)).is_zero());
        assert!(!Value::Opaque(OpaqueKind::Function).is_zero());
    }

    #[test]
    fn test_opaque_kinds() {
        assert_eq!(FieldType::Any.opaque_kind(), Some(OpaqueKind::Interface));
        assert_eq!(FieldType::seq(FieldType::Any).opaque_kind(), None);
    }
}
