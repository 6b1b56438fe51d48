//! Conversions between Rust field types and dynamic values
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::{FieldType, FloatWidth, IntWidth, OpaqueKind, Value};
use crate::error::CoercionError;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

/// A Rust type that can be stored in a record field
///
/// `from_value` expects a value already coerced to exactly
/// [`FieldValue::field_type`]; the coercion engine is responsible for
/// getting it there.
pub trait FieldValue: Sized {
    /// Declared type of fields of this Rust type
    fn field_type() -> FieldType;

    /// Capture the current value
    fn to_value(&self) -> Value;

    /// Rebuild from a value of exactly [`FieldValue::field_type`]
    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

fn mismatch<T: FieldValue>(value: &Value) -> CoercionError {
    CoercionError::mismatch(&T::field_type(), value.type_of())
}

macro_rules! impl_int_field {
    ($($ty:ty => $variant:ident($width:ident, $repr:ty)),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::$variant(IntWidth::$width)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(IntWidth::$width, *self as $repr)
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match value {
                        Value::$variant(IntWidth::$width, v) => Ok(v as $ty),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

impl_int_field!(
    i8 => Int(W8, i64),
    i16 => Int(W16, i64),
    i32 => Int(W32, i64),
    i64 => Int(W64, i64),
    isize => Int(Size, i64),
    u8 => Uint(W8, u64),
    u16 => Uint(W16, u64),
    u32 => Uint(W32, u64),
    u64 => Uint(W64, u64),
    usize => Uint(Size, u64),
);

macro_rules! impl_float_field {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::Float(FloatWidth::$width)
                }

                fn to_value(&self) -> Value {
                    Value::Float(FloatWidth::$width, *self as f64)
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match value {
                        Value::Float(FloatWidth::$width, v) => Ok(v as $ty),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

impl_float_field!(f32 => F32, f64 => F64);

impl FieldValue for bool {
    fn field_type() -> FieldType {
        FieldType::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for String {
    fn field_type() -> FieldType {
        FieldType::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn field_type() -> FieldType {
        FieldType::optional(T::field_type())
    }

    fn to_value(&self) -> Value {
        Value::Optional(
            T::field_type(),
            self.as_ref().map(|inner| Box::new(inner.to_value())),
        )
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Optional(_, None) => Ok(None),
            Value::Optional(_, Some(inner)) => T::from_value(*inner).map(Some),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::seq(T::field_type())
    }

    fn to_value(&self) -> Value {
        Value::Seq(T::field_type(), self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Seq(_, items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Ord,
    V: FieldValue,
{
    fn field_type() -> FieldType {
        FieldType::map(K::field_type(), V::field_type())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            K::field_type(),
            V::field_type(),
            self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Map(_, _, entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<K, V> FieldValue for HashMap<K, V>
where
    K: FieldValue + Eq + Hash + Ord,
    V: FieldValue,
{
    fn field_type() -> FieldType {
        FieldType::map(K::field_type(), V::field_type())
    }

    // Entries are captured in key order so captured values compare equal
    fn to_value(&self) -> Value {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Value::Map(
            K::field_type(),
            V::field_type(),
            entries
                .into_iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Map(_, _, entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// Dynamic values: heterogeneous elements, or the interface kind as a field
impl FieldValue for Value {
    fn field_type() -> FieldType {
        FieldType::Any
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

macro_rules! impl_opaque_field {
    ($kind:ident => $($ty:ty),* $(,)?) => {
        $(
            impl<T> FieldValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::$kind
                }

                fn to_value(&self) -> Value {
                    Value::Opaque(OpaqueKind::$kind)
                }

                fn from_value(_value: Value) -> Result<Self, CoercionError> {
                    Err(CoercionError::UnsupportedKind {
                        kind: OpaqueKind::$kind,
                    })
                }
            }
        )*
    };
}

impl_opaque_field!(Channel => Sender<T>, SyncSender<T>, Receiver<T>);
impl_opaque_field!(Function => fn() -> T);

impl<A, R> FieldValue for fn(A) -> R {
    fn field_type() -> FieldType {
        FieldType::Function
    }

    fn to_value(&self) -> Value {
        Value::Opaque(OpaqueKind::Function)
    }

    fn from_value(_value: Value) -> Result<Self, CoercionError> {
        Err(CoercionError::UnsupportedKind {
            kind: OpaqueKind::Function,
        })
    }
}
