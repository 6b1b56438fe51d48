//! Type coercion engine
//!
//! Decides whether a runtime value can be written into a field of another
//! declared type, and produces the converted value. Rules apply in order:
//!
//! 1. Channel, function and interface kinds are rejected outright.
//! 2. A value whose runtime type equals the target is cloned.
//! 3. Optional wrappers are added or removed (one level).
//! 4. Integers convert to any integer or float width, floats to any float
//!    width. Floats never convert to integers.
//! 5. Sequences and maps convert element-wise when their element types are
//!    equal or numerically convertible. `Vec<any>` needs explicit re-typing.
//! 6. Records only convert when their types are directly assignable.
//!
//! Coercion never mutates its input.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

mod container;
mod numeric;

#[cfg(test)]
mod prop_tests;

pub use numeric::numeric_convertible;

use crate::config::{CoercionConfig, NarrowingMode};
use crate::error::CoercionError;
use crate::value::{FieldType, Value};

/// Result of coercing one value
pub type CoercionOutcome = Result<Value, CoercionError>;

/// Coercion engine configured with a narrowing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coercer {
    narrowing: NarrowingMode,
}

impl Coercer {
    pub fn new(config: &CoercionConfig) -> Self {
        Self {
            narrowing: config.narrowing,
        }
    }

    pub fn with_narrowing(narrowing: NarrowingMode) -> Self {
        Self { narrowing }
    }

    pub fn narrowing(&self) -> NarrowingMode {
        self.narrowing
    }

    /// Coerce `value` into a value of type `target`
    pub fn coerce(&self, value: &Value, target: &FieldType) -> CoercionOutcome {
        reject_opaque(value, target)?;

        if value.is_nil() {
            return match target {
                FieldType::Optional(inner) => {
                    // A typed absent value still has to fit the target
                    if let Value::Optional(found, None) = value {
                        if *found != FieldType::Any {
                            assignable(found, inner)
                                .map_err(|_| CoercionError::mismatch(target, value.type_of()))?;
                        }
                    }
                    Ok(Value::none((**inner).clone()))
                }
                _ => Err(CoercionError::NilToNonOptional {
                    expected: target.clone(),
                }),
            };
        }

        if value.type_of() == *target {
            return Ok(value.clone());
        }

        match (value, target) {
            (Value::Optional(_, Some(inner)), FieldType::Optional(target_inner)) => self
                .convert(inner, target_inner)
                .map(|converted| Value::some((**target_inner).clone(), converted)),
            (Value::Optional(_, Some(inner)), _) => self.convert(inner, target),
            (_, FieldType::Optional(target_inner)) => self
                .convert(value, target_inner)
                .map(|converted| Value::some((**target_inner).clone(), converted)),
            _ => self.convert(value, target),
        }
    }

    /// Numeric, container and direct conversion of a present value
    fn convert(&self, value: &Value, target: &FieldType) -> CoercionOutcome {
        reject_opaque(value, target)?;

        let found = value.type_of();
        if found == *target {
            return Ok(value.clone());
        }

        match (value, target) {
            (Value::Nil, _) => Err(CoercionError::NilToNonOptional {
                expected: target.clone(),
            }),
            (Value::Int(..) | Value::Uint(..) | Value::Float(..), _) if target.is_numeric() => {
                numeric::convert(value, target, self.narrowing)
                    .ok_or_else(|| CoercionError::mismatch(target, found))
            }
            (Value::Seq(elem, items), FieldType::Seq(target_elem)) => {
                container::convert_seq(elem, items, target_elem, self.narrowing)
            }
            (Value::Map(key, val, entries), FieldType::Map(target_key, target_val)) => {
                container::convert_map((key, val), entries, (target_key, target_val), self.narrowing)
            }
            _ => Err(CoercionError::mismatch(target, found)),
        }
    }
}

fn reject_opaque(value: &Value, target: &FieldType) -> Result<(), CoercionError> {
    if let Some(kind) = target.opaque_kind() {
        return Err(CoercionError::UnsupportedKind { kind });
    }
    if let Value::Opaque(kind) = value {
        return Err(CoercionError::UnsupportedKind { kind: *kind });
    }
    Ok(())
}

/// Coerce with the default (wrapping) coercer
pub fn coerce(value: &Value, target: &FieldType) -> CoercionOutcome {
    Coercer::default().coerce(value, target)
}

/// Type-level counterpart of [`coerce`]: whether values declared as `from`
/// can in general be written into fields declared as `to`
pub fn assignable(from: &FieldType, to: &FieldType) -> Result<(), CoercionError> {
    check_types(from, to, true)
}

/// Like [`assignable`], but scalars must match exactly. Only the optional
/// wrapper and element-wise container conversion may bridge two types.
pub fn copyable(from: &FieldType, to: &FieldType) -> Result<(), CoercionError> {
    check_types(from, to, false)
}

fn check_types(from: &FieldType, to: &FieldType, numeric_scalars: bool) -> Result<(), CoercionError> {
    for ty in [to, from] {
        if let Some(kind) = ty.opaque_kind() {
            return Err(CoercionError::UnsupportedKind { kind });
        }
    }
    if from == to {
        return Ok(());
    }

    let from_inner = unwrap_optional(from);
    let to_inner = unwrap_optional(to);
    if let Some(kind) = to_inner.opaque_kind().or_else(|| from_inner.opaque_kind()) {
        return Err(CoercionError::UnsupportedKind { kind });
    }

    let compatible = match (from_inner, to_inner) {
        (a, b) if a == b => true,
        (a, b) if numeric_scalars && numeric_convertible(a, b) => true,
        (FieldType::Seq(a), FieldType::Seq(b)) => container::element_convertible(a, b),
        (FieldType::Map(ka, va), FieldType::Map(kb, vb)) => {
            container::element_convertible(ka, kb) && container::element_convertible(va, vb)
        }
        _ => false,
    };

    if compatible {
        Ok(())
    } else {
        Err(CoercionError::mismatch(to, from.clone()))
    }
}

fn unwrap_optional(ty: &FieldType) -> &FieldType {
    match ty {
        FieldType::Optional(inner) => inner.as_ref(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, Schema};
    use crate::value::{FloatWidth, IntWidth, OpaqueKind, RecordType, RecordValue};
    use std::sync::Arc;

    fn strings(items: &[&str]) -> Value {
        Value::Seq(FieldType::String, items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn test_identical_type_is_cloned() {
        let value = strings(&["a", "b"]);
        assert_eq!(coerce(&value, &FieldType::seq(FieldType::String)).unwrap(), value);
    }

    #[test]
    fn test_integer_widening() {
        let value = coerce(&Value::Int(IntWidth::W8, 5), &FieldType::Int(IntWidth::W64)).unwrap();
        assert_eq!(value, Value::Int(IntWidth::W64, 5));
    }

    #[test]
    fn test_float_to_integer_fails() {
        let err = coerce(
            &Value::Float(FloatWidth::F64, 3.9),
            &FieldType::Int(IntWidth::W64),
        )
        .unwrap_err();
        assert!(matches!(err, CoercionError::TypeMismatch { .. }));
    }

    #[test]
    fn test_checked_narrowing() {
        let coercer = Coercer::with_narrowing(NarrowingMode::Checked);
        assert!(coercer
            .coerce(&Value::Int(IntWidth::W64, 1000), &FieldType::Int(IntWidth::W8))
            .is_err());
        assert_eq!(
            coerce(&Value::Int(IntWidth::W64, 1000), &FieldType::Int(IntWidth::W8)).unwrap(),
            Value::Int(IntWidth::W8, i64::from(1000i64 as i8))
        );
    }

    #[test]
    fn test_optional_unwrap_and_wrap() {
        let present = Value::some(FieldType::String, Value::from("hello"));
        assert_eq!(coerce(&present, &FieldType::String).unwrap(), Value::from("hello"));

        let wrapped = coerce(&Value::from("hello"), &FieldType::optional(FieldType::String)).unwrap();
        assert_eq!(wrapped, present);

        let absent = Value::none(FieldType::String);
        assert_eq!(
            coerce(&absent, &FieldType::String).unwrap_err(),
            CoercionError::NilToNonOptional {
                expected: FieldType::String
            }
        );
        assert_eq!(
            coerce(&Value::Nil, &FieldType::optional(FieldType::Int(IntWidth::W32))).unwrap(),
            Value::none(FieldType::Int(IntWidth::W32))
        );
    }

    #[test]
    fn test_optional_numeric_conversion() {
        let value = Value::some(FieldType::Int(IntWidth::W8), Value::Int(IntWidth::W8, 9));
        assert_eq!(
            coerce(&value, &FieldType::optional(FieldType::Int(IntWidth::W64))).unwrap(),
            Value::some(FieldType::Int(IntWidth::W64), Value::Int(IntWidth::W64, 9))
        );
    }

    #[test]
    fn test_optional_sequence_unwraps() {
        let value = Value::some(FieldType::seq(FieldType::String), strings(&["x"]));
        assert_eq!(
            coerce(&value, &FieldType::seq(FieldType::String)).unwrap(),
            strings(&["x"])
        );
    }

    #[test]
    fn test_numeric_sequence_conversion() {
        let value = Value::Seq(
            FieldType::Int(IntWidth::W32),
            vec![Value::Int(IntWidth::W32, 1), Value::Int(IntWidth::W32, 2)],
        );
        let converted = coerce(&value, &FieldType::seq(FieldType::Float(FloatWidth::F64))).unwrap();
        assert_eq!(
            converted,
            Value::Seq(
                FieldType::Float(FloatWidth::F64),
                vec![Value::Float(FloatWidth::F64, 1.0), Value::Float(FloatWidth::F64, 2.0)]
            )
        );
    }

    #[test]
    fn test_any_sequence_needs_retyping() {
        let mixed = Value::any_seq(vec![Value::from("a"), Value::Int(IntWidth::W64, 1)]);
        let err = coerce(&mixed, &FieldType::seq(FieldType::String)).unwrap_err();
        assert!(matches!(err, CoercionError::TypeMismatch { .. }));

        let uniform = Value::any_seq(vec![Value::from("a")]);
        assert!(coerce(&uniform, &FieldType::seq(FieldType::String)).is_err());
    }

    #[test]
    fn test_map_conversion() {
        let value = Value::Map(
            FieldType::String,
            FieldType::Int(IntWidth::W16),
            vec![(Value::from("a"), Value::Int(IntWidth::W16, 3))],
        );
        let target = FieldType::map(FieldType::String, FieldType::Int(IntWidth::W64));
        assert_eq!(
            coerce(&value, &target).unwrap(),
            Value::Map(
                FieldType::String,
                FieldType::Int(IntWidth::W64),
                vec![(Value::from("a"), Value::Int(IntWidth::W64, 3))]
            )
        );
        assert!(coerce(&value, &FieldType::map(FieldType::String, FieldType::String)).is_err());
    }

    #[test]
    fn test_opaque_kinds_rejected() {
        for target in [FieldType::Channel, FieldType::Function, FieldType::Any] {
            assert!(matches!(
                coerce(&Value::from("x"), &target),
                Err(CoercionError::UnsupportedKind { .. })
            ));
        }
        assert_eq!(
            coerce(&Value::Opaque(OpaqueKind::Function), &FieldType::String).unwrap_err(),
            CoercionError::UnsupportedKind {
                kind: OpaqueKind::Function
            }
        );
    }

    #[test]
    fn test_records_require_same_type() {
        let schema = |name: &str| {
            Arc::new(
                Schema::builder(name)
                    .field(FieldDescriptor::new("id", FieldType::Int(IntWidth::W64)))
                    .build(),
            )
        };
        let user = RecordType::shared(schema("User"));
        let copy = RecordType::shared(schema("User"));
        let admin = RecordType::shared(schema("Admin"));
        let value = Value::Record(RecordValue::zero(&user));

        assert!(coerce(&value, &FieldType::Record(copy)).is_ok());
        assert!(coerce(&value, &FieldType::Record(admin)).is_err());
    }

    #[test]
    fn test_assignable_types() {
        let int64 = FieldType::Int(IntWidth::W64);
        assert!(assignable(&FieldType::Int(IntWidth::W8), &int64).is_ok());
        assert!(assignable(&FieldType::optional(FieldType::String), &FieldType::String).is_ok());
        assert!(assignable(&FieldType::Float(FloatWidth::F64), &int64).is_err());
        assert!(assignable(&FieldType::seq(FieldType::Any), &FieldType::seq(FieldType::String)).is_err());
        assert!(assignable(&FieldType::seq(FieldType::Any), &FieldType::seq(FieldType::Any)).is_ok());
        assert!(matches!(
            assignable(&FieldType::Channel, &FieldType::Channel),
            Err(CoercionError::UnsupportedKind { kind: OpaqueKind::Channel })
        ));
    }

    #[test]
    fn test_copyable_requires_exact_scalars() {
        let int8 = FieldType::Int(IntWidth::W8);
        let int64 = FieldType::Int(IntWidth::W64);
        assert!(matches!(
            copyable(&int64, &int8),
            Err(CoercionError::TypeMismatch { .. })
        ));
        assert!(copyable(&int8, &int64).is_err());
        assert!(copyable(&FieldType::optional(int64.clone()), &int64).is_ok());
        assert!(copyable(&int64, &FieldType::optional(int64.clone())).is_ok());
        assert!(copyable(&FieldType::optional(int8.clone()), &int64).is_err());
        assert!(copyable(&FieldType::seq(int8.clone()), &FieldType::seq(int64.clone())).is_ok());
        assert!(copyable(
            &FieldType::map(FieldType::String, int8),
            &FieldType::map(FieldType::String, int64)
        )
        .is_ok());
    }

    #[test]
    fn test_map_key_collisions_rejected() {
        let value = Value::Map(
            FieldType::Uint(IntWidth::W16),
            FieldType::String,
            vec![
                (Value::Uint(IntWidth::W16, 300), Value::from("a")),
                (Value::Uint(IntWidth::W16, 44), Value::from("b")),
            ],
        );
        let narrow = FieldType::map(FieldType::Uint(IntWidth::W8), FieldType::String);
        assert!(matches!(
            coerce(&value, &narrow),
            Err(CoercionError::TypeMismatch { .. })
        ));

        let wide = FieldType::map(FieldType::Uint(IntWidth::W64), FieldType::String);
        assert!(coerce(&value, &wide).is_ok());
    }

    #[test]
    fn test_typed_absent_value_must_fit() {
        let absent = Value::none(FieldType::String);
        assert!(matches!(
            coerce(&absent, &FieldType::optional(FieldType::Int(IntWidth::W32))),
            Err(CoercionError::TypeMismatch { .. })
        ));

        let narrow = Value::none(FieldType::Int(IntWidth::W8));
        assert_eq!(
            coerce(&narrow, &FieldType::optional(FieldType::Int(IntWidth::W64))).unwrap(),
            Value::none(FieldType::Int(IntWidth::W64))
        );
        assert_eq!(
            coerce(&Value::none(FieldType::Any), &FieldType::optional(FieldType::String)).unwrap(),
            Value::none(FieldType::String)
        );
    }
}
