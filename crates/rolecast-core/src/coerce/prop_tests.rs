//! Property-based tests for the coercion engine
//!
//! These tests verify that coercion is deterministic, never mutates its
//! input and only ever produces values of the requested type.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::*;
use crate::proptest_strategies::*;
use crate::value::{FloatWidth, IntWidth};
use proptest::prelude::*;

proptest! {
    /// Property: a value coerced to its own type is unchanged
    #[test]
    fn prop_identity_coercion(value in scalar_value_strategy()) {
        let ty = value.type_of();
        prop_assert_eq!(coerce(&value, &ty).unwrap(), value);
    }

    /// Property: successful coercions produce a value of the target type
    #[test]
    fn prop_result_has_target_type(
        value in scalar_value_strategy(),
        target in numeric_type_strategy(),
    ) {
        if let Ok(converted) = coerce(&value, &target) {
            prop_assert_eq!(converted.type_of(), target);
        }
    }

    /// Property: coercion never changes its input
    #[test]
    fn prop_input_untouched(
        value in scalar_value_strategy(),
        target in numeric_type_strategy(),
    ) {
        let before = value.clone();
        let _ = coerce(&value, &target);
        prop_assert_eq!(value, before);
    }

    /// Property: widening to i64 preserves the number
    #[test]
    fn prop_widening_preserves_value(value in int_value_strategy()) {
        let expected = value.as_i64();
        let widened = coerce(&value, &FieldType::Int(IntWidth::W64)).unwrap();
        prop_assert_eq!(widened.as_i64(), expected);
    }

    /// Property: wrapping narrowing matches a truncating cast
    #[test]
    fn prop_wrapping_matches_cast(n in any::<i64>()) {
        let value = Value::Int(IntWidth::W64, n);
        prop_assert_eq!(
            coerce(&value, &FieldType::Int(IntWidth::W8)).unwrap(),
            Value::Int(IntWidth::W8, i64::from(n as i8))
        );
        prop_assert_eq!(
            coerce(&value, &FieldType::Uint(IntWidth::W16)).unwrap(),
            Value::Uint(IntWidth::W16, u64::from(n as u16))
        );
    }

    /// Property: checked narrowing either preserves the number or fails
    #[test]
    fn prop_checked_narrowing_is_lossless(n in any::<i64>(), width in int_width_strategy()) {
        let coercer = Coercer::with_narrowing(NarrowingMode::Checked);
        if let Ok(narrowed) = coercer.coerce(&Value::Int(IntWidth::W64, n), &FieldType::Int(width)) {
            prop_assert_eq!(narrowed.as_i64(), Some(n));
        }
    }

    /// Property: floats never become integers
    #[test]
    fn prop_float_to_integer_rejected(v in any::<f64>(), width in int_width_strategy()) {
        let value = Value::Float(FloatWidth::F64, v);
        let is_mismatch = matches!(
            coerce(&value, &FieldType::Int(width)),
            Err(CoercionError::TypeMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    /// Property: string sequences convert into string sequences only
    #[test]
    fn prop_string_sequences(value in string_seq_strategy()) {
        prop_assert!(coerce(&value, &FieldType::seq(FieldType::String)).is_ok());
        prop_assert!(coerce(&value, &FieldType::seq(FieldType::Bool)).is_err());
    }

    /// Property: channel, function and interface targets are always rejected
    #[test]
    fn prop_opaque_targets_rejected(value in scalar_value_strategy()) {
        for target in [FieldType::Channel, FieldType::Function, FieldType::Any] {
            let is_unsupported = matches!(
                coerce(&value, &target),
                Err(CoercionError::UnsupportedKind { .. })
            );
            prop_assert!(is_unsupported);
        }
    }
}
