//! Numeric conversions between integer and float widths
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::config::NarrowingMode;
use crate::value::{FieldType, FloatWidth, IntWidth, Value};

/// Whether values of `from` can be converted to `to` numerically.
/// Floats never convert to integers.
pub fn numeric_convertible(from: &FieldType, to: &FieldType) -> bool {
    (from.is_integer() && to.is_numeric()) || (from.is_float() && to.is_float())
}

/// Convert a numeric value to a numeric target type.
///
/// Returns `None` when no rule applies or, in checked mode, when the value
/// does not fit the target width.
pub(crate) fn convert(value: &Value, target: &FieldType, narrowing: NarrowingMode) -> Option<Value> {
    match (value, target) {
        (Value::Int(_, v), _) => convert_integer(i128::from(*v), target, narrowing),
        (Value::Uint(_, v), _) => convert_integer(i128::from(*v), target, narrowing),
        (Value::Float(_, v), FieldType::Float(width)) => convert_float(*v, *width, narrowing),
        _ => None,
    }
}

fn convert_integer(n: i128, target: &FieldType, narrowing: NarrowingMode) -> Option<Value> {
    match target {
        FieldType::Int(width) => {
            let (min, max) = signed_range(*width);
            if narrowing == NarrowingMode::Checked && (n < min || n > max) {
                return None;
            }
            Some(Value::Int(*width, wrap_signed(n, *width)))
        }
        FieldType::Uint(width) => {
            if narrowing == NarrowingMode::Checked && (n < 0 || n > unsigned_max(*width)) {
                return None;
            }
            Some(Value::Uint(*width, wrap_unsigned(n, *width)))
        }
        FieldType::Float(FloatWidth::F32) => Some(Value::Float(FloatWidth::F32, n as f32 as f64)),
        FieldType::Float(FloatWidth::F64) => Some(Value::Float(FloatWidth::F64, n as f64)),
        _ => None,
    }
}

fn convert_float(v: f64, width: FloatWidth, narrowing: NarrowingMode) -> Option<Value> {
    match width {
        FloatWidth::F64 => Some(Value::Float(FloatWidth::F64, v)),
        FloatWidth::F32 => {
            let narrowed = v as f32;
            if narrowing == NarrowingMode::Checked && v.is_finite() && narrowed.is_infinite() {
                return None;
            }
            Some(Value::Float(FloatWidth::F32, f64::from(narrowed)))
        }
    }
}

fn signed_range(width: IntWidth) -> (i128, i128) {
    match width {
        IntWidth::W8 => (i8::MIN.into(), i8::MAX.into()),
        IntWidth::W16 => (i16::MIN.into(), i16::MAX.into()),
        IntWidth::W32 => (i32::MIN.into(), i32::MAX.into()),
        IntWidth::W64 => (i64::MIN.into(), i64::MAX.into()),
        IntWidth::Size => (isize::MIN as i128, isize::MAX as i128),
    }
}

fn unsigned_max(width: IntWidth) -> i128 {
    match width {
        IntWidth::W8 => u8::MAX.into(),
        IntWidth::W16 => u16::MAX.into(),
        IntWidth::W32 => u32::MAX.into(),
        IntWidth::W64 => u64::MAX.into(),
        IntWidth::Size => usize::MAX as i128,
    }
}

// Truncating casts: two's complement wrap-around
fn wrap_signed(n: i128, width: IntWidth) -> i64 {
    match width {
        IntWidth::W8 => i64::from(n as i8),
        IntWidth::W16 => i64::from(n as i16),
        IntWidth::W32 => i64::from(n as i32),
        IntWidth::W64 => n as i64,
        IntWidth::Size => n as isize as i64,
    }
}

fn wrap_unsigned(n: i128, width: IntWidth) -> u64 {
    match width {
        IntWidth::W8 => u64::from(n as u8),
        IntWidth::W16 => u64::from(n as u16),
        IntWidth::W32 => u64::from(n as u32),
        IntWidth::W64 => n as u64,
        IntWidth::Size => n as usize as u64,
    }
}
