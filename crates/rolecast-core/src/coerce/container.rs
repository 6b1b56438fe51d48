//! Element-wise conversion of sequences and maps
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::numeric::{self, numeric_convertible};
use crate::config::NarrowingMode;
use crate::error::CoercionError;
use crate::value::{FieldType, Value};

/// Whether container elements of type `from` may become elements of type `to`
pub(crate) fn element_convertible(from: &FieldType, to: &FieldType) -> bool {
    from == to || numeric_convertible(from, to)
}

fn convert_element(
    value: &Value,
    target: &FieldType,
    narrowing: NarrowingMode,
) -> Option<Value> {
    if value.type_of() == *target {
        Some(value.clone())
    } else {
        numeric::convert(value, target, narrowing)
    }
}

pub(crate) fn convert_seq(
    elem: &FieldType,
    items: &[Value],
    target_elem: &FieldType,
    narrowing: NarrowingMode,
) -> Result<Value, CoercionError> {
    let expected = FieldType::seq(target_elem.clone());
    let found = || FieldType::seq(elem.clone());
    if !element_convertible(elem, target_elem) {
        return Err(CoercionError::mismatch(&expected, found()));
    }

    let converted = items
        .iter()
        .map(|item| convert_element(item, target_elem, narrowing))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| CoercionError::mismatch(&expected, found()))?;
    Ok(Value::Seq(target_elem.clone(), converted))
}

/// Key collisions introduced by conversion fail as a type mismatch
pub(crate) fn convert_map(
    (key, value): (&FieldType, &FieldType),
    entries: &[(Value, Value)],
    (target_key, target_value): (&FieldType, &FieldType),
    narrowing: NarrowingMode,
) -> Result<Value, CoercionError> {
    let expected = FieldType::map(target_key.clone(), target_value.clone());
    let found = || FieldType::map(key.clone(), value.clone());
    if !element_convertible(key, target_key) || !element_convertible(value, target_value) {
        return Err(CoercionError::mismatch(&expected, found()));
    }

    let converted = entries
        .iter()
        .map(|(k, v)| {
            Some((
                convert_element(k, target_key, narrowing)?,
                convert_element(v, target_value, narrowing)?,
            ))
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| CoercionError::mismatch(&expected, found()))?;

    // Narrowing can fold distinct keys onto the same converted key
    if key != target_key && has_duplicate_keys(&converted) {
        return Err(CoercionError::mismatch(&expected, found()));
    }
    Ok(Value::Map(target_key.clone(), target_value.clone(), converted))
}

fn has_duplicate_keys(entries: &[(Value, Value)]) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(i, (key, _))| entries[..i].iter().any(|(seen, _)| seen == key))
}
