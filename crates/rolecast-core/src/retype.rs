//! Explicit re-typing of dynamic containers
//!
//! `Vec<any>` never satisfies a typed sequence implicitly. These helpers
//! coerce element by element once the caller opts in.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::coerce::coerce;
use crate::error::{CoercionError, Error, Result};
use crate::schema::resolve;
use crate::value::{FieldMap, FieldType, FieldValue, Value};

/// Re-type heterogeneous items into a `Vec<elem>` value.
///
/// Incompatible elements are dropped when `skip_incompatible` is set and
/// fail the call otherwise.
pub fn retype_seq(
    items: &[Value],
    elem: &FieldType,
    skip_incompatible: bool,
) -> std::result::Result<Value, CoercionError> {
    let mut converted = Vec::with_capacity(items.len());
    for item in items {
        match coerce(item, elem) {
            Ok(value) => converted.push(value),
            Err(e) if skip_incompatible => {
                log::trace!("Dropping incompatible element: {}", e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Value::Seq(elem.clone(), converted))
}

/// Re-type heterogeneous items into a typed vector
pub fn convert_seq<T: FieldValue>(
    items: &[Value],
    skip_incompatible: bool,
) -> std::result::Result<Vec<T>, CoercionError> {
    let Value::Seq(_, converted) = retype_seq(items, &T::field_type(), skip_incompatible)? else {
        return Ok(Vec::new());
    };
    converted.into_iter().map(T::from_value).collect()
}

/// Re-type the `Vec<any>` entries of a field map for the record type `ty`.
///
/// Keys are matched by external alias. Entries whose field is a typed
/// sequence are re-typed; other entries of known fields are copied and
/// unknown keys are dropped.
pub fn retype_map_fields(
    map: &FieldMap,
    ty: &FieldType,
    skip_incompatible: bool,
) -> Result<FieldMap> {
    let schema = resolve(ty)?;
    let mut retyped = FieldMap::new();

    for field in schema.fields() {
        let Some(key) = field.external_name() else {
            continue;
        };
        let Some(value) = map.get(key) else {
            continue;
        };

        let value = match (value, field.ty()) {
            (Value::Seq(FieldType::Any, items), FieldType::Seq(elem)) if **elem != FieldType::Any => {
                retype_seq(items, elem, skip_incompatible).map_err(|e| match e {
                    CoercionError::TypeMismatch { .. } | CoercionError::NilToNonOptional { .. } => {
                        Error::TypeMismatch {
                            field: field.name().to_string(),
                            expected: field.ty().to_string(),
                            found: value.type_of().to_string(),
                        }
                    }
                    other => other.at(field.name()),
                })?
            }
            _ => value.clone(),
        };
        retyped.insert(key.to_string(), value);
    }

    Ok(retyped)
}
