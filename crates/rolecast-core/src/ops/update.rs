//! Batch updates with a per-field report
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::{Transformer, UpdateOptions, UpdateReport};
use crate::access::RoleSet;
use crate::error::{Error, Result};
use crate::schema::{Record, Schema};
use crate::value::{FieldType, Value};

pub(super) fn update_fields<T, U>(
    transformer: &Transformer,
    target: &mut T,
    incoming: &U,
    roles: &RoleSet,
    options: UpdateOptions,
) -> Result<UpdateReport>
where
    T: Record + ?Sized,
    U: Record + ?Sized,
{
    let target_schema = target.schema();
    let incoming_schema = incoming.schema();
    let mut report = UpdateReport::default();

    for field in incoming_schema.fields() {
        let name = field.name();
        let Some(value) = incoming.get(name) else {
            continue;
        };

        match update_one(transformer, &target_schema, target, name, value, roles, options) {
            Ok(Some(applied)) => {
                report.updated.insert(name.to_string(), applied);
            }
            Ok(None) => {}
            Err(e) if options.ignore_unsettables => {
                log::trace!("Field {} is unsettable: {}", name, e);
                report.unsettable.insert(name.to_string(), e);
            }
            Err(e) => {
                log::debug!("Field {} is unsettable: {}", name, e);
                return Err(e);
            }
        }
    }

    Ok(report)
}

/// `Ok(None)` when the field is skipped
fn update_one<T>(
    transformer: &Transformer,
    schema: &Schema,
    target: &mut T,
    name: &str,
    value: Value,
    roles: &RoleSet,
    options: UpdateOptions,
) -> Result<Option<Value>>
where
    T: Record + ?Sized,
{
    let field = schema.lookup(name)?;

    if !transformer.access().allows(roles, field.write_policy()) {
        log::trace!("Write of field {} denied, excluding", name);
        return Ok(None);
    }

    if options.skip_zero_values && value.is_zero() {
        log::trace!("Zero value for field {}, skipping", name);
        return Ok(None);
    }

    let converted = if value.is_nil() {
        match field.ty() {
            FieldType::Optional(inner) => Value::none((**inner).clone()),
            _ => return Err(Error::nil_value(name)),
        }
    } else {
        transformer
            .coercer()
            .coerce(&value, field.ty())
            .map_err(|e| e.at(name))?
    };

    target.set(name, converted.clone())?;
    Ok(Some(converted))
}
