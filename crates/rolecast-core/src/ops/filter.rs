//! Record to record filtering by read policy
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::Transformer;
use crate::access::RoleSet;
use crate::coerce::copyable;
use crate::error::Result;
use crate::schema::{FieldDescriptor, Record};
use crate::value::FieldType;

pub(super) fn filter_into<S, D>(
    transformer: &Transformer,
    source: &S,
    dest: &mut D,
    roles: &RoleSet,
    zero_disallowed: bool,
) -> Result<()>
where
    S: Record + ?Sized,
    D: Record + ?Sized,
{
    let source_schema = source.schema();
    let dest_schema = dest.schema();

    for field in dest_schema.fields() {
        let name = field.name();

        let Some(source_field) = source_schema.field(name) else {
            log::trace!("Field {} is not exported by {}", name, source_schema.name());
            disallow(dest, field, zero_disallowed)?;
            continue;
        };

        if holds_opaque(source_field.ty()) || holds_opaque(field.ty()) {
            log::trace!("Field {} holds a handle that cannot be copied, skipping", name);
            continue;
        }

        copyable(source_field.ty(), field.ty()).map_err(|e| {
            log::debug!("Cannot filter field {}: {}", name, e);
            e.at(name)
        })?;

        if !transformer.access().allows(roles, source_field.read_policy()) {
            log::trace!("Read of field {} denied", name);
            disallow(dest, field, zero_disallowed)?;
            continue;
        }

        let value = match source.get(name) {
            Some(value) if !value.is_nil() => value,
            _ => {
                log::trace!("Field {} is absent in the source, resetting", name);
                dest.set(name, field.ty().zero_value())?;
                continue;
            }
        };

        let converted = transformer
            .coercer()
            .coerce(&value, field.ty())
            .map_err(|e| {
                log::debug!("Cannot filter field {}: {}", name, e);
                e.at(name)
            })?;
        dest.set(name, converted)?;
    }

    Ok(())
}

/// Channel, function and interface fields, optional or not
fn holds_opaque(ty: &FieldType) -> bool {
    match ty {
        FieldType::Optional(inner) => inner.opaque_kind().is_some(),
        other => other.opaque_kind().is_some(),
    }
}

fn disallow<D>(dest: &mut D, field: &FieldDescriptor, zero_disallowed: bool) -> Result<()>
where
    D: Record + ?Sized,
{
    // Channel and function handles have no settable zero
    let settable = !matches!(field.ty(), FieldType::Channel | FieldType::Function);
    if zero_disallowed && settable {
        dest.set(field.name(), field.ty().zero_value())?;
    }
    Ok(())
}
