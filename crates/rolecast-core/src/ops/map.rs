//! Operations between field maps and records
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::{MapFilterOptions, Transformer};
use crate::access::RoleSet;
use crate::error::{Error, Result};
use crate::schema::Record;
use crate::value::{FieldMap, FieldType, Value};

/// Entries are keyed by field name. `roles` of `None` applies every entry.
pub(super) fn merge_map_into<T>(
    transformer: &Transformer,
    target: &mut T,
    map: &FieldMap,
    roles: Option<&RoleSet>,
) -> Result<()>
where
    T: Record + ?Sized,
{
    let schema = target.schema();

    for (name, value) in map {
        let field = schema.lookup(name)?;

        if let Some(roles) = roles {
            if !transformer.access().allows(roles, field.write_policy()) {
                log::trace!("Write of field {} denied, skipping", name);
                continue;
            }
        }

        let converted = if value.is_nil() {
            match field.ty() {
                FieldType::Optional(inner) => Value::none((**inner).clone()),
                _ => {
                    log::debug!("Nil value for non-optional field {}", name);
                    return Err(Error::nil_value(name.as_str()));
                }
            }
        } else {
            transformer
                .coercer()
                .coerce(value, field.ty())
                .map_err(|e| {
                    log::debug!("Cannot merge field {}: {}", name, e);
                    e.at(name)
                })?
        };
        target.set(name, converted)?;
    }

    Ok(())
}

pub(super) fn filter_map<R>(
    transformer: &Transformer,
    reference: &R,
    map: &FieldMap,
    roles: &RoleSet,
    options: MapFilterOptions,
) -> Result<FieldMap>
where
    R: Record + ?Sized,
{
    let schema = reference.schema();
    let mut filtered = FieldMap::new();

    for field in schema.fields() {
        let Some(key) = field.key(options.use_aliases) else {
            continue;
        };
        let Some(value) = map.get(key) else {
            continue;
        };

        if !transformer.access().allows(roles, field.write_policy()) {
            log::trace!("Write of field {} denied, omitting {}", field.name(), key);
            continue;
        }

        if value.is_nil() {
            if options.ignore_nils {
                log::trace!("Skipping nil entry {}", key);
                continue;
            }
            return Err(Error::nil_value(field.name()));
        }

        let converted = transformer
            .coercer()
            .coerce(value, field.ty())
            .map_err(|e| {
                log::debug!("Cannot filter entry {}: {}", key, e);
                e.at(field.name())
            })?;
        filtered.insert(key.to_string(), converted);
    }

    Ok(filtered)
}
