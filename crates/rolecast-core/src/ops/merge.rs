//! Record to record merging by write policy
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::Transformer;
use crate::access::RoleSet;
use crate::error::Result;
use crate::schema::Record;

pub(super) fn merge_into<T, U>(
    transformer: &Transformer,
    target: &mut T,
    update: &U,
    roles: &RoleSet,
) -> Result<()>
where
    T: Record + ?Sized,
    U: Record + ?Sized,
{
    let target_schema = target.schema();
    let update_schema = update.schema();

    for field in update_schema.fields() {
        let name = field.name();
        let target_field = target_schema.lookup(name)?;

        if !transformer.access().allows(roles, target_field.write_policy()) {
            log::trace!("Write of field {} denied, skipping", name);
            continue;
        }

        let value = match update.get(name) {
            Some(value) if !value.is_nil() => value,
            _ => {
                log::trace!("Field {} is absent in the update, skipping", name);
                continue;
            }
        };

        let converted = transformer
            .coercer()
            .coerce(&value, target_field.ty())
            .map_err(|e| {
                log::debug!("Cannot merge field {}: {}", name, e);
                e.at(name)
            })?;
        target.set(name, converted)?;
    }

    Ok(())
}
