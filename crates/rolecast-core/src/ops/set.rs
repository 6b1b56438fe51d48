//! Single field writes
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use super::{Transformer, ZeroWrite};
use crate::access::RoleSet;
use crate::error::{Error, Result};
use crate::schema::Record;
use crate::value::Value;

pub(super) fn set_field<T>(
    transformer: &Transformer,
    target: &mut T,
    name: &str,
    value: &Value,
    roles: &RoleSet,
    zero: ZeroWrite,
) -> Result<()>
where
    T: Record + ?Sized,
{
    let schema = target.schema();
    let field = schema.lookup(name)?;

    if !transformer.access().allows(roles, field.write_policy()) {
        log::debug!("Write of field {} denied", name);
        return Err(Error::unauthorized(name));
    }

    if value.is_nil() || value.is_zero() {
        match zero {
            ZeroWrite::Skip => {
                log::trace!("Zero value for field {}, nothing to set", name);
                return Ok(());
            }
            ZeroWrite::Reject => {
                return Err(Error::ZeroValue {
                    field: name.to_string(),
                })
            }
            ZeroWrite::Allow => {}
        }
    }

    let converted = transformer
        .coercer()
        .coerce(value, field.ty())
        .map_err(|e| {
            log::debug!("Cannot set field {}: {}", name, e);
            e.at(name)
        })?;
    target.set(name, converted)
}

pub(super) fn is_allowed_to_set<T>(
    transformer: &Transformer,
    target: &T,
    name: &str,
    roles: &RoleSet,
) -> bool
where
    T: Record + ?Sized,
{
    target
        .schema()
        .field(name)
        .is_some_and(|field| transformer.access().allows(roles, field.write_policy()))
}
