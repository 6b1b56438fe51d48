//! Field enumeration and record snapshots
//!
//! Snapshots capture exported fields into a [`FieldMap`] or a JSON object.
//! Role-gated helpers evaluate access with the default evaluator. JSON
//! output has sorted keys.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::access::{AccessEvaluator, AccessExpression, RoleSet};
use crate::error::Result;
use crate::schema::{FieldDescriptor, Record};
use crate::value::FieldMap;

/// Names of all exported fields, in declaration order
pub fn field_names<R: Record + ?Sized>(record: &R) -> Vec<String> {
    record
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect()
}

/// Names of the exported fields `roles` may read
pub fn readable_field_names<R: Record + ?Sized>(record: &R, roles: &RoleSet) -> Vec<String> {
    names_where(record, roles, FieldDescriptor::read_policy)
}

/// Names of the exported fields `roles` may write
pub fn writable_field_names<R: Record + ?Sized>(record: &R, roles: &RoleSet) -> Vec<String> {
    names_where(record, roles, FieldDescriptor::write_policy)
}

fn names_where<R, P>(record: &R, roles: &RoleSet, policy: P) -> Vec<String>
where
    R: Record + ?Sized,
    P: Fn(&FieldDescriptor) -> &AccessExpression,
{
    let evaluator = AccessEvaluator::default();
    record
        .schema()
        .fields()
        .iter()
        .filter(|field| evaluator.allows(roles, policy(*field)))
        .map(|field| field.name().to_string())
        .collect()
}

/// Every exported field, keyed by field name
pub fn to_map<R: Record + ?Sized>(record: &R) -> FieldMap {
    let schema = record.schema();
    schema
        .fields()
        .iter()
        .filter_map(|field| {
            record
                .get(field.name())
                .map(|value| (field.name().to_string(), value))
        })
        .collect()
}

/// The named exported fields; unknown and hidden names are ignored
pub fn to_map_fields<R: Record + ?Sized>(record: &R, names: &[&str]) -> FieldMap {
    let schema = record.schema();
    names
        .iter()
        .filter(|name| schema.field(name).is_some())
        .filter_map(|name| record.get(name).map(|value| (name.to_string(), value)))
        .collect()
}

/// The fields `roles` may read, keyed by field name
pub fn to_map_readable<R: Record + ?Sized>(record: &R, roles: &RoleSet) -> FieldMap {
    let evaluator = AccessEvaluator::default();
    let schema = record.schema();
    schema
        .fields()
        .iter()
        .filter(|field| evaluator.allows(roles, field.read_policy()))
        .filter_map(|field| {
            record
                .get(field.name())
                .map(|value| (field.name().to_string(), value))
        })
        .collect()
}

/// The fields `roles` may write, optionally keyed by external alias.
/// Fields aliased `-` are left out when keying by alias.
pub fn to_map_writable<R: Record + ?Sized>(
    record: &R,
    roles: &RoleSet,
    skip_nils: bool,
    use_aliases: bool,
) -> FieldMap {
    let evaluator = AccessEvaluator::default();
    let schema = record.schema();
    let mut map = FieldMap::new();
    for field in schema.fields() {
        if !evaluator.allows(roles, field.write_policy()) {
            continue;
        }
        let Some(key) = field.key(use_aliases) else {
            continue;
        };
        let Some(value) = record.get(field.name()) else {
            continue;
        };
        if skip_nils && value.is_nil() {
            continue;
        }
        map.insert(key.to_string(), value);
    }
    map
}

/// JSON object of the named fields.
///
/// Fails with `FieldNotFound` or `UnexportedField` for a name that is not
/// an exported field.
pub fn to_json_fields<R: Record + ?Sized>(record: &R, names: &[&str]) -> Result<String> {
    let schema = record.schema();
    let mut map = FieldMap::new();
    for name in names {
        let field = schema.lookup(name)?;
        if let Some(value) = record.get(field.name()) {
            map.insert(field.name().to_string(), value);
        }
    }
    Ok(serde_json::to_string(&map)?)
}

/// JSON object of the fields `roles` may read
pub fn to_json_readable<R: Record + ?Sized>(record: &R, roles: &RoleSet) -> Result<String> {
    Ok(serde_json::to_string(&to_map_readable(record, roles))?)
}

/// JSON object of the fields `roles` may write, keyed by external alias
pub fn to_json_writable<R: Record + ?Sized>(
    record: &R,
    roles: &RoleSet,
    skip_nils: bool,
) -> Result<String> {
    Ok(serde_json::to_string(&to_map_writable(record, roles, skip_nils, true))?)
}
