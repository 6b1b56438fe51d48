//! Rolecast Core - Role-gated field transformation between record types
//!
//! This crate copies, merges and filters named fields between differently
//! shaped records. Every field carries a read and a write access policy that
//! is evaluated against the caller's roles, and values crossing a record
//! boundary go through a coercion engine that reconciles optional wrappers,
//! numeric widths and structurally equal collections.
//!
//! # Main Components
//!
//! - **Access Evaluator**: Parse and evaluate per-field access expressions
//! - **Value Model**: Dynamic values and declared field types, with JSON interop
//! - **Coercion Engine**: Move values across type boundaries or reject them
//! - **Schemas**: Field descriptor tables, derived or built at runtime
//! - **Structural Operations**: Filter, merge, set and batch update
//!
//! # Example
//!
//! ```
//! use rolecast_core::{filter_into, Record, Result, RoleSet, Value};
//!
//! #[derive(Record, Default)]
//! pub struct Account {
//!     #[field(read = "*", write = "admin,user")]
//!     pub name: String,
//!     #[field(read = "admin", write = "admin")]
//!     pub secret: String,
//! }
//!
//! fn main() -> Result<()> {
//!     let account = Account {
//!         name: "Ada".to_string(),
//!         secret: "s3cr3t".to_string(),
//!     };
//!     let mut public = Account::default();
//!     filter_into(&account, &mut public, &RoleSet::from(["user"]), true)?;
//!
//!     assert_eq!(public.name, "Ada");
//!     assert_eq!(public.get("secret"), Some(Value::from("")));
//!     Ok(())
//! }
//! ```
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

extern crate self as rolecast_core;

pub mod access;
pub mod coerce;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod ops;
pub mod retype;
pub mod schema;
pub mod snapshot;
pub mod value;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use access::{is_allowed, AccessEvaluator, AccessExpression, AccessToken, RoleSet};
pub use coerce::{assignable, coerce, copyable, Coercer, CoercionOutcome};
pub use config::{AccessConfig, CoercionConfig, Config, NarrowingMode, NegationMode};
pub use dynamic::DynamicRecord;
pub use error::{CoercionError, Error, ErrorKind, Result};
pub use ops::{MapFilterOptions, Transformer, UpdateOptions, UpdateReport, ZeroWrite};
pub use retype::{convert_seq, retype_map_fields, retype_seq};
pub use schema::{resolve, FieldDescriptor, Record, RecordSchema, Schema, SchemaBuilder};
pub use snapshot::{
    field_names, readable_field_names, to_json_fields, to_json_readable, to_json_writable, to_map,
    to_map_fields, to_map_readable, to_map_writable, writable_field_names,
};
pub use value::{
    field_map_from_json, FieldMap, FieldType, FieldValue, FloatWidth, IntWidth, OpaqueKind,
    RecordType, RecordValue, Value,
};

#[cfg(feature = "derive")]
pub use rolecast_derive::Record;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Copy the fields of `source` readable by `roles` into `dest`.
/// See [`Transformer::filter_into`].
pub fn filter_into<S, D>(source: &S, dest: &mut D, roles: &RoleSet, zero_disallowed: bool) -> Result<()>
where
    S: Record + ?Sized,
    D: Record + ?Sized,
{
    Transformer::default().filter_into(source, dest, roles, zero_disallowed)
}

/// Apply the fields of `update` that `roles` may write onto `target`.
/// See [`Transformer::merge_into`].
pub fn merge_into<T, U>(target: &mut T, update: &U, roles: &RoleSet) -> Result<()>
where
    T: Record + ?Sized,
    U: Record + ?Sized,
{
    Transformer::default().merge_into(target, update, roles)
}

/// Apply every entry of `map` onto `target`
pub fn merge_map_into<T>(target: &mut T, map: &FieldMap) -> Result<()>
where
    T: Record + ?Sized,
{
    Transformer::default().merge_map_into(target, map)
}

/// Apply the entries of `map` that `roles` may write onto `target`
pub fn merge_map_into_for<T>(target: &mut T, map: &FieldMap, roles: &RoleSet) -> Result<()>
where
    T: Record + ?Sized,
{
    Transformer::default().merge_map_into_for(target, map, roles)
}

/// Keep the entries of `map` that `roles` may write into a record shaped
/// like `reference`
pub fn filter_map<R>(
    reference: &R,
    map: &FieldMap,
    roles: &RoleSet,
    options: MapFilterOptions,
) -> Result<FieldMap>
where
    R: Record + ?Sized,
{
    Transformer::default().filter_map(reference, map, roles, options)
}

/// Set one field; zero and nil values are a no-op
pub fn set_field<T>(target: &mut T, name: &str, value: &Value, roles: &RoleSet) -> Result<()>
where
    T: Record + ?Sized,
{
    Transformer::default().set_field(target, name, value, roles)
}

/// Whether `roles` may write the exported field `name` of `target`
pub fn is_allowed_to_set<T>(target: &T, name: &str, roles: &RoleSet) -> bool
where
    T: Record + ?Sized,
{
    Transformer::default().is_allowed_to_set(target, name, roles)
}

/// Apply the fields of `incoming` onto `target` and report the outcome
pub fn update_fields<T, U>(
    target: &mut T,
    incoming: &U,
    roles: &RoleSet,
    options: UpdateOptions,
) -> Result<UpdateReport>
where
    T: Record + ?Sized,
    U: Record + ?Sized,
{
    Transformer::default().update_fields(target, incoming, roles, options)
}
