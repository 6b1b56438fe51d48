//! Structural operations between records and field maps
//!
//! Every operation resolves the schemas involved, evaluates the relevant
//! access expression for each field against the caller's roles and moves
//! allowed values through the coercion engine. Operations fail fast and do
//! not roll back: fields applied before a failing field stay applied.
//!
//! | Operation | Policy consulted |
//! |---|---|
//! | [`Transformer::filter_into`] | source field read |
//! | [`Transformer::merge_into`] | target field write |
//! | [`Transformer::merge_map_into_for`] | target field write |
//! | [`Transformer::filter_map`] | reference field write |
//! | [`Transformer::set_field`] | target field write |
//! | [`Transformer::update_fields`] | target field write |
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

mod filter;
mod map;
mod merge;
mod set;
mod update;


use crate::access::{AccessEvaluator, RoleSet};
use crate::coerce::Coercer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::schema::Record;
use crate::value::{FieldMap, Value};
use std::collections::BTreeMap;

/// How [`Transformer::set_field`] treats zero and nil values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroWrite {
    /// Zero and nil values are a silent no-op
    #[default]
    Skip,
    /// Zero and nil values fail with [`Error::ZeroValue`]
    Reject,
    /// Zero values are written; nil follows the optional rules
    Allow,
}

/// Options for [`Transformer::filter_map`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapFilterOptions {
    /// Skip present-but-nil entries instead of failing
    pub ignore_nils: bool,
    /// Look up and emit keys by external alias
    pub use_aliases: bool,
}

/// Options for [`Transformer::update_fields`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Leave fields alone when the incoming value is zero
    pub skip_zero_values: bool,
    /// Record unsettable fields and carry on instead of failing
    pub ignore_unsettables: bool,
}

/// Outcome of a batch update
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Field name to the value written
    pub updated: BTreeMap<String, Value>,
    /// Field name to the reason it could not be set
    pub unsettable: BTreeMap<String, Error>,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.unsettable.is_empty()
    }
}

/// Runs structural operations with a configured access evaluator and
/// coercion engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transformer {
    access: AccessEvaluator,
    coercer: Coercer,
}

impl Transformer {
    pub fn new(config: &Config) -> Self {
        Self {
            access: AccessEvaluator::new(&config.access),
            coercer: Coercer::new(&config.coercion),
        }
    }

    pub fn with_parts(access: AccessEvaluator, coercer: Coercer) -> Self {
        Self { access, coercer }
    }

    pub fn access(&self) -> &AccessEvaluator {
        &self.access
    }

    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    /// Copy the fields of `source` readable by `roles` into `dest`.
    ///
    /// Fields of `dest` that are missing from `source` or not readable are
    /// reset to their zero value when `zero_disallowed` is set and left
    /// unchanged otherwise.
    pub fn filter_into<S, D>(
        &self,
        source: &S,
        dest: &mut D,
        roles: &RoleSet,
        zero_disallowed: bool,
    ) -> Result<()>
    where
        S: Record + ?Sized,
        D: Record + ?Sized,
    {
        filter::filter_into(self, source, dest, roles, zero_disallowed)
    }

    /// Apply the fields of `update` that `roles` may write onto `target`
    pub fn merge_into<T, U>(&self, target: &mut T, update: &U, roles: &RoleSet) -> Result<()>
    where
        T: Record + ?Sized,
        U: Record + ?Sized,
    {
        merge::merge_into(self, target, update, roles)
    }

    /// Apply every entry of a field map onto `target`, without access checks
    pub fn merge_map_into<T>(&self, target: &mut T, map: &FieldMap) -> Result<()>
    where
        T: Record + ?Sized,
    {
        map::merge_map_into(self, target, map, None)
    }

    /// Apply the entries of a field map that `roles` may write onto `target`
    pub fn merge_map_into_for<T>(&self, target: &mut T, map: &FieldMap, roles: &RoleSet) -> Result<()>
    where
        T: Record + ?Sized,
    {
        map::merge_map_into(self, target, map, Some(roles))
    }

    /// Keep the entries of `map` that `roles` may write into a record shaped
    /// like `reference`, coerced to the declared field types
    pub fn filter_map<R>(
        &self,
        reference: &R,
        map: &FieldMap,
        roles: &RoleSet,
        options: MapFilterOptions,
    ) -> Result<FieldMap>
    where
        R: Record + ?Sized,
    {
        map::filter_map(self, reference, map, roles, options)
    }

    /// Set one field, skipping zero and nil values
    pub fn set_field<T>(&self, target: &mut T, name: &str, value: &Value, roles: &RoleSet) -> Result<()>
    where
        T: Record + ?Sized,
    {
        set::set_field(self, target, name, value, roles, ZeroWrite::Skip)
    }

    /// Set one field with an explicit zero-write policy
    pub fn set_field_with<T>(
        &self,
        target: &mut T,
        name: &str,
        value: &Value,
        roles: &RoleSet,
        zero: ZeroWrite,
    ) -> Result<()>
    where
        T: Record + ?Sized,
    {
        set::set_field(self, target, name, value, roles, zero)
    }

    /// Whether `roles` may write the exported field `name` of `target`
    pub fn is_allowed_to_set<T>(&self, target: &T, name: &str, roles: &RoleSet) -> bool
    where
        T: Record + ?Sized,
    {
        set::is_allowed_to_set(self, target, name, roles)
    }

    /// Apply the fields of `incoming` onto `target`, reporting what was
    /// written and what could not be
    pub fn update_fields<T, U>(
        &self,
        target: &mut T,
        incoming: &U,
        roles: &RoleSet,
        options: UpdateOptions,
    ) -> Result<UpdateReport>
    where
        T: Record + ?Sized,
        U: Record + ?Sized,
    {
        update::update_fields(self, target, incoming, roles, options)
    }
}
