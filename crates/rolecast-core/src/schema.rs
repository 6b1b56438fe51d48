//! Field descriptors and record schemas
//!
//! A [`Schema`] is the field descriptor table of one record type: the
//! exported fields in declaration order, with their declared types, read and
//! write policies and external alias, plus the names of fields that exist
//! but are not exported. Schemas are built once per type and shared.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::access::AccessExpression;
use crate::error::{Error, Result};
use crate::value::{FieldType, Value};
use std::sync::Arc;

/// Alias that hides a field from alias-keyed operations
pub const HIDDEN_ALIAS: &str = "-";

/// Descriptor of one exported field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    ty: FieldType,
    read: AccessExpression,
    write: AccessExpression,
    alias: Option<String>,
}

impl FieldDescriptor {
    /// A field with deny-all read and write policies and no alias
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            read: AccessExpression::default(),
            write: AccessExpression::default(),
            alias: None,
        }
    }

    pub fn read(mut self, expression: &str) -> Self {
        self.read = AccessExpression::parse(expression);
        self
    }

    pub fn write(mut self, expression: &str) -> Self {
        self.write = AccessExpression::parse(expression);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn read_policy(&self) -> &AccessExpression {
        &self.read
    }

    pub fn write_policy(&self) -> &AccessExpression {
        &self.write
    }

    pub fn declared_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Key used by alias-keyed operations; `None` when aliased `-`
    pub fn external_name(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some(HIDDEN_ALIAS) => None,
            Some(alias) => Some(alias),
            None => Some(&self.name),
        }
    }

    /// Key used by an operation, by alias or by field name
    pub(crate) fn key(&self, use_aliases: bool) -> Option<&str> {
        if use_aliases {
            self.external_name()
        } else {
            Some(&self.name)
        }
    }
}

/// Field descriptor table of one record type
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
    hidden: Vec<String>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name: name.into(),
                fields: Vec::new(),
                hidden: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exported fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Names of fields that exist but are not exported
    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    /// Exported field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Exported field by name, distinguishing hidden from missing fields
    pub fn lookup(&self, name: &str) -> Result<&FieldDescriptor> {
        if let Some(field) = self.field(name) {
            return Ok(field);
        }
        if self.hidden.iter().any(|hidden| hidden == name) {
            Err(Error::unexported(name))
        } else {
            Err(Error::field_not_found(name))
        }
    }

    /// Exported field by external name
    pub fn by_alias(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.external_name() == Some(key))
    }

    /// Same exported field names and declared types, in order
    ///
    /// Nested record types are compared by name only.
    pub fn same_shape(&self, other: &Schema) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name == b.name && a.ty.to_string() == b.ty.to_string())
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Add an exported field
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.schema.fields.push(field);
        self
    }

    /// Record a field that exists but is not exported
    pub fn hidden(mut self, name: impl Into<String>) -> Self {
        self.schema.hidden.push(name.into());
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

/// A record whose fields can be read and written by name
///
/// Implemented by `#[derive(Record)]` and by [`crate::DynamicRecord`].
pub trait Record {
    /// Schema of this record
    fn schema(&self) -> Arc<Schema>;

    /// Current value of an exported field
    fn get(&self, name: &str) -> Option<Value>;

    /// Store a value already coerced to the field's declared type
    fn set(&mut self, name: &str, value: Value) -> Result<()>;
}

/// Statically known schema of a derived record type
pub trait RecordSchema {
    fn record_name() -> &'static str;

    fn record_schema() -> Arc<Schema>;
}

/// Resolve the schema of a record type, or of an optional record type
pub fn resolve(ty: &FieldType) -> Result<Arc<Schema>> {
    match ty {
        FieldType::Record(record) => Ok(record.schema()),
        FieldType::Optional(inner) => match inner.as_ref() {
            FieldType::Record(record) => Ok(record.schema()),
            _ => Err(Error::shape(format!("expected a record type, got {}", ty))),
        },
        other => Err(Error::shape(format!("expected a record type, got {}", other))),
    }
}
