//! Records with a runtime-defined shape
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::error::{CoercionError, Error, Result};
use crate::schema::{Record, Schema};
use crate::value::{FieldType, RecordType, RecordValue, Value};
use std::sync::Arc;

/// A record backed by a shared [`Schema`], holding one [`Value`] per
/// exported field
///
/// Every field starts at the zero value of its declared type. Channel and
/// function fields hold opaque handles and can be observed but never set.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl DynamicRecord {
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|field| field.ty().zero_value())
            .collect();
        Self { schema, values }
    }

    /// An empty record with the same schema
    pub fn empty_like(&self) -> Self {
        Self::new(Arc::clone(&self.schema))
    }

    /// Builder-style [`Record::set`]
    pub fn with(mut self, name: &str, value: Value) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::shared(Arc::clone(&self.schema))
    }

    /// Capture the record as a value
    pub fn to_value(&self) -> Value {
        let fields = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect();
        Value::Record(RecordValue::new(self.record_type(), fields))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.schema
            .fields()
            .iter()
            .position(|field| field.name() == name)
            .ok_or_else(|| match self.schema.lookup(name) {
                Err(err) => err,
                Ok(_) => Error::field_not_found(name),
            })
    }
}

impl Record for DynamicRecord {
    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn get(&self, name: &str) -> Option<Value> {
        let index = self.position(name).ok()?;
        self.values.get(index).cloned()
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index = self.position(name)?;
        let declared = self.schema.fields()[index].ty();
        if let Some(kind) = declared.opaque_kind() {
            if *declared != FieldType::Any {
                return Err(CoercionError::UnsupportedKind { kind }.at(name));
            }
        }
        if let Value::Opaque(kind) = value {
            return Err(CoercionError::UnsupportedKind { kind }.at(name));
        }
        if *declared != FieldType::Any && value.type_of() != *declared {
            return Err(CoercionError::mismatch(declared, value.type_of()).at(name));
        }
        self.values[index] = value;
        Ok(())
    }
}
