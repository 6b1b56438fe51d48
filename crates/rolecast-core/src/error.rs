//! Error types for the Rolecast core library
//!
//! This module defines the error handling system for Rolecast,
//! using thiserror for ergonomic error definitions and anyhow for flexible error contexts.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::value::{FieldType, OpaqueKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Rolecast operations
#[derive(Error, Debug)]
pub enum Error {
    /// Argument is not a record where one is required
    #[error("Shape error: {message}")]
    Shape { message: String },

    /// Named field does not exist on the target schema
    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    /// Named field exists but is not exported
    #[error("Unexported field: {field}")]
    UnexportedField { field: String },

    /// Caller roles fail the write policy of the field
    #[error("Unauthorized to set field: {field}")]
    Unauthorized { field: String },

    /// No coercion rule applies
    #[error("Type mismatch for field {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Field kind can never be set generically
    #[error("Unsupported field type for {field}: {kind}")]
    UnsupportedKind { field: String, kind: OpaqueKind },

    /// Required value was absent
    #[error("Nil value for field {field}")]
    NilValue { field: String },

    /// Zero value writes are forbidden for this call
    #[error("Zero value is not allowed for field {field}")]
    ZeroValue { field: String },

    /// JSON encoding and decoding errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Closed enumeration of error kinds, one per [`Error`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Shape,
    FieldNotFound,
    UnexportedField,
    Unauthorized,
    TypeMismatch,
    UnsupportedKind,
    NilValue,
    ZeroValue,
    Json,
    Configuration,
    Io,
}

impl Error {
    pub fn shape(message: impl Into<String>) -> Self {
        Error::Shape {
            message: message.into(),
        }
    }

    pub fn field_not_found(field: impl Into<String>) -> Self {
        Error::FieldNotFound {
            field: field.into(),
        }
    }

    pub fn unexported(field: impl Into<String>) -> Self {
        Error::UnexportedField {
            field: field.into(),
        }
    }

    pub fn unauthorized(field: impl Into<String>) -> Self {
        Error::Unauthorized {
            field: field.into(),
        }
    }

    pub fn nil_value(field: impl Into<String>) -> Self {
        Error::NilValue {
            field: field.into(),
        }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape { .. } => ErrorKind::Shape,
            Error::FieldNotFound { .. } => ErrorKind::FieldNotFound,
            Error::UnexportedField { .. } => ErrorKind::UnexportedField,
            Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::UnsupportedKind { .. } => ErrorKind::UnsupportedKind,
            Error::NilValue { .. } => ErrorKind::NilValue,
            Error::ZeroValue { .. } => ErrorKind::ZeroValue,
            Error::Json { .. } => ErrorKind::Json,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Name of the offending field, for field-level errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::FieldNotFound { field }
            | Error::UnexportedField { field }
            | Error::Unauthorized { field }
            | Error::TypeMismatch { field, .. }
            | Error::UnsupportedKind { field, .. }
            | Error::NilValue { field }
            | Error::ZeroValue { field } => Some(field),
            _ => None,
        }
    }
}

/// Failure of the coercion engine, before a field name is attached
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// No coercion rule applies
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: FieldType, found: FieldType },

    /// Channel, function and interface kinds are never coerced
    #[error("unsupported kind: {kind}")]
    UnsupportedKind { kind: OpaqueKind },

    /// An absent value offered to a non-optional type
    #[error("nil value cannot be assigned to {expected}")]
    NilToNonOptional { expected: FieldType },
}

impl CoercionError {
    pub(crate) fn mismatch(expected: &FieldType, found: FieldType) -> Self {
        CoercionError::TypeMismatch {
            expected: expected.clone(),
            found,
        }
    }

    /// Attach the field name, producing the crate-level error
    pub fn at(self, field: &str) -> Error {
        let field = field.to_string();
        match self {
            CoercionError::TypeMismatch { expected, found } => Error::TypeMismatch {
                field,
                expected: expected.to_string(),
                found: found.to_string(),
            },
            CoercionError::UnsupportedKind { kind } => Error::UnsupportedKind { field, kind },
            CoercionError::NilToNonOptional { .. } => Error::NilValue { field },
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Shape => "shape",
            ErrorKind::FieldNotFound => "field-not-found",
            ErrorKind::UnexportedField => "unexported-field",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::UnsupportedKind => "unsupported-kind",
            ErrorKind::NilValue => "nil-value",
            ErrorKind::ZeroValue => "zero-value",
            ErrorKind::Json => "json",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Io => "io",
        };
        write!(f, "{}", name)
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
