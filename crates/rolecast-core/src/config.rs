//! Configuration for the access evaluator and the coercion engine
//!
//! Configuration is loaded from, in increasing precedence:
//! - Default values
//! - A JSON document (string or file)
//! - Environment variables (`ROLECAST_NEGATION`, `ROLECAST_NARROWING`)
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding [`AccessConfig::negation`]
pub const NEGATION_ENV: &str = "ROLECAST_NEGATION";

/// Environment variable overriding [`CoercionConfig::narrowing`]
pub const NARROWING_ENV: &str = "ROLECAST_NARROWING";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Access expression settings
    pub access: AccessConfig,

    /// Coercion engine settings
    pub coercion: CoercionConfig,
}

/// Access expression configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// How negated tokens (`!role`) are evaluated
    pub negation: NegationMode,
}

/// Coercion configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionConfig {
    /// How numeric narrowing handles out-of-range values
    pub narrowing: NarrowingMode,
}

/// Evaluation of negated access tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegationMode {
    /// A negated token that does not match the caller grants access
    #[default]
    Permissive,
    /// Negated tokens only deny
    Strict,
}

/// Numeric narrowing behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrowingMode {
    /// Out-of-range values wrap (two's complement truncation)
    #[default]
    Wrap,
    /// Out-of-range values are a type mismatch
    Checked,
}

impl Config {
    /// Parse configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Configuration {
            message: format!("invalid configuration document: {}", e),
            source: Some(e.into()),
        })
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            message: format!("failed to read configuration file {}", path.display()),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(NEGATION_ENV) {
            match value.parse() {
                Ok(mode) => self.access.negation = mode,
                Err(e) => log::warn!("Ignoring {}: {}", NEGATION_ENV, e),
            }
        }
        if let Some(value) = lookup(NARROWING_ENV) {
            match value.parse() {
                Ok(mode) => self.coercion.narrowing = mode,
                Err(e) => log::warn!("Ignoring {}: {}", NARROWING_ENV, e),
            }
        }
        self
    }
}

impl FromStr for NegationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(NegationMode::Permissive),
            "strict" => Ok(NegationMode::Strict),
            other => Err(Error::Configuration {
                message: format!("unknown negation mode '{}'", other),
                source: None,
            }),
        }
    }
}

impl FromStr for NarrowingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrap" => Ok(NarrowingMode::Wrap),
            "checked" => Ok(NarrowingMode::Checked),
            other => Err(Error::Configuration {
                message: format!("unknown narrowing mode '{}'", other),
                source: None,
            }),
        }
    }
}

impl fmt::Display for NegationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegationMode::Permissive => write!(f, "permissive"),
            NegationMode::Strict => write!(f, "strict"),
        }
    }
}

impl fmt::Display for NarrowingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrowingMode::Wrap => write!(f, "wrap"),
            NarrowingMode::Checked => write!(f, "checked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_defaults_are_permissive_and_wrapping() {
        let config = Config::default();
        assert_eq!(config.access.negation, NegationMode::Permissive);
        assert_eq!(config.coercion.narrowing, NarrowingMode::Wrap);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = Config::from_json_str(r#"{"access": {"negation": "strict"}}"#).unwrap();
        assert_eq!(config.access.negation, NegationMode::Strict);
        assert_eq!(config.coercion.narrowing, NarrowingMode::Wrap);
    }

    #[test]
    fn test_invalid_document() {
        let err = Config::from_json_str(r#"{"access": {"negation": "sometimes"}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"coercion": {{"narrowing": "checked"}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.coercion.narrowing, NarrowingMode::Checked);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            NEGATION_ENV => Some("STRICT".to_string()),
            NARROWING_ENV => Some("bogus".to_string()),
            _ => None,
        });
        assert_eq!(config.access.negation, NegationMode::Strict);
        assert_eq!(config.coercion.narrowing, NarrowingMode::Wrap);
    }
}
