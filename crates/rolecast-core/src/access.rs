//! Access expression parsing and evaluation
//!
//! Every field carries one access expression per direction (read and write).
//! An expression is a comma-separated list of tokens: the wildcard `*`, a
//! plain role name, or a role name negated with `!`.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use crate::config::{AccessConfig, NegationMode};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Roles held by the caller of an operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: BTreeSet<String>,
}

impl RoleSet {
    /// Create an empty role set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role
    pub fn insert(&mut self, role: impl Into<String>) -> bool {
        self.roles.insert(role.into())
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for RoleSet {
    fn from(roles: [&str; N]) -> Self {
        roles.into_iter().collect()
    }
}

impl From<&[&str]> for RoleSet {
    fn from(roles: &[&str]) -> Self {
        roles.iter().copied().collect()
    }
}

/// A single token of an access expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessToken {
    /// `*`
    Wildcard,
    /// `role`
    Role(String),
    /// `!role`
    Deny(String),
}

/// Parsed access policy for one field and one direction
///
/// An empty expression declares no role and therefore denies everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessExpression {
    source: String,
    tokens: Vec<AccessToken>,
    wildcard: bool,
}

impl AccessExpression {
    /// Parse an expression. Parsing never fails: tokens are trimmed and
    /// empty tokens are dropped.
    pub fn parse(expression: &str) -> Self {
        let wildcard = expression.trim() == "*";
        let tokens = expression
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                if token == "*" {
                    AccessToken::Wildcard
                } else if let Some(role) = token.strip_prefix('!') {
                    AccessToken::Deny(role.trim().to_string())
                } else {
                    AccessToken::Role(token.to_string())
                }
            })
            .collect();

        Self {
            source: expression.to_string(),
            tokens,
            wildcard,
        }
    }

    /// The expression that allows every caller
    pub fn everyone() -> Self {
        Self::parse("*")
    }

    /// The original expression text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[AccessToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the whole expression is the bare wildcard
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn has_negation(&self) -> bool {
        self.tokens
            .iter()
            .any(|token| matches!(token, AccessToken::Deny(_)))
    }
}

impl FromStr for AccessExpression {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for AccessExpression {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for AccessExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Evaluates access expressions against role sets
///
/// In [`NegationMode::Permissive`] a negated token that does not veto the
/// caller grants access on its own, so `!guest` admits an empty role set.
/// [`NegationMode::Strict`] only lets negated tokens veto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessEvaluator {
    negation: NegationMode,
}

impl AccessEvaluator {
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            negation: config.negation,
        }
    }

    pub fn with_negation(negation: NegationMode) -> Self {
        Self { negation }
    }

    pub fn negation(&self) -> NegationMode {
        self.negation
    }

    /// Evaluate a parsed expression
    pub fn allows(&self, roles: &RoleSet, expression: &AccessExpression) -> bool {
        if expression.wildcard {
            return true;
        }

        let mut allowed = false;
        for token in &expression.tokens {
            match token {
                AccessToken::Wildcard => allowed = true,
                AccessToken::Role(role) => {
                    if roles.contains(role) {
                        allowed = true;
                    }
                }
                AccessToken::Deny(role) => {
                    if roles.contains(role) {
                        return false;
                    }
                    if self.negation == NegationMode::Permissive {
                        allowed = true;
                    }
                }
            }
        }

        allowed
    }

    /// Parse and evaluate an expression string
    pub fn is_allowed(&self, roles: &RoleSet, expression: &str) -> bool {
        self.allows(roles, &AccessExpression::parse(expression))
    }
}

/// Evaluate `expression` for `roles` with the default (permissive) evaluator
pub fn is_allowed(roles: &RoleSet, expression: &str) -> bool {
    AccessEvaluator::default().is_allowed(roles, expression)
}
