// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the configuration engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while parsing schemas or reconciling configuration.
///
/// Validation failures are not errors: they are reported through
/// [`crate::ValidationResult`] and never block edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The schema text is not JSON, or it lacks a usable `properties` mapping.
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// A property has no `default` and its type has no fallback value.
    /// This points at an incomplete schema rather than bad user data.
    #[error("Cannot resolve a default for '{key}': {reason}")]
    UnresolvableDefault { key: String, reason: String },

    /// A saved configuration that is neither an object nor null.
    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),

    /// Operator text that the property's control cannot turn into a value.
    #[error("Invalid input for '{key}': {reason}")]
    InvalidInput { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn malformed_schema(msg: impl Into<String>) -> Self {
        Self::MalformedSchema(msg.into())
    }

    pub(crate) fn unresolvable(key: &str, reason: impl Into<String>) -> Self {
        Self::UnresolvableDefault {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_input(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
