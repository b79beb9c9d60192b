//! Validation errors for identifiers and configuration.

use thiserror::Error;

/// An identifier failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Identifiers are opaque but must not be empty (or whitespace only).
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Identifiers are embedded in URL paths, so `/` is rejected.
    #[error("{kind} contains an illegal character: {value:?}")]
    IllegalCharacter { kind: &'static str, value: String },
}

/// A configuration value was out of range or unparsable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field}: cannot parse {value:?}")]
    Parse { field: &'static str, value: String },

    #[error("{0} is required")]
    Missing(&'static str),
}

impl ConfigError {
    pub fn not_positive(field: &'static str) -> Self {
        Self::NotPositive { field }
    }

    pub fn parse(field: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            field,
            value: value.into(),
        }
    }
}
