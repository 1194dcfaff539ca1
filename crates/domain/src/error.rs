//! Errors raised while building domain values from operator input or
//! persisted text.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value broke a rule: empty name, rank out of range.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid dbref: {0}")]
    InvalidDbref(String),

    /// Text did not match any known spelling (tiers, comparators, tokens).
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_dbref(msg: impl Into<String>) -> Self {
        Self::InvalidDbref(msg.into())
    }

    /// For `FromStr` implementations when the input matches no variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
