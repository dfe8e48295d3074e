//! Core error types.

use thiserror::Error;

/// Errors from domain-level validation and parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required title was blank at save time.
    #[error("title must not be empty")]
    EmptyTitle,

    /// A category string outside the fixed enumeration.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
