//! Store error types.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
///
/// These surface only at explicit boundaries (backup import/export, direct
/// backend access). Reads and writes through the cells absorb storage
/// faults per the store contract: a failed read falls back to the default
/// value and a failed write is logged and dropped.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backup document that could not be parsed. Nothing was written.
    #[error("malformed backup document: {0}")]
    MalformedBackup(#[source] serde_json::Error),
}
