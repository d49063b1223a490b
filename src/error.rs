//! Error types
//!
//! None of these ever stop a timer. Callers log them and carry on as if the
//! value were absent.

use thiserror::Error;

/// Durable client storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("stored value under `{key}` is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Rejected server-pushed event
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("malformed `{event}` payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{event}` payload is missing `{field}`")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },
}
