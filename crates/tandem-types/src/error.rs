use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("missing reserved key: {0}")]
    MissingReservedKey(&'static str),

    #[error("malformed reserved key {key}: {reason}")]
    MalformedReservedKey { key: &'static str, reason: String },
}
