use thiserror::Error;

/// Errors from blob store operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The requested key does not exist.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The key cannot be used by this backend (empty, absolute, or
    /// traversing outside the store root).
    #[error("invalid blob key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot be reached (transport or auth failure).
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

impl BlobError {
    /// Returns `true` for the missing-key condition, as opposed to
    /// transport or I/O failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;
