use thiserror::Error;

/// Errors from search index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No document with this id exists in the collection.
    #[error("document not found in {collection}: {id}")]
    NotFound { collection: String, id: String },

    /// The backend cannot be reached (transport or auth failure).
    #[error("search index unavailable: {0}")]
    Unavailable(String),

    /// A stored document cannot be decoded.
    #[error("malformed document in {collection}: {reason}")]
    MalformedDocument { collection: String, reason: String },
}

impl IndexError {
    /// Returns `true` for the missing-document condition, as opposed to
    /// transport failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
