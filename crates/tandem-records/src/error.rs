use std::fmt;

use thiserror::Error;

use tandem_blob::BlobError;
use tandem_index::IndexError;
use tandem_types::{RecordId, TypeError};

/// Which dual-store operation left the stores divergent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DualOp {
    Save,
    Delete,
}

impl fmt::Display for DualOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save => write!(f, "save"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Errors from record and collection operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record is absent from the store the operation targeted.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// Blob store failure.
    #[error("blob store: {0}")]
    Blob(#[from] BlobError),

    /// Search index failure.
    #[error("search index: {0}")]
    Index(#[from] IndexError),

    /// A persisted envelope or indexed document cannot be decoded.
    #[error("malformed stored record: {0}")]
    Serialization(String),

    /// The record belongs to a different collection than the coordinator.
    #[error("collection mismatch: expected {expected}, record carries {actual}")]
    CollectionMismatch { expected: String, actual: String },

    /// The first store of a dual write succeeded and the second failed,
    /// leaving this id divergent between the stores. Running reindex
    /// reconciles a partial save; a partial delete leaves an orphan blob
    /// that the next reindex re-surfaces.
    #[error("partial {op} for {id}: {source}")]
    PartialWrite {
        id: RecordId,
        op: DualOp,
        #[source]
        source: Box<RecordError>,
    },
}

impl RecordError {
    /// Returns `true` for the missing-record condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if a dual write was left half-applied.
    pub fn is_partial_write(&self) -> bool {
        matches!(self, Self::PartialWrite { .. })
    }

    pub(crate) fn partial(id: RecordId, op: DualOp, source: RecordError) -> Self {
        Self::PartialWrite {
            id,
            op,
            source: Box::new(source),
        }
    }
}

impl From<TypeError> for RecordError {
    fn from(e: TypeError) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for record operations.
pub type RecordResult<T> = Result<T, RecordError>;
