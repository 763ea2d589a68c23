use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use tandem_blob::BlobError;
use tandem_index::IndexError;
use tandem_records::RecordError;

use crate::gate::OpClass;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("authorization denied for {class} operation")]
    Denied { class: OpClass, anonymous: bool },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Status and machine-readable code for the wire. `partial_write` is
    /// surfaced distinctly: it is the signal that reindex is needed.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Record(e) => record_status_and_code(e),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::Denied { anonymous: true, .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Denied { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            Self::Config(_) | Self::Internal(_) | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

fn record_status_and_code(e: &RecordError) -> (StatusCode, &'static str) {
    match e {
        RecordError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        RecordError::PartialWrite { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "partial_write"),
        RecordError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record"),
        RecordError::CollectionMismatch { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        RecordError::Blob(blob) => match blob {
            BlobError::InvalidKey { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            BlobError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            // Transport and I/O failure talking to the backend is retryable.
            BlobError::Io(_) | BlobError::Unavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
        },
        RecordError::Index(index) => match index {
            IndexError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            IndexError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            IndexError::MalformedDocument { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record")
            }
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let mut message = self.to_string();
        if code == "partial_write" {
            message.push_str("; run reindex to reconcile the stores");
        }
        if status.is_server_error() {
            tracing::warn!("request failed: {message}");
        }
        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
