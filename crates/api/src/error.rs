//! API error to response mapping.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use imgdrop_core::upload::UploadError;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Errors surfaced by route handlers.
///
/// Every variant answers `500` with an empty body. The error is logged once,
/// when it is turned into a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be read, usually because it exceeds the limit.
    #[error("failed to read request body: {0}")]
    Body(#[source] BytesRejection),

    /// Request body is not a valid upload request.
    #[error("invalid request body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Decoding or storing the upload failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Response could not be encoded after the object was stored.
    #[error("failed to encode response for stored upload {id}: {source}")]
    Encode {
        /// Identifier of the already stored upload.
        id: Uuid,
        /// Encoding failure.
        source: serde_json::Error,
    },

    /// Static serving requested while the active backend has no local files.
    #[error("static serving is unavailable for the '{backend}' storage backend")]
    StaticUnavailable {
        /// Active backend name.
        backend: &'static str,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Encode { id, .. } => {
                error!(error = %self, id = %id, "Upload stored but response failed");
            }
            _ => error!(error = %self, "Request failed"),
        }
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
