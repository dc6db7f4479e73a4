//! Upload route.

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Largest accepted request body. Base64 inflates images by a third.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for an upload.
#[derive(Debug, Deserialize)]
pub struct FileUploadRequest {
    /// File as a base64 data URL.
    pub content: String,
}

/// Response for a stored upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    /// Generated identifier.
    pub id: Uuid,
    /// URL resolving to the stored file.
    pub url: String,
    /// Upload time (RFC 3339).
    pub uploaded_at: DateTime<Utc>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/upload`
/// Store a data URL and return where it can be fetched.
///
/// The body is read and parsed by hand so an oversized or malformed payload
/// goes through [`ApiError`] like every other failure.
async fn upload_file(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body.map_err(ApiError::Body)?;
    let request: FileUploadRequest =
        serde_json::from_slice(&body).map_err(ApiError::InvalidJson)?;

    let uploaded = state.uploads.upload_data_url(&request.content).await?;
    info!(
        id = %uploaded.id,
        url = %uploaded.url,
        content_type = %uploaded.content_type,
        size = uploaded.size,
        url_expires_at = ?uploaded.url_expires_at,
        "File uploaded"
    );

    let response = FileUploadResponse {
        id: uploaded.id,
        url: uploaded.url,
        uploaded_at: uploaded.uploaded_at,
    };
    let body = serde_json::to_vec(&response).map_err(|source| ApiError::Encode {
        id: uploaded.id,
        source,
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
