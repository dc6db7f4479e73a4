//! Static file serving for the local storage backend.

use axum::{Router, extract::State, routing::get};
use tower_http::services::ServeDir;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// Prefix stripped from request paths before resolving them on disk.
pub const STATIC_PREFIX: &str = "/static";

/// Creates the static routes for the active backend.
///
/// With a local base path, `/static/<path>` serves `<base>/<path>`: content
/// type from the extension, `404` for missing files and traversal attempts.
/// Backends without local files get a route that reports the
/// misconfiguration instead.
pub fn routes(state: &AppState) -> Router<AppState> {
    if let Some(base) = state.storage.base_path() {
        Router::new().nest_service(STATIC_PREFIX, ServeDir::new(base))
    } else {
        warn!(
            backend = state.storage.name(),
            "Storage backend has no local files; /static is disabled"
        );
        Router::new()
            .route(STATIC_PREFIX, get(static_unavailable))
            .route(&format!("{STATIC_PREFIX}/{{*path}}"), get(static_unavailable))
    }
}

/// GET `/static/{*path}` when the backend cannot serve files.
async fn static_unavailable(State(state): State<AppState>) -> ApiError {
    ApiError::StaticUnavailable {
        backend: state.storage.name(),
    }
}
