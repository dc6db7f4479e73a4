//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The upload endpoint
//! - Static file serving for the local backend
//! - Health check
//! - Error to response mapping

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use imgdrop_core::storage::StorageBackend;
use imgdrop_core::upload::UploadService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Active storage backend.
    pub storage: Arc<dyn StorageBackend>,
    /// Upload service bound to the same backend.
    pub uploads: Arc<UploadService>,
}

impl AppState {
    /// Create state around a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        let uploads = Arc::new(UploadService::new(storage.clone()));
        Self { storage, uploads }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::static_files::routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
