//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod static_files;
pub mod upload;

/// Creates the API router with all stateless-built routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(upload::routes())
}
