//! API route table.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, AppState};

/// Build the v1 API router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Service
        .route("/health", get(handlers::get_health))
        .route("/config", get(handlers::get_config))
        .route("/catalog", get(handlers::get_catalog))
        // Sizing
        .route("/analyze", post(handlers::analyze))
        .route("/belt-drive", post(handlers::belt_drive))
        .route("/optimize", post(handlers::optimize))
        .with_state(state)
}
