//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Identity resolution
        .route("/api/v1/resolve/:address", get(handlers::resolve))
        .route("/api/v1/avatar", get(handlers::resolve_avatar))

        .with_state(state)
}
