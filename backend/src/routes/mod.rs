//! Route definitions for the chilly billing server

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/qualities", get(handlers::list_qualities))
        .route("/billing", get(handlers::get_billing))
        .route("/billing/print", get(handlers::print_billing))
}
