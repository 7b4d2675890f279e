//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check the trade data store is readable
    let (storage, records) = match state.billing.record_count().await {
        Ok(count) => ("available".to_string(), Some(count)),
        Err(e) => {
            tracing::warn!(error = %e, "Trade data store unavailable");
            ("unavailable".to_string(), None)
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
        records,
    })
}
