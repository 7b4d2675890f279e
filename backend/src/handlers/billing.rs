//! Quality billing HTTP handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    services::{
        billing::{BillingQuery, BillingResponse, QualitiesResponse},
        statement::render_statement,
    },
    AppState,
};

/// List the quality labels that can be billed
pub async fn list_qualities(State(state): State<AppState>) -> AppResult<Json<QualitiesResponse>> {
    let qualities = state.billing.quality_labels().await?;
    Ok(Json(qualities))
}

/// Calculate the bill for one quality
pub async fn get_billing(
    State(state): State<AppState>,
    Query(query): Query<BillingQuery>,
) -> AppResult<Json<BillingResponse>> {
    let response = state.billing.calculate(query).await?;
    Ok(Json(response))
}

/// Printable plain-text bill for one quality
pub async fn print_billing(
    State(state): State<AppState>,
    Query(query): Query<BillingQuery>,
) -> AppResult<impl IntoResponse> {
    let response = state.billing.calculate(query).await?;
    let text = render_statement(&response)
        .map_err(|e| AppError::Internal(format!("failed to render statement: {}", e)))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}
