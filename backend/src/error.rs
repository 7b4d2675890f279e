//! Error handling for the chilly billing server
//!
//! Every failure leaves the server as a JSON body of the form
//! `{ "error": { "code", "message", "field"? } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::BillingError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Billing errors
    #[error(transparent)]
    Billing(#[from] BillingError),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        let detail = |code: &str, field: Option<&str>| ErrorDetail {
            code: code.to_string(),
            message: self.to_string(),
            field: field.map(str::to_string),
        };

        match self {
            AppError::Billing(BillingError::NoQualitySelected) => (
                StatusCode::BAD_REQUEST,
                detail("NO_QUALITY_SELECTED", Some("quality")),
            ),
            AppError::Billing(BillingError::NoMatchingRecords(_)) => (
                StatusCode::NOT_FOUND,
                detail("NO_MATCHING_RECORDS", Some("quality")),
            ),
            AppError::Billing(BillingError::NothingCalculated) => {
                (StatusCode::CONFLICT, detail("NOTHING_CALCULATED", None))
            }
            AppError::Billing(BillingError::InvalidRepackingCharge(_)) => (
                StatusCode::BAD_REQUEST,
                detail("VALIDATION_ERROR", Some("repacking_charge")),
            ),
            AppError::Billing(BillingError::Store(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, detail("STORAGE_ERROR", None))
            }
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!(code = %error_detail.code, "{}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
