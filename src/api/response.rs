//! Response types for the sales analysis API.
//!
//! This module defines the success bodies that are not plain models and the
//! error body every failing endpoint returns.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::StockSeverity;

/// Response body for the `/stock/classify` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// The stock tier.
    pub severity: StockSeverity,
    /// `quantity / min_stock`.
    pub ratio: Decimal,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "Months must be a three-letter or full English month name",
                ),
            ),
            EngineError::MalformedRecord { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "MALFORMED_RECORD",
                    message,
                    "units_sold and net_sales must be non-negative numbers",
                ),
            ),
            EngineError::InvalidThreshold { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_THRESHOLD", message),
            ),
            EngineError::DuplicatePeriod { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_PERIOD",
                    message,
                    "Only one extract per period is accepted under the reject policy",
                ),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
