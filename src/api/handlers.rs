//! HTTP request handlers for the sales analysis API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{
    build_report, build_report_strict, classify_stock_with, inventory_valuation, low_stock_report,
    margin_analysis, stock_ratio,
};
use crate::error::EngineResult;

use super::request::{AnalyzeRequest, ClassifyRequest, StockSnapshotRequest};
use super::response::{ApiError, ApiErrorResponse, ClassifyResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/stock/low-stock", post(low_stock_handler))
        .route("/stock/valuation", post(valuation_handler))
        .route("/stock/margins", post(margins_handler))
        .route("/stock/classify", post(classify_handler))
        .with_state(state)
}

/// Handler for POST /analyze.
///
/// Runs the full analysis over the submitted extracts. Unusable extracts are
/// excluded and listed in the report unless the request is strict.
async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing analysis request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = state.config().config();
    let start_time = Instant::now();
    let report = if request.strict {
        match build_report_strict(&request.reports, config) {
            Ok(report) => report,
            Err(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "Strict ingestion failed");
                return error_response(err.into());
            }
        }
    } else {
        build_report(&request.reports, config)
    };
    info!(
        correlation_id = %correlation_id,
        analysis_id = %report.analysis_id,
        extracts = request.reports.len(),
        excluded = report.ingestion.excluded.len(),
        total_sales = %report.summary.total_sales,
        duration_us = start_time.elapsed().as_micros(),
        "Analysis completed successfully"
    );
    json_response(&report)
}

/// Handler for POST /stock/low-stock.
async fn low_stock_handler(
    State(state): State<AppState>,
    payload: Result<Json<StockSnapshotRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing low-stock request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let report = low_stock_report(&request.items, state.config().stock_thresholds());
    info!(
        correlation_id = %correlation_id,
        items = request.items.len(),
        low = report.lines.len(),
        out_of_stock = report.out_of_stock_count,
        duration_us = start_time.elapsed().as_micros(),
        "Low-stock report completed"
    );
    json_response(&report)
}

/// Handler for POST /stock/valuation.
async fn valuation_handler(
    payload: Result<Json<StockSnapshotRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing valuation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let valuation = inventory_valuation(&request.items);
    info!(
        correlation_id = %correlation_id,
        items = request.items.len(),
        total_cost_value = %valuation.total_cost_value,
        invalid = valuation.invalid_skus.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Inventory valuation completed"
    );
    json_response(&valuation)
}

/// Handler for POST /stock/margins.
///
/// Lists as many top products as the configured ranking size.
async fn margins_handler(
    State(state): State<AppState>,
    payload: Result<Json<StockSnapshotRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing margin request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let analysis = margin_analysis(&request.items, state.config().ranking().top_n);
    info!(
        correlation_id = %correlation_id,
        items = request.items.len(),
        unpriced = analysis.unpriced_skus.len(),
        invalid = analysis.invalid_skus.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Margin analysis completed"
    );
    json_response(&analysis)
}

/// Handler for POST /stock/classify.
async fn classify_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match classify(&request, &state) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                quantity = request.quantity,
                min_stock = request.min_stock,
                severity = %response.severity,
                "Stock level classified"
            );
            json_response(&response)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Classification failed");
            error_response(err.into())
        }
    }
}

fn classify(request: &ClassifyRequest, state: &AppState) -> EngineResult<ClassifyResponse> {
    let thresholds = state.config().stock_thresholds();
    Ok(ClassifyResponse {
        severity: classify_stock_with(request.quantity, request.min_stock, thresholds)?,
        ratio: stock_ratio(request.quantity, request.min_stock)?,
    })
}

fn json_response<T: Serialize>(body: &T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    (
        error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error.error),
    )
        .into_response()
}

/// Maps a body extraction failure to a 400 with a JSON error body.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    })
}
