//! HTTP API module for the sales analysis engine.
//!
//! This module exposes the analysis and stock classification over JSON:
//!
//! - `POST /analyze` - full analysis report for a set of monthly extracts
//! - `POST /stock/low-stock` - low-stock report for an inventory snapshot
//! - `POST /stock/valuation` - stock value at cost and at retail
//! - `POST /stock/margins` - unit margins by product and category
//! - `POST /stock/classify` - severity tier of a single stock level

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AnalyzeRequest, ClassifyRequest, StockSnapshotRequest};
pub use response::{ApiError, ApiErrorResponse, ClassifyResponse};
pub use state::AppState;
