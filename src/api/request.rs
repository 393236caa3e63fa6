//! Request types for the sales analysis API.

use serde::{Deserialize, Serialize};

use crate::models::{ReportBatch, StockItem};

/// Request body for the `/analyze` endpoint.
///
/// # Example
///
/// ```
/// use sales_insight::api::AnalyzeRequest;
///
/// let json = r#"{
///     "reports": [
///         {
///             "label": "sales_jan_2024.csv",
///             "month": "Jan",
///             "year": "2024",
///             "rows": [
///                 {"product_name": "Mint Ice", "category_name": "E-Liquid",
///                  "units_sold": 12, "net_sales": "215.40"}
///             ]
///         }
///     ]
/// }"#;
/// let request: AnalyzeRequest = serde_json::from_str(json).unwrap();
/// assert_eq!(request.reports.len(), 1);
/// assert!(!request.strict);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// The monthly extracts to analyze.
    pub reports: Vec<ReportBatch>,
    /// Fail the request on the first unusable extract instead of excluding it.
    #[serde(default)]
    pub strict: bool,
}

/// Request body for the `/stock/low-stock`, `/stock/valuation` and
/// `/stock/margins` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshotRequest {
    /// The inventory snapshot.
    pub items: Vec<StockItem>,
}

/// Request body for the `/stock/classify` endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Units currently on hand.
    pub quantity: i64,
    /// Minimum units that should be kept on hand.
    pub min_stock: i64,
}
