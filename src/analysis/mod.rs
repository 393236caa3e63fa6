//! Sales analysis over monthly extracts.
//!
//! The pipeline runs in this order:
//!
//! 1. [`normalize`] - raw rows of one extract to [`SalesRecord`]s
//! 2. [`ingest`] / [`merge`] - per-period record sets into one dataset
//! 3. [`aggregate`] - sums along a [`GroupBy`] dimension set
//! 4. [`compute_growth`] - period-over-period change
//! 5. [`top_n`] - rankings with an optional minimum threshold
//!
//! [`build_report`] runs all of them for a dashboard. Inventory snapshots
//! are analyzed separately by [`classify_stock`], [`low_stock_report`],
//! [`inventory_valuation`] and [`margin_analysis`].
//!
//! Every function here is pure: no I/O and no shared state.
//!
//! [`SalesRecord`]: crate::models::SalesRecord
//! [`GroupBy`]: crate::models::GroupBy

mod aggregate;
mod growth;
mod ingest;
mod inventory;
mod merge;
mod normalize;
mod ranking;
mod report;
mod stock_severity;
mod summary;

pub use aggregate::{Accumulator, aggregate};
pub use growth::{compute_growth, compute_growth_by_dimension, growth_pct};
pub use ingest::{Ingestion, ingest, ingest_strict};
pub use inventory::{inventory_valuation, margin_analysis, product_margin};
pub use merge::{PeriodRecords, distinct_periods, merge, merge_with_policy, missing_periods};
pub use normalize::normalize;
pub use ranking::{RankMetric, Threshold, top_n};
pub use report::{build_report, build_report_strict};
pub use stock_severity::{classify_stock, classify_stock_with, low_stock_report, stock_ratio};
pub use summary::{
    ALL_TIME_LABEL, date_range_label, filter_category, filter_periods, search_products,
    summarize, timeline_by_year,
};
