//! Core data models for the sales analysis engine.
//!
//! This module contains all the domain models used throughout the engine.

mod aggregate;
mod analysis_report;
mod inventory;
mod period;
mod sales_record;
mod stock;

pub use aggregate::{GroupBy, GrowthPoint, PeriodAggregate};
pub use analysis_report::{
    AnalysisReport, DatasetSummary, ExcludedPeriod, IngestionReport, ReportBatch, YearTimeline,
};
pub use inventory::{
    CategoryMargin, CategoryValuation, InventoryValuation, ItemValuation, MarginAnalysis,
    ProductMargin,
};
pub use period::PeriodKey;
pub use sales_record::{MAX_CELL_VALUE, RawSalesRow, RawValue, SalesRecord, TOTAL_CATEGORY};
pub use stock::{LowStockLine, LowStockReport, StockItem, StockSeverity};
