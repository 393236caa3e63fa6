//! Report-level models.
//!
//! This module contains the input batch type ([`ReportBatch`]), the
//! per-period ingestion outcome ([`IngestionReport`]), dataset-wide views
//! ([`DatasetSummary`], [`YearTimeline`]) and the complete
//! [`AnalysisReport`] handed to presentation collaborators.

use chrono::{DateTime, Month, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GrowthPoint, PeriodAggregate, PeriodKey, RawSalesRow};

/// One monthly extract as delivered by the ingestion collaborator.
///
/// # Example
///
/// ```
/// use sales_insight::models::{RawSalesRow, ReportBatch};
///
/// let batch = ReportBatch {
///     label: "sales_jan_2024.csv".to_string(),
///     month: "Jan".to_string(),
///     year: "2024".to_string(),
///     rows: vec![RawSalesRow::new("Mint Ice 30ml", "E-Liquid", 12, "215.40")],
/// };
/// assert_eq!(batch.rows.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBatch {
    /// Identifies the extract in the ingestion report (usually a file name).
    #[serde(default)]
    pub label: String,
    /// Month token of the extract.
    pub month: String,
    /// Year token of the extract.
    pub year: String,
    /// The extract's rows, grand-total line included.
    #[serde(default)]
    pub rows: Vec<RawSalesRow>,
}

/// An extract left out of the analysis, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedPeriod {
    /// The batch label.
    pub label: String,
    /// The period, when it could be parsed.
    pub period: Option<PeriodKey>,
    /// Why the extract was excluded.
    pub reason: String,
}

/// Which extracts made it into the analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Periods whose records were included, chronologically, without repeats.
    pub included: Vec<PeriodKey>,
    /// Extracts that were dropped.
    pub excluded: Vec<ExcludedPeriod>,
    /// Periods that were supplied by more than one extract.
    pub duplicates: Vec<PeriodKey>,
    /// Months absent between the first and last included period.
    pub missing_periods: Vec<PeriodKey>,
}

impl IngestionReport {
    /// Whether every supplied extract was used and the series has no gaps.
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty() && self.duplicates.is_empty() && self.missing_periods.is_empty()
    }
}

/// Headline figures over a set of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Sum of net sales.
    pub total_sales: Decimal,
    /// Sum of units sold.
    pub total_units: Decimal,
    /// Net sales per unit, `None` when no units were sold.
    pub average_price: Option<Decimal>,
    /// Number of distinct product names.
    pub unique_products: usize,
    /// Number of records.
    pub record_count: usize,
    /// Number of distinct periods.
    pub period_count: usize,
    /// Earliest period present.
    pub first_period: Option<PeriodKey>,
    /// Latest period present.
    pub last_period: Option<PeriodKey>,
}

/// The months available for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTimeline {
    /// The calendar year.
    pub year: i32,
    /// Months present in that year, chronologically.
    pub months: Vec<Month>,
}

/// Everything a dashboard or report needs from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique identifier for this run.
    pub analysis_id: Uuid,
    /// When the analysis was performed.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// `"YYYY-MM to YYYY-MM"` caption, or `"All Time"`.
    pub date_range: String,
    /// Which extracts were used.
    pub ingestion: IngestionReport,
    /// Headline figures.
    pub summary: DatasetSummary,
    /// Available months grouped by year, newest year first.
    pub timeline: Vec<YearTimeline>,
    /// Totals per period, chronologically.
    pub monthly: Vec<PeriodAggregate>,
    /// Month-over-month growth of the totals.
    pub monthly_growth: Vec<GrowthPoint>,
    /// Totals per category, highest sales first.
    pub categories: Vec<PeriodAggregate>,
    /// Month-over-month growth per category.
    pub category_growth: Vec<GrowthPoint>,
    /// Products ranked by net sales.
    pub top_by_sales: Vec<PeriodAggregate>,
    /// Products ranked by units sold.
    pub top_by_units: Vec<PeriodAggregate>,
    /// Products ranked by average price, low-volume products excluded.
    pub top_by_average_price: Vec<PeriodAggregate>,
}
