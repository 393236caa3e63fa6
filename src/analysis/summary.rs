//! Dataset-wide views: headline summary, period and category filters,
//! product search and the year-grouped timeline.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;

use crate::models::{DatasetSummary, PeriodKey, SalesRecord, YearTimeline};

/// Caption used when there are no periods to describe.
pub const ALL_TIME_LABEL: &str = "All Time";

/// Computes headline figures over `records`.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::summarize;
/// use sales_insight::models::{PeriodKey, SalesRecord};
/// use rust_decimal::Decimal;
///
/// let record = |name: &str, units: i64, sales: i64| SalesRecord {
///     product_name: name.to_string(),
///     category_name: "E-Liquid".to_string(),
///     units_sold: Decimal::from(units),
///     net_sales: Decimal::from(sales),
///     period: PeriodKey::parse("Jan", "2024").unwrap(),
/// };
///
/// let summary = summarize(&[record("Mint", 3, 30), record("Berry", 1, 10)]);
/// assert_eq!(summary.total_sales, Decimal::from(40));
/// assert_eq!(summary.average_price, Some(Decimal::from(10)));
/// assert_eq!(summary.unique_products, 2);
/// ```
pub fn summarize(records: &[SalesRecord]) -> DatasetSummary {
    let total_sales: Decimal = records.iter().map(|r| r.net_sales).sum();
    let total_units: Decimal = records.iter().map(|r| r.units_sold).sum();
    let average_price = if total_units.is_zero() {
        None
    } else {
        total_sales.checked_div(total_units)
    };

    let products: HashSet<&str> = records.iter().map(|r| r.product_name.as_str()).collect();
    let periods: BTreeSet<PeriodKey> = records.iter().map(|r| r.period).collect();

    DatasetSummary {
        total_sales,
        total_units,
        average_price,
        unique_products: products.len(),
        record_count: records.len(),
        period_count: periods.len(),
        first_period: periods.first().copied(),
        last_period: periods.last().copied(),
    }
}

/// Keeps the records whose period is in `selected`.
///
/// An empty selection selects nothing.
pub fn filter_periods(records: &[SalesRecord], selected: &[PeriodKey]) -> Vec<SalesRecord> {
    let selected: HashSet<PeriodKey> = selected.iter().copied().collect();
    records
        .iter()
        .filter(|record| selected.contains(&record.period))
        .cloned()
        .collect()
}

/// Keeps the records of one category (exact match).
pub fn filter_category(records: &[SalesRecord], category: &str) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|record| record.category_name == category)
        .cloned()
        .collect()
}

/// Finds records whose product name contains `term`, ignoring case.
///
/// Matches are ordered by net sales, highest first; equal sales keep their
/// input order. A blank term matches every record.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::search_products;
/// use sales_insight::models::{PeriodKey, SalesRecord};
/// use rust_decimal::Decimal;
///
/// let record = |name: &str, sales: i64| SalesRecord {
///     product_name: name.to_string(),
///     category_name: "E-Liquid".to_string(),
///     units_sold: Decimal::ONE,
///     net_sales: Decimal::from(sales),
///     period: PeriodKey::parse("Jan", "2024").unwrap(),
/// };
/// let records = vec![record("Mint Ice", 10), record("Berry", 50), record("Spearmint", 30)];
///
/// let found = search_products(&records, "MINT");
/// let names: Vec<_> = found.iter().map(|r| r.product_name.as_str()).collect();
/// assert_eq!(names, vec!["Spearmint", "Mint Ice"]);
/// ```
pub fn search_products(records: &[SalesRecord], term: &str) -> Vec<SalesRecord> {
    let needle = term.trim().to_lowercase();
    let mut found: Vec<SalesRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || record.product_name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    found.sort_by(|a, b| b.net_sales.cmp(&a.net_sales));
    found
}

/// Groups periods by year, newest year first, months chronological within
/// each year.
pub fn timeline_by_year(periods: &[PeriodKey]) -> Vec<YearTimeline> {
    let mut years: BTreeMap<i32, BTreeSet<PeriodKey>> = BTreeMap::new();
    for period in periods {
        years.entry(period.year()).or_default().insert(*period);
    }

    years
        .into_iter()
        .rev()
        .map(|(year, months)| YearTimeline {
            year,
            months: months.into_iter().map(|period| period.month()).collect(),
        })
        .collect()
}

/// `"2024-01 to 2024-03"` from the earliest to the latest of `periods`, or
/// [`ALL_TIME_LABEL`] when there are none.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::date_range_label;
/// use sales_insight::models::PeriodKey;
///
/// let mar = PeriodKey::parse("Mar", "2024").unwrap();
/// let jan = PeriodKey::parse("Jan", "2024").unwrap();
/// assert_eq!(date_range_label(&[mar, jan]), "2024-01 to 2024-03");
/// assert_eq!(date_range_label(&[]), "All Time");
/// ```
pub fn date_range_label(periods: &[PeriodKey]) -> String {
    match (periods.iter().min(), periods.iter().max()) {
        (Some(first), Some(last)) => format!("{} to {}", first.sort_label(), last.sort_label()),
        _ => ALL_TIME_LABEL.to_string(),
    }
}
