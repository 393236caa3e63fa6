//! Period-over-period growth.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{GrowthPoint, PeriodAggregate};

/// Percentage change from `previous` to `current`.
///
/// Returns `None` when `previous` is not positive; growth from nothing is
/// undefined rather than zero or infinite. A change too large to represent
/// is also `None`.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::growth_pct;
/// use rust_decimal::Decimal;
///
/// assert_eq!(growth_pct(Decimal::from(100), Decimal::from(150)), Some(Decimal::from(50)));
/// assert_eq!(growth_pct(Decimal::ZERO, Decimal::from(50)), None);
/// ```
pub fn growth_pct(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous <= Decimal::ZERO {
        return None;
    }
    current
        .checked_sub(previous)
        .and_then(|change| change.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Computes growth between each pair of chronologically adjacent aggregates.
///
/// The input is re-sorted by period first (stable), so callers may pass
/// aggregates in any order. Aggregates without a period cannot be placed on
/// the timeline and are skipped with a warning. For `n` period-bearing
/// aggregates the result has `n - 1` points; fewer than two gives none.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::{aggregate, compute_growth};
/// use sales_insight::models::{GroupBy, PeriodKey, SalesRecord};
/// use rust_decimal::Decimal;
///
/// let record = |month: &str, sales: i64| SalesRecord {
///     product_name: "Mint Ice".to_string(),
///     category_name: "E-Liquid".to_string(),
///     units_sold: Decimal::ONE,
///     net_sales: Decimal::from(sales),
///     period: PeriodKey::parse(month, "2024").unwrap(),
/// };
/// let monthly = aggregate(&[record("Feb", 150), record("Jan", 100)], GroupBy::Period);
///
/// let growth = compute_growth(&monthly);
/// assert_eq!(growth.len(), 1);
/// assert_eq!(growth[0].sales_growth_pct, Some(Decimal::from(50)));
/// ```
pub fn compute_growth(aggregates: &[PeriodAggregate]) -> Vec<GrowthPoint> {
    let mut series: Vec<&PeriodAggregate> = aggregates
        .iter()
        .filter(|aggregate| aggregate.period.is_some())
        .collect();

    let skipped = aggregates.len() - series.len();
    if skipped > 0 {
        warn!(skipped, "Skipping aggregates without a period in growth series");
    }

    if !series.is_sorted_by_key(|aggregate| aggregate.period) {
        debug!(len = series.len(), "Re-sorting growth series chronologically");
        series.sort_by_key(|aggregate| aggregate.period);
    }

    series
        .windows(2)
        .filter_map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            let from_period = previous.period?;
            let to_period = current.period?;
            let dimension = if previous.dimension() == current.dimension() {
                current.dimension().map(str::to_string)
            } else {
                None
            };
            Some(GrowthPoint {
                from_period,
                to_period,
                dimension,
                units_growth_pct: growth_pct(previous.total_units, current.total_units),
                sales_growth_pct: growth_pct(previous.total_sales, current.total_sales),
            })
        })
        .collect()
}

/// Computes one growth series per dimension value.
///
/// Aggregates are split by [`PeriodAggregate::dimension`] (category for a
/// period-and-category grouping) and each series is handled as in
/// [`compute_growth`]. Series appear in the order their dimension first
/// appears in the input.
pub fn compute_growth_by_dimension(aggregates: &[PeriodAggregate]) -> Vec<GrowthPoint> {
    let mut series: Vec<(Option<&str>, Vec<PeriodAggregate>)> = Vec::new();
    for aggregate in aggregates {
        let dimension = aggregate.dimension();
        match series.iter_mut().find(|(key, _)| *key == dimension) {
            Some((_, members)) => members.push(aggregate.clone()),
            None => series.push((dimension, vec![aggregate.clone()])),
        }
    }

    series
        .into_iter()
        .flat_map(|(dimension, members)| {
            compute_growth(&members).into_iter().map(move |mut point| {
                point.dimension = dimension.map(str::to_string);
                point
            })
        })
        .collect()
}
