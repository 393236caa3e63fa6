//! Aggregate models.
//!
//! This module contains [`PeriodAggregate`], the summed view of a group of
//! sales records, the [`GroupBy`] dimensions it can be grouped along, and
//! [`GrowthPoint`], the change between two chronologically adjacent
//! aggregates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PeriodKey;

/// The dimensions records can be grouped along.
///
/// # Example
///
/// ```
/// use sales_insight::models::GroupBy;
///
/// assert!(GroupBy::PeriodAndCategory.includes_period());
/// assert!(!GroupBy::Product.includes_period());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One aggregate per period.
    Period,
    /// One aggregate per product name, across all periods.
    Product,
    /// One aggregate per category, across all periods.
    Category,
    /// One aggregate per (period, category) pair.
    PeriodAndCategory,
    /// One aggregate per (product, category) pair, across all periods.
    ProductAndCategory,
}

impl GroupBy {
    /// Whether aggregates of this grouping carry a period.
    pub fn includes_period(&self) -> bool {
        matches!(self, GroupBy::Period | GroupBy::PeriodAndCategory)
    }

    /// Whether aggregates of this grouping carry a category.
    pub fn includes_category(&self) -> bool {
        matches!(
            self,
            GroupBy::Category | GroupBy::PeriodAndCategory | GroupBy::ProductAndCategory
        )
    }

    /// Whether aggregates of this grouping carry a product.
    pub fn includes_product(&self) -> bool {
        matches!(self, GroupBy::Product | GroupBy::ProductAndCategory)
    }
}

/// Summed sales figures for one group of records.
///
/// Fields not part of the grouping are `None`. Shares are percentages of the
/// grand total of the records that were aggregated, and are `None` when that
/// grand total is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    /// The period, for period groupings.
    pub period: Option<PeriodKey>,
    /// The category, for category groupings.
    pub category: Option<String>,
    /// The product name, for product groupings.
    pub product: Option<String>,
    /// Sum of units sold.
    pub total_units: Decimal,
    /// Sum of net sales.
    pub total_sales: Decimal,
    /// Number of records in the group.
    pub record_count: usize,
    /// Number of distinct product names in the group.
    pub distinct_products: usize,
    /// Group sales as a percentage of the aggregated grand total.
    pub sales_share_pct: Option<Decimal>,
    /// Group units as a percentage of the aggregated grand total.
    pub units_share_pct: Option<Decimal>,
}

impl PeriodAggregate {
    /// The non-period dimension value: product name if present, else category.
    pub fn dimension(&self) -> Option<&str> {
        self.product.as_deref().or(self.category.as_deref())
    }

    /// Net sales per unit, or `None` when no units were sold.
    ///
    /// # Example
    ///
    /// ```
    /// use sales_insight::models::PeriodAggregate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut aggregate = PeriodAggregate {
    ///     period: None,
    ///     category: Some("Hardware".to_string()),
    ///     product: None,
    ///     total_units: Decimal::from(4),
    ///     total_sales: Decimal::from(100),
    ///     record_count: 2,
    ///     distinct_products: 2,
    ///     sales_share_pct: None,
    ///     units_share_pct: None,
    /// };
    /// assert_eq!(aggregate.average_price(), Some(Decimal::from(25)));
    ///
    /// aggregate.total_units = Decimal::ZERO;
    /// assert_eq!(aggregate.average_price(), None);
    /// ```
    pub fn average_price(&self) -> Option<Decimal> {
        if self.total_units.is_zero() {
            None
        } else {
            self.total_sales.checked_div(self.total_units)
        }
    }
}

/// Period-over-period change between two adjacent aggregates.
///
/// A growth figure is `None` when the earlier value is zero: growth from
/// nothing is undefined and is kept distinct from 0%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// The earlier period.
    pub from_period: PeriodKey,
    /// The later period.
    pub to_period: PeriodKey,
    /// The dimension value of the series, when growth was split by dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Percentage change in units sold.
    pub units_growth_pct: Option<Decimal>,
    /// Percentage change in net sales.
    pub sales_growth_pct: Option<Decimal>,
}

impl GrowthPoint {
    /// The `"Jan 2024 to Feb 2024"` caption for this step.
    pub fn label(&self) -> String {
        format!("{} to {}", self.from_period, self.to_period)
    }
}
