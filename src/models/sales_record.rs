//! Sales row models.
//!
//! [`RawSalesRow`] is the loosely-typed row handed over by the report
//! ingestion collaborator; [`SalesRecord`] is the validated, strongly-typed
//! row produced by normalization.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PeriodKey;

/// Category literal used by extracts for their grand-total line.
pub const TOTAL_CATEGORY: &str = "TOTAL";

/// Largest units or sales value a single row may carry.
///
/// Keeps every sum the engine forms over normalized records well inside the
/// range of [`Decimal`].
pub const MAX_CELL_VALUE: i64 = 1_000_000_000_000_000;

/// A numeric cell as it arrives from an extract: a number or a string.
///
/// # Example
///
/// ```
/// use sales_insight::models::RawValue;
/// use rust_decimal::Decimal;
///
/// assert_eq!(RawValue::from("$1,250.50").to_decimal(), Some(Decimal::new(125050, 2)));
/// assert_eq!(RawValue::from("n/a").to_decimal(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A value that was already numeric.
    Number(Decimal),
    /// A value that still needs parsing.
    Text(String),
}

impl RawValue {
    /// Interprets the cell as a decimal number.
    ///
    /// Text is trimmed, a leading `$` and `,` thousands separators are
    /// removed. Returns `None` when nothing numeric remains.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawValue::Number(value) => Some(*value),
            RawValue::Text(text) => {
                let trimmed = text.trim();
                let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
                let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return None;
                }
                Decimal::from_str(&cleaned)
                    .or_else(|_| Decimal::from_scientific(&cleaned))
                    .ok()
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        RawValue::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(Decimal::from(value))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(Decimal::from(value))
    }
}

/// One row of a monthly extract before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRow {
    /// Product name column.
    pub product_name: String,
    /// Category name column; `"TOTAL"` marks the grand-total line.
    pub category_name: String,
    /// Units sold column.
    #[serde(default)]
    pub units_sold: Option<RawValue>,
    /// Net sales column.
    #[serde(default)]
    pub net_sales: Option<RawValue>,
}

impl RawSalesRow {
    /// Creates a raw row from its four cells.
    pub fn new(
        product_name: impl Into<String>,
        category_name: impl Into<String>,
        units_sold: impl Into<RawValue>,
        net_sales: impl Into<RawValue>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            category_name: category_name.into(),
            units_sold: Some(units_sold.into()),
            net_sales: Some(net_sales.into()),
        }
    }

    /// Whether this row is the extract's synthetic grand-total line.
    ///
    /// Only an exact, case-sensitive match counts; `"Subtotal"` or `"total"`
    /// are ordinary categories.
    pub fn is_grand_total(&self) -> bool {
        self.category_name == TOTAL_CATEGORY
    }
}

/// Performance of one product within one period.
///
/// Produced only by normalization, which guarantees the category is not the
/// grand-total literal and both quantities lie in `0..=MAX_CELL_VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// The product name.
    pub product_name: String,
    /// The product's category.
    pub category_name: String,
    /// Units sold in the period.
    pub units_sold: Decimal,
    /// Net sales in the period.
    pub net_sales: Decimal,
    /// The period the row belongs to.
    pub period: PeriodKey,
}
