//! Record normalization.
//!
//! Turns the raw rows of one monthly extract into validated [`SalesRecord`]s:
//! the grand-total line is dropped, numeric cells are coerced once, and the
//! period is attached to every row.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{MAX_CELL_VALUE, PeriodKey, RawSalesRow, RawValue, SalesRecord};

/// Normalizes the rows of one extract.
///
/// Rows whose category is exactly `"TOTAL"` are dropped so the extract's
/// grand-total line is not counted twice. Every other row must carry a
/// numeric `units_sold` and `net_sales` between zero and [`MAX_CELL_VALUE`].
///
/// [`MAX_CELL_VALUE`]: crate::models::MAX_CELL_VALUE
///
/// # Errors
///
/// Returns [`EngineError::MalformedRecord`] for the first row with a
/// missing, non-numeric, negative or out-of-range value. The whole extract should then be
/// treated as unusable; no partially normalized output is returned.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::normalize;
/// use sales_insight::models::{PeriodKey, RawSalesRow};
///
/// let period = PeriodKey::parse("Jan", "2024").unwrap();
/// let rows = vec![
///     RawSalesRow::new("Mint Ice 30ml", "E-Liquid", 12, "215.40"),
///     RawSalesRow::new("", "TOTAL", 12, "215.40"),
/// ];
///
/// let records = normalize(&rows, period).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].period, period);
/// ```
pub fn normalize(rows: &[RawSalesRow], period: PeriodKey) -> EngineResult<Vec<SalesRecord>> {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped_totals = 0usize;

    for (index, row) in rows.iter().enumerate() {
        if row.is_grand_total() {
            dropped_totals += 1;
            continue;
        }

        let units_sold = coerce(row.units_sold.as_ref(), "units_sold", index, period)?;
        let net_sales = coerce(row.net_sales.as_ref(), "net_sales", index, period)?;

        records.push(SalesRecord {
            product_name: row.product_name.clone(),
            category_name: row.category_name.clone(),
            units_sold,
            net_sales,
            period,
        });
    }

    debug!(
        period = %period,
        rows = rows.len(),
        records = records.len(),
        dropped_totals,
        "Normalized extract"
    );

    Ok(records)
}

fn coerce(
    value: Option<&RawValue>,
    field: &str,
    row: usize,
    period: PeriodKey,
) -> EngineResult<Decimal> {
    let malformed = |message: String| EngineError::MalformedRecord {
        period: period.to_string(),
        row,
        field: field.to_string(),
        message,
    };

    let raw = value.ok_or_else(|| malformed("value is missing".to_string()))?;
    let number = raw.to_decimal().ok_or_else(|| {
        let shown = match raw {
            RawValue::Text(text) => text.clone(),
            RawValue::Number(number) => number.to_string(),
        };
        malformed(format!("not a number: '{}'", shown))
    })?;

    if number.is_sign_negative() && !number.is_zero() {
        return Err(malformed(format!("negative value: {}", number)));
    }
    if number > Decimal::from(MAX_CELL_VALUE) {
        return Err(malformed(format!(
            "value {} exceeds the maximum of {}",
            number, MAX_CELL_VALUE
        )));
    }

    Ok(number)
}
