//! Stock severity classification and the low-stock report.
//!
//! An item's tier follows from `quantity / min_stock`. Each tier bound is
//! inclusive for the more urgent tier, so a ratio of exactly 0.25 is
//! Critical and exactly 1.0 is Warning.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::StockThresholds;
use crate::error::{EngineError, EngineResult};
use crate::models::{LowStockLine, LowStockReport, StockItem, StockSeverity};

/// `quantity / min_stock`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidThreshold`] when `min_stock` is not positive.
pub fn stock_ratio(quantity: i64, min_stock: i64) -> EngineResult<Decimal> {
    if min_stock <= 0 {
        return Err(EngineError::InvalidThreshold { min_stock });
    }
    Decimal::from(quantity)
        .checked_div(Decimal::from(min_stock))
        .ok_or(EngineError::InvalidThreshold { min_stock })
}

/// Classifies a stock level with the default tier bounds (0.25, 0.50, 1.0).
///
/// # Errors
///
/// Returns [`EngineError::InvalidThreshold`] when `min_stock` is not positive.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::classify_stock;
/// use sales_insight::models::StockSeverity;
///
/// assert_eq!(classify_stock(0, 10).unwrap(), StockSeverity::OutOfStock);
/// assert_eq!(classify_stock(25, 100).unwrap(), StockSeverity::Critical);
/// assert_eq!(classify_stock(150, 100).unwrap(), StockSeverity::Ok);
/// assert!(classify_stock(5, 0).is_err());
/// ```
pub fn classify_stock(quantity: i64, min_stock: i64) -> EngineResult<StockSeverity> {
    classify_stock_with(quantity, min_stock, &StockThresholds::default())
}

/// Classifies a stock level against configured tier bounds.
///
/// Zero or negative quantities are [`StockSeverity::OutOfStock`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidThreshold`] when `min_stock` is not positive.
pub fn classify_stock_with(
    quantity: i64,
    min_stock: i64,
    thresholds: &StockThresholds,
) -> EngineResult<StockSeverity> {
    let ratio = stock_ratio(quantity, min_stock)?;
    Ok(severity_for(quantity, ratio, thresholds))
}

fn severity_for(quantity: i64, ratio: Decimal, thresholds: &StockThresholds) -> StockSeverity {
    if quantity <= 0 {
        StockSeverity::OutOfStock
    } else if ratio <= thresholds.critical {
        StockSeverity::Critical
    } else if ratio <= thresholds.low {
        StockSeverity::Low
    } else if ratio <= thresholds.warning {
        StockSeverity::Warning
    } else {
        StockSeverity::Ok
    }
}

/// Builds the report of items at or below their minimum level.
///
/// Lines are ordered by stock ratio, lowest first, then by name. Items with
/// a non-positive minimum cannot be classified, and items whose restock cost
/// cannot be represented cannot be costed; both are listed in `invalid_skus`
/// and logged instead of failing the whole report.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::low_stock_report;
/// use sales_insight::config::StockThresholds;
/// use sales_insight::models::{StockItem, StockSeverity};
/// use rust_decimal::Decimal;
///
/// let item = |sku: &str, quantity, min_stock| StockItem {
///     sku: sku.to_string(),
///     name: sku.to_string(),
///     category: "Hardware".to_string(),
///     quantity,
///     min_stock,
///     unit_cost: Decimal::from(4),
///     unit_price: Decimal::from(9),
/// };
/// let report = low_stock_report(
///     &[item("COIL", 0, 10), item("TANK", 30, 10), item("POD", 4, 10)],
///     &StockThresholds::default(),
/// );
///
/// assert_eq!(report.lines.len(), 2);
/// assert_eq!(report.lines[0].severity, StockSeverity::OutOfStock);
/// assert_eq!(report.estimated_restock_cost, Decimal::from(64));
/// ```
pub fn low_stock_report(items: &[StockItem], thresholds: &StockThresholds) -> LowStockReport {
    let mut lines = Vec::new();
    let mut invalid_skus = Vec::new();
    let mut estimated_restock_cost = Decimal::ZERO;

    for item in items {
        let ratio = match stock_ratio(item.quantity, item.min_stock) {
            Ok(ratio) => ratio,
            Err(err) => {
                warn!(sku = %item.sku, error = %err, "Skipping stock item with invalid minimum");
                invalid_skus.push(item.sku.clone());
                continue;
            }
        };

        if item.quantity > item.min_stock {
            continue;
        }

        let costed = item.min_stock.checked_sub(item.quantity).and_then(|units_needed| {
            let restock_cost = Decimal::from(units_needed).checked_mul(item.unit_cost)?;
            let total = estimated_restock_cost.checked_add(restock_cost)?;
            Some((units_needed, restock_cost, total))
        });
        let Some((units_needed, restock_cost, total)) = costed else {
            warn!(sku = %item.sku, "Skipping stock item whose restock cost cannot be represented");
            invalid_skus.push(item.sku.clone());
            continue;
        };
        estimated_restock_cost = total;

        lines.push(LowStockLine {
            sku: item.sku.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            min_stock: item.min_stock,
            ratio,
            severity: severity_for(item.quantity, ratio, thresholds),
            units_needed,
            restock_cost,
        });
    }

    lines.sort_by(|a, b| a.ratio.cmp(&b.ratio).then_with(|| a.name.cmp(&b.name)));

    let out_of_stock_count = lines
        .iter()
        .filter(|line| line.severity == StockSeverity::OutOfStock)
        .count();

    debug!(
        items = items.len(),
        low = lines.len(),
        out_of_stock = out_of_stock_count,
        invalid = invalid_skus.len(),
        "Built low-stock report"
    );

    LowStockReport {
        lines,
        out_of_stock_count,
        estimated_restock_cost,
        invalid_skus,
    }
}
