//! Stock-level models.
//!
//! This module contains the [`StockSeverity`] tiers, the [`StockItem`]
//! inventory snapshot line supplied by the inventory store, and the
//! [`LowStockReport`] built from a set of such lines.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stock-health tier derived from current quantity versus minimum level.
///
/// Tiers are ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockSeverity {
    /// Nothing left on hand.
    OutOfStock,
    /// At or below a quarter of the minimum.
    Critical,
    /// At or below half of the minimum.
    Low,
    /// At or below the minimum.
    Warning,
    /// Above the minimum.
    Ok,
}

impl StockSeverity {
    /// Whether the item needs restocking attention.
    pub fn needs_attention(&self) -> bool {
        *self != StockSeverity::Ok
    }
}

impl fmt::Display for StockSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockSeverity::OutOfStock => write!(f, "OUT OF STOCK"),
            StockSeverity::Critical => write!(f, "CRITICAL"),
            StockSeverity::Low => write!(f, "LOW"),
            StockSeverity::Warning => write!(f, "WARNING"),
            StockSeverity::Ok => write!(f, "OK"),
        }
    }
}

/// One inventory line as read from the inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Units currently on hand.
    pub quantity: i64,
    /// Minimum units that should be kept on hand.
    pub min_stock: i64,
    /// Cost of one unit.
    pub unit_cost: Decimal,
    /// Retail price of one unit.
    pub unit_price: Decimal,
}

/// A stock item at or below its minimum level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockLine {
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Units currently on hand.
    pub quantity: i64,
    /// Minimum units that should be kept on hand.
    pub min_stock: i64,
    /// `quantity / min_stock`.
    pub ratio: Decimal,
    /// The item's tier.
    pub severity: StockSeverity,
    /// Units required to get back to the minimum.
    pub units_needed: i64,
    /// `units_needed * unit_cost`.
    pub restock_cost: Decimal,
}

/// Items at or below minimum stock, most urgent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockReport {
    /// Lines ordered by stock ratio, then by name.
    pub lines: Vec<LowStockLine>,
    /// Number of items with nothing on hand.
    pub out_of_stock_count: usize,
    /// Cost of bringing every item strictly below minimum back to minimum.
    pub estimated_restock_cost: Decimal,
    /// SKUs skipped because their minimum level was not positive.
    pub invalid_skus: Vec<String>,
}

impl LowStockReport {
    /// Lines belonging to a single tier, in report order.
    pub fn lines_with(&self, severity: StockSeverity) -> impl Iterator<Item = &LowStockLine> {
        self.lines.iter().filter(move |line| line.severity == severity)
    }
}
