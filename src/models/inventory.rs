//! Inventory valuation and margin models.
//!
//! Both reports are computed from the same [`StockItem`](super::StockItem)
//! snapshot as the low-stock report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stock on hand for one SKU, valued at cost and at retail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemValuation {
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Units currently on hand.
    pub quantity: i64,
    /// `quantity * unit_cost`.
    pub cost_value: Decimal,
    /// `quantity * unit_price`.
    pub retail_value: Decimal,
}

/// Valuation totals of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValuation {
    /// Category name.
    pub category: String,
    /// Units on hand across the category.
    pub units: i64,
    /// Stock value at cost.
    pub cost_value: Decimal,
    /// Stock value at retail.
    pub retail_value: Decimal,
    /// Share of the total cost value; `None` when that total is zero.
    pub cost_share_pct: Option<Decimal>,
}

/// What the stock on hand is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryValuation {
    /// Units on hand across all valued lines.
    pub total_units: i64,
    /// Stock value at cost.
    pub total_cost_value: Decimal,
    /// Stock value at retail.
    pub total_retail_value: Decimal,
    /// `total_retail_value - total_cost_value`.
    pub potential_profit: Decimal,
    /// `(retail / cost - 1) * 100`; `None` unless the cost value is positive.
    pub average_markup_pct: Option<Decimal>,
    /// Categories by cost value, highest first.
    pub categories: Vec<CategoryValuation>,
    /// Every valued line by cost value, highest first.
    pub lines: Vec<ItemValuation>,
    /// SKUs skipped because their value could not be represented.
    pub invalid_skus: Vec<String>,
}

impl InventoryValuation {
    /// The `n` lines holding the most value at cost.
    pub fn most_valuable(&self, n: usize) -> &[ItemValuation] {
        &self.lines[..n.min(self.lines.len())]
    }
}

/// Unit margin of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMargin {
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Cost of one unit.
    pub unit_cost: Decimal,
    /// Retail price of one unit.
    pub unit_price: Decimal,
    /// `unit_price - unit_cost`.
    pub margin: Decimal,
    /// `margin / unit_price * 100`; `None` when the price is zero.
    pub margin_pct: Option<Decimal>,
}

/// Margin spread within one category.
///
/// The percentages cover products with a defined margin; all three are
/// `None` when the category has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMargin {
    /// Category name.
    pub category: String,
    /// Products in the category, priced or not.
    pub product_count: usize,
    /// Mean margin percentage.
    pub average_margin_pct: Option<Decimal>,
    /// Lowest margin percentage.
    pub lowest_margin_pct: Option<Decimal>,
    /// Highest margin percentage.
    pub highest_margin_pct: Option<Decimal>,
}

/// Margin statistics over an inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginAnalysis {
    /// Products analyzed.
    pub product_count: usize,
    /// Mean margin percentage over products with a defined margin.
    pub average_margin_pct: Option<Decimal>,
    /// Highest margin percentage.
    pub highest_margin_pct: Option<Decimal>,
    /// Lowest margin percentage.
    pub lowest_margin_pct: Option<Decimal>,
    /// Categories by average margin, highest first; undefined averages last.
    pub categories: Vec<CategoryMargin>,
    /// Highest-margin products, best first.
    pub top_products: Vec<ProductMargin>,
    /// SKUs with a zero price, whose margin percentage is undefined.
    pub unpriced_skus: Vec<String>,
    /// SKUs skipped because their margin could not be represented.
    pub invalid_skus: Vec<String>,
}
