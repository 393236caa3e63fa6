//! Inventory valuation and product margin analysis.
//!
//! Both reports read the same snapshot as the low-stock report. Monetary
//! figures are computed with checked arithmetic: a line whose value cannot be
//! represented is logged, listed under `invalid_skus` and left out of every
//! total.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    CategoryMargin, CategoryValuation, InventoryValuation, ItemValuation, MarginAnalysis,
    ProductMargin, StockItem,
};

use super::aggregate::share_pct;
use super::ranking::descending;

#[derive(Debug, Clone, Default)]
struct Value {
    units: i64,
    cost: Decimal,
    retail: Decimal,
    profit: Decimal,
}

impl Value {
    fn of(item: &StockItem) -> Option<Self> {
        let quantity = Decimal::from(item.quantity);
        let cost = quantity.checked_mul(item.unit_cost)?;
        let retail = quantity.checked_mul(item.unit_price)?;
        Some(Self {
            units: item.quantity,
            cost,
            retail,
            profit: retail.checked_sub(cost)?,
        })
    }

    fn plus(&self, other: &Self) -> Option<Self> {
        Some(Self {
            units: self.units.checked_add(other.units)?,
            cost: self.cost.checked_add(other.cost)?,
            retail: self.retail.checked_add(other.retail)?,
            profit: self.profit.checked_add(other.profit)?,
        })
    }
}

/// Values the stock on hand at cost and at retail.
///
/// Categories keep first-appearance order among equal cost values; lines and
/// categories are both sorted by cost value, highest first. Negative
/// quantities are valued as they are, so they reduce the totals.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::inventory_valuation;
/// use sales_insight::models::StockItem;
/// use rust_decimal::Decimal;
///
/// let item = |sku: &str, category: &str, quantity, cost: i64, price: i64| StockItem {
///     sku: sku.to_string(),
///     name: sku.to_string(),
///     category: category.to_string(),
///     quantity,
///     min_stock: 5,
///     unit_cost: Decimal::from(cost),
///     unit_price: Decimal::from(price),
/// };
/// let valuation = inventory_valuation(&[
///     item("COIL", "Hardware", 10, 2, 5),
///     item("MINT", "E-Liquid", 4, 6, 15),
/// ]);
///
/// assert_eq!(valuation.total_cost_value, Decimal::from(44));
/// assert_eq!(valuation.total_retail_value, Decimal::from(110));
/// assert_eq!(valuation.potential_profit, Decimal::from(66));
/// assert_eq!(valuation.categories[0].category, "E-Liquid");
/// ```
pub fn inventory_valuation(items: &[StockItem]) -> InventoryValuation {
    let mut total = Value::default();
    let mut categories: Vec<(String, Value)> = Vec::new();
    let mut lines = Vec::with_capacity(items.len());
    let mut invalid_skus = Vec::new();

    for item in items {
        let slot = categories.iter().position(|(name, _)| *name == item.category);
        let current = slot.map(|slot| categories[slot].1.clone()).unwrap_or_default();

        let summed = Value::of(item).and_then(|line| {
            let grand = total.plus(&line)?;
            let category = current.plus(&line)?;
            Some((line, grand, category))
        });
        let Some((line, new_total, new_category)) = summed else {
            warn!(sku = %item.sku, "Skipping inventory line whose value cannot be represented");
            invalid_skus.push(item.sku.clone());
            continue;
        };

        total = new_total;
        match slot {
            Some(slot) => categories[slot].1 = new_category,
            None => categories.push((item.category.clone(), new_category)),
        }
        lines.push(ItemValuation {
            sku: item.sku.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            cost_value: line.cost,
            retail_value: line.retail,
        });
    }

    lines.sort_by(|a, b| b.cost_value.cmp(&a.cost_value));

    let mut categories: Vec<CategoryValuation> = categories
        .into_iter()
        .map(|(category, value)| CategoryValuation {
            category,
            units: value.units,
            cost_value: value.cost,
            retail_value: value.retail,
            cost_share_pct: share_pct(value.cost, total.cost),
        })
        .collect();
    categories.sort_by(|a, b| b.cost_value.cmp(&a.cost_value));

    debug!(
        items = items.len(),
        valued = lines.len(),
        categories = categories.len(),
        invalid = invalid_skus.len(),
        "Built inventory valuation"
    );

    InventoryValuation {
        total_units: total.units,
        total_cost_value: total.cost,
        total_retail_value: total.retail,
        potential_profit: total.profit,
        average_markup_pct: markup_pct(total.cost, total.retail),
        categories,
        lines,
        invalid_skus,
    }
}

fn markup_pct(cost: Decimal, retail: Decimal) -> Option<Decimal> {
    if cost <= Decimal::ZERO {
        return None;
    }
    retail
        .checked_div(cost)?
        .checked_sub(Decimal::ONE)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Unit margin of one item.
///
/// `margin_pct` is `None` when the price is zero. Returns `None` when the
/// margin itself cannot be represented.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::product_margin;
/// use sales_insight::models::StockItem;
/// use rust_decimal::Decimal;
///
/// let mut item = StockItem {
///     sku: "MINT".to_string(),
///     name: "Mint Ice".to_string(),
///     category: "E-Liquid".to_string(),
///     quantity: 4,
///     min_stock: 5,
///     unit_cost: Decimal::from(6),
///     unit_price: Decimal::from(15),
/// };
/// let margin = product_margin(&item).unwrap();
/// assert_eq!(margin.margin, Decimal::from(9));
/// assert_eq!(margin.margin_pct, Some(Decimal::from(60)));
///
/// item.unit_price = Decimal::ZERO;
/// assert_eq!(product_margin(&item).unwrap().margin_pct, None);
/// ```
pub fn product_margin(item: &StockItem) -> Option<ProductMargin> {
    let margin = item.unit_price.checked_sub(item.unit_cost)?;
    let margin_pct = if item.unit_price.is_zero() {
        None
    } else {
        margin
            .checked_div(item.unit_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    };

    Some(ProductMargin {
        sku: item.sku.clone(),
        name: item.name.clone(),
        category: item.category.clone(),
        unit_cost: item.unit_cost,
        unit_price: item.unit_price,
        margin,
        margin_pct,
    })
}

/// Margin statistics over a snapshot, with the `top` highest-margin products.
///
/// Averages, highs and lows cover products with a defined margin percentage.
/// Zero-priced products are counted and listed under `unpriced_skus`, and
/// rank after every priced product. Ties keep input order.
pub fn margin_analysis(items: &[StockItem], top: usize) -> MarginAnalysis {
    let mut products = Vec::with_capacity(items.len());
    let mut invalid_skus = Vec::new();
    for item in items {
        match product_margin(item) {
            Some(margin) => products.push(margin),
            None => {
                warn!(sku = %item.sku, "Skipping product whose margin cannot be represented");
                invalid_skus.push(item.sku.clone());
            }
        }
    }

    let unpriced_skus: Vec<String> = products
        .iter()
        .filter(|product| product.unit_price.is_zero())
        .map(|product| product.sku.clone())
        .collect();

    let mut by_category: Vec<(String, usize, Vec<Decimal>)> = Vec::new();
    for product in &products {
        let slot = match by_category.iter().position(|(name, _, _)| *name == product.category) {
            Some(slot) => slot,
            None => {
                by_category.push((product.category.clone(), 0, Vec::new()));
                by_category.len() - 1
            }
        };
        let (_, count, margins) = &mut by_category[slot];
        *count += 1;
        margins.extend(product.margin_pct);
    }

    let mut categories: Vec<CategoryMargin> = by_category
        .into_iter()
        .map(|(category, product_count, margins)| CategoryMargin {
            category,
            product_count,
            average_margin_pct: mean(&margins),
            lowest_margin_pct: margins.iter().min().copied(),
            highest_margin_pct: margins.iter().max().copied(),
        })
        .collect();
    categories.sort_by(|a, b| descending(a.average_margin_pct, b.average_margin_pct));

    let defined: Vec<Decimal> = products.iter().filter_map(|p| p.margin_pct).collect();
    let product_count = products.len();

    let mut top_products = products;
    top_products.sort_by(|a, b| descending(a.margin_pct, b.margin_pct));
    top_products.truncate(top);

    debug!(
        items = items.len(),
        priced = defined.len(),
        unpriced = unpriced_skus.len(),
        invalid = invalid_skus.len(),
        "Built margin analysis"
    );

    MarginAnalysis {
        product_count,
        average_margin_pct: mean(&defined),
        highest_margin_pct: defined.iter().max().copied(),
        lowest_margin_pct: defined.iter().min().copied(),
        categories,
        top_products,
        unpriced_skus,
        invalid_skus,
    }
}

/// Arithmetic mean, `None` for no values or an unrepresentable sum.
fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))?
        .checked_div(Decimal::from(values.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(sku: &str, category: &str, quantity: i64, unit_cost: &str, unit_price: &str) -> StockItem {
        StockItem {
            sku: sku.to_string(),
            name: format!("Item {sku}"),
            category: category.to_string(),
            quantity,
            min_stock: 10,
            unit_cost: dec(unit_cost),
            unit_price: dec(unit_price),
        }
    }

    fn snapshot() -> Vec<StockItem> {
        vec![
            item("COIL", "Hardware", 40, "1.50", "4.00"),
            item("MINT", "E-Liquid", 12, "6.00", "15.00"),
            item("POD", "Hardware", 3, "20.00", "35.00"),
            item("BERRY", "E-Liquid", 0, "6.00", "15.00"),
        ]
    }

    #[test]
    fn test_valuation_totals() {
        let valuation = inventory_valuation(&snapshot());
        assert_eq!(valuation.total_units, 55);
        // 60 + 72 + 60 + 0
        assert_eq!(valuation.total_cost_value, dec("192.00"));
        // 160 + 180 + 105 + 0
        assert_eq!(valuation.total_retail_value, dec("445.00"));
        assert_eq!(valuation.potential_profit, dec("253.00"));
        assert_eq!(valuation.average_markup_pct.unwrap().round_dp(2), dec("131.77"));
        assert!(valuation.invalid_skus.is_empty());
    }

    #[test]
    fn test_valuation_by_category() {
        let valuation = inventory_valuation(&snapshot());
        let hardware = &valuation.categories[0];
        assert_eq!(hardware.category, "Hardware");
        assert_eq!(hardware.units, 43);
        assert_eq!(hardware.cost_value, dec("120.00"));
        assert_eq!(hardware.retail_value, dec("265.00"));
        assert_eq!(hardware.cost_share_pct.unwrap().round_dp(2), dec("62.50"));
        assert_eq!(valuation.categories[1].category, "E-Liquid");
    }

    #[test]
    fn test_valuation_lines_by_cost_with_stable_ties() {
        let valuation = inventory_valuation(&snapshot());
        let skus: Vec<_> = valuation.lines.iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(skus, vec!["MINT", "COIL", "POD", "BERRY"]);
        assert_eq!(valuation.most_valuable(2).len(), 2);
        assert_eq!(valuation.most_valuable(10).len(), 4);
    }

    #[test]
    fn test_valuation_of_empty_snapshot() {
        let valuation = inventory_valuation(&[]);
        assert_eq!(valuation.total_cost_value, Decimal::ZERO);
        assert_eq!(valuation.average_markup_pct, None);
        assert!(valuation.categories.is_empty());
    }

    #[test]
    fn test_zero_cost_gives_undefined_markup_and_share() {
        let valuation = inventory_valuation(&[item("FREE", "Promo", 5, "0", "2.00")]);
        assert_eq!(valuation.total_retail_value, dec("10.00"));
        assert_eq!(valuation.average_markup_pct, None);
        assert_eq!(valuation.categories[0].cost_share_pct, None);
    }

    #[test]
    fn test_unrepresentable_line_is_skipped() {
        let mut items = snapshot();
        items.push(item("HUGE", "Hardware", i64::MAX, "79228162514264337593543950335", "1"));
        let valuation = inventory_valuation(&items);
        assert_eq!(valuation.invalid_skus, vec!["HUGE".to_string()]);
        assert_eq!(valuation.total_cost_value, dec("192.00"));
        assert_eq!(valuation.lines.len(), 4);
    }

    #[test]
    fn test_overflowing_total_skips_the_later_line() {
        let items = vec![
            item("A", "Hardware", 1, "79228162514264337593543950335", "79228162514264337593543950335"),
            item("B", "E-Liquid", 1, "79228162514264337593543950335", "79228162514264337593543950335"),
        ];
        let valuation = inventory_valuation(&items);
        assert_eq!(valuation.invalid_skus, vec!["B".to_string()]);
        assert_eq!(valuation.categories.len(), 1);
    }

    #[test]
    fn test_product_margin() {
        let margin = product_margin(&item("COIL", "Hardware", 1, "1.50", "4.00")).unwrap();
        assert_eq!(margin.margin, dec("2.50"));
        assert_eq!(margin.margin_pct, Some(dec("62.5")));
    }

    #[test]
    fn test_selling_below_cost_is_negative_margin() {
        let margin = product_margin(&item("CLEAR", "Hardware", 1, "10.00", "8.00")).unwrap();
        assert_eq!(margin.margin, dec("-2.00"));
        assert_eq!(margin.margin_pct, Some(dec("-25")));
    }

    #[test]
    fn test_zero_price_margin_is_undefined() {
        let margin = product_margin(&item("FREE", "Promo", 1, "1.00", "0")).unwrap();
        assert_eq!(margin.margin, dec("-1.00"));
        assert_eq!(margin.margin_pct, None);
    }

    #[test]
    fn test_margin_statistics() {
        let analysis = margin_analysis(&snapshot(), 10);
        assert_eq!(analysis.product_count, 4);
        // Margins: COIL 62.5, MINT 60, POD 42.857.., BERRY 60
        assert_eq!(analysis.highest_margin_pct, Some(dec("62.5")));
        assert_eq!(analysis.lowest_margin_pct.unwrap().round_dp(2), dec("42.86"));
        assert_eq!(analysis.average_margin_pct.unwrap().round_dp(2), dec("56.34"));
        assert!(analysis.unpriced_skus.is_empty());
    }

    #[test]
    fn test_margin_by_category() {
        let analysis = margin_analysis(&snapshot(), 10);
        let names: Vec<_> = analysis.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["E-Liquid", "Hardware"]);

        let hardware = &analysis.categories[1];
        assert_eq!(hardware.product_count, 2);
        assert_eq!(hardware.highest_margin_pct, Some(dec("62.5")));
        assert_eq!(hardware.lowest_margin_pct.unwrap().round_dp(2), dec("42.86"));
        assert_eq!(hardware.average_margin_pct.unwrap().round_dp(2), dec("52.68"));
    }

    #[test]
    fn test_top_products_by_margin() {
        let mut items = snapshot();
        items.push(item("FREE", "Promo", 1, "1.00", "0"));
        let analysis = margin_analysis(&items, 3);

        let skus: Vec<_> = analysis.top_products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["COIL", "MINT", "BERRY"]);

        let everything = margin_analysis(&items, 10);
        assert_eq!(everything.top_products.last().unwrap().sku, "FREE");
    }

    #[test]
    fn test_unpriced_products_are_counted_not_averaged() {
        let items = vec![
            item("COIL", "Hardware", 1, "1.50", "4.00"),
            item("FREE", "Promo", 1, "1.00", "0"),
        ];
        let analysis = margin_analysis(&items, 10);
        assert_eq!(analysis.product_count, 2);
        assert_eq!(analysis.unpriced_skus, vec!["FREE".to_string()]);
        assert_eq!(analysis.average_margin_pct, Some(dec("62.5")));

        let promo = analysis.categories.iter().find(|c| c.category == "Promo").unwrap();
        assert_eq!(promo.product_count, 1);
        assert_eq!(promo.average_margin_pct, None);
        assert_eq!(analysis.categories.last().unwrap().category, "Promo");
    }

    #[test]
    fn test_margin_of_empty_snapshot() {
        let analysis = margin_analysis(&[], 10);
        assert_eq!(analysis.product_count, 0);
        assert_eq!(analysis.average_margin_pct, None);
        assert_eq!(analysis.highest_margin_pct, None);
        assert!(analysis.top_products.is_empty());
    }

    #[test]
    fn test_unrepresentable_margin_is_skipped() {
        let items = vec![
            item("COIL", "Hardware", 1, "1.50", "4.00"),
            item("ODD", "Hardware", 1, "-79228162514264337593543950335", "79228162514264337593543950335"),
        ];
        let analysis = margin_analysis(&items, 10);
        assert_eq!(analysis.invalid_skus, vec!["ODD".to_string()]);
        assert_eq!(analysis.product_count, 1);
    }
}
