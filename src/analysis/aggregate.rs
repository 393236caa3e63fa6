//! Grouping and summing of sales records.
//!
//! [`aggregate`] groups a record slice along a [`GroupBy`] dimension set.
//! [`Accumulator`] does the same incrementally, so totals can be built up
//! batch by batch and still match a one-shot aggregation of the same
//! records.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::models::{GroupBy, PeriodAggregate, PeriodKey, SalesRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    period: Option<PeriodKey>,
    category: Option<String>,
    product: Option<String>,
}

impl GroupKey {
    fn of(record: &SalesRecord, group_by: GroupBy) -> Self {
        Self {
            period: group_by.includes_period().then_some(record.period),
            category: group_by
                .includes_category()
                .then(|| record.category_name.clone()),
            product: group_by
                .includes_product()
                .then(|| record.product_name.clone()),
        }
    }
}

#[derive(Debug, Clone)]
struct GroupTotals {
    key: GroupKey,
    units: Decimal,
    sales: Decimal,
    records: usize,
    products: HashSet<String>,
}

/// Running totals for one grouping.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::{aggregate, Accumulator};
/// use sales_insight::models::{GroupBy, PeriodKey, SalesRecord};
/// use rust_decimal::Decimal;
///
/// let period = PeriodKey::parse("Jan", "2024").unwrap();
/// let record = |name: &str, sales: i64| SalesRecord {
///     product_name: name.to_string(),
///     category_name: "E-Liquid".to_string(),
///     units_sold: Decimal::ONE,
///     net_sales: Decimal::from(sales),
///     period,
/// };
/// let records = vec![record("a", 10), record("b", 20), record("c", 30)];
///
/// let mut accumulator = Accumulator::new(GroupBy::Category);
/// accumulator.extend(&records[..2]);
/// accumulator.extend(&records[2..]);
///
/// assert_eq!(accumulator.finish(), aggregate(&records, GroupBy::Category));
/// ```
#[derive(Debug, Clone)]
pub struct Accumulator {
    group_by: GroupBy,
    index: HashMap<GroupKey, usize>,
    groups: Vec<GroupTotals>,
}

impl Accumulator {
    /// Creates an empty accumulator for `group_by`.
    pub fn new(group_by: GroupBy) -> Self {
        Self {
            group_by,
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// The grouping this accumulator sums along.
    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    /// Adds one record to its group.
    pub fn add(&mut self, record: &SalesRecord) {
        let key = GroupKey::of(record, self.group_by);
        let slot = match self.index.get(&key) {
            Some(slot) => *slot,
            None => {
                self.groups.push(GroupTotals {
                    key: key.clone(),
                    units: Decimal::ZERO,
                    sales: Decimal::ZERO,
                    records: 0,
                    products: HashSet::new(),
                });
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[slot];
        group.units += record.units_sold;
        group.sales += record.net_sales;
        group.records += 1;
        if !group.products.contains(&record.product_name) {
            group.products.insert(record.product_name.clone());
        }
    }

    /// Adds every record of `records`.
    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a SalesRecord>) {
        for record in records {
            self.add(record);
        }
    }

    /// Produces the aggregates for everything added so far.
    ///
    /// Shares are computed against the totals of all records added. Groupings
    /// with a period are returned chronologically; within a period, and for
    /// groupings without a period, groups keep first-appearance order.
    pub fn finish(&self) -> Vec<PeriodAggregate> {
        let grand_units: Decimal = self.groups.iter().map(|g| g.units).sum();
        let grand_sales: Decimal = self.groups.iter().map(|g| g.sales).sum();

        let mut aggregates: Vec<PeriodAggregate> = self
            .groups
            .iter()
            .map(|group| PeriodAggregate {
                period: group.key.period,
                category: group.key.category.clone(),
                product: group.key.product.clone(),
                total_units: group.units,
                total_sales: group.sales,
                record_count: group.records,
                distinct_products: group.products.len(),
                sales_share_pct: share_pct(group.sales, grand_sales),
                units_share_pct: share_pct(group.units, grand_units),
            })
            .collect();

        if self.group_by.includes_period() {
            aggregates.sort_by_key(|aggregate| aggregate.period);
        }
        aggregates
    }
}

/// `part / whole * 100`, or `None` when `whole` is zero.
pub(crate) fn share_pct(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Groups `records` along `group_by` and sums units and sales per group.
///
/// Average price is available per aggregate through
/// [`PeriodAggregate::average_price`]; it is `None`, never zero, when a
/// group sold no units. Shares are relative to the records passed in, so
/// they add up to 100% within whatever subset was aggregated.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::aggregate;
/// use sales_insight::models::{GroupBy, PeriodKey, SalesRecord};
/// use rust_decimal::Decimal;
///
/// let jan = PeriodKey::parse("Jan", "2024").unwrap();
/// let dec = PeriodKey::parse("Dec", "2023").unwrap();
/// let record = |period, sales: i64| SalesRecord {
///     product_name: "Mint Ice".to_string(),
///     category_name: "E-Liquid".to_string(),
///     units_sold: Decimal::ONE,
///     net_sales: Decimal::from(sales),
///     period,
/// };
///
/// let monthly = aggregate(&[record(jan, 30), record(dec, 10)], GroupBy::Period);
/// assert_eq!(monthly[0].period, Some(dec));
/// assert_eq!(monthly[1].total_sales, Decimal::from(30));
/// assert_eq!(monthly[1].sales_share_pct, Some(Decimal::from(75)));
/// ```
pub fn aggregate(records: &[SalesRecord], group_by: GroupBy) -> Vec<PeriodAggregate> {
    let mut accumulator = Accumulator::new(group_by);
    accumulator.extend(records);
    accumulator.finish()
}
