//! Top-N ranking of aggregates.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PeriodAggregate;

/// The figure aggregates are ranked or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    /// Total net sales.
    NetSales,
    /// Total units sold.
    Units,
    /// Net sales per unit; undefined when no units were sold.
    AveragePrice,
}

impl RankMetric {
    /// The metric's value for `aggregate`, `None` when undefined.
    pub fn value(&self, aggregate: &PeriodAggregate) -> Option<Decimal> {
        match self {
            RankMetric::NetSales => Some(aggregate.total_sales),
            RankMetric::Units => Some(aggregate.total_units),
            RankMetric::AveragePrice => aggregate.average_price(),
        }
    }
}

/// A minimum an aggregate must reach on `metric` to be ranked at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    /// The metric the minimum applies to.
    pub metric: RankMetric,
    /// Inclusive lower bound.
    pub minimum: Decimal,
}

impl Threshold {
    /// Whether `aggregate` meets the threshold. An undefined value never does.
    pub fn admits(&self, aggregate: &PeriodAggregate) -> bool {
        self.metric
            .value(aggregate)
            .is_some_and(|value| value >= self.minimum)
    }
}

/// Returns the `n` highest aggregates by `metric`.
///
/// Aggregates failing `min_threshold` are removed before ranking. The sort is
/// stable and descending, so ties keep their input order; entries whose
/// metric is undefined sort after every defined entry.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::{aggregate, top_n, RankMetric, Threshold};
/// use sales_insight::models::{GroupBy, PeriodKey, SalesRecord};
/// use rust_decimal::Decimal;
///
/// let period = PeriodKey::parse("Jan", "2024").unwrap();
/// let record = |name: &str, units: i64, sales: i64| SalesRecord {
///     product_name: name.to_string(),
///     category_name: "Hardware".to_string(),
///     units_sold: Decimal::from(units),
///     net_sales: Decimal::from(sales),
///     period,
/// };
/// let products = aggregate(
///     &[record("Pod Kit", 1, 80), record("Coil", 20, 100), record("Tank", 6, 90)],
///     GroupBy::Product,
/// );
///
/// let premium = top_n(
///     &products,
///     RankMetric::AveragePrice,
///     5,
///     Some(Threshold { metric: RankMetric::Units, minimum: Decimal::from(5) }),
/// );
/// let names: Vec<_> = premium.iter().filter_map(|a| a.dimension()).collect();
/// assert_eq!(names, vec!["Tank", "Coil"]);
/// ```
pub fn top_n(
    aggregates: &[PeriodAggregate],
    metric: RankMetric,
    n: usize,
    min_threshold: Option<Threshold>,
) -> Vec<PeriodAggregate> {
    let mut ranked: Vec<(Option<Decimal>, &PeriodAggregate)> = aggregates
        .iter()
        .filter(|aggregate| min_threshold.is_none_or(|threshold| threshold.admits(aggregate)))
        .map(|aggregate| (metric.value(aggregate), aggregate))
        .collect();

    ranked.sort_by(|(left, _), (right, _)| descending(*left, *right));

    ranked
        .into_iter()
        .take(n)
        .map(|(_, aggregate)| aggregate.clone())
        .collect()
}

pub(crate) fn descending(left: Option<Decimal>, right: Option<Decimal>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(name: &str, units: i64, sales: i64) -> PeriodAggregate {
        PeriodAggregate {
            period: None,
            category: None,
            product: Some(name.to_string()),
            total_units: Decimal::from(units),
            total_sales: Decimal::from(sales),
            record_count: 1,
            distinct_products: 1,
            sales_share_pct: None,
            units_share_pct: None,
        }
    }

    fn names(aggregates: &[PeriodAggregate]) -> Vec<&str> {
        aggregates.iter().filter_map(|a| a.dimension()).collect()
    }

    #[test]
    fn test_top_by_sales() {
        let input = vec![product("a", 1, 10), product("b", 1, 30), product("c", 1, 20)];
        assert_eq!(names(&top_n(&input, RankMetric::NetSales, 2, None)), vec!["b", "c"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![product("first", 1, 50), product("second", 2, 50), product("third", 3, 50)];
        assert_eq!(
            names(&top_n(&input, RankMetric::NetSales, 3, None)),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_n_larger_than_input() {
        let input = vec![product("a", 1, 10)];
        assert_eq!(top_n(&input, RankMetric::Units, 10, None).len(), 1);
        assert!(top_n(&input, RankMetric::Units, 0, None).is_empty());
    }

    #[test]
    fn test_threshold_filters_before_ranking() {
        let input = vec![product("rare", 1, 500), product("common", 10, 200)];
        let threshold = Threshold {
            metric: RankMetric::Units,
            minimum: Decimal::from(5),
        };
        let ranked = top_n(&input, RankMetric::AveragePrice, 5, Some(threshold));
        assert_eq!(names(&ranked), vec!["common"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let input = vec![product("edge", 5, 50)];
        let threshold = Threshold {
            metric: RankMetric::Units,
            minimum: Decimal::from(5),
        };
        assert_eq!(top_n(&input, RankMetric::NetSales, 5, Some(threshold)).len(), 1);
    }

    #[test]
    fn test_undefined_average_price_sorts_last() {
        let input = vec![product("free", 0, 0), product("cheap", 10, 10), product("dear", 1, 40)];
        assert_eq!(
            names(&top_n(&input, RankMetric::AveragePrice, 3, None)),
            vec!["dear", "cheap", "free"]
        );
    }

    #[test]
    fn test_undefined_value_never_meets_threshold() {
        let threshold = Threshold {
            metric: RankMetric::AveragePrice,
            minimum: Decimal::ZERO,
        };
        assert!(!threshold.admits(&product("free", 0, 0)));
    }

    #[test]
    fn test_metric_serializes_snake_case() {
        let json = serde_json::to_string(&RankMetric::AveragePrice).unwrap();
        assert_eq!(json, "\"average_price\"");
    }

    proptest! {
        #[test]
        fn prop_top_n_is_descending_and_bounded(
            sales in proptest::collection::vec(0i64..1_000, 0..20),
            n in 0usize..25,
        ) {
            let input: Vec<PeriodAggregate> = sales
                .iter()
                .enumerate()
                .map(|(i, s)| product(&format!("p{i}"), 1, *s))
                .collect();
            let ranked = top_n(&input, RankMetric::NetSales, n, None);
            prop_assert_eq!(ranked.len(), n.min(input.len()));
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].total_sales >= pair[1].total_sales);
            }
        }
    }
}
