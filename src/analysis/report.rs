//! End-to-end analysis of a set of monthly extracts.

use std::time::Instant;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::error::EngineResult;
use crate::models::{AnalysisReport, GroupBy, ReportBatch};

use super::aggregate::aggregate;
use super::growth::{compute_growth, compute_growth_by_dimension};
use super::ingest::{Ingestion, ingest, ingest_strict};
use super::ranking::{RankMetric, Threshold, top_n};
use super::summary::{date_range_label, summarize, timeline_by_year};

/// Runs ingestion and every analysis over `batches`.
///
/// Extracts that cannot be used are listed in `report.ingestion.excluded`;
/// the remaining ones are analyzed. An input with no usable extract yields
/// an empty report with an `"All Time"` date range.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::build_report;
/// use sales_insight::config::AnalyticsConfig;
/// use sales_insight::models::{RawSalesRow, ReportBatch};
/// use rust_decimal::Decimal;
///
/// let batch = |month: &str, sales: &str| ReportBatch {
///     label: format!("{month}.csv"),
///     month: month.to_string(),
///     year: "2024".to_string(),
///     rows: vec![
///         RawSalesRow::new("Mint Ice", "E-Liquid", 10, sales),
///         RawSalesRow::new("", "TOTAL", 10, sales),
///     ],
/// };
///
/// let report = build_report(&[batch("Jan", "100"), batch("Feb", "150")], &AnalyticsConfig::default());
/// assert_eq!(report.date_range, "2024-01 to 2024-02");
/// assert_eq!(report.summary.total_sales, Decimal::from(250));
/// assert_eq!(report.monthly_growth[0].sales_growth_pct, Some(Decimal::from(50)));
/// ```
pub fn build_report(batches: &[ReportBatch], config: &AnalyticsConfig) -> AnalysisReport {
    let start = Instant::now();
    analyze(ingest(batches, config.duplicate_periods), config, start)
}

/// Like [`build_report`], but fails on the first unusable extract.
///
/// Each extract is parsed and normalized once; the report is built from the
/// records strict ingestion produced.
///
/// # Errors
///
/// Returns the first error of [`ingest_strict`](super::ingest_strict) with the
/// configured duplicate policy.
pub fn build_report_strict(
    batches: &[ReportBatch],
    config: &AnalyticsConfig,
) -> EngineResult<AnalysisReport> {
    let start = Instant::now();
    let ingestion = ingest_strict(batches, config.duplicate_periods)?;
    Ok(analyze(ingestion, config, start))
}

fn analyze(ingestion: Ingestion, config: &AnalyticsConfig, start: Instant) -> AnalysisReport {
    let analysis_id = Uuid::new_v4();
    let records = &ingestion.records;
    let periods = &ingestion.report.included;

    let monthly = aggregate(records, GroupBy::Period);
    let monthly_growth = compute_growth(&monthly);

    let category_totals = aggregate(records, GroupBy::Category);
    let categories = top_n(&category_totals, RankMetric::NetSales, category_totals.len(), None);
    let category_growth = compute_growth_by_dimension(&aggregate(records, GroupBy::PeriodAndCategory));

    let ranking = &config.ranking;
    let products = aggregate(records, GroupBy::Product);
    let top_by_sales = top_n(&products, RankMetric::NetSales, ranking.top_n, None);
    let top_by_units = top_n(&products, RankMetric::Units, ranking.top_n, None);
    let top_by_average_price = top_n(
        &products,
        RankMetric::AveragePrice,
        ranking.top_n,
        Some(Threshold {
            metric: RankMetric::Units,
            minimum: ranking.min_units_for_price_rank,
        }),
    );

    let report = AnalysisReport {
        analysis_id,
        generated_at: Utc::now(),
        engine_version: config.engine.version.clone(),
        date_range: date_range_label(periods),
        summary: summarize(records),
        timeline: timeline_by_year(periods),
        monthly,
        monthly_growth,
        categories,
        category_growth,
        top_by_sales,
        top_by_units,
        top_by_average_price,
        ingestion: ingestion.report,
    };

    info!(
        analysis_id = %analysis_id,
        periods = report.ingestion.included.len(),
        excluded = report.ingestion.excluded.len(),
        records = report.summary.record_count,
        duration_us = start.elapsed().as_micros() as u64,
        "Analysis complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DuplicatePeriodPolicy, RankingConfig};
    use crate::models::{PeriodKey, RawSalesRow};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn batch(month: &str, year: &str, rows: Vec<RawSalesRow>) -> ReportBatch {
        ReportBatch {
            label: format!("sales_{month}_{year}.csv"),
            month: month.to_string(),
            year: year.to_string(),
            rows,
        }
    }

    fn sample_batches() -> Vec<ReportBatch> {
        vec![
            batch(
                "Dec",
                "2023",
                vec![
                    RawSalesRow::new("Mint Ice", "E-Liquid", 10, "100.00"),
                    RawSalesRow::new("Pod Kit", "Hardware", 1, "60.00"),
                    RawSalesRow::new("", "TOTAL", 11, "160.00"),
                ],
            ),
            batch(
                "Jan",
                "2024",
                vec![
                    RawSalesRow::new("Mint Ice", "E-Liquid", 12, "120.00"),
                    RawSalesRow::new("Coil 0.8", "Hardware", 8, "80.00"),
                    RawSalesRow::new("", "TOTAL", 20, "200.00"),
                ],
            ),
        ]
    }

    #[test]
    fn test_report_sections() {
        let report = build_report(&sample_batches(), &AnalyticsConfig::default());

        assert_eq!(report.date_range, "2023-12 to 2024-01");
        assert_eq!(report.summary.total_sales, dec("360.00"));
        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.monthly_growth[0].sales_growth_pct, Some(dec("25")));
        assert_eq!(report.timeline[0].year, 2024);
        assert!(report.ingestion.is_clean());
        assert_eq!(report.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_categories_ordered_by_sales() {
        let report = build_report(&sample_batches(), &AnalyticsConfig::default());
        let names: Vec<_> = report.categories.iter().filter_map(|a| a.dimension()).collect();
        assert_eq!(names, vec!["E-Liquid", "Hardware"]);

        let hardware: Vec<_> = report
            .category_growth
            .iter()
            .filter(|g| g.dimension.as_deref() == Some("Hardware"))
            .collect();
        assert_eq!(hardware.len(), 1);
        assert_eq!(hardware[0].sales_growth_pct.unwrap().round_dp(2), dec("33.33"));
    }

    #[test]
    fn test_rankings_respect_config() {
        let config = AnalyticsConfig {
            ranking: RankingConfig {
                top_n: 1,
                min_units_for_price_rank: dec("5"),
            },
            ..AnalyticsConfig::default()
        };
        let report = build_report(&sample_batches(), &config);

        assert_eq!(report.top_by_sales.len(), 1);
        assert_eq!(report.top_by_sales[0].dimension(), Some("Mint Ice"));
        assert_eq!(report.top_by_units[0].dimension(), Some("Mint Ice"));
        // Pod Kit has the highest price but sold a single unit.
        assert_eq!(report.top_by_average_price[0].dimension(), Some("Mint Ice"));
    }

    #[test]
    fn test_bad_extract_is_excluded_not_fatal() {
        let mut batches = sample_batches();
        batches.push(batch("Febuary", "2024", vec![]));
        let report = build_report(&batches, &AnalyticsConfig::default());
        assert_eq!(report.ingestion.excluded.len(), 1);
        assert_eq!(report.summary.period_count, 2);
    }

    #[test]
    fn test_duplicate_policy_from_config() {
        let mut batches = sample_batches();
        batches.push(batches[1].clone());

        let keep_all = build_report(&batches, &AnalyticsConfig::default());
        assert_eq!(keep_all.summary.total_sales, dec("560.00"));
        assert_eq!(keep_all.ingestion.duplicates, vec![PeriodKey::parse("Jan", "2024").unwrap()]);

        let config = AnalyticsConfig {
            duplicate_periods: DuplicatePeriodPolicy::KeepFirst,
            ..AnalyticsConfig::default()
        };
        let keep_first = build_report(&batches, &config);
        assert_eq!(keep_first.summary.total_sales, dec("360.00"));
    }

    #[test]
    fn test_oversized_values_exclude_the_extract() {
        let mut batches = sample_batches();
        batches.push(batch(
            "Feb",
            "2024",
            vec![
                RawSalesRow::new("Mint Ice", "E-Liquid", 1, "70000000000000000000000000000"),
                RawSalesRow::new("Coil 0.8", "Hardware", 1, "70000000000000000000000000000"),
            ],
        ));

        let report = build_report(&batches, &AnalyticsConfig::default());
        assert_eq!(report.ingestion.excluded.len(), 1);
        assert!(report.ingestion.excluded[0].reason.contains("exceeds the maximum"));
        assert_eq!(report.summary.total_sales, dec("360.00"));

        let err = build_report_strict(&batches, &AnalyticsConfig::default()).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_strict_report_matches_lenient_on_clean_input() {
        let config = AnalyticsConfig::default();
        let strict = build_report_strict(&sample_batches(), &config).unwrap();
        let lenient = build_report(&sample_batches(), &config);
        assert_eq!(strict.summary, lenient.summary);
        assert_eq!(strict.monthly, lenient.monthly);
        assert_eq!(strict.ingestion, lenient.ingestion);
    }

    #[test]
    fn test_strict_report_rejects_duplicate_under_reject_policy() {
        let mut batches = sample_batches();
        batches.push(batches[0].clone());
        let config = AnalyticsConfig {
            duplicate_periods: DuplicatePeriodPolicy::Reject,
            ..AnalyticsConfig::default()
        };
        assert!(build_report_strict(&batches, &config).is_err());
        assert_eq!(build_report(&batches, &config).ingestion.excluded.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let report = build_report(&[], &AnalyticsConfig::default());
        assert_eq!(report.date_range, "All Time");
        assert!(report.monthly.is_empty());
        assert!(report.monthly_growth.is_empty());
        assert_eq!(report.summary.average_price, None);
    }
}
