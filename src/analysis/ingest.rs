//! Batch ingestion with a per-period outcome.
//!
//! A bad extract (unknown month, non-numeric cell) costs only that extract:
//! it is listed in the [`IngestionReport`] with its reason and a warning is
//! logged, and the remaining extracts are merged as usual.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::DuplicatePeriodPolicy;
use crate::error::EngineResult;
use crate::models::{
    ExcludedPeriod, IngestionReport, PeriodKey, ReportBatch, SalesRecord,
};

use super::merge::{
    PeriodRecords, distinct_periods, merge, merge_with_policy, missing_periods, survivors,
};
use super::normalize::normalize;

/// The merged records of every usable extract and the report of what was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingestion {
    /// Records of all included extracts, in input order.
    pub records: Vec<SalesRecord>,
    /// Which extracts were included or excluded, and why.
    pub report: IngestionReport,
}

/// Parses, normalizes and merges a set of monthly extracts.
///
/// Never fails as a whole. Each extract is either included or listed in
/// `report.excluded`; with [`DuplicatePeriodPolicy::Reject`] a repeated
/// period excludes the later extract rather than aborting.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::ingest;
/// use sales_insight::config::DuplicatePeriodPolicy;
/// use sales_insight::models::{RawSalesRow, ReportBatch};
///
/// let batches = vec![
///     ReportBatch {
///         label: "jan.csv".to_string(),
///         month: "Jan".to_string(),
///         year: "2024".to_string(),
///         rows: vec![RawSalesRow::new("Mint Ice", "E-Liquid", 3, "45.00")],
///     },
///     ReportBatch {
///         label: "bad.csv".to_string(),
///         month: "Janvier".to_string(),
///         year: "2024".to_string(),
///         rows: vec![],
///     },
/// ];
///
/// let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
/// assert_eq!(ingestion.records.len(), 1);
/// assert_eq!(ingestion.report.excluded.len(), 1);
/// ```
pub fn ingest(batches: &[ReportBatch], policy: DuplicatePeriodPolicy) -> Ingestion {
    let mut excluded = Vec::new();
    let mut parsed: Vec<(String, PeriodRecords)> = Vec::with_capacity(batches.len());

    for batch in batches {
        let label = batch_label(batch);

        let period = match PeriodKey::parse(&batch.month, &batch.year) {
            Ok(period) => period,
            Err(err) => {
                warn!(label = %label, error = %err, "Excluding extract with invalid period");
                excluded.push(ExcludedPeriod {
                    label,
                    period: None,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        match normalize(&batch.rows, period) {
            Ok(records) => parsed.push((label, PeriodRecords::new(period, records))),
            Err(err) => {
                warn!(label = %label, period = %period, error = %err, "Excluding malformed extract");
                excluded.push(ExcludedPeriod {
                    label,
                    period: Some(period),
                    reason: err.to_string(),
                });
            }
        }
    }

    let duplicates = repeated_periods(parsed.iter().map(|(_, set)| set.period));

    let periods: Vec<PeriodKey> = parsed.iter().map(|(_, set)| set.period).collect();
    let keep = survivors(&periods, policy);
    let mut kept = Vec::with_capacity(parsed.len());
    for ((label, set), kept_flag) in parsed.into_iter().zip(keep) {
        if kept_flag {
            kept.push(set);
        } else {
            warn!(label = %label, period = %set.period, ?policy, "Excluding duplicate extract");
            excluded.push(ExcludedPeriod {
                label,
                period: Some(set.period),
                reason: format!("duplicate extract for period {} ({})", set.period, policy_name(policy)),
            });
        }
    }

    finish(batches.len(), merge(kept), excluded, duplicates)
}

/// Parses, normalizes and merges a set of monthly extracts, failing on the
/// first unusable one.
///
/// On success `report.excluded` is empty; repeated periods kept by `policy`
/// are still listed in `report.duplicates`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPeriod`] or [`EngineError::MalformedRecord`]
/// for the first bad extract, and [`EngineError::DuplicatePeriod`] when
/// `policy` is [`DuplicatePeriodPolicy::Reject`] and a period repeats.
///
/// [`EngineError::InvalidPeriod`]: crate::error::EngineError::InvalidPeriod
/// [`EngineError::MalformedRecord`]: crate::error::EngineError::MalformedRecord
/// [`EngineError::DuplicatePeriod`]: crate::error::EngineError::DuplicatePeriod
pub fn ingest_strict(
    batches: &[ReportBatch],
    policy: DuplicatePeriodPolicy,
) -> EngineResult<Ingestion> {
    let sets = batches
        .iter()
        .map(|batch| {
            let period = PeriodKey::parse(&batch.month, &batch.year)?;
            Ok(PeriodRecords::new(period, normalize(&batch.rows, period)?))
        })
        .collect::<EngineResult<Vec<_>>>()?;
    let duplicates = repeated_periods(sets.iter().map(|set| set.period));
    let records = merge_with_policy(sets, policy)?;
    Ok(finish(batches.len(), records, Vec::new(), duplicates))
}

fn finish(
    extracts: usize,
    records: Vec<SalesRecord>,
    excluded: Vec<ExcludedPeriod>,
    duplicates: Vec<PeriodKey>,
) -> Ingestion {
    let included = distinct_periods(&records);
    let missing = missing_periods(&included);

    info!(
        extracts,
        included = included.len(),
        excluded = excluded.len(),
        records = records.len(),
        "Ingested monthly extracts"
    );

    Ingestion {
        records,
        report: IngestionReport {
            included,
            excluded,
            duplicates,
            missing_periods: missing,
        },
    }
}

fn batch_label(batch: &ReportBatch) -> String {
    if batch.label.is_empty() {
        format!("{} {}", batch.month, batch.year)
    } else {
        batch.label.clone()
    }
}

fn policy_name(policy: DuplicatePeriodPolicy) -> &'static str {
    match policy {
        DuplicatePeriodPolicy::KeepAll => "keep_all",
        DuplicatePeriodPolicy::KeepFirst => "keep_first",
        DuplicatePeriodPolicy::KeepLast => "keep_last",
        DuplicatePeriodPolicy::Reject => "reject",
    }
}

/// Periods occurring more than once, chronologically.
fn repeated_periods(periods: impl Iterator<Item = PeriodKey>) -> Vec<PeriodKey> {
    let mut counts: HashMap<PeriodKey, usize> = HashMap::new();
    for period in periods {
        *counts.entry(period).or_default() += 1;
    }
    let mut repeated: Vec<PeriodKey> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(period, _)| period)
        .collect();
    repeated.sort();
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSalesRow;
    use rust_decimal::Decimal;

    fn batch(label: &str, month: &str, year: &str, rows: Vec<RawSalesRow>) -> ReportBatch {
        ReportBatch {
            label: label.to_string(),
            month: month.to_string(),
            year: year.to_string(),
            rows,
        }
    }

    fn rows(sales: &str) -> Vec<RawSalesRow> {
        vec![
            RawSalesRow::new("Mint Ice", "E-Liquid", 2, sales),
            RawSalesRow::new("", "TOTAL", 2, sales),
        ]
    }

    fn period(month: &str, year: &str) -> PeriodKey {
        PeriodKey::parse(month, year).unwrap()
    }

    #[test]
    fn test_all_valid_extracts_are_included_in_order() {
        let batches = vec![
            batch("feb.csv", "Feb", "2024", rows("20")),
            batch("dec.csv", "December", "2023", rows("10")),
            batch("jan.csv", "jan", "2024", rows("15")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
        assert_eq!(ingestion.records.len(), 3);
        assert_eq!(
            ingestion.report.included,
            vec![period("Dec", "2023"), period("Jan", "2024"), period("Feb", "2024")]
        );
        assert!(ingestion.report.is_clean());
    }

    #[test]
    fn test_invalid_period_excludes_only_that_extract() {
        let batches = vec![
            batch("jan.csv", "Jan", "2024", rows("15")),
            batch("odd.csv", "Smarch", "2024", rows("99")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
        assert_eq!(ingestion.records.len(), 1);
        let excluded = &ingestion.report.excluded[0];
        assert_eq!(excluded.label, "odd.csv");
        assert_eq!(excluded.period, None);
        assert!(excluded.reason.contains("unknown month name"));
    }

    #[test]
    fn test_malformed_record_excludes_whole_period() {
        let mut bad_rows = rows("15");
        bad_rows.push(RawSalesRow::new("Coil", "Hardware", "two", "8"));
        let batches = vec![
            batch("jan.csv", "Jan", "2024", bad_rows),
            batch("feb.csv", "Feb", "2024", rows("20")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
        assert_eq!(ingestion.report.included, vec![period("Feb", "2024")]);
        assert_eq!(ingestion.report.excluded[0].period, Some(period("Jan", "2024")));
        assert!(ingestion.records.iter().all(|r| r.period == period("Feb", "2024")));
    }

    #[test]
    fn test_duplicates_kept_by_default_and_reported() {
        let batches = vec![
            batch("jan-a.csv", "Jan", "2024", rows("15")),
            batch("jan-b.csv", "Jan", "2024", rows("15")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
        assert_eq!(ingestion.records.len(), 2);
        assert_eq!(ingestion.report.duplicates, vec![period("Jan", "2024")]);
        assert!(ingestion.report.excluded.is_empty());
    }

    #[test]
    fn test_reject_policy_excludes_later_duplicate() {
        let batches = vec![
            batch("jan-a.csv", "Jan", "2024", rows("15")),
            batch("jan-b.csv", "Jan", "2024", rows("30")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::Reject);
        assert_eq!(ingestion.records.len(), 1);
        assert_eq!(ingestion.records[0].net_sales, Decimal::from(15));
        assert_eq!(ingestion.report.excluded[0].label, "jan-b.csv");
        assert!(ingestion.report.excluded[0].reason.contains("reject"));
    }

    #[test]
    fn test_keep_last_policy_keeps_later_duplicate() {
        let batches = vec![
            batch("jan-a.csv", "Jan", "2024", rows("15")),
            batch("jan-b.csv", "Jan", "2024", rows("30")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepLast);
        assert_eq!(ingestion.records[0].net_sales, Decimal::from(30));
        assert_eq!(ingestion.report.excluded[0].label, "jan-a.csv");
    }

    #[test]
    fn test_gaps_are_reported_not_filled() {
        let batches = vec![
            batch("jan.csv", "Jan", "2024", rows("15")),
            batch("apr.csv", "Apr", "2024", rows("20")),
        ];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
        assert_eq!(ingestion.records.len(), 2);
        assert_eq!(
            ingestion.report.missing_periods,
            vec![period("Feb", "2024"), period("Mar", "2024")]
        );
    }

    #[test]
    fn test_strict_ingestion_fails_on_first_bad_extract() {
        let batches = vec![
            batch("jan.csv", "Jan", "2024", rows("15")),
            batch("odd.csv", "Smarch", "2024", rows("99")),
        ];
        let err = ingest_strict(&batches, DuplicatePeriodPolicy::KeepAll).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_strict_ingestion_rejects_duplicates() {
        let batches = vec![
            batch("jan-a.csv", "Jan", "2024", rows("15")),
            batch("jan-b.csv", "Jan", "2024", rows("30")),
        ];
        let err = ingest_strict(&batches, DuplicatePeriodPolicy::Reject).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::DuplicatePeriod { .. }));
        let kept = ingest_strict(&batches, DuplicatePeriodPolicy::KeepAll).unwrap();
        assert_eq!(kept.records.len(), 2);
        assert_eq!(kept.report.duplicates, vec![period("Jan", "2024")]);
    }

    #[test]
    fn test_strict_ingestion_matches_clean_lenient_ingestion() {
        let batches = vec![
            batch("feb.csv", "Feb", "2024", rows("20")),
            batch("dec.csv", "Dec", "2023", rows("10")),
        ];
        let strict = ingest_strict(&batches, DuplicatePeriodPolicy::KeepAll).unwrap();
        assert_eq!(strict, ingest(&batches, DuplicatePeriodPolicy::KeepAll));
        assert_eq!(strict.report.missing_periods, vec![period("Jan", "2024")]);
    }

    #[test]
    fn test_strict_ingestion_rejects_oversized_value() {
        let batches = vec![batch(
            "jan.csv",
            "Jan",
            "2024",
            vec![RawSalesRow::new("Mint Ice", "E-Liquid", 1, "70000000000000000000000000000")],
        )];
        let err = ingest_strict(&batches, DuplicatePeriodPolicy::KeepAll).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_missing_label_falls_back_to_tokens() {
        let batches = vec![batch("", "Smarch", "2024", vec![])];
        let ingestion = ingest(&batches, DuplicatePeriodPolicy::KeepAll);
        assert_eq!(ingestion.report.excluded[0].label, "Smarch 2024");
    }
}
