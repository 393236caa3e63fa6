//! Time-series merging.
//!
//! Combines normalized per-period record sets into one dataset and derives
//! the chronological list of periods present in it.

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::config::DuplicatePeriodPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{PeriodKey, SalesRecord};

/// The normalized records of one extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodRecords {
    /// The period the extract covers.
    pub period: PeriodKey,
    /// The extract's normalized records.
    pub records: Vec<SalesRecord>,
}

impl PeriodRecords {
    /// Bundles an extract's records with its period.
    pub fn new(period: PeriodKey, records: Vec<SalesRecord>) -> Self {
        Self { period, records }
    }
}

/// Concatenates record sets in the order given.
///
/// Sets do not need to be chronological or contiguous; a missing month is
/// simply absent. Sets that share a period are all kept.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::{merge, PeriodRecords};
/// use sales_insight::models::PeriodKey;
///
/// let jan = PeriodKey::parse("Jan", "2024").unwrap();
/// let dec = PeriodKey::parse("Dec", "2023").unwrap();
/// let merged = merge(vec![PeriodRecords::new(jan, vec![]), PeriodRecords::new(dec, vec![])]);
/// assert!(merged.is_empty());
/// ```
pub fn merge(sets: Vec<PeriodRecords>) -> Vec<SalesRecord> {
    sets.into_iter().flat_map(|set| set.records).collect()
}

/// Concatenates record sets, resolving repeated periods with `policy`.
///
/// # Errors
///
/// With [`DuplicatePeriodPolicy::Reject`], returns
/// [`EngineError::DuplicatePeriod`] for the first repeated period.
pub fn merge_with_policy(
    sets: Vec<PeriodRecords>,
    policy: DuplicatePeriodPolicy,
) -> EngineResult<Vec<SalesRecord>> {
    let periods: Vec<PeriodKey> = sets.iter().map(|set| set.period).collect();
    let keep = survivors(&periods, policy);

    if policy == DuplicatePeriodPolicy::Reject {
        if let Some(index) = keep.iter().position(|kept| !kept) {
            return Err(EngineError::DuplicatePeriod {
                period: periods[index].to_string(),
            });
        }
    }

    let kept = sets
        .into_iter()
        .zip(keep)
        .filter_map(|(set, kept)| {
            if !kept {
                warn!(period = %set.period, ?policy, "Dropping extract for duplicate period");
            }
            kept.then_some(set)
        })
        .collect();
    Ok(merge(kept))
}

/// Marks which of a sequence of extracts survive `policy`.
///
/// `KeepFirst` and `Reject` keep the first extract of each period,
/// `KeepLast` keeps the last one, `KeepAll` keeps everything.
pub(crate) fn survivors(periods: &[PeriodKey], policy: DuplicatePeriodPolicy) -> Vec<bool> {
    match policy {
        DuplicatePeriodPolicy::KeepAll => vec![true; periods.len()],
        DuplicatePeriodPolicy::KeepFirst | DuplicatePeriodPolicy::Reject => {
            let mut seen = HashSet::new();
            periods.iter().map(|period| seen.insert(*period)).collect()
        }
        DuplicatePeriodPolicy::KeepLast => {
            let mut seen = HashSet::new();
            let mut keep: Vec<bool> = periods.iter().rev().map(|period| seen.insert(*period)).collect();
            keep.reverse();
            keep
        }
    }
}

/// Returns the periods present in `records`, chronologically, without repeats.
pub fn distinct_periods(records: &[SalesRecord]) -> Vec<PeriodKey> {
    records
        .iter()
        .map(|record| record.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Returns the months absent between the earliest and latest of `periods`.
///
/// # Example
///
/// ```
/// use sales_insight::analysis::missing_periods;
/// use sales_insight::models::PeriodKey;
///
/// let nov = PeriodKey::parse("Nov", "2023").unwrap();
/// let feb = PeriodKey::parse("Feb", "2024").unwrap();
/// let missing = missing_periods(&[feb, nov]);
/// assert_eq!(missing.len(), 2); // Dec 2023, Jan 2024
/// ```
pub fn missing_periods(periods: &[PeriodKey]) -> Vec<PeriodKey> {
    let present: BTreeSet<PeriodKey> = periods.iter().copied().collect();
    let (Some(first), Some(last)) = (present.first().copied(), present.last().copied()) else {
        return Vec::new();
    };

    let mut missing = Vec::new();
    let mut cursor = first;
    while cursor < last {
        if !present.contains(&cursor) {
            missing.push(cursor);
        }
        let Some(next) = cursor.next() else {
            break;
        };
        cursor = next;
    }
    missing
}
