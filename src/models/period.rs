//! Reporting period model.
//!
//! This module contains [`PeriodKey`], the canonical (month, year) value that
//! every component uses for chronological ordering. Month names are resolved
//! through a single lookup table; nothing else in the crate maps month names
//! to numbers or sorts by a formatted label.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Canonical month table: (month, short name, full name).
const MONTHS: [(Month, &str, &str); 12] = [
    (Month::January, "Jan", "January"),
    (Month::February, "Feb", "February"),
    (Month::March, "Mar", "March"),
    (Month::April, "Apr", "April"),
    (Month::May, "May", "May"),
    (Month::June, "Jun", "June"),
    (Month::July, "Jul", "July"),
    (Month::August, "Aug", "August"),
    (Month::September, "Sep", "September"),
    (Month::October, "Oct", "October"),
    (Month::November, "Nov", "November"),
    (Month::December, "Dec", "December"),
];

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Resolves a month token (3-letter or full name, any case).
fn lookup_month(token: &str) -> Option<Month> {
    let token = token.trim();
    MONTHS
        .iter()
        .find(|(_, short, long)| token.eq_ignore_ascii_case(short) || token.eq_ignore_ascii_case(long))
        .map(|(month, _, _)| *month)
}

fn short_name(month: Month) -> &'static str {
    MONTHS[month.number_from_month() as usize - 1].1
}

/// A calendar month of a specific year, for which a sales extract exists.
///
/// Ordering is by year, then by month number. Labels such as `"Dec 2023"`
/// and `"Jan 2024"` are for display only and must never be compared as
/// strings.
///
/// # Example
///
/// ```
/// use sales_insight::models::PeriodKey;
///
/// let dec = PeriodKey::parse("Dec", "2023").unwrap();
/// let jan = PeriodKey::parse("january", "2024").unwrap();
///
/// assert!(dec < jan);
/// assert_eq!(jan.to_string(), "Jan 2024");
/// assert_eq!(jan.sort_label(), "2024-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PeriodKeyRepr", try_from = "PeriodKeyRepr")]
pub struct PeriodKey {
    year: i32,
    month: Month,
}

impl PeriodKey {
    /// Creates a period from a year and a month.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] when `year` is outside 1..=9999.
    pub fn new(year: i32, month: Month) -> EngineResult<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::InvalidPeriod {
                month: short_name(month).to_string(),
                year: year.to_string(),
                message: "year out of range".to_string(),
            });
        }
        Ok(Self { year, month })
    }

    /// Parses a period from the month and year tokens of a report.
    ///
    /// The month token may be a three-letter abbreviation or a full month
    /// name in any letter case. The year token must be an integer between
    /// 1 and 9999; surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] when either token is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use sales_insight::models::PeriodKey;
    ///
    /// assert_eq!(
    ///     PeriodKey::parse("jan", "2024").unwrap(),
    ///     PeriodKey::parse("January", "2024").unwrap()
    /// );
    /// assert!(PeriodKey::parse("Janu", "2024").is_err());
    /// ```
    pub fn parse(month_token: &str, year_token: &str) -> EngineResult<Self> {
        let invalid = |message: &str| EngineError::InvalidPeriod {
            month: month_token.to_string(),
            year: year_token.to_string(),
            message: message.to_string(),
        };

        let month = lookup_month(month_token).ok_or_else(|| invalid("unknown month name"))?;
        let year: i32 = year_token
            .trim()
            .parse()
            .map_err(|_| invalid("year is not an integer"))?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid("year out of range"));
        }

        Ok(Self { year, month })
    }

    /// Returns the period containing the given calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] for dates outside years 1..=9999.
    pub fn from_date(date: NaiveDate) -> EngineResult<Self> {
        Self::new(date.year(), MONTHS[date.month0() as usize].0)
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month.
    pub fn month(&self) -> Month {
        self.month
    }

    /// The month number, 1 for January through 12 for December.
    pub fn month_number(&self) -> u32 {
        self.month.number_from_month()
    }

    /// Months elapsed since January of year 0.
    pub fn month_index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month.number_from_month() - 1)
    }

    /// The period immediately after this one, or `None` after December 9999.
    pub fn next(&self) -> Option<Self> {
        if self.month == Month::December {
            (self.year < MAX_YEAR).then(|| Self {
                year: self.year + 1,
                month: Month::January,
            })
        } else {
            Some(Self {
                year: self.year,
                month: self.month.succ(),
            })
        }
    }

    /// The `YYYY-MM` label used for date-range captions.
    pub fn sort_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month_number())
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month_number()).cmp(&(other.year, other.month_number()))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", short_name(self.month), self.year)
    }
}

/// Wire form of a [`PeriodKey`]: `{"year": 2024, "month": "Jan"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PeriodKeyRepr {
    year: i32,
    month: String,
}

impl From<PeriodKey> for PeriodKeyRepr {
    fn from(key: PeriodKey) -> Self {
        Self {
            year: key.year,
            month: short_name(key.month).to_string(),
        }
    }
}

impl TryFrom<PeriodKeyRepr> for PeriodKey {
    type Error = EngineError;

    fn try_from(repr: PeriodKeyRepr) -> Result<Self, Self::Error> {
        PeriodKey::parse(&repr.month, &repr.year.to_string())
    }
}
