//! Configuration types for sales analysis.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifying information about the engine build producing reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable engine name.
    pub name: String,
    /// Version string stamped into every report.
    pub version: String,
}

impl Default for EngineMetadata {
    fn default() -> Self {
        Self {
            name: "sales-insight".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Upper ratio bounds (inclusive) of the stock severity tiers.
///
/// A ratio of exactly `critical` is Critical, not Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockThresholds {
    /// Highest ratio still classified Critical.
    pub critical: Decimal,
    /// Highest ratio still classified Low.
    pub low: Decimal,
    /// Highest ratio still classified Warning.
    pub warning: Decimal,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            critical: Decimal::new(25, 2),
            low: Decimal::new(50, 2),
            warning: Decimal::ONE,
        }
    }
}

impl StockThresholds {
    /// Checks that the bounds are positive and strictly increasing.
    pub fn validate(&self) -> Result<(), String> {
        if self.critical <= Decimal::ZERO {
            return Err("stock_thresholds.critical must be greater than zero".to_string());
        }
        if self.low <= self.critical {
            return Err("stock_thresholds.low must be greater than critical".to_string());
        }
        if self.warning <= self.low {
            return Err("stock_thresholds.warning must be greater than low".to_string());
        }
        Ok(())
    }
}

/// What to do when two extracts cover the same period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePeriodPolicy {
    /// Keep the records of every extract; totals for the period add up.
    #[default]
    KeepAll,
    /// Keep the extract supplied first.
    KeepFirst,
    /// Keep the extract supplied last.
    KeepLast,
    /// Refuse the later extract.
    Reject,
}

/// Ranking defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of entries in each top-N list.
    pub top_n: usize,
    /// Minimum units sold before a product may rank by average price.
    pub min_units_for_price_rank: Decimal,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_units_for_price_rank: Decimal::from(5),
        }
    }
}

/// The complete analysis configuration.
///
/// `AnalyticsConfig::default()` matches the shipped `config/analytics.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Engine identification.
    #[serde(default)]
    pub engine: EngineMetadata,
    /// Stock severity tier bounds.
    #[serde(default)]
    pub stock_thresholds: StockThresholds,
    /// Duplicate-period handling during merge.
    #[serde(default)]
    pub duplicate_periods: DuplicatePeriodPolicy,
    /// Ranking defaults.
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl AnalyticsConfig {
    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        self.stock_thresholds.validate()?;
        if self.ranking.top_n == 0 {
            return Err("ranking.top_n must be at least 1".to_string());
        }
        if self.ranking.min_units_for_price_rank < Decimal::ZERO {
            return Err("ranking.min_units_for_price_rank must not be negative".to_string());
        }
        Ok(())
    }
}
