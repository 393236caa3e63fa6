//! Configuration loading and management for the sales analysis engine.
//!
//! This module loads the analysis configuration from YAML: stock severity
//! bounds, the duplicate-period policy and ranking defaults.
//!
//! # Example
//!
//! ```no_run
//! use sales_insight::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Engine version: {}", config.engine().version);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    AnalyticsConfig, DuplicatePeriodPolicy, EngineMetadata, RankingConfig, StockThresholds,
};
