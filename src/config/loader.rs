//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the analysis
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AnalyticsConfig, DuplicatePeriodPolicy, EngineMetadata, RankingConfig, StockThresholds,
};

/// File name looked up inside a configuration directory.
pub const CONFIG_FILE_NAME: &str = "analytics.yaml";

/// Loads and provides access to the analysis configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── analytics.yaml   # thresholds, duplicate policy, ranking defaults
/// ```
///
/// # Example
///
/// ```no_run
/// use sales_insight::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Top-N size: {}", loader.ranking().top_n);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AnalyticsConfig,
}

impl ConfigLoader {
    /// Loads configuration from a directory containing `analytics.yaml`, or
    /// from the YAML file itself.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if the file cannot be read
    /// - [`EngineError::ConfigParseError`] if it is not valid YAML, does not
    ///   match the expected structure, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let file = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        let path_str = file.display().to_string();

        let content = fs::read_to_string(&file).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content).map_err(|message| EngineError::ConfigParseError {
            path: path_str.clone(),
            message,
        })?;

        debug!(path = %path_str, "Loaded analytics configuration");
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AnalyticsConfig) -> EngineResult<Self> {
        config
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: "<in-memory>".to_string(),
                message,
            })?;
        Ok(Self { config })
    }

    fn parse(content: &str) -> Result<AnalyticsConfig, String> {
        let config: AnalyticsConfig = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Returns the engine metadata.
    pub fn engine(&self) -> &EngineMetadata {
        &self.config.engine
    }

    /// Returns the stock severity bounds.
    pub fn stock_thresholds(&self) -> &StockThresholds {
        &self.config.stock_thresholds
    }

    /// Returns the duplicate-period policy.
    pub fn duplicate_policy(&self) -> DuplicatePeriodPolicy {
        self.config.duplicate_periods
    }

    /// Returns the ranking defaults.
    pub fn ranking(&self) -> &RankingConfig {
        &self.config.ranking
    }
}
