//! Configuration module for the ATM cash forecaster.
//!
//! Configuration is loaded once from environment variables at process start,
//! then shared read-only with every component that needs it.

mod business_env_config;
mod paths_env_config;

pub use business_env_config::BusinessEnvConfig;
pub use paths_env_config::PathsEnvConfig;

use crate::domain::cash::{CashRules, DriftPolicy};
use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub paths: PathsEnvConfig,
    pub business: BusinessEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            paths: PathsEnvConfig::from_env(),
            business: BusinessEnvConfig::from_env().context("Failed to load business config")?,
        })
    }

    pub fn cash_rules(&self) -> &CashRules {
        &self.business.rules
    }

    pub fn drift_policy(&self) -> &DriftPolicy {
        &self.business.drift
    }
}
