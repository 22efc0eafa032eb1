//! Cash-loading business rules parsed from environment variables.

use crate::domain::cash::{CashRules, DriftPolicy};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Business-rule environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BusinessEnvConfig {
    pub rules: CashRules,
    pub drift: DriftPolicy,
}

impl BusinessEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = CashRules::default();
        let parse_decimal = |key: &str, default: Decimal| -> Result<Decimal> {
            match var(key) {
                Some(raw) => Decimal::from_str(raw.trim())
                    .with_context(|| format!("Failed to parse {}", key)),
                None => Ok(default),
            }
        };

        let rules = CashRules {
            daily_interest_rate: parse_decimal("DAILY_INTEREST_RATE", defaults.daily_interest_rate)?,
            stockout_operation_cost: parse_decimal(
                "STOCKOUT_OPERATION_COST",
                defaults.stockout_operation_cost,
            )?,
            fixed_loading_amount: parse_decimal(
                "FIXED_LOADING_AMOUNT",
                defaults.fixed_loading_amount,
            )?,
            safety_margin_ratio: parse_decimal("SAFETY_MARGIN_RATIO", defaults.safety_margin_ratio)?,
        };

        let max_normal_lag = match var("MAX_NORMAL_LAG") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .context("Failed to parse MAX_NORMAL_LAG")?,
            None => DriftPolicy::default().max_normal_lag,
        };

        Ok(Self {
            rules,
            drift: DriftPolicy { max_normal_lag },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_business_config_defaults() {
        let config = BusinessEnvConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.rules.daily_interest_rate, dec!(0.0005));
        assert_eq!(config.rules.stockout_operation_cost, dec!(500));
        assert_eq!(config.rules.fixed_loading_amount, dec!(50000));
        assert_eq!(config.rules.safety_margin_ratio, dec!(1.10));
        assert_eq!(config.drift.max_normal_lag, 60_000.0);
    }

    #[test]
    fn test_business_config_overrides() {
        let env = vars(&[("SAFETY_MARGIN_RATIO", "1.25"), ("MAX_NORMAL_LAG", "80000")]);
        let config = BusinessEnvConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.rules.safety_margin_ratio, dec!(1.25));
        assert_eq!(config.drift.max_normal_lag, 80_000.0);
    }

    #[test]
    fn test_malformed_value_names_the_variable() {
        let env = vars(&[("FIXED_LOADING_AMOUNT", "fifty thousand")]);
        let err = BusinessEnvConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("FIXED_LOADING_AMOUNT"));
    }
}
