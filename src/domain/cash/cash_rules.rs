use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Business constants for pricing a cash load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashRules {
    /// Opportunity cost of one unit of cash held for a day
    pub daily_interest_rate: Decimal,
    /// Flat cost of an emergency refill after a stockout
    pub stockout_operation_cost: Decimal,
    /// Amount loaded by the traditional fixed policy
    pub fixed_loading_amount: Decimal,
    /// Recommended load = predicted demand x this ratio
    pub safety_margin_ratio: Decimal,
}

impl Default for CashRules {
    fn default() -> Self {
        Self {
            daily_interest_rate: dec!(0.0005),
            stockout_operation_cost: dec!(500),
            fixed_loading_amount: dec!(50000),
            safety_margin_ratio: dec!(1.10),
        }
    }
}

/// Threshold check on user-supplied history inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftPolicy {
    /// `lag_24` values above this are outside the observed normal range
    pub max_normal_lag: f64,
}

impl Default for DriftPolicy {
    fn default() -> Self {
        Self {
            max_normal_lag: 60_000.0,
        }
    }
}

impl DriftPolicy {
    pub fn is_drift(&self, lag_24: f64) -> bool {
        lag_24 > self.max_normal_lag
    }
}
