use super::cash_rules::CashRules;
use rust_decimal::Decimal;
use std::fmt;

/// What happened to the traditional fixed load for the forecast demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingScenario {
    /// Fixed load covered demand; the excess sat idle
    IdleCash,
    /// Fixed load ran out; an emergency refill was needed
    Stockout,
}

impl LoadingScenario {
    pub fn explanation(&self) -> &'static str {
        match self {
            LoadingScenario::IdleCash => {
                "The traditional method keeps unnecessary excess cash (idle cash)."
            }
            LoadingScenario::Stockout => {
                "The traditional method ran out of cash and incurred an operational cost (stockout)."
            }
        }
    }
}

impl fmt::Display for LoadingScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingScenario::IdleCash => write!(f, "Idle Cash"),
            LoadingScenario::Stockout => write!(f, "Stockout"),
        }
    }
}

/// Cost comparison between the forecast-driven load and the fixed load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialImpact {
    pub ai_cost: Decimal,
    pub traditional_cost: Decimal,
    /// traditional_cost - ai_cost
    pub saving: Decimal,
    pub scenario: LoadingScenario,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingRecommendation {
    pub predicted_demand: Decimal,
    /// Amount to load: predicted demand with the safety margin applied
    pub safe_margin: Decimal,
    pub impact: FinancialImpact,
}

impl CashRules {
    pub fn safe_margin(&self, predicted_demand: Decimal) -> Decimal {
        predicted_demand * self.safety_margin_ratio
    }

    /// Safety uplift as a signed percentage, e.g. "+10%".
    pub fn margin_label(&self) -> String {
        let pct = ((self.safety_margin_ratio - Decimal::ONE) * Decimal::ONE_HUNDRED).normalize();
        if pct.is_sign_negative() {
            format!("{}%", pct)
        } else {
            format!("+{}%", pct)
        }
    }

    /// Holding cost of the fixed load, plus a refill when it falls short.
    pub fn traditional_cost(&self, predicted_demand: Decimal) -> (Decimal, LoadingScenario) {
        let holding = self.fixed_loading_amount * self.daily_interest_rate;
        if self.fixed_loading_amount >= predicted_demand {
            (holding, LoadingScenario::IdleCash)
        } else {
            (
                holding + self.stockout_operation_cost,
                LoadingScenario::Stockout,
            )
        }
    }

    pub fn recommend(&self, predicted_demand: Decimal) -> LoadingRecommendation {
        let safe_margin = self.safe_margin(predicted_demand);
        let ai_cost = safe_margin * self.daily_interest_rate;
        let (traditional_cost, scenario) = self.traditional_cost(predicted_demand);

        LoadingRecommendation {
            predicted_demand,
            safe_margin,
            impact: FinancialImpact {
                ai_cost,
                traditional_cost,
                saving: traditional_cost - ai_cost,
                scenario,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_safe_margin_applies_ratio() {
        let rules = CashRules::default();
        assert_eq!(rules.safe_margin(dec!(10000)), dec!(11000));
    }

    #[test]
    fn test_fixed_load_covers_demand() {
        let rules = CashRules::default();
        let (cost, scenario) = rules.traditional_cost(dec!(10000));
        assert_eq!(cost, dec!(25));
        assert_eq!(scenario, LoadingScenario::IdleCash);
    }

    #[test]
    fn test_fixed_load_equal_to_demand_is_idle() {
        let rules = CashRules::default();
        let (cost, scenario) = rules.traditional_cost(dec!(50000));
        assert_eq!(cost, dec!(25));
        assert_eq!(scenario, LoadingScenario::IdleCash);
    }

    #[test]
    fn test_fixed_load_stockout_adds_operation_cost() {
        let rules = CashRules::default();
        let (cost, scenario) = rules.traditional_cost(dec!(70000));
        assert_eq!(cost, dec!(525));
        assert_eq!(scenario, LoadingScenario::Stockout);
    }

    #[test]
    fn test_recommendation_saving() {
        let rec = CashRules::default().recommend(dec!(10000));
        assert_eq!(rec.safe_margin, dec!(11000));
        assert_eq!(rec.impact.ai_cost, dec!(5.5));
        assert_eq!(rec.impact.saving, dec!(19.5));
    }

    #[test]
    fn test_margin_label() {
        assert_eq!(CashRules::default().margin_label(), "+10%");
        let tight = CashRules {
            safety_margin_ratio: dec!(0.95),
            ..CashRules::default()
        };
        assert_eq!(tight.margin_label(), "-5%");
    }
}
