pub mod cash_rules;
pub mod loading_plan;

pub use cash_rules::{CashRules, DriftPolicy};
pub use loading_plan::{FinancialImpact, LoadingRecommendation, LoadingScenario};
