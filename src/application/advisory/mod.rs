pub mod cash_advisor;
pub mod explainability;

pub use cash_advisor::{AnalysisOutcome, AnalysisRequest, CashAdvisor, HISTORY_LIMIT, ModelConfidence};
pub use explainability::ExplainabilityChart;
