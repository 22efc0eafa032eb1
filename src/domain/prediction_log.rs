use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the append-only `predictions` monitoring table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogRecord {
    /// Wall-clock time of the analysis
    pub timestamp: DateTime<Utc>,
    pub target_date: NaiveDate,
    pub input_hour: u32,
    pub lag_24: f64,
    pub prediction: f64,
    pub safe_margin: f64,
    pub business_saving: f64,
}
