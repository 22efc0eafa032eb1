use crate::domain::prediction_log::PredictionLogRecord;
use crate::domain::repositories::PredictionLogRepository;
use anyhow::{Result, anyhow};
use async_trait::async_trait;

/// Stand-in used when the monitoring database could not be opened.
/// Every call fails with the original connection error.
pub struct UnavailablePredictionLog {
    reason: String,
}

impl UnavailablePredictionLog {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PredictionLogRepository for UnavailablePredictionLog {
    async fn append(&self, _record: &PredictionLogRecord) -> Result<()> {
        Err(anyhow!("monitoring database unavailable: {}", self.reason))
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<PredictionLogRecord>> {
        Err(anyhow!("monitoring database unavailable: {}", self.reason))
    }
}
