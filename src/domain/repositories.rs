//! Repository abstractions for the prediction monitoring log.
//!
//! The log is append-only: there is no update or delete path and no
//! retention policy.

use crate::domain::prediction_log::PredictionLogRecord;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PredictionLogRepository: Send + Sync {
    /// Append one record
    async fn append(&self, record: &PredictionLogRecord) -> Result<()>;

    /// Most recent records, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<PredictionLogRecord>>;
}
