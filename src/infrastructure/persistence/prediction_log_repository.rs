use crate::domain::prediction_log::PredictionLogRecord;
use crate::domain::repositories::PredictionLogRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqlitePredictionLogRepository {
    pool: SqlitePool,
}

impl SqlitePredictionLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<PredictionLogRecord> {
        let timestamp: String = row.try_get("timestamp")?;
        let target_date: String = row.try_get("target_date")?;
        let input_hour: i64 = row.try_get("input_hour")?;

        Ok(PredictionLogRecord {
            timestamp: DateTime::parse_from_rfc3339(&timestamp)
                .with_context(|| format!("Invalid log timestamp '{}'", timestamp))?
                .with_timezone(&Utc),
            target_date: NaiveDate::parse_from_str(&target_date, DATE_FORMAT)
                .with_context(|| format!("Invalid log target date '{}'", target_date))?,
            input_hour: u32::try_from(input_hour).context("Invalid log input hour")?,
            lag_24: row.try_get("lag_24")?,
            prediction: row.try_get("prediction")?,
            safe_margin: row.try_get("safe_margin")?,
            business_saving: row.try_get("business_saving")?,
        })
    }
}

#[async_trait]
impl PredictionLogRepository for SqlitePredictionLogRepository {
    async fn append(&self, record: &PredictionLogRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO predictions
            (timestamp, target_date, input_hour, lag_24, prediction, safe_margin, business_saving)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        // Fixed-width UTC text keeps ORDER BY timestamp chronological
        .bind(record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(record.target_date.format(DATE_FORMAT).to_string())
        .bind(record.input_hour as i64)
        .bind(record.lag_24)
        .bind(record.prediction)
        .bind(record.safe_margin)
        .bind(record.business_saving)
        .execute(&self.pool)
        .await
        .context("Failed to save prediction log record")?;

        debug!("Persisted prediction for {}", record.target_date);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<PredictionLogRecord>> {
        let rows = sqlx::query("SELECT * FROM predictions ORDER BY timestamp DESC, rowid DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .context("Failed to read prediction log")?;

        rows.iter().map(Self::map_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::database::Database;
    use chrono::{Duration, TimeZone};

    fn record(minute: i64, prediction: f64) -> PredictionLogRecord {
        PredictionLogRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minute),
            target_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            input_hour: 12,
            lag_24: 4200.0,
            prediction,
            safe_margin: prediction * 1.1,
            business_saving: 19.5,
        }
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqlitePredictionLogRepository::new(db.pool.clone());

        let rec = record(0, 10000.0);
        repo.append(&rec).await.unwrap();

        let rows = repo.recent(10).await.unwrap();
        assert_eq!(rows, vec![rec]);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqlitePredictionLogRepository::new(db.pool.clone());

        for i in 0..12 {
            repo.append(&record(i, i as f64)).await.unwrap();
        }

        let rows = repo.recent(10).await.unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].prediction, 11.0);
        assert_eq!(rows[9].prediction, 2.0);
    }
}
