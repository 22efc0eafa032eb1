use crate::application::ml::InferenceEngine;
use crate::config::Config;
use crate::domain::cash::LoadingRecommendation;
use crate::domain::errors::ModelError;
use crate::domain::ml::{CalendarFeatures, FeatureVector, HistoryFeatures};
use crate::domain::prediction_log::PredictionLogRecord;
use crate::domain::repositories::PredictionLogRepository;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Number of log rows shown by the history view
pub const HISTORY_LIMIT: usize = 10;

pub const DEFAULT_HOUR: u32 = 12;
pub const DEFAULT_LAG_1: f64 = 1500.0;
pub const DEFAULT_LAG_24: f64 = 4200.0;
pub const DEFAULT_ROLLING_MEAN_3: f64 = 1800.0;
pub const DEFAULT_ROLLING_MEAN_24: f64 = 3500.0;

fn log_amount(column: &str, value: Decimal) -> f64 {
    value.to_f64().unwrap_or_else(|| {
        warn!("{} = {} does not fit the log column, storing 0", column, value);
        0.0
    })
}

/// Operator inputs for one analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    pub target_date: NaiveDate,
    pub hour: u32,
    /// User-supplied history values; not recomputed from stored data
    pub history: HistoryFeatures,
}

impl AnalysisRequest {
    pub fn with_defaults(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            hour: DEFAULT_HOUR,
            history: HistoryFeatures {
                lag_1: DEFAULT_LAG_1,
                lag_24: DEFAULT_LAG_24,
                rolling_mean_3: DEFAULT_ROLLING_MEAN_3,
                rolling_mean_24: DEFAULT_ROLLING_MEAN_24,
            },
        }
    }

    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(
            CalendarFeatures::from_date_hour(self.target_date, self.hour),
            self.history,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelConfidence {
    High,
    Low,
}

impl fmt::Display for ModelConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelConfidence::High => write!(f, "High"),
            ModelConfidence::Low => write!(f, "Low"),
        }
    }
}

/// Everything the operator sees after pressing "analyze"
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub request: AnalysisRequest,
    pub features: FeatureVector,
    pub drift_detected: bool,
    pub confidence: ModelConfidence,
    /// Non-negative predicted withdrawal amount
    pub prediction: f64,
    pub recommendation: LoadingRecommendation,
    /// Set when the monitoring log could not be written
    pub log_error: Option<String>,
}

/// Interactive predict-and-log handler.
///
/// Holds shared read-only handles to the engine and configuration, both
/// constructed once at process start.
pub struct CashAdvisor {
    engine: Arc<InferenceEngine>,
    config: Arc<Config>,
    log: Arc<dyn PredictionLogRepository>,
}

impl CashAdvisor {
    pub fn new(
        engine: Arc<InferenceEngine>,
        config: Arc<Config>,
        log: Arc<dyn PredictionLogRepository>,
    ) -> Self {
        Self {
            engine,
            config,
            log,
        }
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_drift(&self, lag_24: f64) -> bool {
        self.config.drift_policy().is_drift(lag_24)
    }

    /// Predicts demand, prices the recommended load, and appends a log row.
    ///
    /// A log write failure does not fail the analysis; it is reported in
    /// `AnalysisOutcome::log_error`.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, ModelError> {
        if request.hour > 23 {
            return Err(ModelError::InvalidInput(format!(
                "hour must be between 0 and 23, got {}",
                request.hour
            )));
        }

        let lag_24 = request.history.lag_24;
        let drift_detected = self.is_drift(lag_24);
        if drift_detected {
            warn!(
                "Data drift: lag_24 = {} exceeds the normal limit of {}",
                lag_24,
                self.config.drift_policy().max_normal_lag
            );
        }

        let features = request.features();
        let prediction = self.engine.predict(features)?;
        let Some(predicted_demand) = Decimal::from_f64(prediction) else {
            warn!("Model output {} cannot be priced", prediction);
            return Err(ModelError::Prediction(format!(
                "model output {} is not a representable amount",
                prediction
            )));
        };
        let recommendation = self.config.cash_rules().recommend(predicted_demand);

        info!(
            "Forecast for {} {:02}:00 -> demand {:.0}, load {}, saving {}",
            request.target_date,
            request.hour,
            prediction,
            recommendation.safe_margin.round_dp(0),
            recommendation.impact.saving.round_dp(2)
        );

        let record = PredictionLogRecord {
            timestamp: Utc::now(),
            target_date: request.target_date,
            input_hour: request.hour,
            lag_24,
            prediction,
            safe_margin: log_amount("safe_margin", recommendation.safe_margin),
            business_saving: log_amount("business_saving", recommendation.impact.saving),
        };
        let log_error = match self.log.append(&record).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Prediction log write failed: {:#}", e);
                Some(format!("{:#}", e))
            }
        };

        Ok(AnalysisOutcome {
            request,
            features,
            drift_detected,
            confidence: if drift_detected {
                ModelConfidence::Low
            } else {
                ModelConfidence::High
            },
            prediction,
            recommendation,
            log_error,
        })
    }

    /// Latest log rows, newest first.
    pub async fn recent_history(&self) -> anyhow::Result<Vec<PredictionLogRecord>> {
        self.log.recent(HISTORY_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_features_use_selected_date() {
        // 2024-06-15 is a Saturday
        let request = AnalysisRequest::with_defaults(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        let fv = request.features();

        assert_eq!(fv.calendar.hour, DEFAULT_HOUR);
        assert_eq!(fv.calendar.day_of_week, 5);
        assert_eq!(fv.calendar.day_of_month, 15);
        assert!(fv.calendar.is_weekend);
        assert_eq!(fv.history.lag_24, DEFAULT_LAG_24);
    }

    #[test]
    fn test_confidence_labels() {
        assert_eq!(ModelConfidence::High.to_string(), "High");
        assert_eq!(ModelConfidence::Low.to_string(), "Low");
    }
}
