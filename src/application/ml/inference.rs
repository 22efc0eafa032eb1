use super::predictor::DemandRegressor;
use crate::domain::errors::ModelError;
use crate::domain::ml::{FeatureFrame, FeatureVector};
use crate::infrastructure::persistence::model_store;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Accepted shapes for a single prediction request
#[derive(Debug, Clone)]
pub enum PredictionInput {
    Record(FeatureVector),
    Table(FeatureFrame),
    Mapping(HashMap<String, f64>),
}

impl From<FeatureVector> for PredictionInput {
    fn from(fv: FeatureVector) -> Self {
        PredictionInput::Record(fv)
    }
}

impl From<FeatureFrame> for PredictionInput {
    fn from(frame: FeatureFrame) -> Self {
        PredictionInput::Table(frame)
    }
}

impl From<HashMap<String, f64>> for PredictionInput {
    fn from(mapping: HashMap<String, f64>) -> Self {
        PredictionInput::Mapping(mapping)
    }
}

impl PredictionInput {
    fn into_frame(self) -> FeatureFrame {
        match self {
            PredictionInput::Record(fv) => FeatureFrame::from(&fv),
            PredictionInput::Table(frame) => frame,
            PredictionInput::Mapping(mapping) => FeatureFrame::from_mapping(&mapping),
        }
    }
}

/// Result of asking the engine for a demand estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Forecast {
    /// Non-negative expected withdrawal amount
    Amount(f64),
    /// No model is loaded
    Unavailable,
}

impl Forecast {
    pub fn amount_or_zero(&self) -> f64 {
        match self {
            Forecast::Amount(a) => *a,
            Forecast::Unavailable => 0.0,
        }
    }
}

/// Single-row inference wrapper around a loaded demand model.
///
/// Whether a model is loaded is decided once at construction and never
/// changes afterwards.
pub struct InferenceEngine {
    model: Option<Box<dyn DemandRegressor>>,
    model_path: Option<PathBuf>,
}

impl InferenceEngine {
    /// Loads the artifact at `model_path`. Any load problem leaves the engine
    /// unusable instead of failing.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        let model_path = model_path.into();
        let model = match model_store::load(&model_path) {
            Ok(Some(model)) => Some(Box::new(model) as Box<dyn DemandRegressor>),
            Ok(None) => {
                warn!(
                    "Model file not found at {:?}. Engine will report zero demand.",
                    model_path
                );
                None
            }
            Err(e) => {
                error!("Failed to load model from {:?}: {}", model_path, e);
                None
            }
        };

        Self {
            model,
            model_path: Some(model_path),
        }
    }

    pub fn from_regressor(model: Box<dyn DemandRegressor>) -> Self {
        info!("Inference engine using in-memory {} model", model.name());
        Self {
            model: Some(model),
            model_path: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            model: None,
            model_path: None,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.name())
    }

    /// Demand estimate that keeps "no model" distinct from "no demand".
    pub fn forecast(&self, input: impl Into<PredictionInput>) -> Result<Forecast, ModelError> {
        let Some(model) = &self.model else {
            return Ok(Forecast::Unavailable);
        };

        let row = input.into().into_frame().single_row_in(model.feature_names())?;
        let raw = model.predict_row(&row)?;
        Ok(Forecast::Amount(raw.max(0.0)))
    }

    /// Demand estimate, floored at zero. An unusable engine yields 0.0;
    /// check `is_usable` to tell that apart from a genuine zero forecast.
    pub fn predict(&self, input: impl Into<PredictionInput>) -> Result<f64, ModelError> {
        self.forecast(input).map(|f| f.amount_or_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_registry::{
        CalendarFeatures, HistoryFeatures, feature_names,
    };
    use chrono::NaiveDate;

    struct FixedModel {
        output: f64,
        names: Vec<String>,
    }

    impl DemandRegressor for FixedModel {
        fn predict_row(&self, _features: &[f64]) -> Result<f64, ModelError> {
            Ok(self.output)
        }
        fn feature_names(&self) -> &[String] {
            &self.names
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Returns the value of the `lag_24` column
    struct EchoLag24 {
        names: Vec<String>,
    }

    impl DemandRegressor for EchoLag24 {
        fn predict_row(&self, features: &[f64]) -> Result<f64, ModelError> {
            Ok(features[5])
        }
        fn feature_names(&self) -> &[String] {
            &self.names
        }
        fn name(&self) -> &str {
            "echo"
        }
    }

    fn record() -> FeatureVector {
        FeatureVector::new(
            CalendarFeatures::from_date_hour(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(), 12),
            HistoryFeatures {
                lag_1: 1500.0,
                lag_24: 4200.0,
                rolling_mean_3: 1800.0,
                rolling_mean_24: 3500.0,
            },
        )
    }

    #[test]
    fn test_unavailable_engine_predicts_zero() {
        let engine = InferenceEngine::unavailable();
        assert!(!engine.is_usable());
        assert_eq!(engine.predict(record()).unwrap(), 0.0);
        assert_eq!(engine.forecast(record()).unwrap(), Forecast::Unavailable);
    }

    #[test]
    fn test_missing_file_is_unusable() {
        let engine = InferenceEngine::new("/definitely/not/here/model.json");
        assert!(!engine.is_usable());
        assert_eq!(engine.predict(record()).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_output_is_floored() {
        let engine = InferenceEngine::from_regressor(Box::new(FixedModel {
            output: -1.0e12,
            names: feature_names(),
        }));
        assert_eq!(engine.predict(record()).unwrap(), 0.0);
        assert_eq!(engine.forecast(record()).unwrap(), Forecast::Amount(0.0));
    }

    #[test]
    fn test_mapping_input_matches_by_name() {
        let engine = InferenceEngine::from_regressor(Box::new(EchoLag24 {
            names: feature_names(),
        }));
        let mapping: HashMap<String, f64> = feature_names()
            .into_iter()
            .zip(record().to_f64_vector())
            .collect();
        assert_eq!(engine.predict(mapping).unwrap(), 4200.0);
    }

    #[test]
    fn test_reordered_table_input_matches_by_name() {
        let engine = InferenceEngine::from_regressor(Box::new(EchoLag24 {
            names: feature_names(),
        }));
        let mut columns = feature_names();
        let mut values = record().to_f64_vector();
        columns.reverse();
        values.reverse();
        let frame = FeatureFrame::new(columns, vec![values]);
        assert_eq!(engine.predict(frame).unwrap(), 4200.0);
    }
}
