use super::feature_pipeline::build_features;
use super::gbm::{GbmParams, GradientBoostedRegressor};
use crate::config::Config;
use crate::domain::errors::{PipelineError, TrainingError};
use crate::infrastructure::dataset::load_events;
use crate::infrastructure::persistence::model_store;
use std::path::PathBuf;
use tracing::info;

/// What a successful training run produced
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub events_loaded: usize,
    pub rows_dropped: usize,
    pub samples_trained: usize,
    /// In-sample fit quality, informational only
    pub training_rmse: f64,
    pub model_path: PathBuf,
}

/// Batch job: raw CSV -> features -> fitted model -> artifact on disk.
///
/// Any failure aborts before the artifact is written, so an existing model at
/// `model_path` is only replaced by a complete new one.
#[derive(Debug, Clone)]
pub struct TrainingJob {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub params: GbmParams,
}

impl TrainingJob {
    pub fn from_config(config: &Config) -> Self {
        Self {
            data_path: config.paths.data_path.clone(),
            model_path: config.paths.model_path.clone(),
            params: GbmParams::default(),
        }
    }

    pub fn run(&self) -> Result<TrainingSummary, TrainingError> {
        info!("Reading dataset: {:?}", self.data_path);
        let events = load_events(&self.data_path)?;
        let events_loaded = events.len();

        info!("Deriving features...");
        let table = build_features(events);
        if table.is_empty() {
            return Err(PipelineError::EmptyFeatureTable {
                dropped: table.dropped,
            }
            .into());
        }

        info!("Training model on {} samples...", table.len());
        let model = GradientBoostedRegressor::fit_table(&table, self.params.clone())?;

        let fitted = model.predict_rows(&table.matrix())?;
        let sq_err: f64 = fitted
            .iter()
            .zip(table.targets())
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let training_rmse = (sq_err / fitted.len() as f64).sqrt();
        info!("In-sample RMSE: {:.2}", training_rmse);

        model_store::save(&model, &self.model_path)?;

        Ok(TrainingSummary {
            events_loaded,
            rows_dropped: table.dropped,
            samples_trained: table.len(),
            training_rmse,
            model_path: self.model_path.clone(),
        })
    }
}
