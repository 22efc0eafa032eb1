pub mod feature_pipeline;
pub mod gbm;
pub mod inference;
pub mod predictor;
pub mod training_job;

pub use feature_pipeline::build_features;
pub use gbm::{GbmParams, GradientBoostedRegressor};
pub use inference::{Forecast, InferenceEngine, PredictionInput};
pub use predictor::DemandRegressor;
pub use training_job::{TrainingJob, TrainingSummary};
