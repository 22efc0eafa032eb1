use crate::domain::errors::ModelError;

/// Interface for withdrawal demand models
pub trait DemandRegressor: Send + Sync {
    /// Raw model output for one row, values in `feature_names()` order.
    /// May be negative; callers clamp.
    fn predict_row(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Ordered feature contract the model was trained on
    fn feature_names(&self) -> &[String];

    /// Get model name/type
    fn name(&self) -> &str;
}
