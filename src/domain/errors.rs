use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning the raw withdrawal dataset into a feature table
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input dataset not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' is missing from the dataset")]
    MissingColumn { column: String },

    #[error("Row {row}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Row {row}: cannot parse amount '{value}'")]
    InvalidAmount { row: usize, value: String },

    #[error("Feature table is empty after dropping {dropped} incomplete rows")]
    EmptyFeatureTable { dropped: usize },
}

/// Errors related to the forecast model and its artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training failed: {0}")]
    Training(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Feature contract mismatch: expected {expected:?}, got {actual:?}")]
    FeatureContractMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Invalid prediction input: {0}")]
    InvalidInput(String),
}

/// Anything that can abort the batch training job
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_formatting() {
        let err = PipelineError::MissingColumn {
            column: "transactionTime".to_string(),
        };
        assert!(err.to_string().contains("transactionTime"));
    }

    #[test]
    fn test_contract_mismatch_lists_both_sides() {
        let err = ModelError::FeatureContractMismatch {
            expected: vec!["hour".to_string()],
            actual: vec!["minute".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("hour"));
        assert!(msg.contains("minute"));
    }

    #[test]
    fn test_training_error_is_transparent() {
        let err: TrainingError = PipelineError::EmptyFeatureTable { dropped: 24 }.into();
        assert_eq!(
            err.to_string(),
            "Feature table is empty after dropping 24 incomplete rows"
        );
    }
}
