//! File locations parsed from environment variables.

use std::env;
use std::path::PathBuf;

/// Paths environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PathsEnvConfig {
    /// Raw withdrawal dataset read by the training job
    pub data_path: PathBuf,
    /// Model artifact written by training, read by inference
    pub model_path: PathBuf,
    /// SQLite URL of the monitoring log
    pub database_url: String,
    /// Pre-rendered feature attribution chart
    pub explainability_image_path: PathBuf,
}

impl Default for PathsEnvConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/atm_data.csv"),
            model_path: PathBuf::from("models/atm_optimized_model.json"),
            database_url: "sqlite://monitoring.db".to_string(),
            explainability_image_path: PathBuf::from("notebooks/shap_summary.png"),
        }
    }
}

impl PathsEnvConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_path: var("ATM_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            model_path: var("ATM_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            explainability_image_path: var("EXPLAINABILITY_IMAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.explainability_image_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_defaults() {
        let config = PathsEnvConfig::from_vars(|_| None);
        assert_eq!(config, PathsEnvConfig::default());
        assert_eq!(config.database_url, "sqlite://monitoring.db");
    }

    #[test]
    fn test_model_path_override() {
        let config = PathsEnvConfig::from_vars(|k| {
            (k == "ATM_MODEL_PATH").then(|| "/tmp/m.json".to_string())
        });
        assert_eq!(config.model_path, PathBuf::from("/tmp/m.json"));
        assert_eq!(config.data_path, PathBuf::from("data/atm_data.csv"));
    }
}
