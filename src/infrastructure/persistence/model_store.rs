//! On-disk storage for the fitted demand model.
//!
//! The artifact is a single JSON document. It is written to a sibling temp
//! file and renamed into place, so a failed save never leaves a truncated
//! model behind.

use crate::application::ml::gbm::GradientBoostedRegressor;
use crate::application::ml::predictor::DemandRegressor;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::check_contract;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ModelError + '_ {
    move |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn save(model: &GradientBoostedRegressor, path: &Path) -> Result<(), ModelError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
        info!("Created model directory {:?}", parent);
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, model)?;
        writer.flush().map_err(io_err(&tmp_path))?;
    }
    fs::rename(&tmp_path, path).map_err(io_err(path))?;

    info!("Model saved to {:?}", path);
    Ok(())
}

/// Loads the artifact at `path`.
///
/// A missing file is `Ok(None)`: the model is simply unavailable. A file that
/// exists but cannot be read, parsed, or whose feature contract differs from
/// the registry is an error.
pub fn load(path: &Path) -> Result<Option<GradientBoostedRegressor>, ModelError> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(io_err(path))?;
    let model: GradientBoostedRegressor = serde_json::from_reader(BufReader::new(file))?;
    check_contract(model.feature_names())?;

    info!(
        "Loaded {} model ({} stages) from {:?}",
        model.name(),
        model.n_stages(),
        path
    );
    Ok(Some(model))
}
