//! Batch training job.
//!
//! Reads the withdrawal dataset, derives per-ATM features, fits the demand
//! model and writes the artifact. Paths come from the environment.
//!
//! # Usage
//! ```sh
//! ATM_DATA_PATH=data/atm_data.csv cargo run --bin train
//! ```
//!
//! # Environment Variables
//! - `ATM_DATA_PATH` - Input CSV (default: data/atm_data.csv)
//! - `ATM_MODEL_PATH` - Output artifact (default: models/atm_optimized_model.json)

use anyhow::Result;
use atm_cash::application::ml::TrainingJob;
use atm_cash::config::Config;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the ATM cash demand model", long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    Cli::parse();
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let config = Config::from_env()?;
    let job = TrainingJob::from_config(&config);

    info!("══════════════════════════════════════════════════════");
    info!("  ATM cash optimisation pipeline starting");
    info!("══════════════════════════════════════════════════════");

    match job.run() {
        Ok(summary) => {
            info!(
                "Loaded {} events, removed {} incomplete rows, trained on {} samples",
                summary.events_loaded, summary.rows_dropped, summary.samples_trained
            );
            info!("Model saved to {:?}", summary.model_path);
            info!("Pipeline completed. Start the advisor with `cargo run -- analyze`.");
        }
        Err(e) => {
            error!("Pipeline aborted: {}", e);
            error!(
                "No model was written. Check that {:?} exists and has the atmName, transactionTime and totalOutcome columns.",
                job.data_path
            );
        }
    }

    Ok(())
}
