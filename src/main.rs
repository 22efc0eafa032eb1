//! ATM cash advisor console.
//!
//! Forecasts hourly withdrawal demand for a chosen date and hour, recommends a
//! cash load, compares its cost with the fixed-loading policy, and records the
//! result in the monitoring log.

use anyhow::Result;
use atm_cash::application::advisory::cash_advisor::{
    DEFAULT_HOUR, DEFAULT_LAG_1, DEFAULT_LAG_24, DEFAULT_ROLLING_MEAN_3, DEFAULT_ROLLING_MEAN_24,
};
use atm_cash::application::advisory::explainability::{CAPTION, LEGEND};
use atm_cash::application::advisory::{AnalysisRequest, CashAdvisor, ExplainabilityChart};
use atm_cash::application::ml::InferenceEngine;
use atm_cash::config::Config;
use atm_cash::domain::ml::HistoryFeatures;
use atm_cash::domain::repositories::PredictionLogRepository;
use atm_cash::infrastructure::persistence::{
    Database, SqlitePredictionLogRepository, UnavailablePredictionLog,
};
use atm_cash::interfaces::report::{render_history, render_outcome};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "ATM cash flow optimisation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Forecast demand and price the recommended load
    Analyze {
        /// Target date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Hour of day
        #[arg(long, default_value_t = DEFAULT_HOUR, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour: u32,

        /// Withdrawal one hour earlier
        #[arg(long, default_value_t = DEFAULT_LAG_1)]
        lag_1: f64,

        /// Withdrawal at the same hour yesterday
        #[arg(long, default_value_t = DEFAULT_LAG_24)]
        lag_24: f64,

        /// Mean withdrawal over the last 3 hours
        #[arg(long, default_value_t = DEFAULT_ROLLING_MEAN_3)]
        rolling_mean_3: f64,

        /// Mean withdrawal over the last 24 hours
        #[arg(long, default_value_t = DEFAULT_ROLLING_MEAN_24)]
        rolling_mean_24: f64,
    },
    /// Show the latest logged predictions
    History,
    /// Show the feature attribution chart location and legend
    Explain,
    /// Report whether the forecast engine is ready
    Status,
}

async fn open_log(database_url: &str) -> Arc<dyn PredictionLogRepository> {
    match Database::new(database_url).await {
        Ok(db) => Arc::new(SqlitePredictionLogRepository::new(db.pool)),
        Err(e) => {
            warn!("Monitoring database unavailable: {:#}", e);
            Arc::new(UnavailablePredictionLog::new(format!("{:#}", e)))
        }
    }
}

fn explain(config: &Config) {
    match ExplainabilityChart::locate(&config.paths.explainability_image_path) {
        ExplainabilityChart::Available(path) => {
            println!("{}: {}", CAPTION, path.display());
            for line in LEGEND {
                println!("  * {}", line);
            }
        }
        missing => {
            if let Some(msg) = missing.warning() {
                println!("WARNING: {}", msg);
            }
        }
    }
}

fn print_missing_model(config: &Config) {
    println!(
        "ERROR: model file not found or unreadable: {}",
        config.paths.model_path.display()
    );
    println!("Train the model first with `cargo run --bin train`.");
}

/// Engine and log store are opened once and shared with the advisor.
async fn build_advisor(config: Arc<Config>) -> CashAdvisor {
    let engine = Arc::new(InferenceEngine::new(config.paths.model_path.clone()));
    let log = open_log(&config.paths.database_url).await;
    CashAdvisor::new(engine, config, log)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = Arc::new(Config::from_env()?);

    match cli.command {
        Command::Explain => explain(&config),
        Command::Status => {
            let engine = InferenceEngine::new(config.paths.model_path.clone());
            if engine.is_usable() {
                println!(
                    "System ready: {} loaded from {}",
                    engine.model_name().unwrap_or("model"),
                    engine
                        .model_path()
                        .unwrap_or(config.paths.model_path.as_path())
                        .display()
                );
            } else {
                print_missing_model(&config);
            }
        }
        Command::History => {
            let advisor = build_advisor(config.clone()).await;
            match advisor.recent_history().await {
                Ok(records) => print!("{}", render_history(&records)),
                Err(e) => println!("ERROR: could not read the monitoring log: {:#}", e),
            }
        }
        Command::Analyze {
            date,
            hour,
            lag_1,
            lag_24,
            rolling_mean_3,
            rolling_mean_24,
        } => {
            let advisor = build_advisor(config.clone()).await;
            if !advisor.engine().is_usable() {
                print_missing_model(&config);
                return Ok(());
            }

            let request = AnalysisRequest {
                target_date: date.unwrap_or_else(|| Local::now().date_naive()),
                hour,
                history: HistoryFeatures {
                    lag_1,
                    lag_24,
                    rolling_mean_3,
                    rolling_mean_24,
                },
            };
            info!("Analyzing {:?}", request);

            let outcome = advisor.analyze(request).await?;
            print!(
                "{}",
                render_outcome(
                    &outcome,
                    config.cash_rules(),
                    config.drift_policy().max_normal_lag
                )
            );
        }
    }

    Ok(())
}
