//! Plain-text rendering for the operator console.

use crate::application::advisory::{AnalysisOutcome, ModelConfidence};
use crate::domain::cash::CashRules;
use crate::domain::prediction_log::PredictionLogRecord;
use std::fmt::Write;

const SPARK: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line trend of the given values, oldest first.
pub fn sparkline(values: &[f64]) -> String {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return String::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| {
            if range <= 0.0 {
                SPARK[SPARK.len() / 2]
            } else {
                let idx = ((v - min) / range * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[idx.min(SPARK.len() - 1)]
            }
        })
        .collect()
}

pub fn render_outcome(outcome: &AnalysisOutcome, rules: &CashRules, max_normal_lag: f64) -> String {
    let mut out = String::new();
    let rec = &outcome.recommendation;

    if outcome.drift_detected {
        let _ = writeln!(
            out,
            "WARNING (data drift): lag_24 = {:.0} is above the normal limit of {:.0}.",
            outcome.request.history.lag_24, max_normal_lag
        );
    }

    let _ = writeln!(out, "Forecast results");
    let _ = writeln!(out, "  Predicted demand:  {:>12.0}", outcome.prediction);
    let _ = writeln!(
        out,
        "  Recommended load:  {:>12} ({} safety)",
        rec.safe_margin.round_dp(0),
        rules.margin_label()
    );
    let _ = write!(out, "  Model confidence:  {}", outcome.confidence);
    if outcome.confidence == ModelConfidence::Low {
        let _ = write!(out, " (input outside normal range)");
    }
    let _ = writeln!(out);

    let _ = writeln!(out);
    let _ = writeln!(out, "Financial impact");
    let _ = writeln!(
        out,
        "  Traditional cost:  {:>12}",
        rec.impact.traditional_cost.round_dp(2)
    );
    let _ = writeln!(out, "  Forecast cost:     {:>12}", rec.impact.ai_cost.round_dp(2));
    let _ = writeln!(out, "  Saving:            {:>12}", rec.impact.saving.round_dp(2));
    let _ = writeln!(out, "  {}", rec.impact.scenario.explanation());

    match &outcome.log_error {
        None => {
            let _ = writeln!(out, "\nPrediction saved to the monitoring log.");
        }
        Some(e) => {
            let _ = writeln!(out, "\nNOTICE: prediction was not logged: {}", e);
        }
    }

    out
}

/// Table of log rows (newest first) followed by the prediction trend.
pub fn render_history(records: &[PredictionLogRecord]) -> String {
    if records.is_empty() {
        return "No predictions recorded yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<27} {:<10} {:>4} {:>10} {:>12} {:>12} {:>10}",
        "timestamp", "date", "hour", "lag_24", "prediction", "safe_margin", "saving"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:<27} {:<10} {:>4} {:>10.0} {:>12.0} {:>12.0} {:>10.2}",
            r.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            r.target_date,
            r.input_hour,
            r.lag_24,
            r.prediction,
            r.safe_margin,
            r.business_saving
        );
    }

    let trend: Vec<f64> = records.iter().rev().map(|r| r.prediction).collect();
    let _ = writeln!(out, "\nPrediction trend: {}", sparkline(&trend));
    out
}
