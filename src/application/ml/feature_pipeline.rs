//! Per-ATM feature derivation.
//!
//! Events are sorted by `(atm_name, transaction_time)`, split into contiguous
//! per-ATM runs, and each run is walked once to produce lag and trailing-mean
//! values. A row only becomes trainable once every feature is defined, which
//! requires at least `MIN_HISTORY` prior observations for the same ATM.

use crate::domain::ml::{
    CalendarFeatures, FeatureRow, FeatureTable, FeatureVector, HistoryFeatures, MIN_HISTORY,
    WithdrawalEvent,
};
use std::cmp::Ordering;
use tracing::info;

fn chronological(a: &WithdrawalEvent, b: &WithdrawalEvent) -> Ordering {
    a.atm_name
        .cmp(&b.atm_name)
        .then(a.transaction_time.cmp(&b.transaction_time))
}

/// Target `k` positions before `i`.
fn lag(targets: &[Option<f64>], i: usize, k: usize) -> Option<f64> {
    i.checked_sub(k).and_then(|j| targets[j])
}

/// Mean of the `window` targets strictly before `i`.
fn trailing_mean(targets: &[Option<f64>], i: usize, window: usize) -> Option<f64> {
    let start = i.checked_sub(window)?;
    let sum = targets[start..i]
        .iter()
        .try_fold(0.0, |acc, v| v.map(|x| acc + x))?;
    Some(sum / window as f64)
}

/// History features at position `i` of one ATM's ordered target series.
///
/// Only positions `< i` are read, so a row's own target never leaks into its
/// features.
pub fn history_at(targets: &[Option<f64>], i: usize) -> Option<HistoryFeatures> {
    Some(HistoryFeatures {
        lag_1: lag(targets, i, 1)?,
        lag_24: lag(targets, i, MIN_HISTORY)?,
        rolling_mean_3: trailing_mean(targets, i, 3)?,
        rolling_mean_24: trailing_mean(targets, i, MIN_HISTORY)?,
    })
}

fn derive_group(group: &[WithdrawalEvent], out: &mut Vec<FeatureRow>) -> usize {
    let targets: Vec<Option<f64>> = group.iter().map(|e| e.total_outcome).collect();
    let mut dropped = 0;

    for (i, event) in group.iter().enumerate() {
        match (event.total_outcome, history_at(&targets, i)) {
            (Some(target), Some(history)) => out.push(FeatureRow {
                atm_name: event.atm_name.clone(),
                transaction_time: event.transaction_time,
                features: FeatureVector::new(
                    CalendarFeatures::from_datetime(event.transaction_time),
                    history,
                ),
                target,
            }),
            _ => dropped += 1,
        }
    }

    dropped
}

/// Builds the trainable feature table from raw events.
pub fn build_features(mut events: Vec<WithdrawalEvent>) -> FeatureTable {
    let initial_len = events.len();
    events.sort_by(chronological);

    let mut rows = Vec::with_capacity(initial_len);
    let mut dropped = 0;
    let mut atm_count = 0;
    for group in events.chunk_by(|a, b| a.atm_name == b.atm_name) {
        dropped += derive_group(group, &mut rows);
        atm_count += 1;
    }

    info!(
        "Feature derivation complete: {} ATMs, {} rows kept, {} incomplete rows removed",
        atm_count,
        rows.len(),
        dropped
    );

    FeatureTable { rows, dropped }
}
