use super::feature_registry::{FeatureVector, feature_names};
use crate::domain::errors::ModelError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One withdrawal observation for one ATM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    pub atm_name: String,
    pub transaction_time: NaiveDateTime,
    /// Withdrawn amount. `None` when the source cell was empty.
    pub total_outcome: Option<f64>,
}

impl WithdrawalEvent {
    pub fn new(atm_name: impl Into<String>, transaction_time: NaiveDateTime, amount: f64) -> Self {
        Self {
            atm_name: atm_name.into(),
            transaction_time,
            total_outcome: Some(amount),
        }
    }
}

/// A trainable row: complete features plus the target
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub atm_name: String,
    pub transaction_time: NaiveDateTime,
    pub features: FeatureVector,
    pub target: f64,
}

/// Output of the feature pipeline
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    /// Rows discarded because a derived value was missing
    pub dropped: usize,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        feature_names()
    }

    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.features.to_f64_vector()).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.target).collect()
    }

    /// Rows belonging to a single ATM, in time order.
    pub fn rows_for<'a>(&'a self, atm_name: &'a str) -> impl Iterator<Item = &'a FeatureRow> + 'a {
        self.rows.iter().filter(move |r| r.atm_name == atm_name)
    }
}

/// Column-named table of model inputs.
///
/// Columns are matched to the model's feature contract by name, so a frame
/// built in any column order predicts the same as one in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a one-row frame from a flat name -> value mapping.
    pub fn from_mapping(mapping: &HashMap<String, f64>) -> Self {
        let mut columns: Vec<String> = mapping.keys().cloned().collect();
        columns.sort();
        let row = columns.iter().map(|c| mapping[c]).collect();
        Self {
            columns,
            rows: vec![row],
        }
    }

    /// Reorders a single row into `contract` order.
    pub fn single_row_in(&self, contract: &[String]) -> Result<Vec<f64>, ModelError> {
        let row = match self.rows.as_slice() {
            [row] => row,
            rows => {
                return Err(ModelError::InvalidInput(format!(
                    "expected exactly one row, got {}",
                    rows.len()
                )));
            }
        };
        if row.len() != self.columns.len() {
            return Err(ModelError::InvalidInput(format!(
                "row has {} values for {} columns",
                row.len(),
                self.columns.len()
            )));
        }

        let mut sorted_columns = self.columns.clone();
        sorted_columns.sort();
        let mut sorted_contract = contract.to_vec();
        sorted_contract.sort();
        if sorted_columns != sorted_contract {
            return Err(ModelError::FeatureContractMismatch {
                expected: contract.to_vec(),
                actual: self.columns.clone(),
            });
        }

        Ok(contract
            .iter()
            .map(|name| {
                let idx = self.columns.iter().position(|c| c == name).unwrap_or_default();
                row[idx]
            })
            .collect())
    }
}

impl From<&FeatureVector> for FeatureFrame {
    fn from(fv: &FeatureVector) -> Self {
        Self {
            columns: feature_names(),
            rows: vec![fv.to_f64_vector()],
        }
    }
}
