use crate::domain::errors::ModelError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Ordered list of feature names.
/// This order MUST match the column order the model was trained on.
/// Any change here is a breaking change for saved artifacts.
pub const FEATURE_NAMES: &[&str] = &[
    "hour",
    "day_of_week",
    "day_of_month",
    "is_weekend",
    "lag_1",
    "lag_24",
    "rolling_mean_3",
    "rolling_mean_24",
];

/// Longest look-back used by any history feature.
pub const MIN_HISTORY: usize = 24;

/// Features derived from the timestamp alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    pub hour: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub day_of_month: u32,
    pub is_weekend: bool,
}

impl CalendarFeatures {
    pub fn from_datetime(ts: NaiveDateTime) -> Self {
        Self::from_date_hour(ts.date(), ts.hour())
    }

    pub fn from_date_hour(date: NaiveDate, hour: u32) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            hour,
            day_of_week,
            day_of_month: date.day(),
            is_weekend: day_of_week >= 5,
        }
    }
}

/// Backward-looking withdrawal statistics for one ATM
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryFeatures {
    pub lag_1: f64,
    pub lag_24: f64,
    pub rolling_mean_3: f64,
    pub rolling_mean_24: f64,
}

/// One complete model input row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub calendar: CalendarFeatures,
    pub history: HistoryFeatures,
}

impl FeatureVector {
    pub fn new(calendar: CalendarFeatures, history: HistoryFeatures) -> Self {
        Self { calendar, history }
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn to_f64_vector(&self) -> Vec<f64> {
        vec![
            self.calendar.hour as f64,
            self.calendar.day_of_week as f64,
            self.calendar.day_of_month as f64,
            if self.calendar.is_weekend { 1.0 } else { 0.0 },
            self.history.lag_1,
            self.history.lag_24,
            self.history.rolling_mean_3,
            self.history.rolling_mean_24,
        ]
    }
}

pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Verifies that `actual` names the registry's features in the registry's order.
pub fn check_contract(actual: &[String]) -> Result<(), ModelError> {
    let matches = actual.len() == FEATURE_NAMES.len()
        && actual.iter().zip(FEATURE_NAMES).all(|(a, e)| a == e);
    if matches {
        Ok(())
    } else {
        Err(ModelError::FeatureContractMismatch {
            expected: feature_names(),
            actual: actual.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector::new(
            CalendarFeatures::from_date_hour(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(), 14),
            HistoryFeatures {
                lag_1: 1500.0,
                lag_24: 4200.0,
                rolling_mean_3: 1800.0,
                rolling_mean_24: 3500.0,
            },
        )
    }

    #[test]
    fn test_feature_vector_length() {
        assert_eq!(sample().to_f64_vector().len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_feature_consistency() {
        let vec = sample().to_f64_vector();
        // 2024-03-16 is a Saturday
        assert_eq!(vec[0], 14.0);
        assert_eq!(vec[1], 5.0);
        assert_eq!(vec[2], 16.0);
        assert_eq!(vec[3], 1.0);
        // rolling_mean_24 is last
        assert_eq!(vec[7], 3500.0);
    }

    #[test]
    fn test_weekday_is_not_weekend() {
        let cal = CalendarFeatures::from_date_hour(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 0);
        assert_eq!(cal.day_of_week, 4);
        assert!(!cal.is_weekend);
    }

    #[test]
    fn test_contract_check() {
        assert!(check_contract(&feature_names()).is_ok());

        let mut swapped = feature_names();
        swapped.swap(4, 5);
        assert!(matches!(
            check_contract(&swapped),
            Err(ModelError::FeatureContractMismatch { .. })
        ));
    }
}
