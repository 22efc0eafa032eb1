pub mod feature_registry;
pub mod types;

pub use feature_registry::{
    CalendarFeatures, FEATURE_NAMES, FeatureVector, HistoryFeatures, MIN_HISTORY,
};
pub use types::{FeatureFrame, FeatureRow, FeatureTable, WithdrawalEvent};
