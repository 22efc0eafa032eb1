// Interactive forecast-and-log handling
pub mod advisory;

// Feature derivation, training and inference
pub mod ml;
