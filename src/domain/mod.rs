// Cash loading business rules
pub mod cash;

// Forecasting features and tables
pub mod ml;

// Monitoring log records
pub mod prediction_log;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
