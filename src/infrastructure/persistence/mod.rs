pub mod database;
pub mod model_store;
pub mod prediction_log_repository;
pub mod unavailable_log;

pub use database::Database;
pub use prediction_log_repository::SqlitePredictionLogRepository;
pub use unavailable_log::UnavailablePredictionLog;
