pub mod dataset;
pub mod persistence;
