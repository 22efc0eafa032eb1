pub mod csv_event_source;

pub use csv_event_source::{load_events, read_events};
