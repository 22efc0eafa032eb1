use crate::domain::errors::PipelineError;
use crate::domain::ml::WithdrawalEvent;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

pub const ATM_COLUMN: &str = "atmName";
pub const TIME_COLUMN: &str = "transactionTime";
pub const TARGET_COLUMN: &str = "totalOutcome";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Empty, `NaN` and `NA` cells are missing values.
fn parse_amount(raw: &str, row: usize) -> Result<Option<f64>, PipelineError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(|v| (!v.is_nan()).then_some(v))
        .map_err(|_| PipelineError::InvalidAmount {
            row,
            value: raw.to_string(),
        })
}

/// Reads withdrawal events from CSV data with a header row.
///
/// Columns other than `atmName`, `transactionTime` and `totalOutcome` are
/// ignored. The timestamp column is checked first.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<WithdrawalEvent>, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
            })
    };
    let time_idx = column(TIME_COLUMN)?;
    let atm_idx = column(ATM_COLUMN)?;
    let target_idx = column(TARGET_COLUMN)?;

    let mut events = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let raw_time = record.get(time_idx).unwrap_or_default();
        let transaction_time =
            parse_timestamp(raw_time).ok_or_else(|| PipelineError::InvalidTimestamp {
                row,
                value: raw_time.to_string(),
            })?;

        events.push(WithdrawalEvent {
            atm_name: record.get(atm_idx).unwrap_or_default().trim().to_string(),
            transaction_time,
            total_outcome: parse_amount(record.get(target_idx).unwrap_or_default(), row)?,
        });
    }

    Ok(events)
}

pub fn load_events(path: &Path) -> Result<Vec<WithdrawalEvent>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(csv::Error::from)?;
    let events = read_events(BufReader::new(file))?;
    info!("Loaded {} withdrawal events from {:?}", events.len(), path);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_timestamp_formats() {
        for raw in [
            "2024-01-05 13:00:00",
            "2024-01-05T13:00:00",
            "2024-01-05 13:00",
            "2024-01-05T13:00:00+03:00",
            "2024-01-05 13:00:00.250",
        ] {
            let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {}", raw));
            assert_eq!(ts.hour(), 13, "{}", raw);
        }
        assert_eq!(parse_timestamp("2024-01-05").unwrap().hour(), 0);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let data = "atmName,weekday,transactionTime,totalOutcome\n\
                    Big Street,MONDAY,2024-01-01 00:00:00,1200\n\
                    Big Street,MONDAY,2024-01-01 01:00:00,\n";
        let events = read_events(data.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].atm_name, "Big Street");
        assert_eq!(events[0].total_outcome, Some(1200.0));
        assert_eq!(events[1].total_outcome, None);
    }

    #[test]
    fn test_missing_time_column() {
        let data = "atmName,totalOutcome\nA,10\n";
        let err = read_events(data.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { column } if column == TIME_COLUMN));
    }

    #[test]
    fn test_bad_timestamp_reports_row() {
        let data = "atmName,transactionTime,totalOutcome\nA,2024-01-01 00:00:00,1\nA,soon,2\n";
        let err = read_events(data.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTimestamp { row: 2, .. }));
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let data = "atmName,transactionTime,totalOutcome\nA,2024-01-01 00:00:00,lots\n";
        assert!(matches!(
            read_events(data.as_bytes()),
            Err(PipelineError::InvalidAmount { row: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_events(Path::new("/no/such/atm_data.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound { .. }));
    }
}
