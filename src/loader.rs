//! CSV loader for PurpleAir sensor data.
//!
//! Parses each row into a [`Reading`], skipping malformed rows individually
//! and reporting them in the load summary. Only file-level problems (missing
//! file, empty file, header mismatch) abort a load.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::reading::{Reading, TimeBucket};

/// Columns the loader requires; extra columns in the file are ignored.
const REQUIRED_COLUMNS: [&str; 3] = ["zip_code", "timestamp", "concentration"];

/// Timestamp formats accepted in the `timestamp` column.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A file-level load failure. Per-row problems never produce this; they are
/// collected as [`RowSkip`]s instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),
    #[error("data file is empty")]
    Empty,
    #[error("header mismatch: missing required column '{0}'")]
    SchemaMismatch(&'static str),
}

/// One skipped row and the reason it was excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSkip {
    /// 1-based line number in the source file.
    pub line: u64,
    pub reason: String,
}

/// Result of a successful load: the parsed readings plus the rows that were
/// excluded along the way.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub readings: Vec<Reading>,
    pub skipped: Vec<RowSkip>,
}

impl LoadOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    zip_code: String,
    timestamp: String,
    concentration: String,
}

/// Loads readings from a comma-separated file at `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened, is empty, or its
/// header lacks a required column. Malformed data rows are skipped, not
/// fatal.
pub fn load(path: impl AsRef<Path>) -> Result<LoadOutcome, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::SchemaMismatch(required));
        }
    }

    let mut outcome = LoadOutcome::default();

    for (idx, record) in reader.deserialize::<RawRow>().enumerate() {
        // Line 1 is the header row.
        let line = idx as u64 + 2;
        let raw = match record {
            Ok(raw) => raw,
            Err(e) => {
                outcome.skipped.push(RowSkip {
                    line,
                    reason: format!("malformed record: {e}"),
                });
                continue;
            }
        };

        match parse_row(&raw) {
            Ok(reading) => outcome.readings.push(reading),
            Err(reason) => {
                debug!(line, %reason, "Skipping row");
                outcome.skipped.push(RowSkip { line, reason });
            }
        }
    }

    info!(
        path = %path.display(),
        loaded = outcome.readings.len(),
        skipped = outcome.skipped.len(),
        "Load complete"
    );

    Ok(outcome)
}

fn parse_row(raw: &RawRow) -> Result<Reading, String> {
    let concentration: f64 = raw
        .concentration
        .trim()
        .parse()
        .map_err(|_| format!("bad concentration '{}'", raw.concentration))?;
    if concentration < 0.0 || concentration.is_nan() {
        return Err(format!("negative concentration '{}'", raw.concentration));
    }

    let ts = parse_timestamp(raw.timestamp.trim())
        .ok_or_else(|| format!("bad timestamp '{}'", raw.timestamp))?;

    Ok(Reading::new(
        raw.zip_code.trim().to_string(),
        TimeBucket::from_timestamp(&ts),
        concentration,
    ))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
