//! Core domain types: a single sensor observation and its time-of-day bucket.

use chrono::{NaiveDateTime, Timelike};

/// One of four fixed day segments a reading's timestamp falls into.
///
/// The declared variant order is the fixed display and sort order used by
/// aggregate tables: Morning, Midday, Evening, Night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeBucket {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeBucket {
    /// All buckets in the fixed table-column order.
    pub const ALL: [TimeBucket; 4] = [
        TimeBucket::Morning,
        TimeBucket::Midday,
        TimeBucket::Evening,
        TimeBucket::Night,
    ];

    /// Derives the bucket from a timestamp's time of day.
    ///
    /// Boundaries: Morning 06:00–11:59, Midday 12:00–16:59,
    /// Evening 17:00–20:59, Night 21:00–05:59. Total: every hour of the day
    /// maps to exactly one bucket.
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        match ts.hour() {
            6..=11 => TimeBucket::Morning,
            12..=16 => TimeBucket::Midday,
            17..=20 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "Morning",
            TimeBucket::Midday => "Midday",
            TimeBucket::Evening => "Evening",
            TimeBucket::Night => "Night",
        }
    }
}

/// One sensor observation, immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Postal code as a string; leading zeros are significant.
    pub zip_code: String,
    pub bucket: TimeBucket,
    /// Particulate concentration in PPM. Never negative; rows violating
    /// this are dropped at load time.
    pub concentration: f64,
}

impl Reading {
    pub fn new(zip_code: impl Into<String>, bucket: TimeBucket, concentration: f64) -> Self {
        Reading {
            zip_code: zip_code.into(),
            bucket,
            concentration,
        }
    }
}
