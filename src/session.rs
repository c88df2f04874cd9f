//! Session state: the single owner of the loaded reading set, the zip
//! filter, and the cosmetic identity strings.
//!
//! Every menu action goes through the session, which gates aggregation and
//! filter access behind a successful load and replaces state atomically on
//! re-load.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::aggregate::{AggregateCell, aggregate};
use crate::filter::{FilterError, FilterState};
use crate::loader::{self, LoadError};
use crate::reading::Reading;

/// Longest menu header the original program accepts.
pub const MAX_HEADER_LEN: usize = 30;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("no data is loaded; load the data set first")]
    NotLoaded,
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("header must be at most {MAX_HEADER_LEN} characters")]
    HeaderTooLong,
}

/// Counts reported to the user after a load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug)]
struct Dataset {
    readings: Vec<Reading>,
    filter: FilterState,
}

/// One interactive session over the air quality database.
#[derive(Debug, Default)]
pub struct Session {
    user_name: String,
    header: String,
    data: Option<Dataset>,
}

impl Session {
    pub fn new(user_name: impl Into<String>) -> Self {
        Session {
            user_name: user_name.into(),
            header: String::new(),
            data: None,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Sets the menu header, rejecting anything longer than
    /// [`MAX_HEADER_LEN`] characters.
    pub fn set_header(&mut self, header: &str) -> Result<(), SessionError> {
        if header.chars().count() > MAX_HEADER_LEN {
            return Err(SessionError::HeaderTooLong);
        }
        self.header = header.to_string();
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Loads (or re-loads) readings from `path`.
    ///
    /// On success the prior reading set is fully replaced and the filter is
    /// reset to all-enabled for the new data. On failure prior state is left
    /// untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
        let outcome = loader::load(path)?;
        let summary = LoadSummary {
            loaded: outcome.readings.len(),
            skipped: outcome.skipped_count(),
        };
        self.data = Some(Dataset {
            filter: FilterState::from_readings(&outcome.readings),
            readings: outcome.readings,
        });
        Ok(summary)
    }

    /// Recomputes aggregate cells from the live reading set and the current
    /// filter.
    pub fn cells(&self) -> Result<Vec<AggregateCell>, SessionError> {
        let data = self.data.as_ref().ok_or(SessionError::NotLoaded)?;
        Ok(aggregate(&data.readings, &data.filter))
    }

    pub fn filter_state(&self) -> Result<&FilterState, SessionError> {
        self.data
            .as_ref()
            .map(|d| &d.filter)
            .ok_or(SessionError::NotLoaded)
    }

    /// Toggles the display filter for `zip_code`, returning whether it is
    /// now enabled.
    pub fn toggle_zip(&mut self, zip_code: &str) -> Result<bool, SessionError> {
        let data = self.data.as_mut().ok_or(SessionError::NotLoaded)?;
        let enabled = data.filter.toggle(zip_code)?;
        info!(zip_code, enabled, "Filter toggled");
        Ok(enabled)
    }
}
