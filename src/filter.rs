//! Zip code display filter.
//!
//! Tracks the full universe of zip codes discovered at load time separately
//! from the subset currently enabled for display, so an unknown zip can be
//! rejected even while every known zip is disabled.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::reading::Reading;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("zip code '{0}' does not appear in the loaded data")]
    UnknownZipCode(String),
}

/// Which zip codes are visible in aggregate output.
///
/// Created all-enabled from a fresh set of readings; mutated only by
/// [`FilterState::toggle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    known: BTreeSet<String>,
    enabled: BTreeSet<String>,
}

impl FilterState {
    /// Builds the filter for a freshly loaded reading set: every distinct
    /// zip code present, all enabled.
    pub fn from_readings(readings: &[Reading]) -> Self {
        let known: BTreeSet<String> = readings.iter().map(|r| r.zip_code.clone()).collect();
        FilterState {
            enabled: known.clone(),
            known,
        }
    }

    /// Flips the enabled state of `zip_code`, returning whether it is now
    /// enabled.
    ///
    /// # Errors
    ///
    /// Fails with [`FilterError::UnknownZipCode`] if the zip was never seen
    /// in the loaded data; the filter is left unchanged.
    pub fn toggle(&mut self, zip_code: &str) -> Result<bool, FilterError> {
        if !self.known.contains(zip_code) {
            return Err(FilterError::UnknownZipCode(zip_code.to_string()));
        }
        if self.enabled.remove(zip_code) {
            Ok(false)
        } else {
            self.enabled.insert(zip_code.to_string());
            Ok(true)
        }
    }

    pub fn is_enabled(&self, zip_code: &str) -> bool {
        self.enabled.contains(zip_code)
    }

    /// All zip codes seen at load time, in ascending order.
    pub fn known_zips(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }
}
