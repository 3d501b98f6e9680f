//! # Condition engine context
//!
//! Run parameters shared by all conditions of one pipeline run:
//!
//! - the processing interval (`start_date`, `end_date`, inclusive, in epoch milliseconds),
//! - the native raster size of the primary and of each named secondary sensor,
//! - the extraction window size of the primary and of each named secondary sensor,
//! - the [`MissingSecondaryPolicy`] applied when a configured secondary is absent.
//!
//! Nothing here is validated eagerly. Conditions query what they need and fail with a
//! configuration error only when they actually use a missing parameter; the time range
//! in particular is checked by [`ConditionEngineContext::validate_time`] once range
//! filtering runs.
use ahash::AHashMap;
use hifitime::Epoch;
use serde::Deserialize;

use crate::{
    constants::{Millis, Pixel, SensorName},
    matchup_errors::MatchupError,
    samples::SensorRole,
    time::epoch_to_millis,
};

use super::MissingSecondaryPolicy;

/// Width (`nx`) and height (`ny`) of a raster or extraction window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Dimension {
    pub nx: Pixel,
    pub ny: Pixel,
}

impl Dimension {
    pub fn new(nx: Pixel, ny: Pixel) -> Self {
        Dimension { nx, ny }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConditionEngineContext {
    start_date: Option<Millis>,
    end_date: Option<Millis>,
    primary_raster_size: Option<Dimension>,
    secondary_raster_sizes: AHashMap<SensorName, Dimension>,
    primary_extract_size: Option<Dimension>,
    secondary_extract_sizes: AHashMap<SensorName, Dimension>,
    missing_secondary_policy: MissingSecondaryPolicy,
}

impl ConditionEngineContext {
    pub fn new() -> Self {
        ConditionEngineContext::default()
    }

    // --- Time range ---

    pub fn start_date(&self) -> Option<Millis> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<Millis> {
        self.end_date
    }

    pub fn set_start_date(&mut self, start: Millis) {
        self.start_date = Some(start);
    }

    pub fn set_end_date(&mut self, end: Millis) {
        self.end_date = Some(end);
    }

    pub fn set_start_epoch(&mut self, start: &Epoch) {
        self.start_date = Some(epoch_to_millis(start));
    }

    pub fn set_end_epoch(&mut self, end: &Epoch) {
        self.end_date = Some(epoch_to_millis(end));
    }

    /// Builder-style setter for both date bounds, in epoch milliseconds.
    pub fn with_time_range(mut self, start: Millis, end: Millis) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Check that both date bounds are set and ordered.
    ///
    /// Return
    /// ----------
    /// * `(start, end)` in epoch milliseconds, or one of
    ///   [`MatchupError::MissingStartDate`], [`MatchupError::MissingEndDate`],
    ///   [`MatchupError::InvalidTimeRange`].
    pub fn validate_time(&self) -> Result<(Millis, Millis), MatchupError> {
        let start = self.start_date.ok_or(MatchupError::MissingStartDate)?;
        let end = self.end_date.ok_or(MatchupError::MissingEndDate)?;
        if start > end {
            return Err(MatchupError::InvalidTimeRange { start, end });
        }
        Ok((start, end))
    }

    // --- Raster sizes ---

    pub fn set_primary_raster_size(&mut self, size: Dimension) {
        self.primary_raster_size = Some(size);
    }

    pub fn set_secondary_raster_size(&mut self, name: impl Into<SensorName>, size: Dimension) {
        self.secondary_raster_sizes.insert(name.into(), size);
    }

    /// Native raster size of the sensor playing `role`.
    pub fn raster_size(&self, role: &SensorRole) -> Result<Dimension, MatchupError> {
        let size = match role {
            SensorRole::Primary => self.primary_raster_size,
            SensorRole::Secondary(name) => self.secondary_raster_sizes.get(name).copied(),
        };
        size.ok_or_else(|| MatchupError::MissingDimension(format!("raster size of {role}")))
    }

    // --- Extraction window sizes ---

    pub fn set_primary_extract_size(&mut self, size: Dimension) {
        self.primary_extract_size = Some(size);
    }

    pub fn set_secondary_extract_size(&mut self, name: impl Into<SensorName>, size: Dimension) {
        self.secondary_extract_sizes.insert(name.into(), size);
    }

    pub fn primary_extract_size(&self) -> Option<Dimension> {
        self.primary_extract_size
    }

    pub fn secondary_extract_size(&self, name: &str) -> Option<Dimension> {
        self.secondary_extract_sizes.get(name).copied()
    }

    /// Extraction window size of the sensor playing `role`.
    pub fn extract_size(&self, role: &SensorRole) -> Result<Dimension, MatchupError> {
        let size = match role {
            SensorRole::Primary => self.primary_extract_size,
            SensorRole::Secondary(name) => self.secondary_extract_size(name),
        };
        size.ok_or_else(|| MatchupError::MissingDimension(format!("extract size of {role}")))
    }

    // --- Policy ---

    pub fn missing_secondary_policy(&self) -> MissingSecondaryPolicy {
        self.missing_secondary_policy
    }

    pub fn set_missing_secondary_policy(&mut self, policy: MissingSecondaryPolicy) {
        self.missing_secondary_policy = policy;
    }
}
