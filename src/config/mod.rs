//! # Use case configuration
//!
//! A [`UseCaseConfig`] describes one matchup use case: the participating sensors (exactly
//! one of them primary), the extraction window size of each sensor, the ordered list of
//! conditions to apply, and what to do with sample sets lacking a configured secondary.
//!
//! The types derive [`serde::Deserialize`], so an external loader can produce them from any
//! serde format. Programmatic construction goes through [`UseCaseConfig::builder`]:
//!
//! ```rust
//! use matchup_engine::config::UseCaseConfig;
//! use matchup_engine::samples::SensorRole;
//!
//! let use_case = UseCaseConfig::builder("avhrr-amsub")
//!     .with_sensor("avhrr-n17", true)
//!     .with_sensor("amsub-n15", false)
//!     .with_dimension("avhrr-n17", 5, 5)
//!     .with_dimension("amsub-n15", 3, 3)
//!     .with_time_delta_seconds(300, None)
//!     .with_max_pixel_distance_km(5.0, None)
//!     .with_overlap_removal(SensorRole::Primary)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(use_case.conditions.len(), 3);
//! ```
//!
//! Validation
//! -----------------
//! [`UseCaseConfig::validate`] (also run by the builder and by
//! [`ConditionEngine::configure`](crate::engine::ConditionEngine::configure)) checks:
//!
//! * sensor names are non-blank and unique, at most one sensor is primary,
//! * dimension names are unique and sizes are strictly positive,
//! * every condition configuration passes its own checks
//!   (see [`conditions`]).
use std::collections::HashSet;

use serde::Deserialize;

use crate::{
    condition::{Dimension, MissingSecondaryPolicy},
    constants::{Kilometer, Pixel, SensorName},
    matchup_errors::MatchupError,
    samples::SensorRole,
};

pub mod conditions;

pub use conditions::{
    BorderDistanceConfig, BorderMargins, ConditionConfig, DistanceConfig, DistanceEntry,
    OverlapRemoveConfig, PixelPositionConfig, SecondaryBorderMargins, TimeDeltaConfig,
    TimeDeltaEntry, UniqueSamplesConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SensorConfig {
    pub name: SensorName,
    #[serde(default)]
    pub primary: bool,
}

/// Extraction window size of the sensor `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DimensionConfig {
    pub name: SensorName,
    pub nx: Pixel,
    pub ny: Pixel,
}

impl DimensionConfig {
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.nx, self.ny)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UseCaseConfig {
    pub name: String,
    pub sensors: Vec<SensorConfig>,
    #[serde(default)]
    pub dimensions: Vec<DimensionConfig>,
    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,
    #[serde(default)]
    pub missing_secondary_policy: MissingSecondaryPolicy,
}

impl UseCaseConfig {
    pub fn builder(name: impl Into<String>) -> UseCaseConfigBuilder {
        UseCaseConfigBuilder::new(name)
    }

    pub fn primary_sensor(&self) -> Option<&SensorConfig> {
        self.sensors.iter().find(|sensor| sensor.primary)
    }

    pub fn secondary_sensors(&self) -> impl Iterator<Item = &SensorConfig> {
        self.sensors.iter().filter(|sensor| !sensor.primary)
    }

    /// Extraction window size configured for the sensor `name`.
    pub fn dimension(&self, name: &str) -> Option<Dimension> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.name == name)
            .map(DimensionConfig::dimension)
    }

    pub fn validate(&self) -> Result<(), MatchupError> {
        let invalid = |message: String| MatchupError::InvalidConfiguration(message);

        let mut sensor_names = HashSet::new();
        for sensor in &self.sensors {
            if sensor.name.trim().is_empty() {
                return Err(invalid(format!(
                    "use case '{}': sensor name must not be empty",
                    self.name
                )));
            }
            if !sensor_names.insert(sensor.name.as_str()) {
                return Err(invalid(format!(
                    "use case '{}': sensor '{}' is defined more than once",
                    self.name, sensor.name
                )));
            }
        }
        if self.sensors.iter().filter(|sensor| sensor.primary).count() > 1 {
            return Err(invalid(format!(
                "use case '{}': only one primary sensor is allowed",
                self.name
            )));
        }

        let mut dimension_names = HashSet::new();
        for dimension in &self.dimensions {
            if !dimension_names.insert(dimension.name.as_str()) {
                return Err(invalid(format!(
                    "use case '{}': dimension of '{}' is defined more than once",
                    self.name, dimension.name
                )));
            }
            if dimension.nx <= 0 || dimension.ny <= 0 {
                return Err(invalid(format!(
                    "use case '{}': dimension of '{}' must be positive",
                    self.name, dimension.name
                )));
            }
        }

        self.conditions.iter().try_for_each(ConditionConfig::validate)
    }
}

/// Builder for [`UseCaseConfig`], with validation.
#[derive(Debug, Clone)]
pub struct UseCaseConfigBuilder {
    config: UseCaseConfig,
}

impl UseCaseConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        UseCaseConfigBuilder {
            config: UseCaseConfig {
                name: name.into(),
                sensors: Vec::new(),
                dimensions: Vec::new(),
                conditions: Vec::new(),
                missing_secondary_policy: MissingSecondaryPolicy::default(),
            },
        }
    }

    // --- Sensors ---
    pub fn with_sensor(mut self, name: impl Into<SensorName>, primary: bool) -> Self {
        self.config.sensors.push(SensorConfig {
            name: name.into(),
            primary,
        });
        self
    }
    pub fn with_dimension(mut self, name: impl Into<SensorName>, nx: Pixel, ny: Pixel) -> Self {
        self.config.dimensions.push(DimensionConfig {
            name: name.into(),
            nx,
            ny,
        });
        self
    }
    pub fn with_missing_secondary_policy(mut self, policy: MissingSecondaryPolicy) -> Self {
        self.config.missing_secondary_policy = policy;
        self
    }

    // --- Conditions ---

    /// Add a primary time-delta check against `secondary`, or against the single
    /// secondary when `None`. Repeated calls add entries to the same time-delta condition.
    pub fn with_time_delta_seconds(mut self, seconds: i64, secondary: Option<&str>) -> Self {
        let entry = TimeDeltaEntry::new(seconds, secondary.into_iter().map(str::to_string).collect());
        let existing = self.config.conditions.iter_mut().find_map(|c| match c {
            ConditionConfig::TimeDelta(config) => Some(config),
            _ => None,
        });
        match existing {
            Some(config) => config.entries.push(entry),
            None => self
                .config
                .conditions
                .push(ConditionConfig::TimeDelta(TimeDeltaConfig {
                    entries: vec![entry],
                })),
        }
        self
    }

    /// Add a maximum primary-to-secondary distance for `secondary`, or for the single
    /// secondary when `None`. Repeated calls add entries to the same distance condition.
    pub fn with_max_pixel_distance_km(mut self, km: Kilometer, secondary: Option<&str>) -> Self {
        let entry = DistanceEntry {
            max_pixel_distance_km: km,
            names: secondary.into_iter().map(str::to_string).collect(),
        };
        let existing = self.config.conditions.iter_mut().find_map(|c| match c {
            ConditionConfig::SphericalDistance(config) => Some(config),
            _ => None,
        });
        match existing {
            Some(config) => config.entries.push(entry),
            None => self
                .config
                .conditions
                .push(ConditionConfig::SphericalDistance(DistanceConfig {
                    entries: vec![entry],
                })),
        }
        self
    }
    pub fn with_border_distance(mut self, config: BorderDistanceConfig) -> Self {
        self.config
            .conditions
            .push(ConditionConfig::BorderDistance(config));
        self
    }
    pub fn with_pixel_position(mut self, config: PixelPositionConfig) -> Self {
        self.config
            .conditions
            .push(ConditionConfig::PixelPosition(config));
        self
    }
    pub fn with_overlap_removal(mut self, reference: SensorRole) -> Self {
        self.config
            .conditions
            .push(ConditionConfig::OverlapRemove(OverlapRemoveConfig { reference }));
        self
    }
    pub fn with_unique_samples(
        mut self,
        reference_sensor: impl Into<String>,
        associated_sensor: impl Into<String>,
    ) -> Self {
        self.config
            .conditions
            .push(ConditionConfig::UniqueSamples(UniqueSamplesConfig {
                reference_sensor: reference_sensor.into(),
                associated_sensor: associated_sensor.into(),
            }));
        self
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ----------
    /// * The validated [`UseCaseConfig`], or [`MatchupError::InvalidConfiguration`]
    ///   describing the first rule that failed (see [`UseCaseConfig::validate`]).
    pub fn build(self) -> Result<UseCaseConfig, MatchupError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
