//! # Condition configurations
//!
//! Typed, serde-deserializable configuration of each built-in condition. A use case lists
//! them as a sequence of [`ConditionConfig`] values, internally tagged by the `condition`
//! field:
//!
//! ```json
//! { "condition": "time-delta", "entries": [ { "seconds": 300 } ] }
//! ```
//!
//! Secondary sensor names
//! -----------------
//! Lists of secondary names are trimmed and blank names are ignored. An empty list selects
//! the single secondary of a one-secondary use case. Within one condition, entries with
//! and without names may not be mixed, and at most one unnamed entry is allowed.
use std::collections::HashSet;

use serde::Deserialize;

use crate::{
    constants::{Kilometer, Pixel, SensorName, ONLY_ONE_SECONDARY},
    matchup_errors::MatchupError,
    samples::SensorRole,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "condition", rename_all = "kebab-case")]
pub enum ConditionConfig {
    TimeDelta(TimeDeltaConfig),
    SphericalDistance(DistanceConfig),
    BorderDistance(BorderDistanceConfig),
    PixelPosition(PixelPositionConfig),
    OverlapRemove(OverlapRemoveConfig),
    UniqueSamples(UniqueSamplesConfig),
}

impl ConditionConfig {
    /// Tag of the condition this configuration builds, as registered in the
    /// [`ConditionRegistry`](crate::condition::registry::ConditionRegistry).
    pub fn tag(&self) -> &'static str {
        use crate::condition::{
            border_distance, distance, overlap_remove, pixel_position, time_delta, unique_samples,
        };
        match self {
            ConditionConfig::TimeDelta(_) => time_delta::TAG,
            ConditionConfig::SphericalDistance(_) => distance::TAG,
            ConditionConfig::BorderDistance(_) => border_distance::TAG,
            ConditionConfig::PixelPosition(_) => pixel_position::TAG,
            ConditionConfig::OverlapRemove(_) => overlap_remove::TAG,
            ConditionConfig::UniqueSamples(_) => unique_samples::TAG,
        }
    }

    pub fn validate(&self) -> Result<(), MatchupError> {
        match self {
            ConditionConfig::TimeDelta(config) => config.validate(),
            ConditionConfig::SphericalDistance(config) => config.validate(),
            ConditionConfig::BorderDistance(config) => config.validate(),
            ConditionConfig::PixelPosition(config) => config.validate(),
            ConditionConfig::OverlapRemove(_) => Ok(()),
            ConditionConfig::UniqueSamples(config) => config.validate(),
        }
    }
}

fn invalid(message: impl Into<String>) -> MatchupError {
    MatchupError::InvalidConfiguration(message.into())
}

/// Trimmed, non-blank names in declaration order.
pub fn normalize_names(names: &[String]) -> Vec<SensorName> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`normalize_names`], falling back to the single-secondary name for an empty list.
pub fn secondary_names_or_default(names: &[String]) -> Vec<SensorName> {
    let names = normalize_names(names);
    if names.is_empty() {
        vec![ONLY_ONE_SECONDARY.to_string()]
    } else {
        names
    }
}

fn check_named_entries<'a>(
    condition: &str,
    entries: impl IntoIterator<Item = &'a [String]>,
) -> Result<(), MatchupError> {
    let (unnamed, named): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .map(normalize_names)
        .partition(|names| names.is_empty());

    if !unnamed.is_empty() && !named.is_empty() {
        return Err(invalid(format!(
            "{condition} entries with and without secondary sensor names may not be mixed"
        )));
    }
    if unnamed.len() > 1 {
        return Err(invalid(format!(
            "{condition} may be defined only once without secondary sensor names"
        )));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

// --- time-delta ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeDeltaConfig {
    pub entries: Vec<TimeDeltaEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeDeltaEntry {
    pub seconds: i64,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default = "default_true")]
    pub primary_check: bool,
    #[serde(default)]
    pub secondary_check: bool,
}

impl TimeDeltaEntry {
    /// Primary check of the given secondaries, or of the single secondary if `names` is empty.
    pub fn new(seconds: i64, names: Vec<String>) -> Self {
        TimeDeltaEntry {
            seconds,
            names,
            primary_check: true,
            secondary_check: false,
        }
    }
}

impl TimeDeltaConfig {
    pub fn validate(&self) -> Result<(), MatchupError> {
        if self.entries.is_empty() {
            return Err(invalid("time-delta needs at least one entry"));
        }
        for entry in &self.entries {
            if entry.seconds < 0 {
                return Err(invalid("time-delta seconds must be >= 0"));
            }
            if !entry.primary_check && !entry.secondary_check {
                return Err(invalid(
                    "At least primary_check or secondary_check must be true.",
                ));
            }
            if entry.secondary_check && normalize_names(&entry.names).len() < 2 {
                return Err(invalid(
                    "If secondary_check is true at least two secondary sensor names are needed.",
                ));
            }
        }
        check_named_entries("time-delta", self.entries.iter().map(|e| e.names.as_slice()))
    }

    /// Largest configured delta, in seconds.
    pub fn max_seconds(&self) -> Option<i64> {
        self.entries.iter().map(|entry| entry.seconds).max()
    }
}

// --- spherical-distance ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistanceConfig {
    pub entries: Vec<DistanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistanceEntry {
    pub max_pixel_distance_km: Kilometer,
    #[serde(default)]
    pub names: Vec<String>,
}

impl DistanceConfig {
    pub fn validate(&self) -> Result<(), MatchupError> {
        if self.entries.is_empty() {
            return Err(invalid("spherical-distance needs at least one entry"));
        }
        let valid_km = |km: Kilometer| km.is_finite() && km >= 0.0;
        if !self
            .entries
            .iter()
            .all(|entry| valid_km(entry.max_pixel_distance_km))
        {
            return Err(invalid(
                "max_pixel_distance_km must be a finite, non-negative number",
            ));
        }
        check_named_entries(
            "spherical-distance",
            self.entries.iter().map(|e| e.names.as_slice()),
        )
    }
}

// --- border-distance ---

/// Minimum distance to the raster border along x (`nx`) and y (`ny`), in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BorderMargins {
    pub nx: Pixel,
    pub ny: Pixel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecondaryBorderMargins {
    #[serde(default)]
    pub names: Vec<String>,
    pub nx: Pixel,
    pub ny: Pixel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BorderDistanceConfig {
    #[serde(default)]
    pub primary: Option<BorderMargins>,
    #[serde(default)]
    pub secondaries: Vec<SecondaryBorderMargins>,
}

impl BorderDistanceConfig {
    pub fn validate(&self) -> Result<(), MatchupError> {
        let margins = self
            .primary
            .iter()
            .map(|m| (m.nx, m.ny))
            .chain(self.secondaries.iter().map(|m| (m.nx, m.ny)));
        for (nx, ny) in margins {
            if nx < 0 || ny < 0 {
                return Err(invalid("border-distance margins must be >= 0"));
            }
        }

        let mut seen = HashSet::new();
        for name in self
            .secondaries
            .iter()
            .flat_map(|entry| normalize_names(&entry.names))
        {
            if !seen.insert(name.clone()) {
                return Err(invalid(format!(
                    "border-distance secondary sensor name '{name}' is defined more than once"
                )));
            }
        }

        check_named_entries(
            "border-distance",
            self.secondaries.iter().map(|e| e.names.as_slice()),
        )
    }
}

// --- pixel-position ---

fn pixel_min() -> Pixel {
    Pixel::MIN
}

fn pixel_max() -> Pixel {
    Pixel::MAX
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PixelPositionConfig {
    #[serde(default = "pixel_min")]
    pub min_x: Pixel,
    #[serde(default = "pixel_max")]
    pub max_x: Pixel,
    #[serde(default = "pixel_min")]
    pub min_y: Pixel,
    #[serde(default = "pixel_max")]
    pub max_y: Pixel,
    #[serde(default)]
    pub reference: SensorRole,
    #[serde(default)]
    pub names: Vec<String>,
}

impl Default for PixelPositionConfig {
    fn default() -> Self {
        PixelPositionConfig {
            min_x: Pixel::MIN,
            max_x: Pixel::MAX,
            min_y: Pixel::MIN,
            max_y: Pixel::MAX,
            reference: SensorRole::Primary,
            names: Vec::new(),
        }
    }
}

impl PixelPositionConfig {
    pub fn validate(&self) -> Result<(), MatchupError> {
        if self.min_x > self.max_x {
            return Err(invalid("pixel-position min_x must be <= max_x"));
        }
        if self.min_y > self.max_y {
            return Err(invalid("pixel-position min_y must be <= max_y"));
        }

        let names = normalize_names(&self.names);
        if self.reference.is_primary() && !names.is_empty() {
            return Err(invalid(
                "pixel-position secondary sensor names require a secondary reference",
            ));
        }
        let mut seen = HashSet::new();
        if let Some(name) = names.iter().find(|name| !seen.insert(*name)) {
            return Err(invalid(format!(
                "pixel-position secondary sensor name '{name}' is defined more than once"
            )));
        }
        Ok(())
    }

    /// Roles whose pixel is checked.
    pub fn roles(&self) -> Vec<SensorRole> {
        let names = normalize_names(&self.names);
        if self.reference.is_primary() || names.is_empty() {
            vec![self.reference.clone()]
        } else {
            names.into_iter().map(SensorRole::Secondary).collect()
        }
    }
}

// --- overlap-remove ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OverlapRemoveConfig {
    #[serde(default)]
    pub reference: SensorRole,
}

// --- unique-samples ---

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UniqueSamplesConfig {
    pub reference_sensor: String,
    pub associated_sensor: String,
}

impl UniqueSamplesConfig {
    pub fn validate(&self) -> Result<(), MatchupError> {
        let reference = self.reference_sensor.trim();
        let associated = self.associated_sensor.trim();
        if reference.is_empty() || associated.is_empty() {
            return Err(invalid(
                "unique-samples needs both reference_sensor and associated_sensor",
            ));
        }
        if reference.parse::<SensorRole>()? == associated.parse::<SensorRole>()? {
            return Err(invalid(
                "unique-samples reference_sensor and associated_sensor must differ",
            ));
        }
        Ok(())
    }
}
