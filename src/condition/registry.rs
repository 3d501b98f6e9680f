//! # Condition registry
//!
//! Maps a condition tag to the factory building that condition from its
//! [`ConditionConfig`]. The default registry knows every built-in condition; callers may
//! register additional tags or replace a built-in factory.
use ahash::AHashMap;

use crate::{
    config::{
        conditions::secondary_names_or_default,
        BorderDistanceConfig, ConditionConfig, DistanceConfig, TimeDeltaConfig,
    },
    matchup_errors::MatchupError,
    samples::SensorRole,
    time::seconds_to_millis,
};

use super::{
    border_distance::{self, BorderDistanceCondition, BorderDistanceEntry},
    combine,
    distance::{self, DistanceCondition},
    overlap_remove::{self, OverlapRemoveCondition},
    pixel_position::{self, PixelPositionCondition},
    time_delta::{self, TimeDeltaCondition},
    unique_samples::{self, UniqueSamplesCondition},
    Condition,
};

pub type ConditionFactory = fn(&ConditionConfig) -> Result<Box<dyn Condition>, MatchupError>;

#[derive(Debug, Clone)]
pub struct ConditionRegistry {
    factories: AHashMap<&'static str, ConditionFactory>,
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        let mut registry = ConditionRegistry::empty();
        registry.register(time_delta::TAG, create_time_delta);
        registry.register(distance::TAG, create_distance);
        registry.register(border_distance::TAG, create_border_distance);
        registry.register(pixel_position::TAG, create_pixel_position);
        registry.register(overlap_remove::TAG, create_overlap_remove);
        registry.register(unique_samples::TAG, create_unique_samples);
        registry
    }
}

impl ConditionRegistry {
    /// A registry without any factory.
    pub fn empty() -> Self {
        ConditionRegistry {
            factories: AHashMap::new(),
        }
    }

    /// Register `factory` for `tag`, replacing any factory already registered for it.
    pub fn register(&mut self, tag: &'static str, factory: ConditionFactory) {
        self.factories.insert(tag, factory);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Build the condition described by `config`.
    ///
    /// Return
    /// ----------
    /// * The condition, [`MatchupError::UnknownCondition`] if no factory is registered for
    ///   the configuration's tag, or the factory's own validation error.
    pub fn create(&self, config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
        let tag = config.tag();
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| MatchupError::UnknownCondition(tag.to_string()))?;
        factory(config)
    }
}

fn mismatch(expected: &'static str, config: &ConditionConfig) -> MatchupError {
    MatchupError::MismatchedConditionConfig {
        expected,
        found: config.tag(),
    }
}

fn create_time_delta(config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
    let ConditionConfig::TimeDelta(TimeDeltaConfig { entries }) = config else {
        return Err(mismatch(time_delta::TAG, config));
    };
    config.validate()?;

    let conditions = entries
        .iter()
        .map(|entry| {
            Box::new(
                TimeDeltaCondition::new(seconds_to_millis(entry.seconds))
                    .with_secondary_names(secondary_names_or_default(&entry.names))
                    .with_primary_check(entry.primary_check)
                    .with_secondary_check(entry.secondary_check),
            ) as Box<dyn Condition>
        })
        .collect();
    Ok(combine(time_delta::TAG, conditions))
}

fn create_distance(config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
    let ConditionConfig::SphericalDistance(DistanceConfig { entries }) = config else {
        return Err(mismatch(distance::TAG, config));
    };
    config.validate()?;

    let conditions = entries
        .iter()
        .map(|entry| {
            Box::new(
                DistanceCondition::new(entry.max_pixel_distance_km)
                    .with_secondary_names(secondary_names_or_default(&entry.names)),
            ) as Box<dyn Condition>
        })
        .collect();
    Ok(combine(distance::TAG, conditions))
}

fn create_border_distance(config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
    let ConditionConfig::BorderDistance(BorderDistanceConfig {
        primary,
        secondaries,
    }) = config
    else {
        return Err(mismatch(border_distance::TAG, config));
    };
    config.validate()?;

    let primary_entry = primary
        .iter()
        .map(|m| BorderDistanceEntry::new(SensorRole::Primary, m.nx, m.ny));
    let secondary_entries = secondaries.iter().flat_map(|m| {
        secondary_names_or_default(&m.names)
            .into_iter()
            .map(move |name| BorderDistanceEntry::new(SensorRole::Secondary(name), m.nx, m.ny))
    });

    Ok(Box::new(BorderDistanceCondition::new(
        primary_entry.chain(secondary_entries).collect(),
    )))
}

fn create_pixel_position(config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
    let ConditionConfig::PixelPosition(pixel_config) = config else {
        return Err(mismatch(pixel_position::TAG, config));
    };
    config.validate()?;

    Ok(Box::new(
        PixelPositionCondition::new(
            pixel_config.min_x..=pixel_config.max_x,
            pixel_config.min_y..=pixel_config.max_y,
        )
        .with_roles(pixel_config.roles()),
    ))
}

fn create_overlap_remove(config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
    let ConditionConfig::OverlapRemove(overlap_config) = config else {
        return Err(mismatch(overlap_remove::TAG, config));
    };
    Ok(Box::new(OverlapRemoveCondition::new(
        overlap_config.reference.clone(),
    )))
}

fn create_unique_samples(config: &ConditionConfig) -> Result<Box<dyn Condition>, MatchupError> {
    let ConditionConfig::UniqueSamples(unique_config) = config else {
        return Err(mismatch(unique_samples::TAG, config));
    };
    config.validate()?;

    Ok(Box::new(UniqueSamplesCondition::new(
        unique_config.reference_sensor.parse()?,
        unique_config.associated_sensor.parse()?,
    )))
}
