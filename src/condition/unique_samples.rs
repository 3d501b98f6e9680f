//! # Unique samples condition
//!
//! Collapses many-to-one matchups to one best match per reference pixel.
//!
//! Every sample set is keyed by the pixel of its *reference* sample (see [`create_key`]).
//! Sets sharing a key conflict; within each group the set whose *associated* sample is
//! closest (great-circle distance) to the reference sample survives, the earliest one
//! on ties. Survivors keep all of their secondaries and their original relative order.
//!
//! ## Sample resolution
//!
//! - The reference key is `primary` or a secondary name. A named reference that is
//!   absent from a set falls back to the primary sample of that set.
//! - When the reference resolved to a secondary, the associated sample is the primary.
//!   Otherwise the associated key is resolved; an absent associated secondary is a
//!   missing secondary handled by the context's policy.
use std::collections::hash_map::Entry;

use ahash::AHashMap;

use crate::{
    constants::Kilometer,
    matchup_errors::MatchupError,
    samples::{MatchupSet, Sample, SampleSet, SensorRole},
};

use super::{Condition, ConditionEngineContext};

pub const TAG: &str = "unique-samples";

/// Grouping key of a reference sample, `"x_y"`.
pub fn create_key(reference: &Sample) -> String {
    format!("{}_{}", reference.x, reference.y)
}

/// Strictly closer than `best`. A NaN distance never beats a number, and any number
/// beats a NaN.
fn is_closer(distance: Kilometer, best: Kilometer) -> bool {
    distance < best || (best.is_nan() && !distance.is_nan())
}

#[derive(Debug, Clone)]
pub struct UniqueSamplesCondition {
    reference_sensor: SensorRole,
    associated_sensor: SensorRole,
}

impl UniqueSamplesCondition {
    pub fn new(reference_sensor: SensorRole, associated_sensor: SensorRole) -> Self {
        UniqueSamplesCondition {
            reference_sensor,
            associated_sensor,
        }
    }

    /// The reference sample of `sample_set`, the primary if a named reference is absent.
    pub fn reference<'a>(&self, sample_set: &'a SampleSet) -> &'a Sample {
        self.resolved_reference(sample_set)
            .unwrap_or_else(|| sample_set.primary())
    }

    /// The sample compared against the reference of `sample_set`.
    pub fn associated<'a>(&self, sample_set: &'a SampleSet) -> Result<&'a Sample, MatchupError> {
        if self.resolved_reference(sample_set).is_some() {
            return Ok(sample_set.primary());
        }
        self.associated_sensor.sample(sample_set)
    }

    /// The reference secondary, when the reference is a secondary present in the set.
    fn resolved_reference<'a>(&self, sample_set: &'a SampleSet) -> Option<&'a Sample> {
        match &self.reference_sensor {
            SensorRole::Primary => None,
            SensorRole::Secondary(name) => sample_set.secondary(name),
        }
    }

    fn score(&self, sample_set: &SampleSet) -> Result<(String, Kilometer), MatchupError> {
        let reference = self.reference(sample_set);
        let associated = self.associated(sample_set)?;
        Ok((create_key(reference), reference.distance_km(associated)))
    }
}

impl Condition for UniqueSamplesCondition {
    fn name(&self) -> &'static str {
        TAG
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        let policy = context.missing_secondary_policy();
        let sample_sets = matchup_set.into_sample_sets();

        // key -> (index of the closest set so far, its distance)
        let mut closest: AHashMap<String, (usize, Kilometer)> = AHashMap::new();
        for (index, sample_set) in sample_sets.iter().enumerate() {
            let Some((key, distance)) = policy.skip_missing(self.score(sample_set), TAG)? else {
                continue;
            };
            match closest.entry(key) {
                Entry::Occupied(mut best) => {
                    if is_closer(distance, best.get().1) {
                        best.insert((index, distance));
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert((index, distance));
                }
            }
        }

        let mut keep = vec![false; sample_sets.len()];
        for (index, _) in closest.into_values() {
            keep[index] = true;
        }

        Ok(sample_sets
            .into_iter()
            .zip(keep)
            .filter_map(|(sample_set, kept)| kept.then_some(sample_set))
            .collect())
    }
}
