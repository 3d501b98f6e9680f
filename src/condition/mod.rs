//! # Matchup conditions
//!
//! A [`Condition`] prunes a [`MatchupSet`] according to one acceptance rule. Conditions are
//! independent values composed by the [`ConditionEngine`](crate::engine::ConditionEngine);
//! each one consumes the survivors of the previous one and returns its own survivors.
//!
//! ## Built-in conditions
//!
//! | tag                   | type                                                         | rule |
//! |-----------------------|--------------------------------------------------------------|------|
//! | `time-range`          | [`TimeRangeCondition`](time_range::TimeRangeCondition)       | primary time inside the run's date bounds |
//! | `time-delta`          | [`TimeDeltaCondition`](time_delta::TimeDeltaCondition)       | primary/secondary acquisition time difference |
//! | `spherical-distance`  | [`DistanceCondition`](distance::DistanceCondition)           | great-circle distance primary ↔ secondary |
//! | `border-distance`     | [`BorderDistanceCondition`](border_distance::BorderDistanceCondition) | pixel far enough from the raster edges |
//! | `pixel-position`      | [`PixelPositionCondition`](pixel_position::PixelPositionCondition) | pixel inside a fixed raster window |
//! | `overlap-remove`      | [`OverlapRemoveCondition`](overlap_remove::OverlapRemoveCondition) | extraction windows must not overlap |
//! | `unique-samples`      | [`UniqueSamplesCondition`](unique_samples::UniqueSamplesCondition) | one best match per reference pixel |
//!
//! ## Determinism
//!
//! Every condition keeps the relative order of its survivors. Overlap removal and
//! sample de-duplication are sequential reducers whose tie-breaks ("first seen wins",
//! "closest wins, first on ties") depend on that order.
//!
//! ## Missing secondaries
//!
//! Conditions that must read a named secondary raise
//! [`MatchupError::MissingSecondarySample`] when it is absent. The context's
//! [`MissingSecondaryPolicy`] decides whether the sample set is dropped or the run aborts.
use std::fmt::Debug;

use serde::Deserialize;

use crate::{matchup_errors::MatchupError, samples::MatchupSet};

pub mod border_distance;
pub mod context;
pub mod distance;
pub mod non_overlapping;
pub mod overlap_remove;
pub mod pixel_position;
pub mod registry;
pub mod time_delta;
pub mod time_range;
pub mod unique_samples;

pub use context::{ConditionEngineContext, Dimension};

/// A filter or reducer over a [`MatchupSet`].
pub trait Condition: Debug + Send + Sync {
    /// Tag identifying the condition kind, used for registry lookup and logging.
    fn name(&self) -> &'static str;

    /// Prune `matchup_set` and return the survivors in their original relative order.
    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError>;
}

/// What a condition does with a sample set lacking the secondary it is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSecondaryPolicy {
    /// Remove the sample set and continue.
    #[default]
    Drop,
    /// Stop processing and return [`MatchupError::MissingSecondarySample`].
    Abort,
}

impl MissingSecondaryPolicy {
    /// Turn a missing-secondary error from a keep/drop decision into a drop, if the
    /// policy allows it. Any other outcome passes through unchanged.
    pub(crate) fn resolve(
        self,
        decision: Result<bool, MatchupError>,
        condition: &str,
    ) -> Result<bool, MatchupError> {
        Ok(self.skip_missing(decision, condition)?.unwrap_or(false))
    }

    /// `Ok(None)` for a missing secondary the policy drops, the outcome otherwise.
    pub(crate) fn skip_missing<T>(
        self,
        outcome: Result<T, MatchupError>,
        condition: &str,
    ) -> Result<Option<T>, MatchupError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(MatchupError::MissingSecondarySample(name)) if self == Self::Drop => {
                log::trace!("{condition}: dropping sample set without secondary '{name}'");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Several conditions applied one after another, behaving as their logical AND.
#[derive(Debug)]
pub struct ConditionList {
    name: &'static str,
    conditions: Vec<Box<dyn Condition>>,
}

impl ConditionList {
    pub fn new(name: &'static str, conditions: Vec<Box<dyn Condition>>) -> Self {
        ConditionList { name, conditions }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Condition for ConditionList {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        self.conditions
            .iter()
            .try_fold(matchup_set, |set, condition| condition.apply(set, context))
    }
}

/// Box a single condition as is, or wrap several into a [`ConditionList`].
pub(crate) fn combine(name: &'static str, mut conditions: Vec<Box<dyn Condition>>) -> Box<dyn Condition> {
    if conditions.len() == 1 {
        if let Some(condition) = conditions.pop() {
            return condition;
        }
    }
    Box::new(ConditionList::new(name, conditions))
}
