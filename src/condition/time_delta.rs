//! # Acquisition time difference condition
//!
//! Drops sample sets whose samples were acquired too far apart in time. Two checks can
//! be combined for a list of secondary sensors:
//!
//! - **primary check** (default on): every listed secondary against the primary,
//! - **secondary check** (default off): every pair of listed secondaries.
//!
//! The threshold is inclusive: a difference of exactly `max_delta_millis` is accepted.
use itertools::Itertools;

use crate::{
    constants::{Millis, SensorName, ONLY_ONE_SECONDARY},
    matchup_errors::MatchupError,
    samples::{MatchupSet, Sample, SampleSet},
};

use super::{Condition, ConditionEngineContext};

pub const TAG: &str = "time-delta";

#[derive(Debug, Clone)]
pub struct TimeDeltaCondition {
    max_delta_millis: Millis,
    secondary_names: Vec<SensorName>,
    primary_check: bool,
    secondary_check: bool,
}

impl TimeDeltaCondition {
    /// Primary check against the single secondary with the given threshold.
    pub fn new(max_delta_millis: Millis) -> Self {
        TimeDeltaCondition {
            max_delta_millis,
            secondary_names: vec![ONLY_ONE_SECONDARY.to_string()],
            primary_check: true,
            secondary_check: false,
        }
    }

    pub fn with_secondary_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SensorName>,
    {
        self.secondary_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_primary_check(mut self, primary_check: bool) -> Self {
        self.primary_check = primary_check;
        self
    }

    pub fn with_secondary_check(mut self, secondary_check: bool) -> Self {
        self.secondary_check = secondary_check;
        self
    }

    pub fn max_delta_millis(&self) -> Millis {
        self.max_delta_millis
    }

    pub fn secondary_names(&self) -> &[SensorName] {
        &self.secondary_names
    }

    fn is_valid(&self, s1: &Sample, s2: &Sample) -> bool {
        s1.time_delta(s2) <= self.max_delta_millis
    }

    fn is_valid_to_primary(&self, sample_set: &SampleSet) -> Result<bool, MatchupError> {
        if !self.primary_check {
            return Ok(true);
        }
        let primary = sample_set.primary();
        for name in &self.secondary_names {
            if !self.is_valid(primary, sample_set.require_secondary(name)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_valid_between_secondaries(&self, sample_set: &SampleSet) -> Result<bool, MatchupError> {
        if !self.secondary_check {
            return Ok(true);
        }
        for (n1, n2) in self.secondary_names.iter().tuple_combinations() {
            let s1 = sample_set.require_secondary(n1)?;
            let s2 = sample_set.require_secondary(n2)?;
            if !self.is_valid(s1, s2) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Condition for TimeDeltaCondition {
    fn name(&self) -> &'static str {
        TAG
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        let policy = context.missing_secondary_policy();
        matchup_set.try_retain(|sample_set| {
            let decision = self.is_valid_to_primary(sample_set).and_then(|valid| {
                Ok(valid && self.is_valid_between_secondaries(sample_set)?)
            });
            policy.resolve(decision, TAG)
        })
    }
}
