use crate::{
    constants::{Kilometer, SensorName, ONLY_ONE_SECONDARY},
    matchup_errors::MatchupError,
    samples::{MatchupSet, SampleSet},
};

use super::{Condition, ConditionEngineContext};

pub const TAG: &str = "spherical-distance";

/// Keeps the sample sets whose listed secondaries all lie within `max_distance_km` of the
/// primary, measured as great-circle distance on the mean Earth sphere. The threshold is
/// inclusive.
#[derive(Debug, Clone)]
pub struct DistanceCondition {
    max_distance_km: Kilometer,
    secondary_names: Vec<SensorName>,
}

impl DistanceCondition {
    pub fn new(max_distance_km: Kilometer) -> Self {
        DistanceCondition {
            max_distance_km,
            secondary_names: vec![ONLY_ONE_SECONDARY.to_string()],
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

    pub fn max_distance_km(&self) -> Kilometer {
        self.max_distance_km
    }

    fn is_valid(&self, sample_set: &SampleSet) -> Result<bool, MatchupError> {
        let primary = sample_set.primary();
        for name in &self.secondary_names {
            let secondary = sample_set.require_secondary(name)?;
            if primary.distance_km(secondary) > self.max_distance_km {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Condition for DistanceCondition {
    fn name(&self) -> &'static str {
        TAG
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        let policy = context.missing_secondary_policy();
        matchup_set.try_retain(|sample_set| policy.resolve(self.is_valid(sample_set), TAG))
    }
}
