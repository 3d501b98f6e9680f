use crate::{
    matchup_errors::MatchupError,
    samples::{MatchupSet, SensorRole},
};

use super::{non_overlapping::NonOverlappingCollector, Condition, ConditionEngineContext, Dimension};

pub const TAG: &str = "overlap-remove";

/// Collapses candidates whose extraction windows would overlap, keeping the first
/// candidate of each cluster. The window size is the context's extraction size of the
/// configured reference role.
#[derive(Debug, Clone, Default)]
pub struct OverlapRemoveCondition {
    reference: SensorRole,
}

impl OverlapRemoveCondition {
    pub fn new(reference: SensorRole) -> Self {
        OverlapRemoveCondition { reference }
    }

    pub fn reference(&self) -> &SensorRole {
        &self.reference
    }

    /// Extraction window size for the reference role.
    pub fn dimension(&self, context: &ConditionEngineContext) -> Result<Dimension, MatchupError> {
        context.extract_size(&self.reference)
    }
}

impl Condition for OverlapRemoveCondition {
    fn name(&self) -> &'static str {
        TAG
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        if matchup_set.is_empty() {
            return Ok(matchup_set);
        }

        let Dimension { nx, ny } = self.dimension(context)?;
        let policy = context.missing_secondary_policy();

        let mut collector = NonOverlappingCollector::new(nx, ny, self.reference.clone());
        for sample_set in matchup_set {
            policy.resolve(collector.add(sample_set), TAG)?;
        }
        Ok(collector.into_matchup_set())
    }
}
