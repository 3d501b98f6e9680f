use crate::{matchup_errors::MatchupError, samples::MatchupSet};

use super::{Condition, ConditionEngineContext};

pub const TAG: &str = "time-range";

/// Keeps the sample sets whose primary acquisition time lies inside the context's
/// `[start_date, end_date]` interval, both ends inclusive.
///
/// The date bounds are validated only when there is something to filter, so an empty
/// matchup set passes through an unconfigured context.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeRangeCondition;

impl TimeRangeCondition {
    pub fn new() -> Self {
        TimeRangeCondition
    }
}

impl Condition for TimeRangeCondition {
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

        let (start, end) = context.validate_time()?;
        matchup_set.try_retain(|sample_set| {
            let time = sample_set.primary().time;
            Ok(start <= time && time <= end)
        })
    }
}
