#![allow(dead_code)]

use matchup_engine::{
    constants::Millis, ConditionEngineContext, MatchupSet, Sample, SampleSet,
};

/// Context whose date bounds accept every acquisition time.
pub fn open_context() -> ConditionEngineContext {
    ConditionEngineContext::new().with_time_range(Millis::MIN, Millis::MAX)
}

/// Sample set at the origin pixel and position, differing only by acquisition times.
pub fn create_sample_set(primary_time: Millis, secondary_time: Millis) -> SampleSet {
    SampleSet::new(Sample::new(0, 0, 0.0, 0.0, primary_time))
        .with_only_secondary(Sample::new(0, 0, 0.0, 0.0, secondary_time))
}

/// Sample set acquired at time 0, differing only by geographic positions.
pub fn create_geo_sample_set(
    primary_lon: f64,
    primary_lat: f64,
    secondary_lon: f64,
    secondary_lat: f64,
) -> SampleSet {
    SampleSet::new(Sample::new(0, 0, primary_lon, primary_lat, 0))
        .with_only_secondary(Sample::new(0, 0, secondary_lon, secondary_lat, 0))
}

pub fn primary_times(matchup_set: &MatchupSet) -> Vec<Millis> {
    matchup_set.iter().map(|set| set.primary().time).collect()
}
