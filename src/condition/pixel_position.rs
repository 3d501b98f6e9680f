use std::ops::RangeInclusive;

use crate::{
    constants::Pixel,
    matchup_errors::MatchupError,
    samples::{MatchupSet, SensorRole},
};

use super::{Condition, ConditionEngineContext};

pub const TAG: &str = "pixel-position";

/// Keeps the sample sets whose pixel lies inside a fixed raster window, both bounds
/// inclusive, for every configured role. A role without a sample in a given set is
/// skipped for that set.
#[derive(Debug, Clone)]
pub struct PixelPositionCondition {
    x_range: RangeInclusive<Pixel>,
    y_range: RangeInclusive<Pixel>,
    roles: Vec<SensorRole>,
}

impl Default for PixelPositionCondition {
    fn default() -> Self {
        PixelPositionCondition {
            x_range: Pixel::MIN..=Pixel::MAX,
            y_range: Pixel::MIN..=Pixel::MAX,
            roles: vec![SensorRole::Primary],
        }
    }
}

impl PixelPositionCondition {
    pub fn new(x_range: RangeInclusive<Pixel>, y_range: RangeInclusive<Pixel>) -> Self {
        PixelPositionCondition {
            x_range,
            y_range,
            ..Default::default()
        }
    }

    pub fn with_roles(mut self, roles: Vec<SensorRole>) -> Self {
        self.roles = roles;
        self
    }

    pub fn roles(&self) -> &[SensorRole] {
        &self.roles
    }
}

impl Condition for PixelPositionCondition {
    fn name(&self) -> &'static str {
        TAG
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        _context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        matchup_set.try_retain(|sample_set| {
            Ok(self
                .roles
                .iter()
                .filter_map(|role| role.find_sample(sample_set))
                .all(|sample| self.x_range.contains(&sample.x) && self.y_range.contains(&sample.y)))
        })
    }
}

#[cfg(test)]
mod pixel_position_test {
    use super::*;
    use crate::samples::{Sample, SampleSet};

    fn create_sample_set(px: Pixel, py: Pixel, sx: Pixel, sy: Pixel) -> SampleSet {
        SampleSet::new(Sample::new(px, py, 0.0, 0.0, 0))
            .with_only_secondary(Sample::new(sx, sy, 0.0, 0.0, 0))
    }

    fn primary_xs(set: &MatchupSet) -> Vec<Pixel> {
        set.iter().map(|s| s.primary().x).collect()
    }

    #[test]
    fn test_empty_matchup_set() {
        let result = PixelPositionCondition::default()
            .apply(MatchupSet::new(), &ConditionEngineContext::new())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_constraints() {
        let sets: MatchupSet = vec![
            create_sample_set(12, 198, 217, 2356),
            create_sample_set(134, 1112, 2267, 4356),
        ]
        .into();

        let result = PixelPositionCondition::default()
            .with_roles(vec![SensorRole::only_secondary()])
            .apply(sets, &ConditionEngineContext::new())
            .unwrap();
        assert_eq!(primary_xs(&result), vec![12, 134]);
    }

    #[test]
    fn test_x_constrained_primary() {
        let sets: MatchupSet = vec![
            create_sample_set(10, 2000, 217, 2356),
            create_sample_set(100, 3000, 1, 4356),
            create_sample_set(100, 4000, 2, 4356),
            create_sample_set(1000, 5000, 2267, 4356),
        ]
        .into();

        let result = PixelPositionCondition::new(50..=500, Pixel::MIN..=Pixel::MAX)
            .apply(sets, &ConditionEngineContext::new())
            .unwrap();

        let secondary_xs: Vec<_> = result
            .iter()
            .filter_map(|s| s.only_secondary().map(|s| s.x))
            .collect();
        assert_eq!(secondary_xs, vec![1, 2]);
    }

    #[test]
    fn test_x_constrained_secondary() {
        let sets: MatchupSet = vec![
            create_sample_set(101, 20001, 200, 2357),
            create_sample_set(102, 30002, 30, 4358),
            create_sample_set(103, 40003, 2000, 4359),
            create_sample_set(104, 50004, 4000, 4360),
        ]
        .into();

        let result = PixelPositionCondition::new(50..=2500, Pixel::MIN..=Pixel::MAX)
            .with_roles(vec![SensorRole::only_secondary()])
            .apply(sets, &ConditionEngineContext::new())
            .unwrap();
        assert_eq!(primary_xs(&result), vec![101, 103]);
    }

    #[test]
    fn test_y_constrained_primary() {
        let sets: MatchupSet = vec![
            create_sample_set(1, 1400, 1, 2356),
            create_sample_set(3, 998, 2267, 4356),
            create_sample_set(5, 1998, 2, 4356),
            create_sample_set(7, 2010, 2267, 4356),
        ]
        .into();

        let result = PixelPositionCondition::new(Pixel::MIN..=Pixel::MAX, 1000..=2000)
            .apply(sets, &ConditionEngineContext::new())
            .unwrap();
        assert_eq!(primary_xs(&result), vec![1, 5]);
    }

    #[test]
    fn test_y_constrained_named_secondary_skips_absent() {
        let sample = |x, y| Sample::new(x, y, f64::NAN, f64::NAN, -1);
        let sets: MatchupSet = vec![
            SampleSet::new(sample(1, 1400))
                .with_secondary("sec_A", sample(1, 2356))
                .with_secondary("sec_B", sample(10, 235)),
            SampleSet::new(sample(3, 998)).with_secondary("sec_A", sample(2267, 1356)),
            SampleSet::new(sample(5, 1998))
                .with_secondary("sec_A", sample(2, 4356))
                .with_secondary("sec_B", sample(20, 435)),
            SampleSet::new(sample(7, 2010)).with_secondary("sec_B", sample(2267, 1456)),
        ]
        .into();

        let result = PixelPositionCondition::new(Pixel::MIN..=Pixel::MAX, 1000..=2000)
            .with_roles(vec![SensorRole::secondary("sec_B")])
            .apply(sets, &ConditionEngineContext::new())
            .unwrap();
        assert_eq!(primary_xs(&result), vec![3, 7]);
    }
}
