//! # Raster border distance condition
//!
//! Rejects candidates whose pixel lies too close to the edge of its sensor raster, so
//! that an extraction window centered on it later stays inside the raster.
//!
//! For each configured [`BorderDistanceEntry`] `(role, margin_x, margin_y)` and the role's
//! raster size `(nx, ny)` taken from the [`ConditionEngineContext`], a sample set survives
//! only if the role's pixel `(x, y)` satisfies
//!
//! ```text
//! margin_x <= x <= nx - margin_x - 1
//! margin_y <= y <= ny - margin_y - 1
//! ```
//!
//! Every entry must hold. An entry whose role has no sample in a given set is skipped for
//! that set; an entry whose role has a sample but no raster size in the context is a
//! configuration error.
use crate::{
    constants::Pixel,
    matchup_errors::MatchupError,
    samples::{MatchupSet, Sample, SensorRole},
};

use super::{Condition, ConditionEngineContext, Dimension};

pub const TAG: &str = "border-distance";

/// Minimum pixel distance to the raster border for the sample playing `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderDistanceEntry {
    pub role: SensorRole,
    pub margin_x: Pixel,
    pub margin_y: Pixel,
}

impl BorderDistanceEntry {
    pub fn new(role: SensorRole, margin_x: Pixel, margin_y: Pixel) -> Self {
        BorderDistanceEntry {
            role,
            margin_x,
            margin_y,
        }
    }

    fn is_inside(&self, sample: &Sample, raster: Dimension) -> bool {
        let last = |size: Pixel, margin: Pixel| size.saturating_sub(margin).saturating_sub(1);
        let x_range = self.margin_x..=last(raster.nx, self.margin_x);
        let y_range = self.margin_y..=last(raster.ny, self.margin_y);
        x_range.contains(&sample.x) && y_range.contains(&sample.y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BorderDistanceCondition {
    entries: Vec<BorderDistanceEntry>,
}

impl BorderDistanceCondition {
    pub fn new(entries: Vec<BorderDistanceEntry>) -> Self {
        BorderDistanceCondition { entries }
    }

    pub fn entries(&self) -> &[BorderDistanceEntry] {
        &self.entries
    }
}

impl Condition for BorderDistanceCondition {
    fn name(&self) -> &'static str {
        TAG
    }

    fn apply(
        &self,
        matchup_set: MatchupSet,
        context: &ConditionEngineContext,
    ) -> Result<MatchupSet, MatchupError> {
        if self.entries.is_empty() {
            return Ok(matchup_set);
        }

        matchup_set.try_retain(|sample_set| {
            for entry in &self.entries {
                let Some(sample) = entry.role.find_sample(sample_set) else {
                    continue;
                };
                if !entry.is_inside(sample, context.raster_size(&entry.role)?) {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }
}

#[cfg(test)]
mod border_distance_test {
    use super::*;
    use crate::samples::SampleSet;

    fn create_context() -> ConditionEngineContext {
        let mut context = ConditionEngineContext::new();
        context.set_primary_raster_size(Dimension::new(100, 3000));
        context.set_secondary_raster_size(
            crate::constants::ONLY_ONE_SECONDARY,
            Dimension::new(100, 3000),
        );
        context
    }

    fn create_sample_set(px: Pixel, py: Pixel, sx: Pixel, sy: Pixel) -> SampleSet {
        SampleSet::new(Sample::new(px, py, 0.0, 0.0, 0))
            .with_only_secondary(Sample::new(sx, sy, 0.0, 0.0, 0))
    }

    fn apply(entries: Vec<BorderDistanceEntry>, sets: Vec<SampleSet>) -> MatchupSet {
        BorderDistanceCondition::new(entries)
            .apply(sets.into(), &create_context())
            .unwrap()
    }

    #[test]
    fn test_empty_matchup_set() {
        let result = apply(
            vec![BorderDistanceEntry::new(SensorRole::Primary, 3, 2)],
            vec![],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_primary_left_upper() {
        let result = apply(
            vec![BorderDistanceEntry::new(SensorRole::Primary, 2, 4)],
            vec![
                create_sample_set(1, 675, 45, 109),
                create_sample_set(34, 81, 38, 2005),
                create_sample_set(23, 2, 55, 32),
            ],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).map(|s| s.primary().x), Some(34));
    }

    #[test]
    fn test_primary_right_lower() {
        let result = apply(
            vec![BorderDistanceEntry::new(SensorRole::Primary, 3, 5)],
            vec![
                create_sample_set(98, 675, 45, 109),
                create_sample_set(34, 81, 18, 2005),
                create_sample_set(23, 2996, 55, 32),
            ],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).map(|s| s.primary().x), Some(34));
    }

    #[test]
    fn test_exact_margins_are_kept() {
        let result = apply(
            vec![BorderDistanceEntry::new(SensorRole::Primary, 3, 5)],
            vec![
                create_sample_set(3, 5, 0, 0),
                create_sample_set(96, 2994, 0, 0),
                create_sample_set(97, 2994, 0, 0),
            ],
        );

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_extreme_margins_do_not_overflow() {
        let sets = || vec![create_sample_set(50, 1500, 0, 0)];

        let huge = apply(
            vec![BorderDistanceEntry::new(SensorRole::Primary, Pixel::MAX, Pixel::MAX)],
            sets(),
        );
        assert!(huge.is_empty());

        let negative = apply(
            vec![BorderDistanceEntry::new(SensorRole::Primary, Pixel::MIN, Pixel::MIN)],
            sets(),
        );
        assert_eq!(negative.len(), 1);
    }

    #[test]
    fn test_primary_and_secondary() {
        let result = apply(
            vec![
                BorderDistanceEntry::new(SensorRole::Primary, 5, 5),
                BorderDistanceEntry::new(SensorRole::only_secondary(), 5, 5),
            ],
            vec![
                create_sample_set(33, 675, 45, 109),
                create_sample_set(34, 2996, 3, 205),
                create_sample_set(23, 108, 55, 32),
            ],
        );

        let xs: Vec<_> = result.iter().map(|s| s.primary().x).collect();
        assert_eq!(xs, vec![33, 23]);
    }

    #[test]
    fn test_secondary_only() {
        let entries = || vec![BorderDistanceEntry::new(SensorRole::only_secondary(), 4, 4)];

        let result = apply(
            entries(),
            vec![
                create_sample_set(62, 675, 45, 109),
                create_sample_set(34, 81, 108, 205),
                create_sample_set(23, 435, 55, 2998),
            ],
        );
        assert_eq!(result.len(), 1);

        let result = apply(
            entries(),
            vec![
                create_sample_set(13, 675, 3, 109),
                create_sample_set(34, 81, 14, 1),
                create_sample_set(23, 23, 55, 32),
            ],
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).map(|s| s.primary().x), Some(23));
    }

    #[test]
    fn test_no_entries_is_noop() {
        let result = BorderDistanceCondition::default()
            .apply(
                vec![create_sample_set(0, 0, 0, 0), create_sample_set(99, 2999, 0, 0)].into(),
                &ConditionEngineContext::new(),
            )
            .unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_absent_role_is_skipped() {
        let sets = vec![
            SampleSet::new(Sample::new(50, 50, 0.0, 0.0, 0)),
            SampleSet::new(Sample::new(50, 50, 0.0, 0.0, 0))
                .with_secondary("amsub", Sample::new(0, 0, 0.0, 0.0, 0)),
        ];

        let result = BorderDistanceCondition::new(vec![BorderDistanceEntry::new(
            SensorRole::secondary("amsub"),
            2,
            2,
        )])
        .apply(sets.into(), &{
            let mut context = create_context();
            context.set_secondary_raster_size("amsub", Dimension::new(90, 90));
            context
        })
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).map(|s| s.num_secondaries()), Some(0));
    }

    #[test]
    fn test_missing_raster_size() {
        let result = BorderDistanceCondition::new(vec![BorderDistanceEntry::new(
            SensorRole::Primary,
            1,
            1,
        )])
        .apply(
            vec![create_sample_set(5, 5, 5, 5)].into(),
            &ConditionEngineContext::new(),
        );

        assert!(matches!(result, Err(MatchupError::MissingDimension(_))));
    }

    #[test]
    fn test_idempotent() {
        let condition =
            BorderDistanceCondition::new(vec![BorderDistanceEntry::new(SensorRole::Primary, 2, 4)]);
        let context = create_context();
        let sets: MatchupSet = (0..20).map(|i| create_sample_set(i, i * 200, 0, 0)).collect();

        let once = condition.apply(sets, &context).unwrap();
        let twice = condition.apply(once.clone(), &context).unwrap();
        assert_eq!(once, twice);
    }
}
