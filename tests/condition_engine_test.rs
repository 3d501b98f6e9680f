mod common;

use approx::assert_relative_eq;
use hifitime::Epoch;
use matchup_engine::{
    condition::{
        border_distance::{BorderDistanceCondition, BorderDistanceEntry},
        unique_samples::create_key,
    },
    config::{BorderDistanceConfig, BorderMargins},
    constants::ONLY_ONE_SECONDARY,
    geodesy::spherical_distance_km,
    time::epoch_to_millis,
    Condition, ConditionEngine, ConditionEngineContext, Dimension, MatchupError, MatchupSet,
    MissingSecondaryPolicy, Sample, SampleSet, SensorRole, UseCaseConfig,
};

use common::{create_geo_sample_set, create_sample_set, open_context, primary_times};

const ONE_DAY: i64 = 24 * 60 * 60 * 1000;

fn configured(use_case: &UseCaseConfig, context: ConditionEngineContext) -> ConditionEngine {
    let mut engine = ConditionEngine::new();
    engine.configure(use_case, context).unwrap();
    engine
}

fn plain_use_case() -> UseCaseConfig {
    UseCaseConfig::builder("name").build().unwrap()
}

#[test]
fn test_no_conditions() {
    let engine = configured(&plain_use_case(), open_context());

    assert!(engine.process(MatchupSet::new()).unwrap().is_empty());

    let sets: MatchupSet = vec![
        create_sample_set(234, 556),
        create_sample_set(19887, 3668),
        create_sample_set(8837, 662),
    ]
    .into();
    assert_eq!(engine.process(sets.clone()).unwrap(), sets);
}

#[test]
fn test_empty_set_without_dates() {
    let engine = configured(&plain_use_case(), ConditionEngineContext::new());
    assert!(engine.process(MatchupSet::new()).unwrap().is_empty());

    let err = engine
        .process(vec![create_sample_set(0, 0)].into())
        .unwrap_err();
    assert_eq!(err, MatchupError::MissingStartDate);
}

#[test]
fn test_time_delta_condition() {
    let use_case = UseCaseConfig::builder("name")
        .with_time_delta_seconds(20, None)
        .build()
        .unwrap();
    let engine = configured(&use_case, open_context());

    let result = engine
        .process(
            vec![
                create_sample_set(100000, 100100),
                create_sample_set(100200, 100500),
                create_sample_set(200200, 100500),
            ]
            .into(),
        )
        .unwrap();

    assert_eq!(primary_times(&result), vec![100000, 100200]);
}

#[test]
fn test_time_range_condition() {
    let start = Epoch::from_gregorian_utc_at_midnight(2016, 11, 23);
    let start_time = epoch_to_millis(&start);
    let end_time = start_time + 12 * ONE_DAY;

    let context = ConditionEngineContext::new().with_time_range(start_time, end_time);
    let engine = configured(&plain_use_case(), context);

    let result = engine
        .process(
            vec![
                create_sample_set(start_time - 1, 100500),
                create_sample_set(start_time, 100100),
                create_sample_set(start_time + 5 * ONE_DAY, 100500),
                create_sample_set(end_time, 100500),
                create_sample_set(end_time + 1, 100500),
            ]
            .into(),
        )
        .unwrap();

    assert_eq!(
        primary_times(&result),
        vec![start_time, start_time + 5 * ONE_DAY, end_time]
    );
}

#[test]
fn test_distance_condition() {
    let use_case = UseCaseConfig::builder("name")
        .with_max_pixel_distance_km(4.0, None)
        .with_time_delta_seconds(1, None)
        .build()
        .unwrap();
    let engine = configured(&use_case, open_context());

    let result = engine
        .process(
            vec![
                create_geo_sample_set(4.5, 5.6, 4.50001, 5.60001),
                create_geo_sample_set(20.0, 14.0, 20.002, 13.998),
                create_geo_sample_set(1.0, 2.0, 3.0, 4.0),
            ]
            .into(),
        )
        .unwrap();

    assert_eq!(result.len(), 2);
    let last = result.get(1).unwrap();
    let secondary = last.only_secondary().unwrap();
    assert_relative_eq!(
        last.primary().distance_km(secondary),
        spherical_distance_km(20.0, 14.0, 20.002, 13.998),
        epsilon = 1e-12
    );
    assert!(last.primary().distance_km(secondary) < 0.4);
}

#[test]
fn test_distance_and_time_delta_condition() {
    let use_case = UseCaseConfig::builder("name")
        .with_time_delta_seconds(10, None)
        .with_max_pixel_distance_km(4.0, None)
        .build()
        .unwrap();
    let engine = configured(&use_case, open_context());

    let result = engine
        .process(
            vec![
                create_geo_sample_set(4.5, 5.6, 4.50001, 5.60001),
                create_sample_set(200000, 100100),
                create_geo_sample_set(20.0, 14.0, 20.002, 13.998),
                create_sample_set(100200, 100500),
                create_sample_set(100200, 100500),
                create_geo_sample_set(1.0, 2.0, 3.0, 4.0),
            ]
            .into(),
        )
        .unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(primary_times(&result), vec![0, 0, 100200, 100200]);
}

#[test]
fn test_max_time_delta() {
    let use_case = UseCaseConfig::builder("use-case 20")
        .with_time_delta_seconds(300, None)
        .build()
        .unwrap();
    let engine = configured(&use_case, open_context());

    assert_eq!(use_case.name, "use-case 20");
    assert_eq!(engine.max_time_delta_millis(), Some(300_000));
}

#[test]
fn test_full_pipeline_with_created_context() {
    let use_case = UseCaseConfig::builder("avhrr-amsub")
        .with_sensor("avhrr-n17", true)
        .with_sensor("amsub-n15", false)
        .with_dimension("avhrr-n17", 3, 5)
        .with_dimension("amsub-n15", 7, 9)
        .with_time_delta_seconds(300, None)
        .with_border_distance(BorderDistanceConfig {
            primary: Some(BorderMargins { nx: 2, ny: 4 }),
            secondaries: vec![],
        })
        .with_overlap_removal(SensorRole::Primary)
        .build()
        .unwrap();

    let start = Epoch::from_gregorian_utc_at_midnight(2005, 3, 1);
    let end = Epoch::from_gregorian_utc_at_midnight(2005, 3, 2);
    let mut context = ConditionEngine::create_context(Some(start), Some(end), &use_case).unwrap();
    context.set_primary_raster_size(Dimension::new(100, 3000));
    context.set_secondary_raster_size(ONLY_ONE_SECONDARY, Dimension::new(90, 2500));

    let engine = configured(&use_case, context);
    assert_eq!(
        engine.condition_names(),
        vec!["time-range", "time-delta", "border-distance", "overlap-remove"]
    );

    let t0 = epoch_to_millis(&start) + ONE_DAY / 2;
    let set = |x, y, dt| {
        SampleSet::new(Sample::new(x, y, 0.0, 0.0, t0))
            .with_only_secondary(Sample::new(0, 0, 0.0, 0.0, t0 + dt))
    };

    let result = engine
        .process(
            vec![
                set(1, 675, 0),         // too close to the left border
                set(34, 81, 0),         // kept
                set(35, 83, 0),         // overlaps (34, 81)
                set(23, 2, 0),          // too close to the top border
                set(60, 1000, 301_000), // time delta too large
                set(60, 1000, 299_000), // kept
                set(37, 81, 0),         // kept, windows are 3 pixels wide
            ]
            .into(),
        )
        .unwrap();

    let pixels: Vec<_> = result
        .iter()
        .map(|s| (s.primary().x, s.primary().y))
        .collect();
    assert_eq!(pixels, vec![(34, 81), (60, 1000), (37, 81)]);
}

#[test]
fn test_missing_secondary_policy() {
    let build = |policy| {
        UseCaseConfig::builder("name")
            .with_sensor("avhrr-n17", true)
            .with_sensor("amsub-n15", false)
            .with_sensor("mhs-n18", false)
            .with_time_delta_seconds(60, Some("amsub-n15"))
            .with_missing_secondary_policy(policy)
            .build()
            .unwrap()
    };
    let sets = || -> MatchupSet {
        vec![
            SampleSet::new(Sample::new(0, 0, 0.0, 0.0, 0))
                .with_secondary("mhs-n18", Sample::new(0, 0, 0.0, 0.0, 0)),
            SampleSet::new(Sample::new(0, 0, 0.0, 0.0, 0))
                .with_secondary("amsub-n15", Sample::new(0, 0, 0.0, 0.0, 10)),
        ]
        .into()
    };
    let start = Some(Epoch::from_gregorian_utc_at_midnight(1970, 1, 1));
    let end = Some(Epoch::from_gregorian_utc_at_midnight(1970, 1, 2));

    let use_case = build(MissingSecondaryPolicy::Drop);
    let context = ConditionEngine::create_context(start, end, &use_case).unwrap();
    let result = configured(&use_case, context).process(sets()).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.get(0).unwrap().secondary("amsub-n15").is_some());

    let use_case = build(MissingSecondaryPolicy::Abort);
    let context = ConditionEngine::create_context(start, end, &use_case).unwrap();
    assert_eq!(
        configured(&use_case, context).process(sets()),
        Err(MatchupError::MissingSecondarySample("amsub-n15".into()))
    );
}

#[test]
fn test_unique_samples_condition() {
    let use_case = UseCaseConfig::builder("insitu")
        .with_sensor("animal-sst", true)
        .with_sensor("avhrr-n17", false)
        .with_unique_samples("avhrr-n17", "primary")
        .build()
        .unwrap();
    let engine = configured(&use_case, open_context());

    let reference = Sample::new(118, 119, -108.32, 23.69, 0);
    let sets: MatchupSet = vec![
        SampleSet::new(Sample::new(18, 19, -108.3, 23.7, 0)).with_secondary("avhrr-n17", reference),
        SampleSet::new(Sample::new(19, 19, -108.31, 23.69, 0))
            .with_secondary("avhrr-n17", reference),
        SampleSet::new(Sample::new(20, 19, -108.31, 23.69, 0))
            .with_secondary("avhrr-n17", Sample::new(300, 119, -108.0, 23.0, 0)),
    ]
    .into();

    let result = engine.process(sets).unwrap();

    let primaries: Vec<_> = result.iter().map(|s| s.primary().x).collect();
    assert_eq!(primaries, vec![19, 20]);
    assert_eq!(
        create_key(result.get(0).unwrap().secondary("avhrr-n17").unwrap()),
        "118_119"
    );
}

#[test]
fn test_condition_used_directly() {
    let condition = BorderDistanceCondition::new(vec![BorderDistanceEntry::new(
        SensorRole::only_secondary(),
        4,
        2,
    )]);
    let mut context = ConditionEngineContext::new();
    context.set_secondary_raster_size(ONLY_ONE_SECONDARY, Dimension::new(100, 3000));

    let sets: MatchupSet = vec![
        SampleSet::new(Sample::new(13, 675, 0.0, 0.0, 0))
            .with_only_secondary(Sample::new(3, 109, 0.0, 0.0, 0)),
        SampleSet::new(Sample::new(23, 23, 0.0, 0.0, 0))
            .with_only_secondary(Sample::new(55, 32, 0.0, 0.0, 0)),
    ]
    .into();

    let result = condition.apply(sets, &context).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.get(0).unwrap().primary().x, 23);
}
