//! # Condition engine
//!
//! Builds the ordered condition pipeline of a use case and runs matchup sets through it.
//!
//! ## Pipeline
//!
//! [`ConditionEngine::configure`] always installs a
//! [`TimeRangeCondition`](crate::condition::time_range::TimeRangeCondition) first, then one
//! condition per entry of [`UseCaseConfig::conditions`], in declared order.
//! [`ConditionEngine::process`] applies them one after another; each condition only sees
//! the survivors of the previous one. Processing is synchronous and single threaded.
//!
//! ## Example
//!
//! ```rust
//! use hifitime::Epoch;
//! use matchup_engine::config::UseCaseConfig;
//! use matchup_engine::engine::ConditionEngine;
//! use matchup_engine::samples::{MatchupSet, Sample, SampleSet};
//!
//! let use_case = UseCaseConfig::builder("example")
//!     .with_sensor("avhrr-n17", true)
//!     .with_sensor("amsub-n15", false)
//!     .with_time_delta_seconds(20, None)
//!     .build()
//!     .unwrap();
//!
//! let start = Epoch::from_gregorian_utc_at_midnight(2021, 1, 1);
//! let end = Epoch::from_gregorian_utc_at_midnight(2021, 1, 2);
//! let context = ConditionEngine::create_context(Some(start), Some(end), &use_case).unwrap();
//!
//! let mut engine = ConditionEngine::new();
//! engine.configure(&use_case, context).unwrap();
//!
//! let t0 = 1_609_459_200_000;
//! let matchup_set: MatchupSet = vec![
//!     SampleSet::new(Sample::new(0, 0, 0.0, 0.0, t0))
//!         .with_only_secondary(Sample::new(0, 0, 0.0, 0.0, t0 + 10_000)),
//!     SampleSet::new(Sample::new(0, 0, 0.0, 0.0, t0))
//!         .with_only_secondary(Sample::new(0, 0, 0.0, 0.0, t0 + 30_000)),
//! ]
//! .into();
//!
//! let survivors = engine.process(matchup_set).unwrap();
//! assert_eq!(survivors.len(), 1);
//! assert_eq!(engine.max_time_delta_millis(), Some(20_000));
//! ```
use hifitime::Epoch;

use crate::{
    condition::{
        registry::ConditionRegistry, time_range::TimeRangeCondition, Condition,
        ConditionEngineContext,
    },
    config::{ConditionConfig, UseCaseConfig},
    constants::{Millis, ONLY_ONE_SECONDARY},
    matchup_errors::MatchupError,
    samples::MatchupSet,
    time::seconds_to_millis,
};

#[derive(Debug, Default)]
pub struct ConditionEngine {
    registry: ConditionRegistry,
    conditions: Vec<Box<dyn Condition>>,
    context: ConditionEngineContext,
    max_time_delta_millis: Option<Millis>,
}

impl ConditionEngine {
    /// An unconfigured engine using the built-in conditions.
    pub fn new() -> Self {
        ConditionEngine::default()
    }

    /// An unconfigured engine resolving condition tags through `registry`.
    pub fn with_registry(registry: ConditionRegistry) -> Self {
        ConditionEngine {
            registry,
            ..Default::default()
        }
    }

    /// Build the condition pipeline of `use_case`.
    ///
    /// Any previously configured pipeline is discarded. On error the engine is left
    /// unconfigured.
    ///
    /// Arguments
    /// -----------------
    /// * `use_case`: the use case configuration, validated here.
    /// * `context`: run parameters used by every subsequent [`ConditionEngine::process`].
    ///
    /// Return
    /// ----------
    /// * A configuration error if the use case is invalid or names an unregistered
    ///   condition.
    pub fn configure(
        &mut self,
        use_case: &UseCaseConfig,
        context: ConditionEngineContext,
    ) -> Result<(), MatchupError> {
        self.conditions.clear();
        self.max_time_delta_millis = None;

        use_case.validate()?;

        let mut conditions: Vec<Box<dyn Condition>> = vec![Box::new(TimeRangeCondition::new())];
        for config in &use_case.conditions {
            conditions.push(self.registry.create(config)?);
        }

        self.max_time_delta_millis = use_case
            .conditions
            .iter()
            .filter_map(|config| match config {
                ConditionConfig::TimeDelta(time_delta) => time_delta.max_seconds(),
                _ => None,
            })
            .max()
            .map(seconds_to_millis);
        self.conditions = conditions;
        self.context = context;

        log::debug!(
            "use case '{}': configured conditions [{}]",
            use_case.name,
            self.condition_names().join(", ")
        );
        Ok(())
    }

    /// Run `matchup_set` through every configured condition, in order.
    ///
    /// An unconfigured engine returns the input unchanged.
    pub fn process(&self, matchup_set: MatchupSet) -> Result<MatchupSet, MatchupError> {
        let input = matchup_set.len();

        let output = self
            .conditions
            .iter()
            .try_fold(matchup_set, |set, condition| {
                let before = set.len();
                let survivors = condition.apply(set, &self.context)?;
                log::debug!(
                    "{}: {} of {} sample sets kept",
                    condition.name(),
                    survivors.len(),
                    before
                );
                Ok(survivors)
            })?;

        log::info!(
            "condition engine kept {} of {} sample sets",
            output.len(),
            input
        );
        Ok(output)
    }

    /// Largest time delta configured by a time-delta condition, in milliseconds.
    pub fn max_time_delta_millis(&self) -> Option<Millis> {
        self.max_time_delta_millis
    }

    /// Tags of the configured conditions, in execution order.
    pub fn condition_names(&self) -> Vec<&'static str> {
        self.conditions.iter().map(|c| c.name()).collect()
    }

    pub fn context(&self) -> &ConditionEngineContext {
        &self.context
    }

    /// Build the run context of `use_case` for the interval `[start, end]`.
    ///
    /// The primary extraction size is the dimension configured under the primary sensor's
    /// name. Secondary extraction sizes are keyed by the single-secondary name when the
    /// use case has exactly one secondary sensor, by sensor name otherwise. Sensors without
    /// a configured dimension get no extraction size.
    ///
    /// Return
    /// ----------
    /// * The context, or a configuration error when a date is missing, `start > end`, or
    ///   the use case has no primary sensor.
    pub fn create_context(
        start: Option<Epoch>,
        end: Option<Epoch>,
        use_case: &UseCaseConfig,
    ) -> Result<ConditionEngineContext, MatchupError> {
        let mut context = ConditionEngineContext::new();
        if let Some(start) = start {
            context.set_start_epoch(&start);
        }
        if let Some(end) = end {
            context.set_end_epoch(&end);
        }
        context.validate_time()?;

        let primary = use_case.primary_sensor().ok_or_else(|| {
            MatchupError::InvalidConfiguration(format!(
                "use case '{}' has no primary sensor",
                use_case.name
            ))
        })?;
        if let Some(size) = use_case.dimension(&primary.name) {
            context.set_primary_extract_size(size);
        }

        let secondaries: Vec<_> = use_case.secondary_sensors().collect();
        let single_secondary = secondaries.len() == 1;
        for sensor in secondaries {
            let Some(size) = use_case.dimension(&sensor.name) else {
                continue;
            };
            if single_secondary {
                context.set_secondary_extract_size(ONLY_ONE_SECONDARY, size);
            } else {
                context.set_secondary_extract_size(sensor.name.as_str(), size);
            }
        }

        context.set_missing_secondary_policy(use_case.missing_secondary_policy);
        Ok(context)
    }
}
