pub mod condition;
pub mod config;
pub mod constants;
pub mod engine;
pub mod geodesy;
pub mod matchup_errors;
pub mod samples;
pub mod time;

pub use condition::{Condition, ConditionEngineContext, Dimension, MissingSecondaryPolicy};
pub use config::UseCaseConfig;
pub use engine::ConditionEngine;
pub use matchup_errors::MatchupError;
pub use samples::{MatchupSet, Sample, SampleSet, SensorRole};
