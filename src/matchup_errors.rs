use thiserror::Error;

use crate::constants::Millis;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchupError {
    #[error("Start date is not configured")]
    MissingStartDate,

    #[error("End date is not configured")]
    MissingEndDate,

    #[error("Start date ({start} ms) is after end date ({end} ms)")]
    InvalidTimeRange { start: Millis, end: Millis },

    #[error("Missing secondary sample: {0}")]
    MissingSecondarySample(String),

    #[error("No dimension configured for sensor: {0}")]
    MissingDimension(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No condition registered for tag: {0}")]
    UnknownCondition(String),

    #[error("Condition factory '{expected}' received a '{found}' configuration")]
    MismatchedConditionConfig {
        expected: &'static str,
        found: &'static str,
    },
}

impl MatchupError {
    /// True for the error kinds that are detected before any filtering starts
    /// (missing or contradictory run parameters and configuration).
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, MatchupError::MissingSecondarySample(_))
    }
}
