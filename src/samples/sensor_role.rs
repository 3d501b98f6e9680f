use std::{fmt, str::FromStr};

use serde_with::DeserializeFromStr;

use crate::{
    constants::{SensorName, ONLY_ONE_SECONDARY, PRIMARY_KEY, SECONDARY_KEY},
    matchup_errors::MatchupError,
};

use super::{Sample, SampleSet};

/// Selects which sample of a [`SampleSet`] a condition looks at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, DeserializeFromStr)]
pub enum SensorRole {
    #[default]
    Primary,
    Secondary(SensorName),
}

impl SensorRole {
    /// The single secondary of a one-secondary use case.
    pub fn only_secondary() -> Self {
        SensorRole::Secondary(ONLY_ONE_SECONDARY.to_string())
    }

    pub fn secondary(name: impl Into<SensorName>) -> Self {
        SensorRole::Secondary(name.into())
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, SensorRole::Primary)
    }

    /// Resolve the role against a sample set.
    ///
    /// Return
    /// ----------
    /// * The primary sample, the named secondary sample, or
    ///   [`MatchupError::MissingSecondarySample`] when the secondary is absent.
    pub fn sample<'a>(&self, sample_set: &'a SampleSet) -> Result<&'a Sample, MatchupError> {
        match self {
            SensorRole::Primary => Ok(sample_set.primary()),
            SensorRole::Secondary(name) => sample_set.require_secondary(name),
        }
    }

    /// Like [`SensorRole::sample`] but returns `None` for an absent secondary.
    pub fn find_sample<'a>(&self, sample_set: &'a SampleSet) -> Option<&'a Sample> {
        match self {
            SensorRole::Primary => Some(sample_set.primary()),
            SensorRole::Secondary(name) => sample_set.secondary(name),
        }
    }
}

impl FromStr for SensorRole {
    type Err = MatchupError;

    /// Parse a role key.
    /// - `"primary"` (any case) → `Primary`
    /// - `"secondary"` (any case) → the single secondary
    /// - any other non-blank string → the secondary of that name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key.is_empty() {
            return Err(MatchupError::InvalidConfiguration(
                "sensor role must not be empty".into(),
            ));
        }

        if key.eq_ignore_ascii_case(PRIMARY_KEY) {
            Ok(SensorRole::Primary)
        } else if key.eq_ignore_ascii_case(SECONDARY_KEY) {
            Ok(SensorRole::only_secondary())
        } else {
            Ok(SensorRole::Secondary(key.to_string()))
        }
    }
}

impl fmt::Display for SensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorRole::Primary => write!(f, "{PRIMARY_KEY}"),
            SensorRole::Secondary(name) => write!(f, "{name}"),
        }
    }
}
