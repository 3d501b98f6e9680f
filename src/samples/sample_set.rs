use smallvec::SmallVec;

use crate::{
    constants::{SensorName, ONLY_ONE_SECONDARY},
    matchup_errors::MatchupError,
};

use super::Sample;

/// Named secondary samples, stored inline for the usual one- or two-secondary use cases.
type Secondaries = SmallVec<[(SensorName, Sample); 2]>;

/// One candidate matchup: a primary sample and its named secondary samples.
///
/// Secondary names are unique within a set; assigning a sample to an existing name
/// replaces the previous one. The single-secondary case uses the reserved name
/// [`ONLY_ONE_SECONDARY`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    primary: Sample,
    secondaries: Secondaries,
}

impl SampleSet {
    /// Create a sample set holding only a primary sample.
    pub fn new(primary: Sample) -> Self {
        SampleSet {
            primary,
            secondaries: SmallVec::new(),
        }
    }

    /// Builder-style variant of [`SampleSet::set_secondary`].
    pub fn with_secondary(mut self, name: impl Into<SensorName>, sample: Sample) -> Self {
        self.set_secondary(name, sample);
        self
    }

    /// Builder-style shortcut storing `sample` as the single secondary.
    pub fn with_only_secondary(self, sample: Sample) -> Self {
        self.with_secondary(ONLY_ONE_SECONDARY, sample)
    }

    /// Store a secondary sample under `name`, replacing any sample already stored there.
    pub fn set_secondary(&mut self, name: impl Into<SensorName>, sample: Sample) {
        let name = name.into();
        match self.secondaries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = sample,
            None => self.secondaries.push((name, sample)),
        }
    }

    pub fn primary(&self) -> &Sample {
        &self.primary
    }

    /// Look up the secondary sample stored under `name`.
    pub fn secondary(&self, name: &str) -> Option<&Sample> {
        self.secondaries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, sample)| sample)
    }

    /// Look up the secondary sample stored under `name`, failing when it is absent.
    ///
    /// Return
    /// ----------
    /// * The sample, or [`MatchupError::MissingSecondarySample`] naming the missing sensor.
    pub fn require_secondary(&self, name: &str) -> Result<&Sample, MatchupError> {
        self.secondary(name)
            .ok_or_else(|| MatchupError::MissingSecondarySample(name.to_string()))
    }

    /// The single secondary sample, if present.
    pub fn only_secondary(&self) -> Option<&Sample> {
        self.secondary(ONLY_ONE_SECONDARY)
    }

    pub fn secondary_names(&self) -> impl Iterator<Item = &str> {
        self.secondaries.iter().map(|(name, _)| name.as_str())
    }

    pub fn num_secondaries(&self) -> usize {
        self.secondaries.len()
    }
}
