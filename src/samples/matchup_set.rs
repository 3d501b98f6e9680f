use crate::matchup_errors::MatchupError;

use super::{Sample, SampleSet};

/// The ordered collection of candidate matchups being conditioned.
///
/// Order is significant: overlap removal and sample de-duplication keep the
/// earliest candidate on ties, so every operation here preserves the relative
/// order of the entries it keeps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupSet {
    sample_sets: Vec<SampleSet>,
}

impl MatchupSet {
    pub fn new() -> Self {
        MatchupSet::default()
    }

    pub fn push(&mut self, sample_set: SampleSet) {
        self.sample_sets.push(sample_set);
    }

    /// Append a new sample set holding only `primary`.
    pub fn add_primary(&mut self, primary: Sample) {
        self.sample_sets.push(SampleSet::new(primary));
    }

    pub fn sample_sets(&self) -> &[SampleSet] {
        &self.sample_sets
    }

    pub fn into_sample_sets(self) -> Vec<SampleSet> {
        self.sample_sets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleSet> {
        self.sample_sets.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SampleSet> {
        self.sample_sets.get(index)
    }

    pub fn len(&self) -> usize {
        self.sample_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_sets.is_empty()
    }

    /// Number of candidate matchups, i.e. sample sets, in this collection.
    pub fn num_observations(&self) -> usize {
        self.len()
    }

    /// Keep the sample sets for which `keep` returns `Ok(true)`, in their original order.
    ///
    /// Arguments
    /// -----------------
    /// * `keep`: predicate evaluated once per sample set, front to back.
    ///
    /// Return
    /// ----------
    /// * The survivors, or the first error returned by `keep`. On error the
    ///   whole collection is discarded.
    pub fn try_retain<F>(self, mut keep: F) -> Result<MatchupSet, MatchupError>
    where
        F: FnMut(&SampleSet) -> Result<bool, MatchupError>,
    {
        let mut survivors = Vec::with_capacity(self.sample_sets.len());
        for sample_set in self.sample_sets {
            if keep(&sample_set)? {
                survivors.push(sample_set);
            }
        }
        Ok(MatchupSet::from(survivors))
    }
}

impl From<Vec<SampleSet>> for MatchupSet {
    fn from(sample_sets: Vec<SampleSet>) -> Self {
        MatchupSet { sample_sets }
    }
}

impl FromIterator<SampleSet> for MatchupSet {
    fn from_iter<I: IntoIterator<Item = SampleSet>>(iter: I) -> Self {
        MatchupSet {
            sample_sets: iter.into_iter().collect(),
        }
    }
}

impl Extend<SampleSet> for MatchupSet {
    fn extend<I: IntoIterator<Item = SampleSet>>(&mut self, iter: I) {
        self.sample_sets.extend(iter);
    }
}

impl IntoIterator for MatchupSet {
    type Item = SampleSet;
    type IntoIter = std::vec::IntoIter<SampleSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sample_sets.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchupSet {
    type Item = &'a SampleSet;
    type IntoIter = std::slice::Iter<'a, SampleSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sample_sets.iter()
    }
}
