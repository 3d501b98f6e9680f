//! # Non-overlapping collector
//!
//! Sequential reducer behind overlap removal. Sample sets are offered one at a time, in
//! matchup order; a set is accepted unless the sample of the configured role would have an
//! extraction window overlapping the window of an already accepted sample. The first
//! candidate of a cluster therefore always wins.
//!
//! Two windows of size `width × height` centered on pixels `a` and `s` overlap iff
//!
//! ```text
//! |s.x - a.x| <= width - 1  and  |s.y - a.y| <= height - 1
//! ```
//!
//! ## Spatial index
//!
//! Accepted samples are bucketed in a uniform grid whose cells are exactly one window in
//! size. Any sample overlapping `s` lies in the cell of `s` or in one of its 8 neighbours,
//! so each candidate inspects at most 9 cells instead of every accepted sample. The
//! accepted sets and their order are the same as those of the plain pairwise scan.
//!
//! A window with a non-positive side has no extent and never overlaps.
use ahash::AHashMap;
use smallvec::SmallVec;

use crate::{
    constants::Pixel,
    matchup_errors::MatchupError,
    samples::{MatchupSet, Sample, SampleSet, SensorRole},
};

type Cell = (Pixel, Pixel);

#[derive(Debug, Clone)]
pub struct NonOverlappingCollector {
    width: Pixel,
    height: Pixel,
    role: SensorRole,
    accepted: Vec<SampleSet>,
    grid: AHashMap<Cell, SmallVec<[(Pixel, Pixel); 4]>>,
}

impl NonOverlappingCollector {
    /// Arguments
    /// -----------------
    /// * `width`, `height`: extraction window size in pixels.
    /// * `role`: which sample of each set carries the window.
    pub fn new(width: Pixel, height: Pixel, role: SensorRole) -> Self {
        NonOverlappingCollector {
            width,
            height,
            role,
            accepted: Vec::new(),
            grid: AHashMap::new(),
        }
    }

    /// The sample of `sample_set` this collector compares.
    pub fn sample<'a>(&self, sample_set: &'a SampleSet) -> Result<&'a Sample, MatchupError> {
        self.role.sample(sample_set)
    }

    /// True when the extraction windows centered on `reference` and `sample` intersect.
    pub fn are_overlapping(&self, reference: &Sample, sample: &Sample) -> bool {
        self.has_extent() && self.centers_within((reference.x, reference.y), sample)
    }

    /// Offer the next sample set.
    ///
    /// Return
    /// ----------
    /// * `Ok(true)` if the set was accepted, `Ok(false)` if it overlaps an accepted one,
    ///   or [`MatchupError::MissingSecondarySample`] when the configured secondary is
    ///   absent. Rejected sets are discarded.
    pub fn add(&mut self, sample_set: SampleSet) -> Result<bool, MatchupError> {
        let sample = *self.sample(&sample_set)?;

        if self.has_extent() {
            let cell = self.cell_of(&sample);
            if self.overlaps_neighbourhood(cell, &sample) {
                return Ok(false);
            }
            self.grid
                .entry(cell)
                .or_default()
                .push((sample.x, sample.y));
        }

        self.accepted.push(sample_set);
        Ok(true)
    }

    /// Sample sets accepted so far, in the order they were offered.
    pub fn get(&self) -> &[SampleSet] {
        &self.accepted
    }

    pub fn into_matchup_set(self) -> MatchupSet {
        MatchupSet::from(self.accepted)
    }

    fn centers_within(&self, (x, y): (Pixel, Pixel), sample: &Sample) -> bool {
        x.abs_diff(sample.x) < self.width.unsigned_abs()
            && y.abs_diff(sample.y) < self.height.unsigned_abs()
    }

    fn has_extent(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn cell_of(&self, sample: &Sample) -> Cell {
        (
            sample.x.div_euclid(self.width),
            sample.y.div_euclid(self.height),
        )
    }

    fn overlaps_neighbourhood(&self, (cx, cy): Cell, sample: &Sample) -> bool {
        let neighbours = |c: Pixel| [c.saturating_sub(1), c, c.saturating_add(1)];
        for nx in neighbours(cx) {
            for ny in neighbours(cy) {
                let Some(bucket) = self.grid.get(&(nx, ny)) else {
                    continue;
                };
                if bucket.iter().any(|&center| self.centers_within(center, sample)) {
                    return true;
                }
            }
        }
        false
    }
}
