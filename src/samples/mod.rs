//! # Samples, sample sets and matchup sets
//!
//! The data model flowing through the condition pipeline:
//!
//! ```text
//! MatchupSet
//! └── SampleSet*            (one candidate matchup, order is significant)
//!     ├── primary   : Sample
//!     └── secondaries: name → Sample
//! ```
//!
//! - [`Sample`] – one pixel observation: raster position, geographic position, acquisition time.
//! - [`SampleSet`] – a primary sample plus zero or more named secondary samples.
//! - [`MatchupSet`] – the ordered working collection handed from condition to condition.
//! - [`SensorRole`] – selects the primary or a named secondary inside a [`SampleSet`].
//!
//! Samples are immutable value objects. Within the engine a [`SampleSet`] is only read,
//! kept or removed as a whole; conditions never edit its fields.
pub mod matchup_set;
pub mod sample_set;
pub mod sensor_role;

pub use matchup_set::MatchupSet;
pub use sample_set::SampleSet;
pub use sensor_role::SensorRole;

use crate::{
    constants::{Degree, Kilometer, Millis, Pixel},
    geodesy::spherical_distance_km,
};

/// A single pixel observation
///
/// # Fields
///
/// * `x` - 0-based pixel column in the sensor's native raster
/// * `y` - 0-based pixel row in the sensor's native raster
/// * `lon` - Longitude of the pixel centre in degrees
/// * `lat` - Latitude of the pixel centre in degrees
/// * `time` - Acquisition time in milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: Pixel,
    pub y: Pixel,
    pub lon: Degree,
    pub lat: Degree,
    pub time: Millis,
}

impl Sample {
    /// Create a new sample
    ///
    /// Arguments
    /// ---------
    /// * `x`, `y`: raster position of the pixel
    /// * `lon`, `lat`: geographic position of the pixel in degrees
    /// * `time`: acquisition time in milliseconds since the Unix epoch
    pub fn new(x: Pixel, y: Pixel, lon: Degree, lat: Degree, time: Millis) -> Self {
        Sample {
            x,
            y,
            lon,
            lat,
            time,
        }
    }

    /// Absolute acquisition time difference to another sample, in milliseconds.
    pub fn time_delta(&self, other: &Sample) -> Millis {
        self.time.abs_diff(other.time).min(Millis::MAX as u64) as Millis
    }

    /// Great-circle distance to another sample, in kilometers.
    pub fn distance_km(&self, other: &Sample) -> Kilometer {
        spherical_distance_km(self.lon, self.lat, other.lon, other.lat)
    }
}
