//! # Constants and type definitions for the matchup engine
//!
//! This module centralizes the **physical constants**, **reserved sensor keys** and **common
//! type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Geodetic constants (mean Earth radius used by the spherical distance)
//! - Time conversion factors (seconds ↔ milliseconds)
//! - Reserved keys naming the primary sensor and the single-secondary sentinel
//! - Type aliases for pixel indices, angles, distances and timestamps

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Mean Earth radius in kilometers, used for all great-circle distances
pub const MEAN_EARTH_RADIUS_KM: f64 = 6_370.997;

/// Number of milliseconds in one second
pub const MILLIS_PER_SECOND: i64 = 1_000;

// -------------------------------------------------------------------------------------------------
// Reserved sensor keys
// -------------------------------------------------------------------------------------------------

/// Name under which the secondary sample is stored when a use case has exactly one
/// secondary sensor.
pub const ONLY_ONE_SECONDARY: &str = "only_one_secondary";

/// Role key designating the primary sensor in condition configurations.
pub const PRIMARY_KEY: &str = "primary";

/// Role key designating the single secondary sensor in condition configurations.
pub const SECONDARY_KEY: &str = "secondary";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Timestamp or time span in milliseconds (timestamps count from the Unix epoch)
pub type Millis = i64;
/// Angle in degrees
pub type Degree = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// 0-based pixel column or row index in a sensor raster
pub type Pixel = i32;
/// Name of a secondary sensor inside a [`crate::samples::SampleSet`]
pub type SensorName = String;
