//! # Spherical distance on the mean Earth sphere
//!
//! Great-circle distances between two geographic positions, used by the distance
//! and unique-samples conditions.
//!
//! The angle between the two positions is computed from their unit vectors as
//!
//! ```text
//! θ = atan2(|a × b|, a · b)
//! ```
//!
//! which stays accurate for pixel-scale separations where the `acos(a · b)` form
//! loses most of its significant digits.
use nalgebra::Vector3;

use crate::constants::{Degree, Kilometer, MEAN_EARTH_RADIUS_KM};

/// Unit vector of a geographic position in an Earth-centred Cartesian frame.
fn unit_vector(lon: Degree, lat: Degree) -> Vector3<f64> {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    let cos_lat = lat.cos();
    Vector3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
}

/// Central angle between two geographic positions, in radians.
///
/// Arguments
/// -----------------
/// * `lon1`, `lat1`: first position in degrees
/// * `lon2`, `lat2`: second position in degrees
///
/// Return
/// ----------
/// * The angle in `[0, π]`.
pub fn central_angle(lon1: Degree, lat1: Degree, lon2: Degree, lat2: Degree) -> f64 {
    let a = unit_vector(lon1, lat1);
    let b = unit_vector(lon2, lat2);
    a.cross(&b).norm().atan2(a.dot(&b))
}

/// Great-circle distance between two geographic positions, in kilometers.
///
/// Arguments
/// -----------------
/// * `lon1`, `lat1`: first position in degrees
/// * `lon2`, `lat2`: second position in degrees
///
/// Return
/// ----------
/// * The surface distance on a sphere of radius [`MEAN_EARTH_RADIUS_KM`].
///
/// See also
/// ------------
/// * [`crate::samples::Sample::distance_km`] – Same metric between two pixel observations.
pub fn spherical_distance_km(lon1: Degree, lat1: Degree, lon2: Degree, lat2: Degree) -> Kilometer {
    central_angle(lon1, lat1, lon2, lat2) * MEAN_EARTH_RADIUS_KM
}
