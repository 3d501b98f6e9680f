use hifitime::Epoch;

use crate::constants::{Millis, MILLIS_PER_SECOND};

/// Transformation from an epoch to milliseconds since the Unix epoch (UTC)
///
/// Argument
/// --------
/// * `epoch`: the epoch to convert
///
/// Return
/// ------
/// * the number of milliseconds since 1970-01-01T00:00:00 UTC, rounded to the nearest integer
pub fn epoch_to_millis(epoch: &Epoch) -> Millis {
    epoch.to_unix_milliseconds().round() as Millis
}

/// Transformation from milliseconds since the Unix epoch (UTC) to an epoch
///
/// Argument
/// --------
/// * `millis`: the number of milliseconds since 1970-01-01T00:00:00 UTC
///
/// Return
/// ------
/// * the corresponding epoch
pub fn millis_to_epoch(millis: Millis) -> Epoch {
    Epoch::from_unix_milliseconds(millis as f64)
}

/// Convert a time span in seconds to milliseconds, saturating on overflow
pub fn seconds_to_millis(seconds: i64) -> Millis {
    seconds.saturating_mul(MILLIS_PER_SECOND)
}
