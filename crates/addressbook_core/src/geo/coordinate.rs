//! Coordinate range checks and fixed-point conversion.
//!
//! # Invariants
//! - Latitude range is `[-90, 90]`, longitude range is `[-180, 180]`, both
//!   inclusive. NaN is never in range.
//! - Stored precision is 6 decimal places (micro-degrees), matching a
//!   `decimal(9, 6)` column.

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Scale factor between degrees and stored micro-degrees.
pub const MICRO_DEGREES_PER_DEGREE: f64 = 1_000_000.0;

/// Returns whether `(latitude, longitude)` lies inside the valid ranges.
///
/// Pure predicate; callers decide how to reject.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> bool {
    (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
        && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
}

/// Converts degrees to micro-degrees, rounding half away from zero.
///
/// Input must already be validated; out-of-range values saturate.
pub fn degrees_to_micro(degrees: f64) -> i64 {
    (degrees * MICRO_DEGREES_PER_DEGREE).round() as i64
}

pub fn micro_to_degrees(micro: i64) -> f64 {
    micro as f64 / MICRO_DEGREES_PER_DEGREE
}
