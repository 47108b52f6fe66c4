//! Address domain model.
//!
//! # Responsibility
//! - Define the canonical stored address record and its input shape.
//! - Provide the field checks shared by service and repository write paths.
//!
//! # Invariants
//! - `id` is assigned by storage on create and never reused or mutated.
//! - Persisted coordinates are inside the valid ranges and carry at most
//!   6 decimal places.
//! - `locality` and `city` are at most `MAX_TEXT_CHARS` characters.

use crate::geo::coordinate::{
    degrees_to_micro, validate_coordinates, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE,
    MIN_LONGITUDE,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned address identity.
pub type AddressId = i64;

/// Maximum length of `locality` and `city`, in characters.
pub const MAX_TEXT_CHARS: usize = 256;

/// Validation failures for address input.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressValidationError {
    /// Latitude or longitude outside the valid ranges.
    CoordinatesOutOfRange { latitude: f64, longitude: f64 },
    /// Text field longer than `MAX_TEXT_CHARS`.
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
}

impl Display for AddressValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoordinatesOutOfRange {
                latitude,
                longitude,
            } => write!(
                f,
                "coordinate ({latitude}, {longitude}) not in range \
                 latitude({MIN_LATITUDE}, {MAX_LATITUDE}) and longitude({MIN_LONGITUDE}, {MAX_LONGITUDE})"
            ),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} must be at most {max_chars} characters, got {actual_chars}"
            ),
        }
    }
}

impl Error for AddressValidationError {}

/// Rejects an out-of-range coordinate pair with a descriptive error.
///
/// Every create, update and search path goes through this check.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), AddressValidationError> {
    if validate_coordinates(latitude, longitude) {
        Ok(())
    } else {
        Err(AddressValidationError::CoordinatesOutOfRange {
            latitude,
            longitude,
        })
    }
}

/// Create/update input. Carries every replaceable field; never an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    pub locality: String,
    pub city: String,
    /// Degrees; rounded to 6 decimal places when persisted.
    pub latitude: f64,
    /// Degrees; rounded to 6 decimal places when persisted.
    pub longitude: f64,
}

impl NewAddress {
    pub fn new(
        locality: impl Into<String>,
        city: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            locality: locality.into(),
            city: city.into(),
            latitude,
            longitude,
        }
    }

    /// Checks coordinates first, then text lengths.
    pub fn validate(&self) -> Result<(), AddressValidationError> {
        check_coordinates(self.latitude, self.longitude)?;
        check_text_len("locality", &self.locality)?;
        check_text_len("city", &self.city)?;
        Ok(())
    }

    /// Latitude in stored micro-degrees.
    pub fn latitude_e6(&self) -> i64 {
        degrees_to_micro(self.latitude)
    }

    /// Longitude in stored micro-degrees.
    pub fn longitude_e6(&self) -> i64 {
        degrees_to_micro(self.longitude)
    }
}

/// Stored address record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: AddressId,
    pub locality: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AddressRecord {
    /// `(latitude, longitude)` in degrees.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Returns the replaceable fields as update input.
    pub fn to_new_address(&self) -> NewAddress {
        NewAddress::new(
            self.locality.clone(),
            self.city.clone(),
            self.latitude,
            self.longitude,
        )
    }
}

fn check_text_len(field: &'static str, value: &str) -> Result<(), AddressValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > MAX_TEXT_CHARS {
        return Err(AddressValidationError::FieldTooLong {
            field,
            max_chars: MAX_TEXT_CHARS,
            actual_chars,
        });
    }
    Ok(())
}
