//! Radius search over address records.
//!
//! # Responsibility
//! - Select records within a great-circle radius of a query point.
//!
//! # Invariants
//! - Inclusion is `distance <= radius_km` (boundary included).
//! - Output keeps input order; this is a filter, not a re-sort.
//! - Every record is visited once; there is no spatial index.
//! - Distances are measured from the query point exactly as given. A zero
//!   radius matches only records whose stored coordinates equal it.

use crate::geo::coordinate::validate_coordinates;
use crate::geo::distance::{distance_km, DistanceModel};
use crate::model::address::AddressRecord;
use log::{debug, trace};

/// Query point and radius for proximity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    /// Search radius in kilometers. Must be finite and `>= 0`.
    pub radius_km: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl ProximityQuery {
    pub fn new(radius_km: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            radius_km,
            latitude,
            longitude,
        }
    }

    /// Returns whether the radius is finite and non-negative.
    pub fn has_valid_radius(&self) -> bool {
        self.radius_km.is_finite() && self.radius_km >= 0.0
    }

    pub fn has_valid_origin(&self) -> bool {
        validate_coordinates(self.latitude, self.longitude)
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Returns the records within `query.radius_km` of the query point.
///
/// Callers must reject invalid origins and radii beforehand; this function
/// does not validate.
pub fn find_within(
    query: &ProximityQuery,
    records: &[AddressRecord],
    model: DistanceModel,
) -> Vec<AddressRecord> {
    let origin = query.origin();
    let matched = records
        .iter()
        .filter(|record| {
            let distance = distance_km(model, origin, record.coordinates());
            trace!(
                "event=proximity_check module=search id={} distance_km={distance}",
                record.id
            );
            distance <= query.radius_km
        })
        .cloned()
        .collect::<Vec<_>>();

    debug!(
        "event=proximity_scan module=search status=ok model={} radius_km={} scanned={} matched={}",
        model,
        query.radius_km,
        records.len(),
        matched.len()
    );
    matched
}
