//! Core domain logic for the address book.
//! This crate is the single source of truth for address invariants.

pub mod db;
pub mod geo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use geo::coordinate::validate_coordinates;
pub use geo::distance::{distance_km, DistanceModel};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::address::{
    check_coordinates, AddressId, AddressRecord, AddressValidationError, NewAddress,
    MAX_TEXT_CHARS,
};
pub use repo::address_repo::{AddressRepository, RepoError, RepoResult, SqliteAddressRepository};
pub use search::proximity::{find_within, ProximityQuery};
pub use service::address_service::{AddressService, ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
