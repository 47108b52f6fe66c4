//! Address use-case service.
//!
//! # Responsibility
//! - Provide CRUD and proximity-search entry points for core callers.
//! - Run coordinate validation before any storage access.
//! - Translate repository outcomes into client/server error classes.
//!
//! # Invariants
//! - Validation always happens before a write is attempted.
//! - Update is a full replacement of all non-id fields.
//! - Search always runs over a freshly listed record set.

use crate::geo::distance::DistanceModel;
use crate::model::address::{
    check_coordinates, AddressId, AddressRecord, AddressValidationError, NewAddress,
};
use crate::repo::address_repo::{AddressRepository, RepoError};
use crate::search::proximity::{find_within, ProximityQuery};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for address use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed field validation; nothing was written.
    InvalidAddress(AddressValidationError),
    /// Search radius is negative or not finite.
    InvalidRadius(f64),
    /// Target address does not exist.
    NotFound(AddressId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns whether the caller supplied bad input or a bad reference.
    ///
    /// `false` means a server-side failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(err) => write!(f, "{err}"),
            Self::InvalidRadius(radius) => write!(
                f,
                "radius {radius} km is invalid; expected a finite value >= 0"
            ),
            Self::NotFound(id) => write!(f, "address with id {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAddress(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidRadius(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<AddressValidationError> for ServiceError {
    fn from(value: AddressValidationError) -> Self {
        Self::InvalidAddress(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::InvalidAddress(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Address service facade over repository implementations.
pub struct AddressService<R: AddressRepository> {
    repo: R,
    distance_model: DistanceModel,
}

impl<R: AddressRepository> AddressService<R> {
    /// Creates a service using the default distance model.
    pub fn new(repo: R) -> Self {
        Self::with_distance_model(repo, DistanceModel::default())
    }

    pub fn with_distance_model(repo: R, distance_model: DistanceModel) -> Self {
        Self {
            repo,
            distance_model,
        }
    }

    pub fn distance_model(&self) -> DistanceModel {
        self.distance_model
    }

    /// Validates and stores a new address.
    pub fn create_address(&self, address: &NewAddress) -> ServiceResult<AddressRecord> {
        validate_input("create", address)?;
        let record = self.repo.create_address(address)?;
        info!(
            "event=address_create module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Gets one address by id.
    pub fn get_address(&self, id: AddressId) -> ServiceResult<AddressRecord> {
        match self.repo.get_address(id)? {
            Some(record) => {
                debug!("event=address_get module=service status=ok id={id}");
                Ok(record)
            }
            None => {
                warn!("event=address_get module=service status=not_found id={id}");
                Err(ServiceError::NotFound(id))
            }
        }
    }

    /// Lists every stored address.
    pub fn list_addresses(&self) -> ServiceResult<Vec<AddressRecord>> {
        let records = self.repo.list_addresses()?;
        debug!(
            "event=address_list module=service status=ok count={}",
            records.len()
        );
        Ok(records)
    }

    /// Replaces all non-id fields of an existing address.
    pub fn update_address(
        &self,
        id: AddressId,
        address: &NewAddress,
    ) -> ServiceResult<AddressRecord> {
        validate_input("update", address)?;
        match self.repo.update_address(id, address) {
            Ok(record) => {
                info!("event=address_update module=service status=ok id={id}");
                Ok(record)
            }
            Err(RepoError::NotFound(_)) => {
                warn!("event=address_update module=service status=not_found id={id}");
                Err(ServiceError::NotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Hard-deletes an address.
    pub fn delete_address(&self, id: AddressId) -> ServiceResult<()> {
        match self.repo.delete_address(id) {
            Ok(()) => {
                info!("event=address_delete module=service status=ok id={id}");
                Ok(())
            }
            Err(RepoError::NotFound(_)) => {
                warn!("event=address_delete module=service status=not_found id={id}");
                Err(ServiceError::NotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns stored addresses within `query.radius_km` of the query point.
    ///
    /// Result order follows `list_addresses`.
    pub fn find_nearby(&self, query: &ProximityQuery) -> ServiceResult<Vec<AddressRecord>> {
        if let Err(err) = check_coordinates(query.latitude, query.longitude) {
            warn!(
                "event=address_search module=service status=rejected reason=coordinates latitude={} longitude={}",
                query.latitude, query.longitude
            );
            return Err(err.into());
        }
        if !query.has_valid_radius() {
            warn!(
                "event=address_search module=service status=rejected reason=radius radius_km={}",
                query.radius_km
            );
            return Err(ServiceError::InvalidRadius(query.radius_km));
        }

        let records = self.repo.list_addresses()?;
        let matched = find_within(query, &records, self.distance_model);
        info!(
            "event=address_search module=service status=ok radius_km={} latitude={} longitude={} matched={}",
            query.radius_km,
            query.latitude,
            query.longitude,
            matched.len()
        );
        Ok(matched)
    }
}

fn validate_input(operation: &str, address: &NewAddress) -> ServiceResult<()> {
    address.validate().map_err(|err| {
        warn!("event=address_{operation} module=service status=rejected error={err}");
        ServiceError::InvalidAddress(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{AddressService, ServiceError};
    use crate::model::address::{AddressId, AddressRecord, NewAddress};
    use crate::repo::address_repo::{AddressRepository, RepoError, RepoResult};
    use crate::search::proximity::ProximityQuery;
    use std::cell::Cell;

    /// Repository stub that counts calls and fails every one of them.
    #[derive(Default)]
    struct FailingRepo {
        calls: Cell<u32>,
    }

    impl FailingRepo {
        fn fail<T>(&self) -> RepoResult<T> {
            self.calls.set(self.calls.get() + 1);
            Err(RepoError::InvalidData("storage offline".to_string()))
        }
    }

    impl AddressRepository for &FailingRepo {
        fn create_address(&self, _address: &NewAddress) -> RepoResult<AddressRecord> {
            self.fail()
        }
        fn get_address(&self, _id: AddressId) -> RepoResult<Option<AddressRecord>> {
            self.fail()
        }
        fn list_addresses(&self) -> RepoResult<Vec<AddressRecord>> {
            self.fail()
        }
        fn update_address(
            &self,
            _id: AddressId,
            _address: &NewAddress,
        ) -> RepoResult<AddressRecord> {
            self.fail()
        }
        fn delete_address(&self, _id: AddressId) -> RepoResult<()> {
            self.fail()
        }
    }

    #[test]
    fn invalid_input_never_reaches_repository() {
        let repo = FailingRepo::default();
        let service = AddressService::new(&repo);

        let bad = NewAddress::new("Main St", "Springfield", 95.0, 0.0);
        assert!(matches!(
            service.create_address(&bad),
            Err(ServiceError::InvalidAddress(_))
        ));
        assert!(matches!(
            service.update_address(1, &bad),
            Err(ServiceError::InvalidAddress(_))
        ));
        assert!(matches!(
            service.find_nearby(&ProximityQuery::new(10.0, 0.0, 181.0)),
            Err(ServiceError::InvalidAddress(_))
        ));
        assert!(matches!(
            service.find_nearby(&ProximityQuery::new(-1.0, 0.0, 0.0)),
            Err(ServiceError::InvalidRadius(_))
        ));
        assert_eq!(repo.calls.get(), 0);
    }

    #[test]
    fn storage_failures_are_server_errors() {
        let repo = FailingRepo::default();
        let service = AddressService::new(&repo);

        let err = service.get_address(7).unwrap_err();
        assert!(matches!(err, ServiceError::Repo(_)));
        assert!(!err.is_client_error());

        let err = service.list_addresses().unwrap_err();
        assert!(!err.is_client_error());
        assert_eq!(repo.calls.get(), 2);
    }

    #[test]
    fn not_found_and_validation_are_client_errors() {
        assert!(ServiceError::NotFound(1).is_client_error());
        assert!(ServiceError::InvalidRadius(-1.0).is_client_error());
        assert_eq!(
            ServiceError::NotFound(42).to_string(),
            "address with id 42 not found"
        );
    }
}
