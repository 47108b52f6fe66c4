//! Use-case API for address book callers.
//!
//! # Responsibility
//! - Expose stable, request-level functions over the core service.
//! - Classify every outcome as success, client error or server error.
//!
//! # Invariants
//! - Each call opens its own DB session and releases it before returning.
//! - Exported functions never panic; failures come back as envelopes.
//! - Validation failures and missing ids are distinct client errors.

use crate::config::ApiConfig;
use crate::session::DbSession;
use addressbook_core::{
    core_version as core_version_inner, ping as ping_inner, AddressId, AddressRecord,
    AddressService, NewAddress, ProximityQuery, ServiceError, SqliteAddressRepository,
};
use log::error;
use serde::Serialize;

/// Outcome class of one request, mirroring HTTP status semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    ServerError,
}

impl ApiStatus {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::ServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }

    pub fn is_client_error(self) -> bool {
        matches!(self, Self::BadRequest | Self::NotFound)
    }
}

/// Response envelope returned by every API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    /// Present on success, except for `NoContent`.
    pub body: Option<T>,
    /// Human-readable outcome; error detail on failure.
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn success(status: ApiStatus, body: Option<T>, message: impl Into<String>) -> Self {
        Self {
            status,
            body,
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: ApiFailure) -> Self {
        let status = err.status;
        if status == ApiStatus::ServerError {
            error!(
                "event=api_request module=api status=error operation={operation} error={}",
                err.message
            );
        }
        Self {
            status,
            body: None,
            message: err.message,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

struct ApiFailure {
    status: ApiStatus,
    message: String,
}

impl From<ServiceError> for ApiFailure {
    fn from(value: ServiceError) -> Self {
        let status = match value {
            ServiceError::NotFound(_) => ApiStatus::NotFound,
            ServiceError::InvalidAddress(_) | ServiceError::InvalidRadius(_) => {
                ApiStatus::BadRequest
            }
            ServiceError::Repo(_) => ApiStatus::ServerError,
        };
        Self {
            status,
            message: value.to_string(),
        }
    }
}

/// Request surface bound to one database file.
#[derive(Debug, Clone)]
pub struct AddressBookApi {
    config: ApiConfig,
}

impl AddressBookApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Builds an API from `ADDRESSBOOK_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Health probe; never touches storage.
    pub fn ping(&self) -> String {
        ping_inner().to_owned()
    }

    pub fn core_version(&self) -> String {
        core_version_inner().to_owned()
    }

    /// Fetches one address.
    pub fn get_address(&self, id: AddressId) -> ApiResponse<AddressRecord> {
        match self.with_service("get_address", |service| service.get_address(id)) {
            Ok(record) => ApiResponse::success(ApiStatus::Ok, Some(record), "Address found."),
            Err(err) => ApiResponse::failure("get_address", err),
        }
    }

    /// Creates an address; responds `Created` with the stored record.
    pub fn create_address(&self, input: &NewAddress) -> ApiResponse<AddressRecord> {
        match self.with_service("create_address", |service| service.create_address(input)) {
            Ok(record) => {
                ApiResponse::success(ApiStatus::Created, Some(record), "Address created.")
            }
            Err(err) => ApiResponse::failure("create_address", err),
        }
    }

    /// Replaces every field of an existing address.
    pub fn update_address(&self, id: AddressId, input: &NewAddress) -> ApiResponse<AddressRecord> {
        match self.with_service("update_address", |service| service.update_address(id, input)) {
            Ok(record) => ApiResponse::success(ApiStatus::Ok, Some(record), "Address updated."),
            Err(err) => ApiResponse::failure("update_address", err),
        }
    }

    /// Deletes an address; responds `NoContent` without a body.
    pub fn delete_address(&self, id: AddressId) -> ApiResponse<()> {
        match self.with_service("delete_address", |service| service.delete_address(id)) {
            Ok(()) => ApiResponse::success(ApiStatus::NoContent, None, "Address deleted."),
            Err(err) => ApiResponse::failure("delete_address", err),
        }
    }

    pub fn list_addresses(&self) -> ApiResponse<Vec<AddressRecord>> {
        match self.with_service("list_addresses", |service| service.list_addresses()) {
            Ok(records) => {
                let message = format!("Found {} address(es).", records.len());
                ApiResponse::success(ApiStatus::Ok, Some(records), message)
            }
            Err(err) => ApiResponse::failure("list_addresses", err),
        }
    }

    /// Lists addresses within `radius_km` of `(latitude, longitude)`.
    pub fn find_nearby(
        &self,
        radius_km: f64,
        latitude: f64,
        longitude: f64,
    ) -> ApiResponse<Vec<AddressRecord>> {
        let query = ProximityQuery::new(radius_km, latitude, longitude);
        match self.with_service("find_nearby", |service| service.find_nearby(&query)) {
            Ok(records) => {
                let message = format!("Found {} address(es) within {radius_km} km.", records.len());
                ApiResponse::success(ApiStatus::Ok, Some(records), message)
            }
            Err(err) => ApiResponse::failure("find_nearby", err),
        }
    }

    fn with_service<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&AddressService<SqliteAddressRepository<'_>>) -> Result<T, ServiceError>,
    ) -> Result<T, ApiFailure> {
        let session = DbSession::open(&self.config.db_path, operation).map_err(|err| ApiFailure {
            status: ApiStatus::ServerError,
            message: format!("address book DB open failed: {err}"),
        })?;
        let repo = SqliteAddressRepository::try_new(session.conn()).map_err(|err| ApiFailure {
            status: ApiStatus::ServerError,
            message: format!("address repository init failed: {err}"),
        })?;
        let service = AddressService::with_distance_model(repo, self.config.distance_model);
        let outcome = f(&service);
        outcome.map_err(ApiFailure::from)
    }
}
