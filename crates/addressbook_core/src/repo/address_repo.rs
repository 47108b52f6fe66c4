//! Address repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `addresses` storage.
//! - Keep SQL details and fixed-point column encoding inside the
//!   persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewAddress::validate()` before SQL mutations.
//! - Each write is one autocommit statement, visible to the next read.
//! - Read paths reject invalid persisted state instead of masking it.
//! - No optimistic locking: concurrent updates to one id are last-write-wins.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::geo::coordinate::{micro_to_degrees, validate_coordinates};
use crate::model::address::{
    AddressId, AddressRecord, AddressValidationError, NewAddress, MAX_TEXT_CHARS,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    locality,
    city,
    latitude_e6,
    longitude_e6
FROM addresses";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for address persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AddressValidationError),
    Db(DbError),
    NotFound(AddressId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "address with id {id} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted address data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<AddressValidationError> for RepoError {
    fn from(value: AddressValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for address CRUD operations.
pub trait AddressRepository {
    /// Inserts a new address and returns it with its assigned id.
    fn create_address(&self, address: &NewAddress) -> RepoResult<AddressRecord>;
    fn get_address(&self, id: AddressId) -> RepoResult<Option<AddressRecord>>;
    /// Lists every stored address ordered by `id` ascending.
    fn list_addresses(&self) -> RepoResult<Vec<AddressRecord>>;
    /// Overwrites all non-id fields. `NotFound` when `id` is absent.
    fn update_address(&self, id: AddressId, address: &NewAddress) -> RepoResult<AddressRecord>;
    /// Hard-deletes one address. `NotFound` when `id` is absent.
    fn delete_address(&self, id: AddressId) -> RepoResult<()>;
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    /// Wraps a connection whose schema is fully migrated.
    ///
    /// # Errors
    /// - `RepoError::Db(DbError::SchemaNotMigrated)` when the connection was
    ///   not opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let db_version = current_user_version(conn)?;
        let expected = latest_version();
        if db_version != expected {
            return Err(DbError::SchemaNotMigrated {
                db_version,
                expected,
            }
            .into());
        }
        Ok(Self { conn })
    }

    fn fetch(&self, id: AddressId) -> RepoResult<Option<AddressRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{ADDRESS_SELECT_SQL} WHERE id = ?1;"))?;
        let parsed = stmt
            .query_row([id], |row| Ok(parse_address_row(row)))
            .optional()?;
        parsed.transpose()
    }

    fn read_back(&self, id: AddressId, operation: &str) -> RepoResult<AddressRecord> {
        self.fetch(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("address {id} missing in read-back after {operation}"))
        })
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn create_address(&self, address: &NewAddress) -> RepoResult<AddressRecord> {
        address.validate()?;

        self.conn.execute(
            "INSERT INTO addresses (
                locality,
                city,
                latitude_e6,
                longitude_e6
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                address.locality.as_str(),
                address.city.as_str(),
                address.latitude_e6(),
                address.longitude_e6(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.read_back(id, "create")
    }

    fn get_address(&self, id: AddressId) -> RepoResult<Option<AddressRecord>> {
        self.fetch(id)
    }

    fn list_addresses(&self) -> RepoResult<Vec<AddressRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{ADDRESS_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut addresses = Vec::new();

        while let Some(row) = rows.next()? {
            addresses.push(parse_address_row(row)?);
        }

        Ok(addresses)
    }

    fn update_address(&self, id: AddressId, address: &NewAddress) -> RepoResult<AddressRecord> {
        address.validate()?;

        let changed = self.conn.execute(
            "UPDATE addresses
             SET
                locality = ?1,
                city = ?2,
                latitude_e6 = ?3,
                longitude_e6 = ?4
             WHERE id = ?5;",
            params![
                address.locality.as_str(),
                address.city.as_str(),
                address.latitude_e6(),
                address.longitude_e6(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.read_back(id, "update")
    }

    fn delete_address(&self, id: AddressId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM addresses WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_address_row(row: &Row<'_>) -> RepoResult<AddressRecord> {
    let id: AddressId = row.get("id")?;
    let latitude_e6: i64 = row.get("latitude_e6")?;
    let longitude_e6: i64 = row.get("longitude_e6")?;

    let latitude = micro_to_degrees(latitude_e6);
    let longitude = micro_to_degrees(longitude_e6);
    if !validate_coordinates(latitude, longitude) {
        return Err(RepoError::InvalidData(format!(
            "coordinate ({latitude}, {longitude}) out of range in addresses row {id}"
        )));
    }

    let locality: String = row.get("locality")?;
    let city: String = row.get("city")?;
    for (field, value) in [("locality", &locality), ("city", &city)] {
        if value.chars().count() > MAX_TEXT_CHARS {
            return Err(RepoError::InvalidData(format!(
                "{field} longer than {MAX_TEXT_CHARS} characters in addresses row {id}"
            )));
        }
    }

    Ok(AddressRecord {
        id,
        locality,
        city,
        latitude,
        longitude,
    })
}
