//! Request surface for the address book.
//!
//! Wraps `addressbook_core` with session-per-request storage access and
//! status-classified response envelopes, independent of any transport.

mod api;
pub mod config;
mod session;

pub use addressbook_core::{init_logging, AddressId, AddressRecord, DistanceModel, NewAddress};
pub use api::{AddressBookApi, ApiResponse, ApiStatus};
pub use config::ApiConfig;
