//! Domain model for stored addresses.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every stored address is identified by a storage-assigned `AddressId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod address;
