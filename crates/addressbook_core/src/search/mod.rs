//! Search entry points.
//!
//! # Responsibility
//! - Expose proximity search over stored addresses.

pub mod proximity;
