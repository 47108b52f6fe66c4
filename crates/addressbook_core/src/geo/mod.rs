//! Geographic primitives used by validation and proximity search.
//!
//! # Responsibility
//! - Own the coordinate range predicate shared by every write and query path.
//! - Convert between degrees and the fixed-point storage representation.
//! - Compute great-circle distances under a fixed, named model.

pub mod coordinate;
pub mod distance;
