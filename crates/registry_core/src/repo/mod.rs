//! Record Store: persistence contracts and implementations.
//!
//! # Responsibility
//! - Abstract the single key-value slot that holds all records.
//! - Provide whole-list load/save over that slot plus record-level helpers.
//!
//! # Invariants
//! - Every write overwrites the complete record list; there are no partial writes.
//! - Malformed stored data reads as an empty list instead of failing.
//! - Writes reject duplicate identifiers and records failing `StudentRecord::validate()`.

pub mod slot_store;
pub mod student_repo;
