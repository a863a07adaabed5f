//! Student registry domain model.
//!
//! # Responsibility
//! - Define the persisted student record and the in-progress form draft.
//! - Keep fixed vocabularies (gender, division, hobbies) as closed enums.
//!
//! # Invariants
//! - Every persisted record is identified by a positive `StudentId`.
//! - Deleting a record never renumbers the remaining identifiers.

pub mod student;
