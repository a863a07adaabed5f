//! Table search and pagination.
//!
//! # Responsibility
//! - Match records against a normalized free-text query.
//! - Slice filtered results into fixed-size pages.

pub mod filter;
pub mod page;
