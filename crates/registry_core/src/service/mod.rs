//! UI-facing controllers.
//!
//! # Responsibility
//! - Drive the registration form, the student table and the detail viewer.
//! - Keep front ends decoupled from storage; all persistence goes through
//!   an injected `StudentRepository`.

pub mod detail;
pub mod form;
pub mod table;
