//! Core logic for the student registry.
//! Holds the record model, validation rules, persistence and the controllers
//! that front ends drive.

pub mod capture;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod validation;

pub use capture::{CaptureError, FixedPathPicker, ImageCaptureTask, ImagePicker};
pub use config::{ConfigError, RegistryConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::student::{
    Division, Field, Gender, Hobby, RecordValidationError, StudentDraft, StudentId, StudentRecord,
};
pub use repo::slot_store::{KeyValueSlot, MemorySlotStore, SqliteSlotStore};
pub use repo::student_repo::{
    next_id, InMemoryStudentRepository, RepoError, RepoResult, SlotStudentRepository,
    StudentRepository, DEFAULT_STORAGE_KEY,
};
pub use search::filter::{filter_records, matches, normalize};
pub use search::page::{paginate, PageView, DEFAULT_PAGE_SIZE};
pub use service::detail::DetailView;
pub use service::form::{
    CapturePoll, FieldChange, FormController, FormError, FormEvent, FormMode, FormState,
};
pub use service::table::{DeleteOutcome, Popup, TableController, TableError};
pub use validation::{validate, validate_field, ValidationContext, ValidationErrors};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
