//! Student repository contracts and slot-backed implementation.
//!
//! # Responsibility
//! - Load and save the full student list as one JSON array.
//! - Assign identifiers and apply create/update/delete over the full list.
//!
//! # Invariants
//! - New identifiers are `max(id) + 1`, or 1 for an empty store.
//! - Updates preserve the target identifier; deletes never renumber others.
//! - `save_all(load_all())` leaves the persisted text unchanged.
//! - `load_all` only returns lists that `save_all` accepts.

use crate::db::DbError;
use crate::model::student::{RecordValidationError, StudentId, StudentRecord};
use crate::repo::slot_store::KeyValueSlot;
use log::{info, warn};
use std::cell::RefCell;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "formData";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    DuplicateId(StudentId),
    Validation {
        id: StudentId,
        source: RecordValidationError,
    },
    NotFound(StudentId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize student records: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate student id: {id}"),
            Self::Validation { id, source } => write!(f, "invalid student {id}: {source}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Validation { source, .. } => Some(source),
            Self::DuplicateId(_) | Self::NotFound(_) => None,
        }
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

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Returns the identifier the next created record receives.
pub fn next_id(records: &[StudentRecord]) -> StudentId {
    records
        .iter()
        .map(|record| record.id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Whole-list record persistence.
///
/// Implementors only provide `load_all`/`save_all`; the record-level
/// helpers are expressed on top of them with read-modify-write semantics.
pub trait StudentRepository {
    /// Returns every stored record, or an empty list when nothing valid is stored.
    fn load_all(&self) -> RepoResult<Vec<StudentRecord>>;
    /// Overwrites the stored list with `records`.
    fn save_all(&self, records: &[StudentRecord]) -> RepoResult<()>;

    /// Finds one record by identifier.
    fn get(&self, id: StudentId) -> RepoResult<Option<StudentRecord>> {
        Ok(self.load_all()?.into_iter().find(|record| record.id == id))
    }

    /// Appends a record built with the next free identifier.
    fn insert_with<E>(
        &self,
        build: impl FnOnce(StudentId) -> Result<StudentRecord, E>,
    ) -> Result<StudentRecord, E>
    where
        E: From<RepoError>,
    {
        let mut records = self.load_all()?;
        let record = build(next_id(&records))?;
        records.push(record.clone());
        self.save_all(&records)?;
        Ok(record)
    }

    /// Replaces the record with the same identifier, keeping list position.
    fn replace(&self, record: &StudentRecord) -> RepoResult<()> {
        let mut records = self.load_all()?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepoError::NotFound(record.id))?;
        *slot = record.clone();
        self.save_all(&records)
    }

    /// Removes the record with `id`. Other identifiers are left untouched.
    fn remove(&self, id: StudentId) -> RepoResult<()> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(RepoError::NotFound(id));
        }
        self.save_all(&records)
    }
}

/// Checks the list-level invariants every save must hold.
pub fn check_records(records: &[StudentRecord]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        record.validate().map_err(|source| RepoError::Validation {
            id: record.id,
            source,
        })?;
        if !seen.insert(record.id) {
            return Err(RepoError::DuplicateId(record.id));
        }
    }
    Ok(())
}

/// Repository storing the whole list as JSON in one key-value slot.
pub struct SlotStudentRepository<S: KeyValueSlot> {
    slot: S,
    key: String,
}

impl<S: KeyValueSlot> SlotStudentRepository<S> {
    /// Uses [`DEFAULT_STORAGE_KEY`].
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}

impl<S: KeyValueSlot> StudentRepository for SlotStudentRepository<S> {
    fn load_all(&self) -> RepoResult<Vec<StudentRecord>> {
        let Some(raw) = self.slot.read(&self.key)? else {
            return Ok(Vec::new());
        };

        let records = match serde_json::from_str::<Vec<StudentRecord>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                // Record contents stay out of logs; only position info is kept.
                warn!(
                    "event=store_load module=repo status=recovered key={} reason=malformed_data line={} column={}",
                    self.key,
                    err.line(),
                    err.column()
                );
                return Ok(Vec::new());
            }
        };

        // A list `save_all` would refuse is treated like unparsable data.
        if let Err(err) = check_records(&records) {
            warn!(
                "event=store_load module=repo status=recovered key={} reason=invalid_records error={}",
                self.key, err
            );
            return Ok(Vec::new());
        }
        Ok(records)
    }

    fn save_all(&self, records: &[StudentRecord]) -> RepoResult<()> {
        check_records(records)?;
        let serialized = serde_json::to_string(records)?;
        self.slot.write(&self.key, &serialized)?;
        info!(
            "event=store_save module=repo status=ok key={} count={}",
            self.key,
            records.len()
        );
        Ok(())
    }
}

/// Repository holding records in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    records: RefCell<Vec<StudentRecord>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with `records` after the usual save checks.
    pub fn with_records(records: Vec<StudentRecord>) -> RepoResult<Self> {
        check_records(&records)?;
        Ok(Self {
            records: RefCell::new(records),
        })
    }
}

impl StudentRepository for InMemoryStudentRepository {
    fn load_all(&self) -> RepoResult<Vec<StudentRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn save_all(&self, records: &[StudentRecord]) -> RepoResult<()> {
        check_records(records)?;
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}

impl<R: StudentRepository + ?Sized> StudentRepository for &R {
    fn load_all(&self) -> RepoResult<Vec<StudentRecord>> {
        (**self).load_all()
    }

    fn save_all(&self, records: &[StudentRecord]) -> RepoResult<()> {
        (**self).save_all(records)
    }
}
