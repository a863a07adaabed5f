//! Form Controller: draft editing, validation and commit.
//!
//! # Responsibility
//! - Bind field changes to a `StudentDraft` and track touched fields.
//! - Re-validate on every change and expose errors for touched fields only.
//! - Commit create-or-update through a `StudentRepository` on submit.
//! - Own the in-flight profile picture capture for the lifetime of the draft.
//!
//! # Invariants
//! - Submission always re-validates against a fresh store snapshot.
//! - Edit mode commits under the prefilled identifier, never a new one.
//! - A capture result is applied only to the draft generation that started it.
//!
//! # State machine
//! `Idle` (prefilled, untouched) -> `Valid | Invalid` on each change ->
//! `Committed` after a successful submit. A committed form ignores changes.

use crate::capture::{CaptureError, ImageCaptureTask, ImagePicker};
use crate::model::student::{
    Division, Field, Gender, Hobby, RecordValidationError, StudentDraft, StudentId, StudentRecord,
};
use crate::repo::student_repo::{RepoError, StudentRepository};
use crate::validation::{validate, ValidationContext, ValidationErrors};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(StudentId),
}

impl FormMode {
    pub fn editing_id(self) -> Option<StudentId> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Valid,
    Invalid,
    Committed,
}

/// One user edit of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    Password(String),
    DateOfBirth(String),
    Gender(Gender),
    Hobby { hobby: Hobby, selected: bool },
    Division(Division),
    ProfilePicture(String),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            Self::FirstName(_) => Field::FirstName,
            Self::LastName(_) => Field::LastName,
            Self::Email(_) => Field::Email,
            Self::Phone(_) => Field::Phone,
            Self::Password(_) => Field::Password,
            Self::DateOfBirth(_) => Field::DateOfBirth,
            Self::Gender(_) => Field::Gender,
            Self::Hobby { .. } => Field::Hobbies,
            Self::Division(_) => Field::Division,
            Self::ProfilePicture(_) => Field::ProfilePicture,
        }
    }

    fn apply_to(self, draft: &mut StudentDraft) {
        match self {
            Self::FirstName(value) => draft.first_name = value,
            Self::LastName(value) => draft.last_name = value,
            Self::Email(value) => draft.email = value,
            Self::Phone(value) => draft.phone = value,
            Self::Password(value) => draft.password = value,
            Self::DateOfBirth(value) => draft.date_of_birth = value,
            Self::Gender(value) => draft.gender = Some(value),
            Self::Hobby { hobby, selected } => draft.set_hobby(hobby, selected),
            Self::Division(value) => draft.division = Some(value),
            Self::ProfilePicture(value) => draft.profile_picture = value,
        }
    }
}

/// Completion signal sent to the form's owner after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Created(StudentId),
    Updated(StudentId),
}

impl FormEvent {
    pub fn id(self) -> StudentId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

#[derive(Debug)]
pub enum FormError {
    /// Full validation failed; the form stays open.
    Invalid(ValidationErrors),
    Record(RecordValidationError),
    Repo(RepoError),
    /// Cancel is only offered while creating.
    CancelUnavailable,
    AlreadyCommitted,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "form has invalid fields: {errors}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::CancelUnavailable => write!(f, "cancel is not available while editing"),
            Self::AlreadyCommitted => write!(f, "form was already submitted"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Record(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FormError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<RecordValidationError> for FormError {
    fn from(value: RecordValidationError) -> Self {
        Self::Record(value)
    }
}

/// Result of checking on the profile picture capture.
#[derive(Debug)]
pub enum CapturePoll {
    /// No capture was started.
    Idle,
    /// The worker is still reading/encoding.
    Pending,
    /// The encoded picture was stored in the draft.
    Applied,
    /// The outcome belonged to a reset or closed draft and was dropped.
    Discarded,
    Failed(CaptureError),
}

/// Registration form controller.
#[derive(Debug)]
pub struct FormController {
    mode: FormMode,
    draft: StudentDraft,
    touched: BTreeSet<Field>,
    errors: ValidationErrors,
    state: FormState,
    password_visible: bool,
    generation: u64,
    pending_capture: Option<ImageCaptureTask>,
}

impl FormController {
    /// Opens an empty form in create mode.
    pub fn create() -> Self {
        Self::with_draft(FormMode::Create, StudentDraft::default())
    }

    /// Opens a form prefilled from `record` in edit mode.
    pub fn edit(record: &StudentRecord) -> Self {
        Self::with_draft(FormMode::Edit(record.id), StudentDraft::from_record(record))
    }

    fn with_draft(mode: FormMode, draft: StudentDraft) -> Self {
        Self {
            mode,
            draft,
            touched: BTreeSet::new(),
            errors: ValidationErrors::default(),
            state: FormState::Idle,
            password_visible: false,
            generation: 0,
            pending_capture: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Errors of the whole draft as of the last validation run.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Errors the form displays: those of touched fields.
    pub fn visible_errors(&self) -> ValidationErrors {
        let mut visible = self.errors.clone();
        visible.retain(|field| self.touched.contains(&field));
        visible
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Label of the primary button.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Submit",
            FormMode::Edit(_) => "Update",
        }
    }

    /// Applies one field change and re-validates against `existing`.
    pub fn apply(&mut self, change: FieldChange, existing: &[StudentRecord]) -> FormState {
        if self.state == FormState::Committed {
            return self.state;
        }
        let field = change.field();
        change.apply_to(&mut self.draft);
        self.touched.insert(field);
        self.revalidate(existing)
    }

    /// Re-runs full validation and updates the state.
    pub fn revalidate(&mut self, existing: &[StudentRecord]) -> FormState {
        let ctx = ValidationContext::new(existing, self.mode.editing_id());
        self.errors = validate(&self.draft, &ctx);
        self.state = if self.errors.is_empty() {
            FormState::Valid
        } else {
            FormState::Invalid
        };
        self.state
    }

    /// Validates against the current store and commits the draft.
    ///
    /// Every field is marked touched first so all errors become visible.
    pub fn submit<R: StudentRepository>(&mut self, repo: &R) -> Result<FormEvent, FormError> {
        if self.state == FormState::Committed {
            return Err(FormError::AlreadyCommitted);
        }

        self.touched.extend(Field::ALL);
        let existing = repo.load_all()?;
        if self.revalidate(&existing) == FormState::Invalid {
            debug!(
                "event=form_submit module=form status=invalid error_count={}",
                self.errors.len()
            );
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let event = match self.mode {
            FormMode::Create => {
                let draft = &self.draft;
                let record = repo.insert_with(|id| draft.to_record(id).map_err(FormError::from))?;
                FormEvent::Created(record.id)
            }
            FormMode::Edit(id) => {
                let record = self.draft.to_record(id)?;
                repo.replace(&record)?;
                FormEvent::Updated(id)
            }
        };

        self.discard_capture();
        self.state = FormState::Committed;
        info!(
            "event=form_submit module=form status=ok action={} id={}",
            match event {
                FormEvent::Created(_) => "create",
                FormEvent::Updated(_) => "update",
            },
            event.id()
        );
        Ok(event)
    }

    /// Resets the draft to empty and untouched. Create mode only.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        if let FormMode::Edit(_) = self.mode {
            return Err(FormError::CancelUnavailable);
        }
        self.discard_capture();
        self.draft = StudentDraft::default();
        self.touched.clear();
        self.errors = ValidationErrors::default();
        self.state = FormState::Idle;
        Ok(())
    }

    /// Abandons any in-flight capture. Called when the popup closes.
    pub fn close(&mut self) {
        self.discard_capture();
    }

    pub fn toggle_password_visibility(&mut self) -> bool {
        self.password_visible = !self.password_visible;
        self.password_visible
    }

    pub fn password_visible(&self) -> bool {
        self.password_visible
    }

    /// Password as the input renders it: plain when visible, masked otherwise.
    pub fn password_display(&self) -> String {
        if self.password_visible {
            self.draft.password.clone()
        } else {
            "*".repeat(self.draft.password.chars().count())
        }
    }

    /// Current draft generation. Bumped on reset, close and commit.
    pub fn capture_generation(&self) -> u64 {
        self.generation
    }

    pub fn capture_pending(&self) -> bool {
        self.pending_capture.is_some()
    }

    /// Asks `picker` for an image and starts encoding it in the background.
    ///
    /// Returns `false` when the picker was dismissed. A newer capture
    /// replaces an unfinished older one.
    pub fn begin_image_capture(&mut self, picker: &mut dyn ImagePicker) -> bool {
        if self.state == FormState::Committed {
            return false;
        }
        let Some(path) = picker.pick_image() else {
            return false;
        };
        self.pending_capture = Some(ImageCaptureTask::spawn(path, self.generation));
        true
    }

    /// Applies the capture outcome if the worker has finished.
    pub fn poll_image_capture(&mut self, existing: &[StudentRecord]) -> CapturePoll {
        let Some(task) = self.pending_capture.take() else {
            return CapturePoll::Idle;
        };
        match task.try_take() {
            Some(outcome) => self.deliver_image(task.generation(), outcome, existing),
            None => {
                self.pending_capture = Some(task);
                CapturePoll::Pending
            }
        }
    }

    /// Blocks until the pending capture finishes, then applies it.
    pub fn wait_image_capture(&mut self, existing: &[StudentRecord]) -> CapturePoll {
        let Some(task) = self.pending_capture.take() else {
            return CapturePoll::Idle;
        };
        let generation = task.generation();
        let outcome = task.wait();
        self.deliver_image(generation, outcome, existing)
    }

    /// Callback entry for a capture outcome produced for `generation`.
    pub fn deliver_image(
        &mut self,
        generation: u64,
        outcome: Result<String, CaptureError>,
        existing: &[StudentRecord],
    ) -> CapturePoll {
        if generation != self.generation || self.state == FormState::Committed {
            debug!(
                "event=image_capture module=form status=discarded generation={} current={}",
                generation, self.generation
            );
            return CapturePoll::Discarded;
        }
        match outcome {
            Ok(data_uri) => {
                self.apply(FieldChange::ProfilePicture(data_uri), existing);
                CapturePoll::Applied
            }
            Err(err) => {
                warn!(
                    "event=image_capture module=form status=error error={}",
                    err
                );
                CapturePoll::Failed(err)
            }
        }
    }

    fn discard_capture(&mut self) {
        self.pending_capture = None;
        self.generation = self.generation.wrapping_add(1);
    }
}
