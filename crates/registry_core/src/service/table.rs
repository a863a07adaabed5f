//! Table Controller: search, pagination and record actions.
//!
//! # Responsibility
//! - Mirror the store's record list and present one filtered page of it.
//! - Open the form (add/edit) or the detail viewer (view) as a popup.
//! - Delete records after confirmation.
//!
//! # Invariants
//! - The mirror is reloaded from the store after every committed form.
//! - Changing the query returns to page 1.
//! - The current page never points past the last page after a mutation.

use crate::model::student::{StudentId, StudentRecord};
use crate::repo::student_repo::{RepoError, RepoResult, StudentRepository};
use crate::search::filter::filter_records;
use crate::search::page::{clamp_page, paginate, total_pages, PageView, DEFAULT_PAGE_SIZE};
use crate::service::detail::DetailView;
use crate::service::form::{
    CapturePoll, FieldChange, FormController, FormError, FormEvent, FormState,
};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this data?";

/// Popup currently shown over the table.
#[derive(Debug)]
pub enum Popup {
    Form(FormController),
    /// Read-only snapshot of the viewed record.
    Details(StudentRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(StudentId),
    /// The user declined the confirmation; nothing changed.
    Declined,
}

#[derive(Debug)]
pub enum TableError {
    Repo(RepoError),
    Form(FormError),
    UnknownStudent(StudentId),
    NoOpenForm,
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Form(err) => write!(f, "{err}"),
            Self::UnknownStudent(id) => write!(f, "no student with id {id} in the table"),
            Self::NoOpenForm => write!(f, "no form is open"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::UnknownStudent(_) | Self::NoOpenForm => None,
        }
    }
}

impl From<RepoError> for TableError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<FormError> for TableError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

/// Student table over a repository.
pub struct TableController<R: StudentRepository> {
    repo: R,
    records: Vec<StudentRecord>,
    query: String,
    page: usize,
    page_size: usize,
    popup: Option<Popup>,
}

impl<R: StudentRepository> TableController<R> {
    /// Loads the table with [`DEFAULT_PAGE_SIZE`] rows per page.
    pub fn new(repo: R) -> RepoResult<Self> {
        Self::with_page_size(repo, DEFAULT_PAGE_SIZE)
    }

    /// Loads the table. A zero `page_size` falls back to the default.
    pub fn with_page_size(repo: R, page_size: usize) -> RepoResult<Self> {
        let records = repo.load_all()?;
        debug!(
            "event=table_load module=table status=ok count={}",
            records.len()
        );
        Ok(Self {
            repo,
            records,
            query: String::new(),
            page: 1,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            popup: None,
        })
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Reloads the mirror from the store.
    pub fn refresh(&mut self) -> RepoResult<()> {
        self.records = self.repo.load_all()?;
        self.clamp_current_page();
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Records matching the query, in store order.
    pub fn filtered(&self) -> Vec<&StudentRecord> {
        filter_records(&self.records, &self.query)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size)
    }

    pub fn current_page(&self) -> PageView<&StudentRecord> {
        paginate(self.filtered(), self.page, self.page_size)
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Moves forward one page. Returns `false` when Next is disabled.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Moves back one page. Returns `false` when Prev is disabled.
    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn form(&self) -> Option<&FormController> {
        match &self.popup {
            Some(Popup::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormController> {
        match &mut self.popup {
            Some(Popup::Form(form)) => Some(form),
            _ => None,
        }
    }

    /// Detail content for the open view popup, if any.
    pub fn details(&self) -> Option<DetailView> {
        match &self.popup {
            Some(Popup::Details(record)) => Some(DetailView::of(Some(record))),
            _ => None,
        }
    }

    /// Opens an empty create form.
    pub fn open_add(&mut self) {
        self.replace_popup(Popup::Form(FormController::create()));
    }

    /// Opens the form prefilled with record `id`.
    pub fn open_edit(&mut self, id: StudentId) -> Result<(), TableError> {
        let form = FormController::edit(self.find(id)?);
        self.replace_popup(Popup::Form(form));
        Ok(())
    }

    /// Opens the read-only detail viewer on a snapshot of record `id`.
    pub fn open_view(&mut self, id: StudentId) -> Result<DetailView, TableError> {
        let record = self.find(id)?.clone();
        let view = DetailView::of(Some(&record));
        self.replace_popup(Popup::Details(record));
        Ok(view)
    }

    /// Closes any popup. An unfinished picture capture is abandoned.
    pub fn close_popup(&mut self) {
        if let Some(Popup::Form(form)) = &mut self.popup {
            form.close();
        }
        self.popup = None;
    }

    /// Routes a field change to the open form.
    pub fn apply_form_change(&mut self, change: FieldChange) -> Result<FormState, TableError> {
        match &mut self.popup {
            Some(Popup::Form(form)) => Ok(form.apply(change, &self.records)),
            _ => Err(TableError::NoOpenForm),
        }
    }

    /// Checks on the open form's picture capture without blocking.
    pub fn poll_form_capture(&mut self) -> Result<CapturePoll, TableError> {
        match &mut self.popup {
            Some(Popup::Form(form)) => Ok(form.poll_image_capture(&self.records)),
            _ => Err(TableError::NoOpenForm),
        }
    }

    /// Waits for the open form's picture capture to finish.
    pub fn wait_form_capture(&mut self) -> Result<CapturePoll, TableError> {
        match &mut self.popup {
            Some(Popup::Form(form)) => Ok(form.wait_image_capture(&self.records)),
            _ => Err(TableError::NoOpenForm),
        }
    }

    /// Submits the open form; on success closes it and reloads the table.
    ///
    /// On validation failure the form stays open with all errors visible.
    pub fn submit_form(&mut self) -> Result<FormEvent, TableError> {
        let event = match &mut self.popup {
            Some(Popup::Form(form)) => form.submit(&self.repo)?,
            _ => return Err(TableError::NoOpenForm),
        };
        self.popup = None;
        self.refresh()?;
        Ok(event)
    }

    /// Deletes record `id` if `confirm` accepts [`DELETE_PROMPT`].
    pub fn delete(
        &mut self,
        id: StudentId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, TableError> {
        self.find(id)?;
        if !confirm(DELETE_PROMPT) {
            debug!("event=student_delete module=table status=declined id={id}");
            return Ok(DeleteOutcome::Declined);
        }

        self.repo.remove(id)?;
        self.records.retain(|record| record.id != id);
        self.clamp_current_page();
        info!("event=student_delete module=table status=ok id={id}");
        Ok(DeleteOutcome::Deleted(id))
    }

    fn find(&self, id: StudentId) -> Result<&StudentRecord, TableError> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or(TableError::UnknownStudent(id))
    }

    fn replace_popup(&mut self, popup: Popup) {
        self.close_popup();
        self.popup = Some(popup);
    }

    fn clamp_current_page(&mut self) {
        self.page = clamp_page(self.page, self.total_pages());
    }
}
