//! Declarative per-field validation rules.
//!
//! # Responsibility
//! - Hold the ordered rule table for every form field.
//! - Keep each rule a pure predicate over the draft and its context.
//!
//! # Invariants
//! - Rules of one field are evaluated in table order; the first failing rule
//!   owns the field's message.
//! - Uniqueness rules never match the record currently being edited.

use crate::model::student::{
    is_valid_profile_picture, Field, StudentDraft, StudentId, StudentRecord,
};
use once_cell::sync::Lazy;
use regex::Regex;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Snapshot the uniqueness rules compare against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Records currently persisted.
    pub existing: &'a [StudentRecord],
    /// Identifier of the record being edited, excluded from uniqueness.
    pub editing: Option<StudentId>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(existing: &'a [StudentRecord], editing: Option<StudentId>) -> Self {
        Self { existing, editing }
    }

    fn others(&self) -> impl Iterator<Item = &'a StudentRecord> + '_ {
        self.existing
            .iter()
            .filter(move |record| Some(record.id) != self.editing)
    }
}

/// One predicate + message pair. `holds` returns `true` when the draft passes.
#[derive(Clone, Copy)]
pub struct Rule {
    pub field: Field,
    pub message: &'static str,
    pub holds: fn(&StudentDraft, &ValidationContext<'_>) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish()
    }
}

macro_rules! rule {
    ($field:ident, $message:expr, $holds:expr) => {
        Rule {
            field: Field::$field,
            message: $message,
            holds: $holds,
        }
    };
}

const RULES: &[Rule] = &[
    rule!(FirstName, "First name is required", first_name_present),
    rule!(
        FirstName,
        "First name must be at least 2 characters",
        first_name_min
    ),
    rule!(
        FirstName,
        "First name cannot exceed 50 characters",
        first_name_max
    ),
    rule!(LastName, "Last name is required", last_name_present),
    rule!(
        LastName,
        "Last name must be at least 2 characters",
        last_name_min
    ),
    rule!(
        LastName,
        "Last name cannot exceed 50 characters",
        last_name_max
    ),
    rule!(Email, "Email is required", email_present),
    rule!(Email, "Invalid email format", email_format),
    rule!(
        Email,
        "Email cannot start with special characters like _ or .",
        email_leading_char
    ),
    rule!(Email, "This email is already in use.", email_unique),
    rule!(Phone, "Phone number is required", phone_present),
    rule!(Phone, "Phone number must be 10 digits", phone_format),
    rule!(Phone, "This phone number is already in use.", phone_unique),
    rule!(Password, "Password is required", password_present),
    rule!(
        Password,
        "Password must be at least 6 characters",
        password_min
    ),
    rule!(
        Password,
        "Password must include one uppercase, one lowercase, one digit, and one special character",
        password_complexity
    ),
    rule!(DateOfBirth, "Date of birth is required", dob_present),
    rule!(DateOfBirth, "Invalid date of birth", dob_parses),
    rule!(Gender, "Gender is required", gender_present),
    rule!(Hobbies, "Select at least one hobby", hobbies_present),
    rule!(Division, "Division is required", division_present),
    rule!(
        ProfilePicture,
        "Invalid profile picture format",
        profile_picture_format
    ),
];

/// Returns the full ordered rule table.
pub fn all_rules() -> &'static [Rule] {
    RULES
}

/// Returns the ordered rules that apply to one field.
pub fn rules_for(field: Field) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.field == field)
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn first_name_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.first_name.trim().is_empty()
}

fn first_name_min(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    char_len(&draft.first_name) >= NAME_MIN_CHARS
}

fn first_name_max(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    char_len(&draft.first_name) <= NAME_MAX_CHARS
}

fn last_name_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.last_name.trim().is_empty()
}

fn last_name_min(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    char_len(&draft.last_name) >= NAME_MIN_CHARS
}

fn last_name_max(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    char_len(&draft.last_name) <= NAME_MAX_CHARS
}

fn email_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.email.trim().is_empty()
}

fn email_format(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    EMAIL_RE.is_match(draft.email.trim())
}

fn email_leading_char(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.email.trim().starts_with(['_', '.'])
}

fn email_unique(draft: &StudentDraft, ctx: &ValidationContext<'_>) -> bool {
    let email = draft.email.trim();
    !ctx.others().any(|record| record.email == email)
}

fn phone_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.phone.trim().is_empty()
}

fn phone_format(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    PHONE_RE.is_match(draft.phone.trim())
}

fn phone_unique(draft: &StudentDraft, ctx: &ValidationContext<'_>) -> bool {
    let phone = draft.phone.trim();
    !ctx.others().any(|record| record.phone == phone)
}

fn password_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.password.is_empty()
}

fn password_min(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    draft.password.chars().count() >= PASSWORD_MIN_CHARS
}

fn password_complexity(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    let password = draft.password.as_str();
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

fn dob_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.date_of_birth.trim().is_empty()
}

fn dob_parses(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    draft.parsed_date_of_birth().is_some()
}

fn gender_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    draft.gender.is_some()
}

fn hobbies_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    !draft.hobbies.is_empty()
}

fn division_present(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    draft.division.is_some()
}

fn profile_picture_format(draft: &StudentDraft, _: &ValidationContext<'_>) -> bool {
    is_valid_profile_picture(&draft.profile_picture)
}
