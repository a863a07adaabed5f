//! Student draft validation.
//!
//! # Responsibility
//! - Evaluate the declarative rule table against a draft.
//! - Report at most one message per field, in form order.
//!
//! # Invariants
//! - Validation is pure: no I/O, no mutation of the draft or the snapshot.
//! - An empty `ValidationErrors` means the draft can be committed.

pub mod rules;

use crate::model::student::{Field, StudentDraft};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub use rules::{all_rules, rules_for, Rule, ValidationContext};

/// Field-scoped validation messages, ordered by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.by_field.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.by_field.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.by_field
            .iter()
            .map(|(field, message)| (*field, *message))
    }

    /// Replaces the entry for `field` with the given outcome.
    pub fn set(&mut self, field: Field, message: Option<&'static str>) {
        match message {
            Some(message) => {
                self.by_field.insert(field, message);
            }
            None => {
                self.by_field.remove(&field);
            }
        }
    }

    /// Keeps only entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(Field) -> bool) {
        self.by_field.retain(|field, _| keep(*field));
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validates one field and returns its first failing message.
pub fn validate_field(
    field: Field,
    draft: &StudentDraft,
    ctx: &ValidationContext<'_>,
) -> Option<&'static str> {
    rules_for(field)
        .find(|rule| !(rule.holds)(draft, ctx))
        .map(|rule| rule.message)
}

/// Validates every field of `draft`.
pub fn validate(draft: &StudentDraft, ctx: &ValidationContext<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in Field::ALL {
        errors.set(field, validate_field(field, draft, ctx));
    }
    errors
}
