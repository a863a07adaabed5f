//! Detail Viewer: read-only rendering of one record.

use crate::model::student::{StudentRecord, DATE_FORMAT};
use std::fmt::{Display, Formatter};

pub const LOADING_PLACEHOLDER: &str = "Loading student details...";

/// Rendered detail popup content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// No record was handed over yet.
    Loading,
    Ready {
        /// `(label, value)` rows in display order. The password is never included.
        rows: Vec<(&'static str, String)>,
        has_picture: bool,
    },
}

impl DetailView {
    pub fn of(record: Option<&StudentRecord>) -> Self {
        let Some(record) = record else {
            return Self::Loading;
        };

        let hobbies = record
            .hobbies
            .iter()
            .map(|hobby| hobby.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let picture = if record.profile_picture.is_empty() {
            "N/A".to_string()
        } else {
            "attached".to_string()
        };

        Self::Ready {
            rows: vec![
                ("First Name", record.first_name.clone()),
                ("Last Name", record.last_name.clone()),
                ("Email", record.email.clone()),
                ("Phone", record.phone.clone()),
                ("Gender", record.gender.as_str().to_string()),
                (
                    "Date of Birth",
                    record.date_of_birth.format(DATE_FORMAT).to_string(),
                ),
                ("Hobbies", hobbies),
                ("Division", record.division.as_str().to_string()),
                ("Profile Picture", picture),
            ],
            has_picture: !record.profile_picture.is_empty(),
        }
    }

    /// Looks up one row value by label.
    pub fn value(&self, label: &str) -> Option<&str> {
        match self {
            Self::Loading => None,
            Self::Ready { rows, .. } => rows
                .iter()
                .find(|(row_label, _)| *row_label == label)
                .map(|(_, value)| value.as_str()),
        }
    }
}

impl Display for DetailView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str(LOADING_PLACEHOLDER),
            Self::Ready { rows, .. } => {
                writeln!(f, "Student Details")?;
                let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
                for (label, value) in rows {
                    writeln!(f, "  {label:<width$}  {value}")?;
                }
                Ok(())
            }
        }
    }
}
