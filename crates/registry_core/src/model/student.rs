//! Student record and form draft model.
//!
//! # Responsibility
//! - Define the canonical persisted `StudentRecord` shape.
//! - Define the `StudentDraft` edited by the form controller.
//! - Convert between drafts and records at commit/prefill boundaries.
//!
//! # Invariants
//! - `id` is positive and immutable once assigned by the store.
//! - `hobbies` never contains duplicates.
//! - `profile_picture` is empty or a `data:image/` URI.
//! - Serialized keys stay compatible with the `formData` storage layout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned identifier for a student record.
pub type StudentId = u32;

/// Prefix every accepted profile picture payload starts with.
pub const PROFILE_PICTURE_PREFIX: &str = "data:image/";

/// Input format for the date-of-birth field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Division {
    A,
    B,
    C,
}

impl Division {
    pub const ALL: [Division; 3] = [Division::A, Division::B, Division::C];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

/// Fixed hobby vocabulary offered by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Hobby {
    Reading,
    Gaming,
    Sports,
    Traveling,
}

impl Hobby {
    pub const ALL: [Hobby; 4] = [Hobby::Reading, Hobby::Gaming, Hobby::Sports, Hobby::Traveling];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Gaming => "Gaming",
            Self::Sports => "Sports",
            Self::Traveling => "Traveling",
        }
    }
}

/// Error returned when parsing a vocabulary value from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for UnknownVariant {}

fn parse_variant<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    label: impl Fn(T) -> &'static str,
) -> Result<T, UnknownVariant> {
    let trimmed = value.trim();
    all.iter()
        .copied()
        .find(|candidate| label(*candidate).eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| UnknownVariant {
            kind,
            value: trimmed.to_string(),
        })
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("gender", s, &Gender::ALL, Gender::as_str)
    }
}

impl FromStr for Division {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("division", s, &Division::ALL, Division::as_str)
    }
}

impl FromStr for Hobby {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("hobby", s, &Hobby::ALL, Hobby::as_str)
    }
}

/// Form fields, in the order the registration form lays them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    DateOfBirth,
    Gender,
    Hobbies,
    Division,
    ProfilePicture,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Password,
        Field::DateOfBirth,
        Field::Gender,
        Field::Hobbies,
        Field::Division,
        Field::ProfilePicture,
    ];

    /// Stable external field name, matching the persisted JSON keys.
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::DateOfBirth => "dob",
            Self::Gender => "gender",
            Self::Hobbies => "hobbies",
            Self::Division => "division",
            Self::ProfilePicture => "profilePicture",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Persistence-time invariant violations for a student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Identifiers start at 1.
    ZeroId,
    /// A required field is empty or unset.
    MissingField(Field),
    /// Date of birth input is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    DuplicateHobby(Hobby),
    /// Picture payload is neither empty nor an image data URI.
    InvalidProfilePicture,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "student id must be positive"),
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::InvalidDate(value) => write!(f, "invalid date of birth `{value}`"),
            Self::DuplicateHobby(hobby) => write!(f, "hobby `{}` is listed twice", hobby.as_str()),
            Self::InvalidProfilePicture => {
                write!(f, "profile picture must be empty or an image data URI")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// Canonical persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Serialized as `dob` in `YYYY-MM-DD` form.
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub hobbies: Vec<Hobby>,
    pub division: Division,
    /// Base64 image data URI, or empty when no picture was captured.
    #[serde(default)]
    pub profile_picture: String,
}

impl StudentRecord {
    /// Checks the invariants every record must hold before it is persisted.
    ///
    /// Field format rules (lengths, patterns, uniqueness) belong to the
    /// validator; this only guards the shape the store relies on.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id == 0 {
            return Err(RecordValidationError::ZeroId);
        }

        let required = [
            (Field::FirstName, &self.first_name),
            (Field::LastName, &self.last_name),
            (Field::Email, &self.email),
            (Field::Phone, &self.phone),
            (Field::Password, &self.password),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RecordValidationError::MissingField(field));
            }
        }

        if self.hobbies.is_empty() {
            return Err(RecordValidationError::MissingField(Field::Hobbies));
        }
        for (index, hobby) in self.hobbies.iter().enumerate() {
            if self.hobbies[..index].contains(hobby) {
                return Err(RecordValidationError::DuplicateHobby(*hobby));
            }
        }

        if !is_valid_profile_picture(&self.profile_picture) {
            return Err(RecordValidationError::InvalidProfilePicture);
        }

        Ok(())
    }

    /// Display name used by tables and search.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// In-progress form values, before validation and commit.
///
/// Text inputs stay raw (untrimmed) so the form can echo exactly what was
/// typed; trimming happens in [`StudentDraft::to_record`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Raw date input, expected as `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    /// Selected hobbies in selection order.
    pub hobbies: Vec<Hobby>,
    pub division: Option<Division>,
    pub profile_picture: String,
}

impl StudentDraft {
    /// Prefills a draft from an existing record for editing.
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            password: record.password.clone(),
            date_of_birth: record.date_of_birth.format(DATE_FORMAT).to_string(),
            gender: Some(record.gender),
            hobbies: record.hobbies.clone(),
            division: Some(record.division),
            profile_picture: record.profile_picture.clone(),
        }
    }

    /// Selects or deselects one hobby, keeping selection order.
    pub fn set_hobby(&mut self, hobby: Hobby, selected: bool) {
        let present = self.hobbies.contains(&hobby);
        if selected && !present {
            self.hobbies.push(hobby);
        } else if !selected && present {
            self.hobbies.retain(|existing| *existing != hobby);
        }
    }

    /// Parses the raw date input, if present and well-formed.
    pub fn parsed_date_of_birth(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_of_birth.trim(), DATE_FORMAT).ok()
    }

    /// Converts the draft into a record carrying `id`.
    ///
    /// Text fields are trimmed. The result is checked with
    /// [`StudentRecord::validate`].
    pub fn to_record(&self, id: StudentId) -> Result<StudentRecord, RecordValidationError> {
        let date_of_birth = self.parsed_date_of_birth().ok_or_else(|| {
            if self.date_of_birth.trim().is_empty() {
                RecordValidationError::MissingField(Field::DateOfBirth)
            } else {
                RecordValidationError::InvalidDate(self.date_of_birth.trim().to_string())
            }
        })?;
        let gender = self
            .gender
            .ok_or(RecordValidationError::MissingField(Field::Gender))?;
        let division = self
            .division
            .ok_or(RecordValidationError::MissingField(Field::Division))?;

        let record = StudentRecord {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
            date_of_birth,
            gender,
            hobbies: self.hobbies.clone(),
            division,
            profile_picture: self.profile_picture.clone(),
        };
        record.validate()?;
        Ok(record)
    }
}

/// Returns whether `value` is an acceptable profile picture payload.
pub fn is_valid_profile_picture(value: &str) -> bool {
    value.is_empty() || value.starts_with(PROFILE_PICTURE_PREFIX)
}
