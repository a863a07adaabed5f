#![allow(dead_code)]

use chrono::NaiveDate;
use registry_core::{Division, Gender, Hobby, StudentDraft, StudentId, StudentRecord};

pub fn record(id: StudentId, first: &str, last: &str) -> StudentRecord {
    StudentRecord {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        phone: format!("98765{id:05}"),
        password: "Secret1!".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2001, 4, 12).unwrap(),
        gender: Gender::Other,
        hobbies: vec![Hobby::Reading],
        division: Division::B,
        profile_picture: String::new(),
    }
}

pub fn valid_draft() -> StudentDraft {
    StudentDraft {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane.doe@example.com".to_string(),
        phone: "9876543210".to_string(),
        password: "Secret1!".to_string(),
        date_of_birth: "2000-01-15".to_string(),
        gender: Some(Gender::Female),
        hobbies: vec![Hobby::Reading, Hobby::Traveling],
        division: Some(Division::A),
        profile_picture: String::new(),
    }
}

/// Smallest valid PNG header, enough for content sniffing.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
