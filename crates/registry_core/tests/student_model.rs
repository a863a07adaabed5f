mod common;

use common::{record, valid_draft};
use registry_core::{Division, Field, Gender, Hobby, RecordValidationError, StudentDraft};

#[test]
fn record_serialization_uses_storage_wire_fields() {
    let mut student = record(3, "Jane", "Doe");
    student.hobbies = vec![Hobby::Gaming, Hobby::Sports];
    student.profile_picture = "data:image/png;base64,AAAA".to_string();

    let json = serde_json::to_value(&student).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["firstName"], "Jane");
    assert_eq!(json["lastName"], "Doe");
    assert_eq!(json["phone"], "9876500003");
    assert_eq!(json["dob"], "2001-04-12");
    assert_eq!(json["gender"], "other");
    assert_eq!(json["hobbies"], serde_json::json!(["Gaming", "Sports"]));
    assert_eq!(json["division"], "B");
    assert_eq!(json["profilePicture"], "data:image/png;base64,AAAA");

    let decoded: registry_core::StudentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, student);
}

#[test]
fn missing_profile_picture_key_decodes_as_empty() {
    let value = serde_json::json!({
        "id": 1,
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com",
        "phone": "1234567890",
        "password": "Secret1!",
        "dob": "1999-12-31",
        "gender": "female",
        "hobbies": ["Reading"],
        "division": "C"
    });
    let decoded: registry_core::StudentRecord = serde_json::from_value(value).unwrap();
    assert!(decoded.profile_picture.is_empty());
}

#[test]
fn draft_to_record_trims_text_and_keeps_id() {
    let mut draft = valid_draft();
    draft.first_name = "  Jane ".to_string();
    draft.email = " jane.doe@example.com ".to_string();

    let student = draft.to_record(7).unwrap();
    assert_eq!(student.id, 7);
    assert_eq!(student.first_name, "Jane");
    assert_eq!(student.email, "jane.doe@example.com");
    assert_eq!(student.gender, Gender::Female);
    assert_eq!(student.division, Division::A);
}

#[test]
fn draft_prefill_round_trips_through_record() {
    let student = record(4, "Omar", "Khan");
    let draft = StudentDraft::from_record(&student);
    assert_eq!(draft.date_of_birth, "2001-04-12");
    assert_eq!(draft.to_record(4).unwrap(), student);
}

#[test]
fn to_record_reports_missing_and_malformed_values() {
    let mut draft = valid_draft();
    draft.gender = None;
    assert_eq!(
        draft.to_record(1).unwrap_err(),
        RecordValidationError::MissingField(Field::Gender)
    );

    let mut draft = valid_draft();
    draft.date_of_birth = "15/01/2000".to_string();
    assert_eq!(
        draft.to_record(1).unwrap_err(),
        RecordValidationError::InvalidDate("15/01/2000".to_string())
    );

    let mut draft = valid_draft();
    draft.hobbies.clear();
    assert_eq!(
        draft.to_record(1).unwrap_err(),
        RecordValidationError::MissingField(Field::Hobbies)
    );
}

#[test]
fn record_validate_guards_id_and_picture() {
    let mut student = record(1, "Jane", "Doe");
    student.id = 0;
    assert_eq!(student.validate(), Err(RecordValidationError::ZeroId));

    let mut student = record(1, "Jane", "Doe");
    student.profile_picture = "https://example.com/me.png".to_string();
    assert_eq!(
        student.validate(),
        Err(RecordValidationError::InvalidProfilePicture)
    );
}

#[test]
fn record_validate_rejects_repeated_hobby() {
    let json = serde_json::json!({
        "id": 2,
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com",
        "phone": "1234567890",
        "password": "Secret1!",
        "dob": "1999-12-31",
        "gender": "female",
        "hobbies": ["Reading", "Gaming", "Reading"],
        "division": "C"
    });
    let decoded: registry_core::StudentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(
        decoded.validate(),
        Err(RecordValidationError::DuplicateHobby(Hobby::Reading))
    );
}

#[test]
fn set_hobby_keeps_order_and_ignores_duplicates() {
    let mut draft = StudentDraft::default();
    draft.set_hobby(Hobby::Sports, true);
    draft.set_hobby(Hobby::Reading, true);
    draft.set_hobby(Hobby::Sports, true);
    assert_eq!(draft.hobbies, vec![Hobby::Sports, Hobby::Reading]);

    draft.set_hobby(Hobby::Sports, false);
    assert_eq!(draft.hobbies, vec![Hobby::Reading]);
}

#[test]
fn vocabulary_parsing_is_case_insensitive() {
    assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
    assert_eq!(" b ".parse::<Division>().unwrap(), Division::B);
    assert_eq!("traveling".parse::<Hobby>().unwrap(), Hobby::Traveling);
    assert!("Knitting".parse::<Hobby>().is_err());
}
