mod common;

use common::{record, valid_draft};
use registry_core::{validate, validate_field, Field, StudentDraft, ValidationContext};

#[test]
fn valid_draft_with_unique_contacts_has_no_errors() {
    let existing = vec![record(1, "Ann", "Lee"), record(2, "Bob", "Ray")];
    let ctx = ValidationContext::new(&existing, None);
    let errors = validate(&valid_draft(), &ctx);
    assert!(errors.is_empty(), "unexpected errors: {errors}");
}

#[test]
fn empty_draft_reports_every_required_field() {
    let ctx = ValidationContext::new(&[], None);
    let errors = validate(&StudentDraft::default(), &ctx);

    assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
    assert_eq!(errors.get(Field::LastName), Some("Last name is required"));
    assert_eq!(errors.get(Field::Email), Some("Email is required"));
    assert_eq!(errors.get(Field::Phone), Some("Phone number is required"));
    assert_eq!(errors.get(Field::Password), Some("Password is required"));
    assert_eq!(errors.get(Field::DateOfBirth), Some("Date of birth is required"));
    assert_eq!(errors.get(Field::Gender), Some("Gender is required"));
    assert_eq!(errors.get(Field::Hobbies), Some("Select at least one hobby"));
    assert_eq!(errors.get(Field::Division), Some("Division is required"));
    assert!(!errors.contains(Field::ProfilePicture));
    assert_eq!(errors.len(), 9);
}

#[test]
fn shared_email_with_another_id_is_flagged() {
    let mut existing = record(1, "Ann", "Lee");
    existing.email = "jane.doe@example.com".to_string();
    let existing = vec![existing];
    let ctx = ValidationContext::new(&existing, None);

    let errors = validate(&valid_draft(), &ctx);
    assert_eq!(errors.get(Field::Email), Some("This email is already in use."));
    assert_eq!(errors.len(), 1);
}

#[test]
fn shared_phone_with_another_id_is_flagged() {
    let mut existing = record(1, "Ann", "Lee");
    existing.phone = "9876543210".to_string();
    let existing = vec![existing];
    let ctx = ValidationContext::new(&existing, None);

    assert_eq!(
        validate_field(Field::Phone, &valid_draft(), &ctx),
        Some("This phone number is already in use.")
    );
}

#[test]
fn editing_a_record_does_not_conflict_with_itself() {
    let existing = vec![record(1, "Ann", "Lee"), record(2, "Bob", "Ray")];
    let draft = StudentDraft::from_record(&existing[1]);

    let editing = ValidationContext::new(&existing, Some(2));
    assert!(validate(&draft, &editing).is_empty());

    let creating = ValidationContext::new(&existing, None);
    let errors = validate(&draft, &creating);
    assert!(errors.contains(Field::Email));
    assert!(errors.contains(Field::Phone));
}

#[test]
fn uniqueness_compares_trimmed_values() {
    let mut existing = record(1, "Ann", "Lee");
    existing.email = "jane.doe@example.com".to_string();
    let existing = vec![existing];
    let ctx = ValidationContext::new(&existing, None);

    let mut draft = valid_draft();
    draft.email = "  jane.doe@example.com ".to_string();
    assert_eq!(
        validate_field(Field::Email, &draft, &ctx),
        Some("This email is already in use.")
    );
}

#[test]
fn format_rules_report_their_messages() {
    let ctx = ValidationContext::new(&[], None);
    let cases: [(Field, fn(&mut StudentDraft), &str); 9] = [
        (
            Field::Email,
            |d| d.email = "jane@example".to_string(),
            "Invalid email format",
        ),
        (
            Field::Email,
            |d| d.email = ".jane@example.com".to_string(),
            "Email cannot start with special characters like _ or .",
        ),
        (
            Field::Phone,
            |d| d.phone = "12345".to_string(),
            "Phone number must be 10 digits",
        ),
        (
            Field::Phone,
            |d| d.phone = "12345678ab".to_string(),
            "Phone number must be 10 digits",
        ),
        (
            Field::Password,
            |d| d.password = "Ab1!".to_string(),
            "Password must be at least 6 characters",
        ),
        (
            Field::Password,
            |d| d.password = "abcdef1!".to_string(),
            "Password must include one uppercase, one lowercase, one digit, and one special character",
        ),
        (
            Field::LastName,
            |d| d.last_name = "x".repeat(51),
            "Last name cannot exceed 50 characters",
        ),
        (
            Field::DateOfBirth,
            |d| d.date_of_birth = "2000-13-40".to_string(),
            "Invalid date of birth",
        ),
        (
            Field::ProfilePicture,
            |d| d.profile_picture = "file:///tmp/me.png".to_string(),
            "Invalid profile picture format",
        ),
    ];

    for (field, mutate, expected) in cases {
        let mut draft = valid_draft();
        mutate(&mut draft);
        assert_eq!(validate_field(field, &draft, &ctx), Some(expected), "{field}");
    }
}

#[test]
fn data_uri_profile_picture_is_accepted() {
    let ctx = ValidationContext::new(&[], None);
    let mut draft = valid_draft();
    draft.profile_picture = "data:image/png;base64,iVBORw0KGgo=".to_string();
    assert!(validate(&draft, &ctx).is_empty());
}

#[test]
fn name_length_bounds_are_inclusive() {
    let ctx = ValidationContext::new(&[], None);
    for len in [2, 50] {
        let mut draft = valid_draft();
        draft.first_name = "a".repeat(len);
        draft.last_name = "b".repeat(len);
        assert!(validate(&draft, &ctx).is_empty(), "length {len}");
    }

    let mut draft = valid_draft();
    draft.first_name = "a".repeat(51);
    draft.last_name = "b".repeat(1);
    assert_eq!(
        validate_field(Field::FirstName, &draft, &ctx),
        Some("First name cannot exceed 50 characters")
    );
    assert_eq!(
        validate_field(Field::LastName, &draft, &ctx),
        Some("Last name must be at least 2 characters")
    );
}

#[test]
fn date_of_birth_only_needs_to_be_a_calendar_date() {
    let ctx = ValidationContext::new(&[], None);
    let mut draft = valid_draft();
    draft.date_of_birth = "2999-01-01".to_string();
    assert!(validate(&draft, &ctx).is_empty());
}
