mod common;

use common::record;
use registry_core::db::open_db_in_memory;
use registry_core::{
    next_id, InMemoryStudentRepository, KeyValueSlot, MemorySlotStore, RepoError,
    SlotStudentRepository, SqliteSlotStore, StudentRepository, DEFAULT_STORAGE_KEY,
};

#[test]
fn next_id_starts_at_one_and_follows_max() {
    assert_eq!(next_id(&[]), 1);
    assert_eq!(next_id(&[record(1, "Ann", "Lee"), record(5, "Bob", "Ray")]), 6);
}

#[test]
fn empty_slot_loads_as_empty_list() {
    let repo = SlotStudentRepository::new(MemorySlotStore::new());
    assert!(repo.load_all().unwrap().is_empty());
    assert_eq!(repo.key(), DEFAULT_STORAGE_KEY);
}

#[test]
fn malformed_slot_value_loads_as_empty_list() {
    let slot = MemorySlotStore::new();
    for raw in ["not json", "null", "{\"id\":1}", "[{\"id\":\"x\"}]"] {
        slot.write(DEFAULT_STORAGE_KEY, raw).unwrap();
        let repo = SlotStudentRepository::new(&slot);
        assert!(repo.load_all().unwrap().is_empty(), "raw value {raw}");
    }
}

#[test]
fn stored_records_breaking_save_invariants_load_as_empty_and_store_recovers() {
    let mut no_hobbies = serde_json::to_value(record(1, "Ann", "Lee")).unwrap();
    no_hobbies["hobbies"] = serde_json::json!([]);
    let mut zero_id = serde_json::to_value(record(1, "Ann", "Lee")).unwrap();
    zero_id["id"] = serde_json::json!(0);
    let duplicate_ids = serde_json::to_value(vec![record(3, "Ann", "Lee"), record(3, "Bob", "Ray")])
        .unwrap();

    for stored in [
        serde_json::json!([no_hobbies]),
        serde_json::json!([zero_id]),
        duplicate_ids,
    ] {
        let slot = MemorySlotStore::new();
        slot.write(DEFAULT_STORAGE_KEY, &stored.to_string()).unwrap();
        let repo = SlotStudentRepository::new(&slot);

        let loaded = repo.load_all().unwrap();
        assert!(loaded.is_empty(), "stored value {stored}");
        repo.save_all(&loaded).unwrap();

        let created = repo
            .insert_with::<RepoError>(|id| Ok(record(id, "Dee", "Fox")))
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(repo.load_all().unwrap(), vec![created]);
    }
}

#[test]
fn save_then_load_round_trips_and_resave_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let slot = SqliteSlotStore::new(&conn);
    let repo = SlotStudentRepository::new(&slot);

    let records = vec![record(1, "Ann", "Lee"), record(2, "Bob", "Ray")];
    repo.save_all(&records).unwrap();
    let first_raw = slot.read(DEFAULT_STORAGE_KEY).unwrap().unwrap();

    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded, records);

    repo.save_all(&loaded).unwrap();
    let second_raw = slot.read(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(first_raw, second_raw);
}

#[test]
fn custom_key_isolates_record_lists() {
    let slot = MemorySlotStore::new();
    let a = SlotStudentRepository::with_key(&slot, "classA");
    let b = SlotStudentRepository::with_key(&slot, "classB");

    a.save_all(&[record(1, "Ann", "Lee")]).unwrap();
    assert_eq!(a.load_all().unwrap().len(), 1);
    assert!(b.load_all().unwrap().is_empty());
}

#[test]
fn save_rejects_duplicate_ids_and_invalid_records() {
    let repo = InMemoryStudentRepository::new();

    let err = repo
        .save_all(&[record(2, "Ann", "Lee"), record(2, "Bob", "Ray")])
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(2)));

    let mut invalid = record(3, "Cy", "Moe");
    invalid.hobbies.clear();
    let err = repo.save_all(&[invalid]).unwrap_err();
    assert!(matches!(err, RepoError::Validation { id: 3, .. }));
    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn insert_assigns_next_id() {
    let repo = InMemoryStudentRepository::with_records(vec![record(4, "Ann", "Lee")]).unwrap();
    let created = repo
        .insert_with::<RepoError>(|id| Ok(record(id, "Bob", "Ray")))
        .unwrap();
    assert_eq!(created.id, 5);
    assert_eq!(repo.load_all().unwrap().len(), 2);
}

#[test]
fn replace_keeps_position_and_missing_id_is_not_found() {
    let repo = InMemoryStudentRepository::with_records(vec![
        record(1, "Ann", "Lee"),
        record(2, "Bob", "Ray"),
    ])
    .unwrap();

    let mut updated = record(1, "Anna", "Lee");
    updated.phone = "1112223333".to_string();
    repo.replace(&updated).unwrap();
    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded[0], updated);
    assert_eq!(loaded[1].id, 2);

    let err = repo.replace(&record(9, "Zed", "Zo")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(9)));
}

#[test]
fn remove_deletes_exactly_one_id_without_renumbering() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotStudentRepository::new(SqliteSlotStore::new(&conn));
    repo.save_all(&[
        record(1, "Ann", "Lee"),
        record(2, "Bob", "Ray"),
        record(3, "Cy", "Moe"),
    ])
    .unwrap();

    repo.remove(2).unwrap();
    let ids = repo
        .load_all()
        .unwrap()
        .iter()
        .map(|student| student.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 3]);

    assert!(matches!(repo.remove(2).unwrap_err(), RepoError::NotFound(2)));
    let created = repo
        .insert_with::<RepoError>(|id| Ok(record(id, "Dee", "Fox")))
        .unwrap();
    assert_eq!(created.id, 4);
}

#[test]
fn sqlite_slot_overwrites_and_removes_values() {
    let conn = open_db_in_memory().unwrap();
    let slot = SqliteSlotStore::new(&conn);

    assert_eq!(slot.read("k").unwrap(), None);
    slot.write("k", "one").unwrap();
    slot.write("k", "two").unwrap();
    assert_eq!(slot.read("k").unwrap().as_deref(), Some("two"));
    slot.remove("k").unwrap();
    assert_eq!(slot.read("k").unwrap(), None);
}

#[test]
fn removing_highest_id_lets_next_insert_take_it() {
    let repo = InMemoryStudentRepository::with_records(vec![
        record(1, "Ann", "Lee"),
        record(2, "Bob", "Ray"),
    ])
    .unwrap();

    repo.remove(2).unwrap();
    let created = repo
        .insert_with::<RepoError>(|id| Ok(record(id, "Cy", "Moe")))
        .unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(repo.get(1).unwrap().unwrap().first_name, "Ann");
}
