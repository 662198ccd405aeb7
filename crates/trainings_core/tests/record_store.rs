use trainings_core::{
    seed_entries, Entry, Icon, RecordStore, SqliteRecordStore, StoreError, DEFAULT_STORE_NAME,
    TRAININGS_KEY,
};

fn memory_store() -> SqliteRecordStore {
    SqliteRecordStore::open_in_memory(DEFAULT_STORE_NAME).unwrap()
}

#[test]
fn fresh_store_is_empty() {
    let store = memory_store();
    assert!(!store.exists().unwrap());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn save_then_load_returns_same_sequence() {
    let store = memory_store();
    let entries = seed_entries();

    store.save(&entries).unwrap();
    assert!(store.exists().unwrap());
    assert_eq!(store.load().unwrap(), Some(entries));
}

#[test]
fn save_replaces_previous_value() {
    let store = memory_store();
    store.save(&seed_entries()).unwrap();

    let replacement = vec![Entry::new("Yoga", "Estiramientos", Icon::Voleibol)];
    store.save(&replacement).unwrap();
    assert_eq!(store.load().unwrap(), Some(replacement));
}

#[test]
fn clear_removes_value() {
    let store = memory_store();
    store.save(&seed_entries()).unwrap();

    store.clear().unwrap();
    assert!(!store.exists().unwrap());
    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn undecodable_value_reports_corrupt_state() {
    let store = memory_store();
    store.write_raw(TRAININGS_KEY, "{not json").unwrap();

    assert!(store.exists().unwrap());
    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::CorruptState(_)), "unexpected error: {err}");
}

#[test]
fn stored_text_is_a_json_array_of_entries() {
    let store = memory_store();
    store
        .save(&[Entry::new("Yoga", "Estiramientos", Icon::Running)])
        .unwrap();

    let raw = store.read_raw(TRAININGS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "name": "Yoga", "description": "Estiramientos", "iconRef": 3 }])
    );
}

#[test]
fn store_names_are_isolated_within_one_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let first = SqliteRecordStore::open(&path, "first").unwrap();
    let second = SqliteRecordStore::open(&path, "second").unwrap();
    first.save(&seed_entries()).unwrap();

    assert!(first.exists().unwrap());
    assert!(!second.exists().unwrap());
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trainings.db");

    let store = SqliteRecordStore::open(&path, DEFAULT_STORE_NAME).unwrap();
    store.save(&seed_entries()).unwrap();
    drop(store);

    let reopened = SqliteRecordStore::open(&path, DEFAULT_STORE_NAME).unwrap();
    assert_eq!(reopened.load().unwrap(), Some(seed_entries()));
}
