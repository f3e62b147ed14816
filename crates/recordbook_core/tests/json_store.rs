use recordbook_core::{
    decode_collection, encode_collection, fields, FieldValue, IdPolicy, InMemoryCollection,
    JsonFileStore, RecordRepository, StoreError, FORMAT_VERSION,
};
use serde_json::json;
use std::fs;

fn sample_collection(policy: IdPolicy) -> InMemoryCollection {
    let mut collection = InMemoryCollection::with_policy(policy);
    collection
        .add(fields([
            ("task", FieldValue::from("Learn")),
            ("completed", FieldValue::from(true)),
            ("estimate_hours", FieldValue::from(1.5)),
        ]))
        .unwrap();
    collection
        .add(fields([
            ("task", FieldValue::from("Build")),
            ("completed", FieldValue::from(false)),
            ("priority", FieldValue::from(2)),
            (
                "meta",
                FieldValue::Record(fields([
                    ("owner", FieldValue::from("sam")),
                    ("due", FieldValue::Null),
                ])),
            ),
        ]))
        .unwrap();
    collection
        .add(fields([("task", FieldValue::from("Write"))]))
        .unwrap();
    collection
}

#[test]
fn round_trip_preserves_records_ids_and_types() {
    let mut collection = sample_collection(IdPolicy::Renumber);
    collection.delete(1).unwrap();
    collection
        .update(1, fields([("completed", FieldValue::from(true))]))
        .unwrap();

    let text = encode_collection(&collection).unwrap();
    let decoded = decode_collection(&text).unwrap();

    assert_eq!(decoded, collection);
    let first = decoded.get(1).unwrap();
    assert_eq!(first.get("priority"), Some(&FieldValue::Integer(2)));
    assert_eq!(first.flag("completed"), Some(true));
}

#[test]
fn stable_round_trip_keeps_next_id() {
    let mut collection = sample_collection(IdPolicy::Stable);
    collection.delete(3).unwrap();

    let decoded = decode_collection(&encode_collection(&collection).unwrap()).unwrap();
    assert_eq!(decoded.id_policy(), IdPolicy::Stable);
    assert_eq!(decoded.next_id(), 4);

    let mut decoded = decoded;
    assert_eq!(decoded.add(fields([("task", FieldValue::from("new"))])).unwrap(), 4);
}

#[test]
fn encoded_document_uses_flat_record_fields() {
    let collection = sample_collection(IdPolicy::Renumber);
    let text = encode_collection(&collection).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["format_version"], FORMAT_VERSION);
    assert_eq!(value["id_policy"], "renumber");
    assert_eq!(value["next_id"], 4);
    let first = &value["records"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["task"], "Learn");
    assert_eq!(first["completed"], true);
    assert_eq!(first["estimate_hours"], 1.5);
    assert!(first["created_at"].is_string());
    assert_eq!(value["records"][1]["meta"]["owner"], "sam");
}

#[test]
fn decode_accepts_hand_written_document() {
    let document = json!({
        "format_version": 1,
        "records": [
            {"id": 1, "created_at": "2026-10-19T08:00:00Z", "name": "Alice", "phone": "123-456-7890", "email": "alice@email.com"},
            {"id": 2, "created_at": "2026-10-19T08:05:00Z", "name": "Bob", "phone": "234-567-8901", "email": null}
        ]
    });

    let collection = decode_collection(&document.to_string()).unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.id_policy(), IdPolicy::Renumber);
    assert!(collection.get(2).unwrap().get("email").unwrap().is_null());
}

#[test]
fn decode_rejects_invalid_documents() {
    let malformed = decode_collection("{not json").unwrap_err();
    assert!(matches!(malformed, StoreError::Malformed(_)));

    let future = json!({"format_version": FORMAT_VERSION + 1, "records": []});
    assert!(matches!(
        decode_collection(&future.to_string()).unwrap_err(),
        StoreError::UnsupportedVersion { .. }
    ));

    let duplicate = json!({
        "format_version": 1,
        "id_policy": "stable",
        "records": [
            {"id": 3, "created_at": "2026-10-19T08:00:00Z"},
            {"id": 3, "created_at": "2026-10-19T08:00:00Z"}
        ]
    });
    let err = decode_collection(&duplicate.to_string()).unwrap_err();
    assert!(err.to_string().contains("duplicate record id 3"), "{err}");

    let gap = json!({
        "format_version": 1,
        "id_policy": "renumber",
        "records": [
            {"id": 1, "created_at": "2026-10-19T08:00:00Z"},
            {"id": 3, "created_at": "2026-10-19T08:00:00Z"}
        ]
    });
    assert!(matches!(
        decode_collection(&gap.to_string()).unwrap_err(),
        StoreError::InvalidDocument(_)
    ));

    let stale_next = json!({
        "format_version": 1,
        "id_policy": "stable",
        "next_id": 2,
        "records": [{"id": 5, "created_at": "2026-10-19T08:00:00Z"}]
    });
    assert!(matches!(
        decode_collection(&stale_next.to_string()).unwrap_err(),
        StoreError::InvalidDocument(_)
    ));
}

#[test]
fn decode_checks_id_boundaries() {
    let max_id_without_next = json!({
        "format_version": 1,
        "id_policy": "stable",
        "records": [{"id": u64::MAX, "created_at": "2026-10-19T08:00:00Z"}]
    });
    let err = decode_collection(&max_id_without_next.to_string()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDocument(_)), "{err}");

    let max_next_id = json!({
        "format_version": 1,
        "id_policy": "stable",
        "next_id": u64::MAX,
        "records": []
    });
    let err = decode_collection(&max_next_id.to_string()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDocument(_)), "{err}");

    let last_usable = json!({
        "format_version": 1,
        "id_policy": "stable",
        "next_id": u64::MAX - 1,
        "records": [{"id": u64::MAX - 2, "created_at": "2026-10-19T08:00:00Z"}]
    });
    let collection = decode_collection(&last_usable.to_string()).unwrap();
    assert_eq!(collection.next_id(), u64::MAX - 1);
    assert_eq!(collection.records()[0].id, u64::MAX - 2);

    let zero_renumbered = json!({
        "format_version": 1,
        "id_policy": "renumber",
        "records": [{"id": 0, "created_at": "2026-10-19T08:00:00Z"}]
    });
    let err = decode_collection(&zero_renumbered.to_string()).unwrap_err();
    assert!(err.to_string().contains("positive"), "{err}");

    let max_renumbered = json!({
        "format_version": 1,
        "id_policy": "renumber",
        "records": [{"id": u64::MAX, "created_at": "2026-10-19T08:00:00Z"}]
    });
    assert!(matches!(
        decode_collection(&max_renumbered.to_string()).unwrap_err(),
        StoreError::InvalidDocument(_)
    ));
}

#[test]
fn file_store_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("tasks.json"));
    let collection = sample_collection(IdPolicy::Renumber);

    collection.save_to(&store).unwrap();
    assert!(store.exists());
    assert!(!dir.path().join("nested").join(".tasks.json.tmp").exists());

    let mut restored = InMemoryCollection::new();
    restored.load_from(&store).unwrap();
    assert_eq!(restored, collection);
}

#[test]
fn load_missing_file_reports_io_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    let mut collection = sample_collection(IdPolicy::Renumber);
    let before = collection.clone();

    let err = collection.load_from(&store).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(collection, before);
}

#[test]
fn load_malformed_file_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[1, 2").unwrap();
    let store = JsonFileStore::new(&path);
    let mut collection = sample_collection(IdPolicy::Stable);
    let before = collection.clone();

    let err = collection.load_from(&store).unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));
    assert!(!err.is_not_found());
    assert_eq!(collection, before);
}

#[test]
fn save_overwrites_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));

    let mut collection = sample_collection(IdPolicy::Renumber);
    collection.save_to(&store).unwrap();
    collection.delete(2).unwrap();
    collection.save_to(&store).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded, collection);
}
