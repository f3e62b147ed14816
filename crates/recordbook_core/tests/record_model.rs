use chrono::{TimeZone, Utc};
use recordbook_core::{fields, FieldValue, Record, RecordValidationError};
use serde_json::json;

#[test]
fn record_serializes_envelope_beside_fields() {
    let created_at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
    let record = Record::with_created_at(
        3,
        created_at,
        fields([
            ("task", FieldValue::from("Write documentation")),
            ("completed", FieldValue::from(false)),
        ]),
    )
    .unwrap();

    let mut value = serde_json::to_value(&record).unwrap();
    let stamp = value
        .as_object_mut()
        .unwrap()
        .remove("created_at")
        .unwrap();
    let parsed: chrono::DateTime<Utc> = serde_json::from_value(stamp.clone()).unwrap();
    assert_eq!(parsed, created_at);
    assert_eq!(
        value,
        json!({
            "id": 3,
            "task": "Write documentation",
            "completed": false
        })
    );
    value
        .as_object_mut()
        .unwrap()
        .insert("created_at".to_string(), stamp);

    let decoded: Record = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn new_rejects_reserved_field_names() {
    let err = Record::new(1, fields([("created_at", FieldValue::from("yesterday"))])).unwrap_err();
    assert_eq!(
        err,
        RecordValidationError::ReservedFieldName("created_at".to_string())
    );
}

#[test]
fn merge_validates_before_writing() {
    let mut record = Record::new(1, fields([("task", FieldValue::from("Learn"))])).unwrap();

    let err = record
        .merge(fields([
            ("note", FieldValue::from("kept out")),
            ("id", FieldValue::from(9)),
        ]))
        .unwrap_err();
    assert!(matches!(err, RecordValidationError::ReservedFieldName(_)));
    assert!(record.get("note").is_none());
    assert_eq!(record.id, 1);

    record
        .merge(fields([("task", FieldValue::from("Learn more"))]))
        .unwrap();
    assert_eq!(record.text("task"), Some("Learn more"));
}

#[test]
fn typed_accessors_ignore_mismatched_types() {
    let record = Record::new(
        1,
        fields([
            ("completed", FieldValue::from("yes")),
            ("pages", FieldValue::from(300)),
        ]),
    )
    .unwrap();

    assert_eq!(record.flag("completed"), None);
    assert_eq!(record.text("pages"), None);
    assert_eq!(record.get("pages").and_then(FieldValue::as_integer), Some(300));
    assert_eq!(record.get("pages").unwrap().kind_name(), "integer");
}
