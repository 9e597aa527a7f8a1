//! Export round-trip tests

use tasknorm::export::{from_csv, from_json, to_csv, to_json, write_export};
use tasknorm::{ExportFormat, Priority, TagCategory, TaskOutput};
use tempfile::TempDir;

fn outputs() -> Vec<TaskOutput> {
    vec![
        TaskOutput::new(
            "Schedule team meeting for Wednesday 3pm in conference room B please",
            vec![TagCategory::Work, TagCategory::Communication],
            Priority::Medium,
            "talk to team re: timeline, \"wed?\"",
            Some(0.95),
            Some(812.37),
        )
        .unwrap(),
        TaskOutput::new(
            "Buy milk and eggs from the corner store on the way home",
            vec![TagCategory::Shopping],
            Priority::Low,
            "buy milk, eggs\nasap",
            None,
            None,
        )
        .unwrap(),
    ]
}

fn assert_preserved(original: &[TaskOutput], restored: &[TaskOutput]) {
    assert_eq!(original.len(), restored.len());
    for (a, b) in original.iter().zip(restored) {
        assert_eq!(a.summary(), b.summary());
        assert_eq!(a.priority(), b.priority());
        assert_eq!(a.confidence_score(), b.confidence_score());
        assert_eq!(a.original_text(), b.original_text());
        assert_eq!(a.tags(), b.tags());
    }
}

#[test]
fn test_json_round_trip() {
    let original = outputs();
    let json = to_json(&original).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["priority"], "MEDIUM");
    assert_eq!(value[0]["tags"], "work, communication");
    assert!(value[1]["confidence_score"].is_null());

    assert_preserved(&original, &from_json(&json).unwrap());
}

#[test]
fn test_csv_round_trip() {
    let original = outputs();
    let csv = to_csv(&original).unwrap();
    assert_preserved(&original, &from_csv(&csv).unwrap());
}

#[test]
fn test_import_rejects_invalid_rows() {
    let json = r#"[{
        "summary": "too short",
        "tags": "work",
        "priority": "LOW",
        "confidence_score": null,
        "processing_time_ms": null,
        "original_text": "x"
    }]"#;
    assert!(matches!(from_json(json), Err(tasknorm::Error::Validation(e)) if e.field == "summary"));
}

#[test]
fn test_write_export_to_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let original = outputs();

    let json_path = dir.path().join("tasks.json");
    write_export(&json_path, &original, ExportFormat::Json).unwrap();
    let restored = from_json(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_preserved(&original, &restored);

    let csv_path = dir.path().join("tasks.csv");
    write_export(&csv_path, &original, ExportFormat::Csv).unwrap();
    let restored = from_csv(&std::fs::read_to_string(&csv_path).unwrap()).unwrap();
    assert_preserved(&original, &restored);
}
