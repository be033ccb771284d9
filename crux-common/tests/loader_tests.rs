//! Tests for concurrent dataset loading

use crux_common::loader::{load_datasets, DatasetPaths};
use crux_common::{build_scene, Error, Selection};
use std::path::Path;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const RECORDS: &str = r#"[
    { "problem_id": "P1", "athlete": "Ann", "attempt": 1, "hold": "H1", "limb": "left" },
    { "problem_id": "P1", "athlete": "Ann", "attempt": 1, "hold": "H2", "limb": "left" },
    { "problem_id": "P1", "athlete": "Ann", "attempt": 1, "hold": "H7", "limb": "left" }
]"#;

const PROBLEMS: &str = r#"[
    { "problem_id": "P1", "hold_id": "H1", "x": 0, "y": 0 },
    { "problem_id": "P1", "hold_id": "H2", "x": 10, "y": 0 }
]"#;

#[tokio::test]
async fn test_load_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "record.json", RECORDS);
    write(dir.path(), "probleminfo.json", PROBLEMS);

    let datasets = load_datasets(&DatasetPaths::in_folder(dir.path())).await.unwrap();
    assert_eq!(datasets.records.len(), 3);
    assert_eq!(datasets.problems.len(), 2);

    // Unknown hold H7 is dropped, the rest still draws
    let scene = build_scene(&datasets.into_index(), &Selection::All);
    assert_eq!(scene.groups.len(), 1);
    assert_eq!(scene.groups[0].points.len(), 2);
    assert_eq!(scene.curve_count(), 1);
}

#[tokio::test]
async fn test_missing_file_is_data_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "record.json", RECORDS);

    let err = load_datasets(&DatasetPaths::in_folder(dir.path())).await.unwrap_err();
    match err {
        Error::DataLoad(msg) => assert!(msg.contains("probleminfo.json"), "{}", msg),
        other => panic!("expected DataLoad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_file_is_data_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "record.json", "{ \"not\": \"an array\" }");
    write(dir.path(), "probleminfo.json", PROBLEMS);

    let err = load_datasets(&DatasetPaths::in_folder(dir.path())).await.unwrap_err();
    match err {
        Error::DataLoad(msg) => assert!(msg.contains("record.json"), "{}", msg),
        other => panic!("expected DataLoad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_null_attempt_row_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "record.json",
        r#"[
            { "problem_id": "P1", "athlete": "Ann", "attempt": null, "hold": "H1", "limb": "left" },
            { "problem_id": "P1", "athlete": "Ann", "attempt": null, "hold": "H2", "limb": "left" }
        ]"#,
    );
    write(dir.path(), "probleminfo.json", PROBLEMS);

    let datasets = load_datasets(&DatasetPaths::in_folder(dir.path())).await.unwrap();
    let scene = build_scene(&datasets.into_index(), &Selection::All);
    assert_eq!(scene.groups.len(), 1);
    assert_eq!(scene.groups[0].tension, crux_common::tension("Ann", 1.0));
}
