//! Resilient loading keeps good records and reports every skipped line.

use itinera_jsonl::{read_jsonl_resilient, Warning};
use serde::Deserialize;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Deserialize, PartialEq)]
struct Leg {
    id: String,
}

fn file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn clean_file_has_no_warnings() {
    let file = file_with("{\"id\":\"a\"}\n{\"id\":\"b\"}\n");
    let (legs, warnings) = read_jsonl_resilient::<Leg, _>(file.path()).await.unwrap();

    assert_eq!(legs.len(), 2);
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn corrupt_lines_are_skipped_with_line_numbers() {
    let file = file_with("{\"id\":\"a\"}\n{\"id\":\n\n{\"name\":\"no id\"}\n{\"id\":\"d\"}\n");
    let (legs, warnings) = read_jsonl_resilient::<Leg, _>(file.path()).await.unwrap();

    assert_eq!(
        legs,
        vec![Leg { id: "a".into() }, Leg { id: "d".into() }]
    );
    assert_eq!(warnings.len(), 2);
    assert!(matches!(warnings[0], Warning::MalformedJson { line_number: 2, .. }));
    assert!(matches!(warnings[1], Warning::MalformedJson { line_number: 4, .. }));
}

#[tokio::test]
async fn all_corrupt_yields_empty_records() {
    let file = file_with("x\ny\nz\n");
    let (legs, warnings) = read_jsonl_resilient::<Leg, _>(file.path()).await.unwrap();

    assert!(legs.is_empty());
    assert_eq!(warnings.len(), 3);
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_jsonl_resilient::<Leg, _>(dir.path().join("absent.jsonl")).await;
    assert!(matches!(result, Err(itinera_jsonl::Error::Io(_))));
}

#[tokio::test]
async fn non_utf8_line_is_skipped_not_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\"id\":\"a\"}\n{\"id\":\"\xff\xfe\"}\n{\"id\":\"c\"}\n")
        .unwrap();
    file.flush().unwrap();

    let (legs, warnings) = read_jsonl_resilient::<Leg, _>(file.path()).await.unwrap();

    assert_eq!(legs, vec![Leg { id: "a".into() }, Leg { id: "c".into() }]);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        Warning::SkippedLine { line_number: 2, reason } if reason.contains("UTF-8")
    ));
}
