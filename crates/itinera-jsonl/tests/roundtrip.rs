//! Write-then-read tests across the full JSONL I/O cycle.

use itinera_jsonl::{write_jsonl_atomic, JsonlReader, JsonlWriter};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tempfile::tempdir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Leg {
    id: String,
    starts_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
    notes: Option<String>,
}

fn leg(id: &str, notes: Option<&str>) -> Leg {
    Leg {
        id: id.to_string(),
        starts_at: "2025-03-01T10:00:00Z".to_string(),
        depends_on: vec![],
        notes: notes.map(str::to_string),
    }
}

async fn roundtrip(original: &Leg) -> Leg {
    let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
    writer.write(original).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));
    reader.read_line().await.unwrap().unwrap()
}

#[rstest]
#[case::plain(leg("flight-1", None))]
#[case::escapes(leg("transfer-1", Some("Gate \"B\"\nthen\ttaxi \\ rank")))]
#[case::unicode(leg("hotel-1", Some("H\u{00f4}tel du Parc \u{1F3E8}")))]
#[tokio::test]
async fn single_record_survives_roundtrip(#[case] original: Leg) {
    assert_eq!(roundtrip(&original).await, original);
}

#[tokio::test]
async fn atomic_file_write_reads_back_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lisbon.jsonl");

    let mut second = leg("transfer-1", None);
    second.depends_on = vec!["flight-1".to_string()];
    let legs = vec![leg("flight-1", None), second, leg("hotel-1", Some("late check-in"))];

    write_jsonl_atomic(&path, &legs).await.unwrap();

    let file = tokio::fs::File::open(&path).await.unwrap();
    let read_back: Vec<Leg> = JsonlReader::new(file).read_all().await.unwrap();
    assert_eq!(read_back, legs);
}
