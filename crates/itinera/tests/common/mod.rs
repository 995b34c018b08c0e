//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use itinera::domain::{Segment, SegmentType};
use std::path::Path;
use std::process::{Command, Output};

/// Run the itinera binary in the specified directory
pub fn run_itinera_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_itinera"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute itinera")
}

/// A UTC instant in June 2025
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0)
        .single()
        .expect("valid test datetime")
}

/// A segment with no payload fields set
pub fn segment(id: &str, kind: SegmentType, start: DateTime<Utc>, end: DateTime<Utc>) -> Segment {
    Segment::new(id, kind, start, end)
}

/// Look a segment up by ID, panicking if it is absent
pub fn find<'a>(segments: &'a [Segment], id: &str) -> &'a Segment {
    segments
        .iter()
        .find(|s| s.id.as_str() == id)
        .unwrap_or_else(|| panic!("segment {id} not found"))
}

/// Flight 10:00-14:00, transfer 14:30-15:30 after it, then a hotel from
/// 16:00 to 11:00 the next morning after the transfer.
pub fn arrival_day() -> Vec<Segment> {
    vec![
        segment("flight", SegmentType::Flight, at(1, 10, 0), at(1, 14, 0)).with_title("LIS to OPO"),
        segment("transfer", SegmentType::Transfer, at(1, 14, 30), at(1, 15, 30))
            .with_title("Taxi to hotel")
            .depending_on(["flight"]),
        segment("hotel", SegmentType::Hotel, at(1, 16, 0), at(2, 11, 0))
            .with_title("Hotel Infante")
            .depending_on(["transfer"]),
    ]
}

/// Serialize segments as JSONL, one record per line
pub fn to_jsonl(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| serde_json::to_string(s).expect("serialize segment") + "\n")
        .collect()
}
