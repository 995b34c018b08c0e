//! JSONL file storage backend.
//!
//! Each itinerary lives in `<root>/<itinerary>.jsonl`, one segment per line in
//! stored order. Writes go through [`itinera_jsonl::write_jsonl_atomic`], so a
//! crash mid-save leaves the previous snapshot intact.
//!
//! Reads are resilient. A hand-edited file with a broken line still loads; the
//! problem is reported as a [`LoadWarning`] and logged.

use super::SegmentStore;
use crate::domain::{ItineraryId, Segment, SegmentId};
use crate::error::{Error, Result};
use async_trait::async_trait;
use itinera_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning as JsonlWarning};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// File extension used for itinerary files.
pub const ITINERARY_FILE_EXTENSION: &str = "jsonl";

/// Non-fatal data problems found while loading an itinerary file.
///
/// Only the first two change what is loaded. The engine tolerates dangling
/// references and never re-checks time ranges, so those records are kept as
/// they are and only reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line that is not a valid segment record. The line is skipped.
    MalformedJson {
        /// 1-based line number in the file
        line_number: usize,
        /// Decoder error message
        error: String,
    },

    /// A second record with an ID already seen. The later record is skipped.
    DuplicateSegment {
        /// The repeated ID
        segment_id: SegmentId,
        /// 1-based position among successfully decoded records
        record_number: usize,
    },

    /// A `depends_on` entry naming a segment that is not in the file.
    DanglingDependency {
        /// Segment holding the reference
        segment_id: SegmentId,
        /// The ID it refers to
        missing: SegmentId,
    },

    /// A segment that does not end after it starts.
    InvertedTimeRange {
        /// The offending segment
        segment_id: SegmentId,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: skipped malformed record: {error}")
            }
            LoadWarning::DuplicateSegment {
                segment_id,
                record_number,
            } => write!(
                f,
                "record {record_number}: skipped duplicate segment '{segment_id}'"
            ),
            LoadWarning::DanglingDependency {
                segment_id,
                missing,
            } => write!(
                f,
                "segment '{segment_id}' depends on unknown segment '{missing}'"
            ),
            LoadWarning::InvertedTimeRange { segment_id } => {
                write!(f, "segment '{segment_id}' does not end after it starts")
            }
        }
    }
}

/// Load an itinerary file, skipping unusable records.
///
/// Returns the usable segments in file order together with every problem
/// found. An empty file yields an empty itinerary.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn load_itinerary_file(path: &Path) -> Result<(Vec<Segment>, Vec<LoadWarning>)> {
    let (records, jsonl_warnings) = read_jsonl_resilient::<Segment, _>(path).await?;

    let mut warnings: Vec<LoadWarning> = jsonl_warnings
        .into_iter()
        .map(|warning| match warning {
            JsonlWarning::MalformedJson { line_number, error } => {
                LoadWarning::MalformedJson { line_number, error }
            }
            JsonlWarning::SkippedLine {
                line_number,
                reason,
            } => LoadWarning::MalformedJson {
                line_number,
                error: reason,
            },
        })
        .collect();

    let mut seen = HashSet::new();
    let mut segments = Vec::with_capacity(records.len());
    for (index, segment) in records.into_iter().enumerate() {
        if seen.insert(segment.id.clone()) {
            segments.push(segment);
        } else {
            warnings.push(LoadWarning::DuplicateSegment {
                segment_id: segment.id,
                record_number: index + 1,
            });
        }
    }

    for segment in &segments {
        for missing in segment.depends_on.iter().filter(|id| !seen.contains(*id)) {
            warnings.push(LoadWarning::DanglingDependency {
                segment_id: segment.id.clone(),
                missing: missing.clone(),
            });
        }
        if segment.start_datetime >= segment.end_datetime {
            warnings.push(LoadWarning::InvertedTimeRange {
                segment_id: segment.id.clone(),
            });
        }
    }

    Ok((segments, warnings))
}

/// [`SegmentStore`] keeping one JSONL file per itinerary.
#[derive(Debug, Clone)]
pub struct JsonlSegmentStore {
    root: PathBuf,
}

impl JsonlSegmentStore {
    /// Create a store rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The file an itinerary is stored in.
    pub fn path_for(&self, itinerary: &ItineraryId) -> PathBuf {
        self.root.join(format!("{itinerary}.{ITINERARY_FILE_EXTENSION}"))
    }
}

#[async_trait]
impl SegmentStore for JsonlSegmentStore {
    async fn load(&self, itinerary: &ItineraryId) -> Result<Vec<Segment>> {
        let path = self.path_for(itinerary);
        if !tokio::fs::try_exists(&path).await? {
            return Err(Error::ItineraryNotFound(itinerary.clone()));
        }

        let (segments, warnings) = load_itinerary_file(&path).await?;
        for warning in &warnings {
            tracing::warn!(itinerary = %itinerary, "{warning}");
        }
        tracing::debug!(
            itinerary = %itinerary,
            segments = segments.len(),
            warnings = warnings.len(),
            "loaded itinerary"
        );
        Ok(segments)
    }

    async fn save(&self, itinerary: &ItineraryId, segments: &[Segment]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(itinerary);
        write_jsonl_atomic(&path, segments).await?;
        tracing::debug!(
            itinerary = %itinerary,
            segments = segments.len(),
            path = %path.display(),
            "saved itinerary"
        );
        Ok(())
    }

    async fn list_itineraries(&self) -> Result<Vec<ItineraryId>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ITINERARY_FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match ItineraryId::parse(stem) {
                Ok(id) => ids.push(id),
                Err(reason) => {
                    tracing::debug!(path = %path.display(), %reason, "ignoring file");
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn delete(&self, itinerary: &ItineraryId) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(itinerary)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::ItineraryNotFound(itinerary.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentType;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn segment_line(id: &str, start: u32, end: u32, deps: &[&str]) -> String {
        let at = |h| Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap();
        let segment = Segment::new(id, SegmentType::Activity, at(start), at(end))
            .depending_on(deps.iter().copied());
        serde_json::to_string(&segment).unwrap()
    }

    async fn write_file(dir: &TempDir, lines: &[String]) -> PathBuf {
        let path = dir.path().join("trip.jsonl");
        tokio::fs::write(&path, lines.join("\n")).await.unwrap();
        path
    }

    #[tokio::test]
    async fn clean_file_has_no_warnings() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            &[segment_line("a", 9, 10, &[]), segment_line("b", 11, 12, &["a"])],
        )
        .await;

        let (segments, warnings) = load_itinerary_file(&path).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            &[
                segment_line("a", 9, 10, &[]),
                "{not json".to_string(),
                segment_line("b", 11, 12, &[]),
            ],
        )
        .await;

        let (segments, warnings) = load_itinerary_file(&path).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert!(matches!(
            warnings.as_slice(),
            [LoadWarning::MalformedJson { line_number: 2, .. }]
        ));
    }

    #[tokio::test]
    async fn first_duplicate_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            &[segment_line("a", 9, 10, &[]), segment_line("a", 13, 14, &[])],
        )
        .await;

        let (segments, warnings) = load_itinerary_file(&path).await.unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_datetime.format("%H").to_string(), "09");
        assert_eq!(
            warnings,
            vec![LoadWarning::DuplicateSegment {
                segment_id: "a".into(),
                record_number: 2,
            }]
        );
    }

    #[tokio::test]
    async fn dangling_and_inverted_records_are_kept_and_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            &[segment_line("a", 9, 10, &["ghost"]), segment_line("b", 12, 11, &[])],
        )
        .await;

        let (segments, warnings) = load_itinerary_file(&path).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].depends_on, vec![SegmentId::from("ghost")]);
        assert_eq!(
            warnings,
            vec![
                LoadWarning::DanglingDependency {
                    segment_id: "a".into(),
                    missing: "ghost".into(),
                },
                LoadWarning::InvertedTimeRange {
                    segment_id: "b".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn store_ignores_foreign_files_when_listing() {
        let dir = TempDir::new().unwrap();
        let store = JsonlSegmentStore::new(dir.path());
        let trip = ItineraryId::parse("trip").unwrap();
        store.save(&trip, &[]).await.unwrap();
        tokio::fs::write(dir.path().join("config.yaml"), "x: 1").await.unwrap();
        tokio::fs::write(dir.path().join("bad name.jsonl"), "").await.unwrap();

        assert_eq!(store.list_itineraries().await.unwrap(), vec![trip]);
    }

    #[tokio::test]
    async fn missing_root_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = JsonlSegmentStore::new(dir.path().join("absent"));
        assert!(store.list_itineraries().await.unwrap().is_empty());
    }

    #[test]
    fn path_uses_itinerary_as_file_stem() {
        let store = JsonlSegmentStore::new("/data");
        let trip = ItineraryId::parse("lisbon-2025").unwrap();
        assert_eq!(store.path_for(&trip), PathBuf::from("/data/lisbon-2025.jsonl"));
    }

    #[test]
    fn warnings_render_readably() {
        let warning = LoadWarning::DanglingDependency {
            segment_id: "taxi".into(),
            missing: "flight".into(),
        };
        assert_eq!(
            warning.to_string(),
            "segment 'taxi' depends on unknown segment 'flight'"
        );
    }
}
