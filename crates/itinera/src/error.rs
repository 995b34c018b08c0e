//! Error types for itinera operations.
//!
//! Scheduling failures carry their evidence (the cycle path, the conflicting
//! pairs, the missing identifier) as data so callers can explain them without
//! parsing messages.

use crate::domain::{ItineraryId, SegmentId};
use crate::schedule::Conflict;
use std::io;
use thiserror::Error;

/// The error type for itinera operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The segment a cascade starts from is not in the supplied list.
    #[error("Segment not found: {0}")]
    MissingDependency(SegmentId),

    /// Explicit dependencies form a cycle.
    #[error("Circular dependency: {}", format_path(.path))]
    CircularDependency {
        /// Identifiers from where the cycle was entered back to the node that closes it.
        path: Vec<SegmentId>,
    },

    /// A cascade left mutually exclusive segments overlapping.
    #[error("Adjustment failed: {} conflict(s): {}", .conflicts.len(), format_conflicts(.conflicts))]
    AdjustmentFailed {
        /// Every conflicting pair in the adjusted schedule.
        conflicts: Vec<Conflict>,
    },

    /// Shifting a segment would leave the representable date range.
    #[error("Shifted time for segment {0} is out of range")]
    TimeOutOfRange(SegmentId),

    /// Itinerary not found in storage.
    #[error("Itinerary not found: {0}")]
    ItineraryNotFound(ItineraryId),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored data could not be interpreted.
    #[error("Invalid storage format: {0}")]
    InvalidFormat(String),

    /// A record could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No data directory or config file was found.
    #[error("Not an itinera directory (no config at {0}); run `itinera init` first")]
    NotInitialized(String),

    /// `init` was run against an existing data directory.
    #[error("Already initialized: {0}")]
    AlreadyInitialized(String),

    /// The chronological window must not be negative.
    #[error("Chronological window must be zero or more minutes, got {0}")]
    InvalidWindow(i64),

    /// The config file could not be parsed or written.
    #[error("Configuration error: {0}")]
    Invalid(String),
}

impl From<itinera_jsonl::Error> for Error {
    fn from(err: itinera_jsonl::Error) -> Self {
        match err {
            itinera_jsonl::Error::Io(e) => Error::Io(e),
            itinera_jsonl::Error::Json(e) => StorageError::Serialization(e).into(),
            other => StorageError::InvalidFormat(other.to_string()).into(),
        }
    }
}

fn format_path(path: &[SegmentId]) -> String {
    path.iter()
        .map(SegmentId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A specialized Result type for itinera operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_shows_path() {
        let err = Error::CircularDependency {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Circular dependency: a -> b -> a");
    }

    #[test]
    fn conflict_message_lists_every_pair() {
        let err = Error::AdjustmentFailed {
            conflicts: vec![
                Conflict::new("f1".into(), "f2".into()),
                Conflict::new("f1".into(), "t1".into()),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Adjustment failed: 2 conflict(s): f1 overlaps f2, f1 overlaps t1"
        );
    }

    #[test]
    fn jsonl_io_errors_stay_io() {
        let err: Error = itinera_jsonl::Error::Io(io::Error::other("disk")).into();
        assert!(matches!(err, Error::Io(_)));
    }
}
