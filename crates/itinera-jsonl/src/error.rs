//! Error types for itinera-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for itinera-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line could not be decoded into the requested record type.
    #[error("line {line_number}: {source}")]
    Parse {
        /// 1-based line number of the offending line.
        line_number: usize,
        /// Underlying decoder error.
        source: serde_json::Error,
    },

    /// Invalid JSONL format.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for itinera-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
