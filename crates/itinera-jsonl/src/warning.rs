//! Non-fatal problems encountered while reading JSONL data.
//!
//! Resilient reads keep going past bad lines. Each skipped line is recorded
//! as a [`Warning`] in a shared [`WarningCollector`] so the caller can report
//! it once loading finishes.
//!
//! ```
//! use itinera_jsonl::warning::{Warning, WarningCollector};
//!
//! let collector = WarningCollector::new();
//! collector.add(Warning::MalformedJson {
//!     line_number: 3,
//!     error: "expected `,` or `}`".to_string(),
//! });
//!
//! assert_eq!(collector.into_warnings()[0].line_number(), 3);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A line that was skipped during a resilient read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line is not valid JSON for the requested record type.
    MalformedJson {
        /// The 1-based line number.
        line_number: usize,
        /// Decoder error message.
        error: String,
    },

    /// The line was dropped before decoding.
    SkippedLine {
        /// The 1-based line number.
        line_number: usize,
        /// Why the line was dropped.
        reason: String,
    },
}

impl Warning {
    /// Returns the 1-based line number the warning refers to.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a stable identifier for the warning variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => write!(f, "line {line_number}: skipped: {reason}"),
        }
    }
}

impl std::error::Error for Warning {}

/// Shared, cloneable sink for warnings.
///
/// Clones share the same underlying list, which lets a stream adapter push
/// warnings while the caller keeps a handle to read them afterwards.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while pushing cannot leave the Vec half-written, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Vec<Warning>> {
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a warning.
    pub fn add(&self, warning: Warning) {
        tracing::trace!(%warning, "collected JSONL warning");
        self.lock().push(warning);
    }

    /// Number of warnings recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the recorded warnings in insertion order.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.lock().clone()
    }

    /// Consumes this handle and returns the recorded warnings.
    ///
    /// Other clones keep their view of the shared list; this returns a copy
    /// when the list is still shared.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        match Arc::try_unwrap(self.warnings) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
