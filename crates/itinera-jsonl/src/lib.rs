//! JSON Lines codec for itinerary snapshots.
//!
//! Each itinerary is persisted as one JSON object per line. This crate owns the
//! byte-level concerns: buffered async reading with line tracking, resilient
//! loading that skips corrupt lines instead of failing, and crash-safe writes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{read_jsonl_resilient, JsonlReader};
pub use warning::{Warning, WarningCollector};
pub use writer::JsonlWriter;
