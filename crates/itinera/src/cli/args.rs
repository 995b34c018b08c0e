//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use super::types::SegmentTypeArg;
use super::validators::{parse_delta, validate_segment_id};
use crate::domain::SegmentId;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Chronological inference window in minutes
    ///
    /// A segment starting within this many minutes after another one ends is
    /// treated as following it. Defaults to 30.
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..))]
    pub window_minutes: Option<i64>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `import` command
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// JSONL file with one segment per line
    pub file: PathBuf,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Only show segments of this type
    #[arg(short = 't', long = "type", value_enum)]
    pub segment_type: Option<SegmentTypeArg>,
}

/// Arguments for the `dependents` command
#[derive(Parser, Debug, Clone)]
pub struct DependentsArgs {
    /// Segment whose dependents to show
    #[arg(value_parser = validate_segment_id)]
    pub segment: SegmentId,
}

/// Arguments for the `shift` command
#[derive(Parser, Debug, Clone)]
pub struct ShiftArgs {
    /// Segment to move
    #[arg(value_parser = validate_segment_id)]
    pub segment: SegmentId,

    /// How far to move it: `+2h`, `-30m`, `1h30m`, `90s`, `1500ms`
    #[arg(long = "by", value_parser = parse_delta, allow_hyphen_values = true)]
    pub delta_ms: i64,

    /// Show what would move without saving
    #[arg(long)]
    pub dry_run: bool,
}
