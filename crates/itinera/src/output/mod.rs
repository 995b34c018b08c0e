//! Output formatting for CLI commands.
//!
//! Every printer has a text form for people and a JSON form for scripts.
//! Text printers write to any `Write` so they can be tested without a
//! terminal; the public functions pick stdout and the configured mode.

pub mod color;

use crate::domain::{ItineraryId, Segment, SegmentId};
use crate::planner::{HealthReport, Reschedule};
use crate::schedule::ChronologicalDependencies;
use crate::storage::LoadWarning;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{bold, check_mark, colorize_id, colorize_type, dimmed, type_icon};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Settings that control text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `ITINERA_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `ITINERA_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("ITINERA_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "ITINERA_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // https://no-color.org/
        let use_colors = env::var_os("NO_COLOR").is_none()
            && env::var("ITINERA_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Render a millisecond delta the way `--by` accepts it, e.g. `+1h30m`.
pub fn format_delta(delta_ms: i64) -> String {
    const UNITS: [(u64, &str); 5] = [
        (86_400_000, "d"),
        (3_600_000, "h"),
        (60_000, "m"),
        (1_000, "s"),
        (1, "ms"),
    ];

    if delta_ms == 0 {
        return "0s".to_string();
    }

    let sign = if delta_ms < 0 { '-' } else { '+' };
    let mut rest = delta_ms.unsigned_abs();
    let mut out = String::from(sign);
    for (size, unit) in UNITS {
        if rest >= size {
            out.push_str(&format!("{}{unit}", rest / size));
            rest %= size;
        }
    }
    out
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn join_ids(ids: &[SegmentId], config: &OutputConfig) -> String {
    ids.iter()
        .map(|id| colorize_id(id.as_str(), config))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print segments in stored order
pub fn print_segments(segments: &[Segment], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            print_segments_text(&mut io::stdout().lock(), segments, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(&segments),
    }
}

/// Print segments in dependency order, numbered
pub fn print_order(segments: &[Segment], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            print_order_text(&mut io::stdout().lock(), segments, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(&segments),
    }
}

/// Print the transitive dependents of a segment
pub fn print_dependents(
    segment: &SegmentId,
    dependents: &[SegmentId],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => print_dependents_text(
            &mut io::stdout().lock(),
            segment,
            dependents,
            &OutputConfig::from_env(),
        ),
        OutputMode::Json => print_json(&serde_json::json!({
            "segment": segment,
            "dependents": dependents,
        })),
    }
}

/// Print chronologically inferred predecessors
pub fn print_inferred(inferred: &ChronologicalDependencies, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            print_inferred_text(&mut io::stdout().lock(), inferred, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(inferred),
    }
}

/// Print a health report
pub fn print_health(
    itinerary: &ItineraryId,
    report: &HealthReport,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => print_health_text(
            &mut io::stdout().lock(),
            itinerary,
            report,
            &OutputConfig::from_env(),
        ),
        OutputMode::Json => print_json(&serde_json::json!({
            "itinerary": itinerary,
            "healthy": report.is_healthy(),
            "cycle": report.cycle,
            "conflicts": report.conflicts,
        })),
    }
}

/// Print the outcome of a shift
pub fn print_reschedule(result: &Reschedule, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            print_reschedule_text(&mut io::stdout().lock(), result, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(result),
    }
}

/// Print stored itinerary IDs
pub fn print_itineraries(itineraries: &[ItineraryId], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let mut out = io::stdout().lock();
            if itineraries.is_empty() {
                return writeln!(out, "No itineraries found.");
            }
            for id in itineraries {
                writeln!(out, "{id}")?;
            }
            Ok(())
        }
        OutputMode::Json => print_json(&itineraries),
    }
}

/// Report load warnings on stderr so they never mix with JSON on stdout
pub fn print_load_warnings(warnings: &[LoadWarning]) -> io::Result<()> {
    let config = OutputConfig::from_env();
    let mut err = io::stderr().lock();
    for w in warnings {
        writeln!(err, "{} {w}", warning("warning:", &config))?;
    }
    Ok(())
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(io::stdout().lock(), "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_segment_line<W: Write>(
    w: &mut W,
    segment: &Segment,
    config: &OutputConfig,
) -> io::Result<()> {
    let segment_type = segment.segment_type();
    write!(
        w,
        "{} {} {} {}",
        type_icon(segment_type, config),
        colorize_type(segment_type, config),
        colorize_id(segment.id.as_str(), config),
        dimmed(
            &format!(
                "{} -> {}",
                format_time(&segment.start_datetime),
                format_time(&segment.end_datetime)
            ),
            config
        ),
    )?;
    if segment.title.is_empty() {
        writeln!(w)
    } else {
        writeln!(w, "  {}", segment.title)
    }
}

fn print_segments_text<W: Write>(
    w: &mut W,
    segments: &[Segment],
    config: &OutputConfig,
) -> io::Result<()> {
    if segments.is_empty() {
        return writeln!(w, "No segments found.");
    }

    writeln!(w, "{} segment(s):", segments.len())?;
    for segment in segments {
        write_segment_line(w, segment, config)?;
        if !segment.depends_on.is_empty() {
            writeln!(
                w,
                "    {} {}",
                dimmed("after:", config),
                join_ids(&segment.depends_on, config)
            )?;
        }
    }
    Ok(())
}

fn print_order_text<W: Write>(
    w: &mut W,
    segments: &[Segment],
    config: &OutputConfig,
) -> io::Result<()> {
    if segments.is_empty() {
        return writeln!(w, "No segments found.");
    }

    for (position, segment) in segments.iter().enumerate() {
        write!(w, "{:>3}. ", position + 1)?;
        write_segment_line(w, segment, config)?;
    }
    Ok(())
}

fn print_dependents_text<W: Write>(
    w: &mut W,
    segment: &SegmentId,
    dependents: &[SegmentId],
    config: &OutputConfig,
) -> io::Result<()> {
    let id = colorize_id(segment.as_str(), config);
    if dependents.is_empty() {
        return writeln!(w, "Nothing depends on {id}.");
    }

    writeln!(w, "{} segment(s) depend on {id}:", dependents.len())?;
    for dependent in dependents {
        writeln!(w, "  {}", colorize_id(dependent.as_str(), config))?;
    }
    Ok(())
}

fn print_inferred_text<W: Write>(
    w: &mut W,
    inferred: &ChronologicalDependencies,
    config: &OutputConfig,
) -> io::Result<()> {
    if inferred.is_empty() {
        return writeln!(w, "No chronological dependencies inferred.");
    }

    let arrow = if config.use_ascii { "<-" } else { "←" };
    for (dependent, predecessors) in inferred {
        writeln!(
            w,
            "{} {} {}",
            colorize_id(dependent.as_str(), config),
            dimmed(arrow, config),
            join_ids(predecessors, config)
        )?;
    }
    Ok(())
}

fn print_health_text<W: Write>(
    w: &mut W,
    itinerary: &ItineraryId,
    report: &HealthReport,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold(&format!("Itinerary {itinerary}"), config))?;

    match &report.cycle {
        None => writeln!(w, "  {} no dependency cycles", check_mark(true, config))?,
        Some(path) => {
            let path = path
                .iter()
                .map(SegmentId::as_str)
                .collect::<Vec<_>>()
                .join(" -> ");
            writeln!(
                w,
                "  {} dependency cycle: {}",
                check_mark(false, config),
                error(&path, config)
            )?;
        }
    }

    if report.conflicts.is_empty() {
        writeln!(w, "  {} no conflicts", check_mark(true, config))?;
    } else {
        writeln!(
            w,
            "  {} {} conflict(s):",
            check_mark(false, config),
            report.conflicts.len()
        )?;
        for conflict in &report.conflicts {
            writeln!(w, "      {}", error(&conflict.to_string(), config))?;
        }
    }
    Ok(())
}

fn print_reschedule_text<W: Write>(
    w: &mut W,
    result: &Reschedule,
    config: &OutputConfig,
) -> io::Result<()> {
    let delta = format_delta(result.delta_ms);
    if result.persisted {
        writeln!(
            w,
            "{} {} segment(s) by {delta}",
            success("Shifted", config),
            result.shifted.len()
        )?;
    } else {
        writeln!(
            w,
            "{} would shift {} segment(s) by {delta}",
            warning("Dry run:", config),
            result.shifted.len()
        )?;
    }

    for id in &result.shifted {
        if let Some(segment) = result.segments.iter().find(|s| &s.id == id) {
            write!(w, "  ")?;
            write_segment_line(w, segment, config)?;
        }
    }
    Ok(())
}
