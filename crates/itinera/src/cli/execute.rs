//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::{Context, Result};
use std::path::Path;

use super::args::{DependentsArgs, ImportArgs, InitArgs, ListArgs, ShiftArgs};
use crate::config;
use crate::domain::{ItineraryId, SegmentType};
use crate::output::{self, OutputMode};
use crate::planner::Planner;
use crate::storage::load_itinerary_file;

/// Execute the init command
pub async fn execute_init(dir: &Path, args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    let result = config::init(dir, args.window_minutes).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "data_dir": result.data_dir.display().to_string(),
            "config_file": result.config_file.display().to_string(),
            "itineraries_dir": result.itineraries_dir.display().to_string(),
            "chronological_window_minutes": result.window_minutes,
        }))?,
        OutputMode::Text if !args.quiet => {
            println!("Initialized itinera in {}", result.data_dir.display());
            println!("  Config:      {}", result.config_file.display());
            println!("  Itineraries: {}", result.itineraries_dir.display());
            println!("  Window:      {} minutes", result.window_minutes);
        }
        OutputMode::Text => {}
    }
    Ok(())
}

/// Execute the import command
///
/// Replaces the itinerary with the segments read from the file. Unusable
/// records are skipped and reported on stderr.
pub async fn execute_import(
    planner: &Planner,
    itinerary: &ItineraryId,
    args: &ImportArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let (segments, warnings) = load_itinerary_file(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    output::print_load_warnings(&warnings)?;

    planner.storage().save(itinerary, &segments).await?;
    tracing::info!(itinerary = %itinerary, segments = segments.len(), "imported itinerary");

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "itinerary": itinerary,
            "imported": segments.len(),
            "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }))?,
        OutputMode::Text => output::print_message(&format!(
            "Imported {} segment(s) into '{itinerary}'",
            segments.len()
        ))?,
    }
    Ok(())
}

/// Execute the itineraries command
pub async fn execute_itineraries(planner: &Planner, output_mode: OutputMode) -> Result<()> {
    let itineraries = planner.storage().list_itineraries().await?;
    output::print_itineraries(&itineraries, output_mode)?;
    Ok(())
}

/// Execute the list command
pub async fn execute_list(
    planner: &Planner,
    itinerary: &ItineraryId,
    args: &ListArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let mut segments = planner.segments(itinerary).await?;
    if let Some(wanted) = args.segment_type.map(SegmentType::from) {
        segments.retain(|s| s.segment_type() == wanted);
    }
    output::print_segments(&segments, output_mode)?;
    Ok(())
}

/// Execute the check command
///
/// Returns whether the itinerary is healthy.
pub async fn execute_check(
    planner: &Planner,
    itinerary: &ItineraryId,
    output_mode: OutputMode,
) -> Result<bool> {
    let report = planner.check(itinerary).await?;
    output::print_health(itinerary, &report, output_mode)?;
    Ok(report.is_healthy())
}

/// Execute the order command
pub async fn execute_order(
    planner: &Planner,
    itinerary: &ItineraryId,
    output_mode: OutputMode,
) -> Result<()> {
    let ordered = planner.ordered(itinerary).await?;
    output::print_order(&ordered, output_mode)?;
    Ok(())
}

/// Execute the dependents command
pub async fn execute_dependents(
    planner: &Planner,
    itinerary: &ItineraryId,
    args: &DependentsArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let dependents = planner.preview_dependents(itinerary, &args.segment).await?;
    output::print_dependents(&args.segment, &dependents, output_mode)?;
    Ok(())
}

/// Execute the infer command
pub async fn execute_infer(
    planner: &Planner,
    itinerary: &ItineraryId,
    output_mode: OutputMode,
) -> Result<()> {
    let inferred = planner.inferred(itinerary).await?;
    output::print_inferred(&inferred, output_mode)?;
    Ok(())
}

/// Execute the shift command
pub async fn execute_shift(
    planner: &Planner,
    itinerary: &ItineraryId,
    args: &ShiftArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let result = if args.dry_run {
        planner
            .preview_reschedule(itinerary, &args.segment, args.delta_ms)
            .await?
    } else {
        planner
            .reschedule(itinerary, &args.segment, args.delta_ms)
            .await?
    };
    output::print_reschedule(&result, output_mode)?;
    Ok(())
}
