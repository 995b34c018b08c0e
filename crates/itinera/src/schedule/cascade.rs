//! Cascade rescheduling.
//!
//! Moving a segment moves everything tied to it. The set of tied segments is
//! the BFS closure of the moved segment over explicit edges merged with
//! chronologically inferred ones. Each of them gets the same delta as the
//! moved segment; deltas never accumulate along a path.
//!
//! The shifted schedule is computed in full and then checked for conflicts.
//! Nothing is written back: on failure the caller's list is simply still the
//! authoritative one.

use super::chronology::infer;
use super::conflicts::validate_under;
use super::dependents::reachable_from;
use super::graph::{build_graph, EdgeOrigin};
use super::policy::SchedulePolicy;
use crate::domain::{Segment, SegmentId};
use crate::error::{Error, Result};
use chrono::Duration;
use serde::Serialize;
use std::collections::HashMap;

/// The segments a move will shift, before anything is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadePlan {
    /// Segment the user moved
    pub moved: SegmentId,

    /// Signed shift in milliseconds, applied uniformly
    pub delta_ms: i64,

    /// Every segment to shift: `moved` first, then dependents in BFS order
    pub shifted: Vec<SegmentId>,
}

impl CascadePlan {
    /// The shift as a duration.
    pub fn delta(&self) -> Duration {
        // i64::MIN ms is one step past the smallest representable delta.
        Duration::milliseconds(self.delta_ms.max(-i64::MAX))
    }

    /// Segment ID to delta for every shifted segment.
    pub fn adjustments(&self) -> HashMap<SegmentId, Duration> {
        let delta = self.delta();
        self.shifted.iter().map(|id| (id.clone(), delta)).collect()
    }
}

pub(super) fn plan(
    policy: &SchedulePolicy,
    segments: &[Segment],
    moved: &SegmentId,
    delta_ms: i64,
) -> Result<CascadePlan> {
    let mut graph = build_graph(segments);
    let Some(start) = graph.index(moved) else {
        return Err(Error::MissingDependency(moved.clone()));
    };
    if Duration::try_milliseconds(delta_ms).is_none() {
        return Err(Error::TimeOutOfRange(moved.clone()));
    }

    let explicit_edges = graph.edge_count();
    for (dependent, predecessors) in &infer(segments, policy) {
        for predecessor in predecessors {
            graph.add_edge_once(predecessor, dependent, EdgeOrigin::Chronological);
        }
    }
    tracing::debug!(
        moved = %moved,
        explicit = explicit_edges,
        inferred = graph.edge_count() - explicit_edges,
        "built cascade graph"
    );

    let shifted = std::iter::once(moved.clone())
        .chain(
            reachable_from(&graph, start)
                .into_iter()
                .map(|node| graph.node_segment(node).id.clone()),
        )
        .collect();

    Ok(CascadePlan {
        moved: moved.clone(),
        delta_ms,
        shifted,
    })
}

/// Apply `plan` to a copy of `segments`, keeping the original order.
pub(super) fn apply(segments: &[Segment], plan: &CascadePlan) -> Result<Vec<Segment>> {
    let adjustments = plan.adjustments();
    segments
        .iter()
        .map(|segment| match adjustments.get(&segment.id) {
            Some(&delta) => shift(segment, delta),
            None => Ok(segment.clone()),
        })
        .collect()
}

fn shift(segment: &Segment, delta: Duration) -> Result<Segment> {
    let out_of_range = || Error::TimeOutOfRange(segment.id.clone());
    let mut shifted = segment.clone();
    shifted.start_datetime = segment
        .start_datetime
        .checked_add_signed(delta)
        .ok_or_else(out_of_range)?;
    shifted.end_datetime = segment
        .end_datetime
        .checked_add_signed(delta)
        .ok_or_else(out_of_range)?;
    Ok(shifted)
}

pub(super) fn adjust(
    policy: &SchedulePolicy,
    segments: &[Segment],
    moved: &SegmentId,
    delta_ms: i64,
) -> Result<Vec<Segment>> {
    run(policy, segments, moved, delta_ms).map(|(_, adjusted)| adjusted)
}

/// Plan, apply and validate in one pass, returning the plan with the result.
pub(super) fn run(
    policy: &SchedulePolicy,
    segments: &[Segment],
    moved: &SegmentId,
    delta_ms: i64,
) -> Result<(CascadePlan, Vec<Segment>)> {
    let plan = plan(policy, segments, moved, delta_ms)?;
    let adjusted = apply(segments, &plan)?;

    if let Err(err) = validate_under(policy, &adjusted) {
        tracing::debug!(moved = %moved, delta_ms, error = %err, "cascade rejected");
        return Err(err);
    }

    tracing::debug!(moved = %moved, delta_ms, shifted = plan.shifted.len(), "cascade applied");
    Ok((plan, adjusted))
}

/// Compute which segments a move would shift, without shifting them.
///
/// # Errors
///
/// Returns [`Error::MissingDependency`] if `moved` is not in `segments`.
pub fn plan_cascade(segments: &[Segment], moved: &SegmentId, delta_ms: i64) -> Result<CascadePlan> {
    plan(&SchedulePolicy::default(), segments, moved, delta_ms)
}

/// Move `moved` by `delta_ms` milliseconds and shift all of its explicit and
/// inferred dependents by the same amount.
///
/// Returns the full list in its original order, unchanged segments included.
///
/// # Errors
///
/// - [`Error::MissingDependency`] if `moved` is not in `segments`
/// - [`Error::AdjustmentFailed`] if the result has overlapping exclusive segments
/// - [`Error::TimeOutOfRange`] if a shifted time is not representable
pub fn adjust_dependent_segments(
    segments: &[Segment],
    moved: &SegmentId,
    delta_ms: i64,
) -> Result<Vec<Segment>> {
    adjust(&SchedulePolicy::default(), segments, moved, delta_ms)
}
