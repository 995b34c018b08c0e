//! Segment dependency and cascade-scheduling engine.
//!
//! The engine is a set of pure, synchronous functions over a segment slice.
//! No graph is kept between calls: each operation builds a [`DependencyGraph`]
//! from the slice it is given and drops it on return.
//!
//! # Pieces
//!
//! - [`build_graph`]: nodes plus `predecessor -> dependent` edges from `depends_on`
//! - [`validate_no_cycles`]: three-colour DFS over explicit edges
//! - [`get_topological_order`]: Kahn's algorithm with FIFO tie-breaking
//! - [`find_dependents`]: BFS closure of a segment's dependents
//! - [`infer_chronological_dependencies`]: implicit edges from time adjacency
//! - [`would_overlap`] / [`validate_no_conflicts`]: type-aware overlap rules
//! - [`adjust_dependent_segments`]: uniform cascade of a time shift, validated
//!
//! Free functions use [`SchedulePolicy::default`]. [`Scheduler`] runs the same
//! operations under a configured policy.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use itinera::domain::{Segment, SegmentType};
//! use itinera::schedule::adjust_dependent_segments;
//!
//! let at = |h| Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap();
//! let segments = vec![
//!     Segment::new("flight", SegmentType::Flight, at(10), at(14)),
//!     Segment::new("taxi", SegmentType::Transfer, at(15), at(16)).depending_on(["flight"]),
//! ];
//!
//! let two_hours = 2 * 60 * 60 * 1000;
//! let moved = adjust_dependent_segments(&segments, &"flight".into(), two_hours).unwrap();
//! assert_eq!(moved[1].start_datetime, at(17));
//! ```

mod cascade;
mod chronology;
mod conflicts;
mod cycles;
mod dependents;
mod graph;
mod order;
mod policy;

use crate::domain::{Segment, SegmentId};
use crate::error::Result;

pub use cascade::{adjust_dependent_segments, plan_cascade, CascadePlan};
pub use chronology::{infer_chronological_dependencies, ChronologicalDependencies};
pub use conflicts::{
    find_conflicts, overlaps_in_time, validate_no_conflicts, would_overlap, Conflict,
};
pub use cycles::{find_cycle, validate_no_cycles};
pub use dependents::find_dependents;
pub use graph::{build_graph, DependencyGraph, EdgeOrigin};
pub use order::get_topological_order;
pub use policy::{
    SchedulePolicy, DEFAULT_BACKGROUND_TYPES, DEFAULT_CHRONOLOGICAL_WINDOW_MINUTES,
    DEFAULT_EXCLUSIVE_TYPES,
};

/// The engine bound to a specific [`SchedulePolicy`].
///
/// Cycle checks, ordering and dependent lookup do not depend on the policy and
/// behave exactly like the free functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scheduler {
    policy: SchedulePolicy,
}

impl Scheduler {
    /// Create a scheduler with the given policy.
    pub fn new(policy: SchedulePolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect.
    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// See [`validate_no_cycles`].
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` with the cycle path.
    pub fn validate_no_cycles(&self, segments: &[Segment]) -> Result<()> {
        validate_no_cycles(segments)
    }

    /// See [`get_topological_order`].
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` with the cycle path.
    pub fn topological_order(&self, segments: &[Segment]) -> Result<Vec<Segment>> {
        get_topological_order(segments)
    }

    /// See [`find_dependents`].
    pub fn find_dependents(&self, segments: &[Segment], segment_id: &SegmentId) -> Vec<SegmentId> {
        find_dependents(segments, segment_id)
    }

    /// Chronological inference under this scheduler's window and background types.
    pub fn infer_chronological_dependencies(
        &self,
        segments: &[Segment],
    ) -> ChronologicalDependencies {
        chronology::infer(segments, &self.policy)
    }

    /// Overlap check under this scheduler's exclusive types.
    pub fn would_overlap(&self, a: &Segment, b: &Segment) -> bool {
        conflicts::would_overlap_under(&self.policy, a, b)
    }

    /// Every conflicting pair under this scheduler's exclusive types.
    pub fn find_conflicts(&self, segments: &[Segment]) -> Vec<Conflict> {
        conflicts::find_conflicts_under(&self.policy, segments)
    }

    /// Conflict validation under this scheduler's exclusive types.
    ///
    /// # Errors
    ///
    /// Returns `AdjustmentFailed` listing every conflicting pair.
    pub fn validate_no_conflicts(&self, segments: &[Segment]) -> Result<()> {
        conflicts::validate_under(&self.policy, segments)
    }

    /// The shift set a move would produce under this policy.
    ///
    /// # Errors
    ///
    /// Returns `MissingDependency` if `moved` is unknown.
    pub fn plan_cascade(
        &self,
        segments: &[Segment],
        moved: &SegmentId,
        delta_ms: i64,
    ) -> Result<CascadePlan> {
        cascade::plan(&self.policy, segments, moved, delta_ms)
    }

    /// Cascade a shift under this policy.
    ///
    /// # Errors
    ///
    /// See [`adjust_dependent_segments`].
    pub fn adjust_dependent_segments(
        &self,
        segments: &[Segment],
        moved: &SegmentId,
        delta_ms: i64,
    ) -> Result<Vec<Segment>> {
        cascade::adjust(&self.policy, segments, moved, delta_ms)
    }

    /// Cascade a shift and also return the plan that produced it.
    ///
    /// The graph is built and inference runs once for both.
    ///
    /// # Errors
    ///
    /// See [`adjust_dependent_segments`].
    pub fn cascade(
        &self,
        segments: &[Segment],
        moved: &SegmentId,
        delta_ms: i64,
    ) -> Result<(CascadePlan, Vec<Segment>)> {
        cascade::run(&self.policy, segments, moved, delta_ms)
    }
}
