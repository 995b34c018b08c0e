//! Type-aware overlap detection.
//!
//! Two segments conflict only when their time ranges overlap *and* both of
//! their types are exclusive under the policy. With the default policy that
//! means flights and transfers; a hotel can overlap anything.

use super::policy::SchedulePolicy;
use crate::domain::{Segment, SegmentId};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A pair of exclusive segments whose time ranges overlap.
///
/// `first` precedes `second` in the checked list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Conflict {
    /// Earlier segment of the pair, by list position
    pub first: SegmentId,

    /// Later segment of the pair, by list position
    pub second: SegmentId,
}

impl Conflict {
    /// Create a conflict between two segment IDs.
    pub fn new(first: SegmentId, second: SegmentId) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} overlaps {}", self.first, self.second)
    }
}

/// Half-open interval overlap: touching endpoints do not overlap.
pub fn overlaps_in_time(a: &Segment, b: &Segment) -> bool {
    a.start_datetime < b.end_datetime && b.start_datetime < a.end_datetime
}

pub(super) fn would_overlap_under(policy: &SchedulePolicy, a: &Segment, b: &Segment) -> bool {
    policy.is_exclusive(a.segment_type())
        && policy.is_exclusive(b.segment_type())
        && overlaps_in_time(a, b)
}

pub(super) fn find_conflicts_under(policy: &SchedulePolicy, segments: &[Segment]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (i, a) in segments.iter().enumerate() {
        for b in &segments[i + 1..] {
            if would_overlap_under(policy, a, b) {
                conflicts.push(Conflict::new(a.id.clone(), b.id.clone()));
            }
        }
    }
    conflicts
}

pub(super) fn validate_under(policy: &SchedulePolicy, segments: &[Segment]) -> Result<()> {
    let conflicts = find_conflicts_under(policy, segments);
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(Error::AdjustmentFailed { conflicts })
    }
}

/// Whether `a` and `b` would be an impossible pair under the default policy.
pub fn would_overlap(a: &Segment, b: &Segment) -> bool {
    would_overlap_under(&SchedulePolicy::default(), a, b)
}

/// Every conflicting pair in `segments`, each unordered pair checked once.
pub fn find_conflicts(segments: &[Segment]) -> Vec<Conflict> {
    find_conflicts_under(&SchedulePolicy::default(), segments)
}

/// Check `segments` for overlapping exclusive pairs.
///
/// # Errors
///
/// Returns [`Error::AdjustmentFailed`] listing every conflicting pair, not
/// just the first one found.
pub fn validate_no_conflicts(segments: &[Segment]) -> Result<()> {
    validate_under(&SchedulePolicy::default(), segments)
}
