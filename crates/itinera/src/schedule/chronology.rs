//! Chronological dependency inference.
//!
//! A segment that starts within the policy window after another one ends is
//! treated as depending on it, whether or not anyone declared that. Background
//! segments (hotels by default) span long periods and take no part.
//!
//! Inferred edges always point from an earlier start to a later one, so they
//! cannot form a cycle among distinct segments. They are advisory only: the
//! cycle check and topological order never see them.

use super::policy::SchedulePolicy;
use crate::domain::{Segment, SegmentId};
use chrono::Duration;
use std::collections::BTreeMap;

/// Inferred predecessors keyed by dependent segment ID.
///
/// Predecessors are listed nearest start first. Segments without inferred
/// predecessors have no entry.
pub type ChronologicalDependencies = BTreeMap<SegmentId, Vec<SegmentId>>;

pub(super) fn infer(segments: &[Segment], policy: &SchedulePolicy) -> ChronologicalDependencies {
    let mut timeline: Vec<&Segment> = segments
        .iter()
        .filter(|s| !policy.is_background(s.segment_type()))
        .collect();
    // Stable: equal starts keep input order.
    timeline.sort_by_key(|s| s.start_datetime);

    let window = policy.chronological_window;
    let mut inferred = ChronologicalDependencies::new();

    for (position, later) in timeline.iter().enumerate() {
        let predecessors: Vec<SegmentId> = timeline[..position]
            .iter()
            .rev()
            .filter(|earlier| earlier.id != later.id)
            .filter(|earlier| {
                let gap = later.start_datetime - earlier.end_datetime;
                gap >= Duration::zero() && gap <= window
            })
            .map(|earlier| earlier.id.clone())
            .collect();

        if !predecessors.is_empty() {
            inferred
                .entry(later.id.clone())
                .or_default()
                .extend(predecessors);
        }
    }

    inferred
}

/// Infer predecessor relationships from time adjacency under the default policy.
///
/// For each non-hotel segment B, every earlier non-hotel segment A with
/// `0 <= B.start - A.end <= 30 minutes` is recorded as a predecessor of B.
pub fn infer_chronological_dependencies(segments: &[Segment]) -> ChronologicalDependencies {
    infer(segments, &SchedulePolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentType;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
    }

    fn seg(id: &str, kind: SegmentType, start: DateTime<Utc>, end: DateTime<Utc>) -> Segment {
        Segment::new(id, kind, start, end)
    }

    fn preds(map: &ChronologicalDependencies, id: &str) -> Vec<String> {
        map.get(&SegmentId::from(id))
            .map(|list| list.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn exactly_thirty_minutes_is_inferred() {
        let segments = vec![
            seg("flight", SegmentType::Flight, at(10, 0), at(14, 0)),
            seg("taxi", SegmentType::Transfer, at(14, 30), at(15, 0)),
        ];
        let inferred = infer_chronological_dependencies(&segments);
        assert_eq!(preds(&inferred, "taxi"), vec!["flight"]);
    }

    #[test]
    fn one_millisecond_past_the_window_is_not() {
        let late = at(14, 30) + Duration::milliseconds(1);
        let segments = vec![
            seg("flight", SegmentType::Flight, at(10, 0), at(14, 0)),
            seg("taxi", SegmentType::Transfer, late, at(15, 0)),
        ];
        assert!(infer_chronological_dependencies(&segments).is_empty());
    }

    #[test]
    fn back_to_back_is_inferred_but_overlap_is_not() {
        let segments = vec![
            seg("a", SegmentType::Meeting, at(9, 0), at(10, 0)),
            seg("b", SegmentType::Meeting, at(10, 0), at(11, 0)),
            seg("c", SegmentType::Activity, at(10, 45), at(12, 0)),
        ];
        let inferred = infer_chronological_dependencies(&segments);
        assert_eq!(preds(&inferred, "b"), vec!["a"]);
        // c starts before b ends and 45 minutes after a ends.
        assert!(preds(&inferred, "c").is_empty());
    }

    #[test]
    fn hotels_are_never_on_either_side() {
        let segments = vec![
            seg("flight", SegmentType::Flight, at(10, 0), at(14, 0)),
            seg("hotel", SegmentType::Hotel, at(14, 10), at(23, 0)),
            seg("dinner", SegmentType::Activity, at(23, 15), at(23, 45)),
        ];
        let inferred = infer_chronological_dependencies(&segments);
        assert!(inferred.is_empty());
    }

    #[test]
    fn every_segment_ending_in_the_window_counts() {
        let segments = vec![
            seg("call", SegmentType::Meeting, at(13, 0), at(13, 50)),
            seg("flight", SegmentType::Flight, at(10, 0), at(14, 0)),
            seg("taxi", SegmentType::Transfer, at(14, 15), at(15, 0)),
        ];
        let inferred = infer_chronological_dependencies(&segments);
        assert_eq!(preds(&inferred, "taxi"), vec!["call", "flight"]);
    }

    #[test]
    fn custom_window_is_respected() {
        let policy = SchedulePolicy {
            chronological_window: Duration::minutes(90),
            ..SchedulePolicy::default()
        };
        let segments = vec![
            seg("a", SegmentType::Activity, at(9, 0), at(10, 0)),
            seg("b", SegmentType::Activity, at(11, 15), at(12, 0)),
        ];
        assert_eq!(preds(&infer(&segments, &policy), "b"), vec!["a"]);
        assert!(infer_chronological_dependencies(&segments).is_empty());
    }
}
