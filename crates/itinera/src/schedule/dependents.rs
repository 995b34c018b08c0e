//! Transitive dependent lookup (BFS).

use super::graph::{build_graph, DependencyGraph};
use crate::domain::{Segment, SegmentId};
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};

/// Every node reachable from `start` through outgoing edges, in BFS order.
///
/// `start` itself is never included, even when a cycle leads back to it. The
/// visited set keeps this finite on cyclic graphs.
pub(super) fn reachable_from(graph: &DependencyGraph<'_>, start: NodeIndex) -> Vec<NodeIndex> {
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut reached = Vec::new();

    while let Some(node) = queue.pop_front() {
        for next in graph.dependent_indices(node) {
            if visited.insert(next) {
                reached.push(next);
                queue.push_back(next);
            }
        }
    }

    reached
}

/// IDs of every segment that depends on `segment_id`, directly or transitively.
///
/// Closer dependents come first. An unknown ID yields an empty list.
pub fn find_dependents(segments: &[Segment], segment_id: &SegmentId) -> Vec<SegmentId> {
    let graph = build_graph(segments);
    let Some(start) = graph.index(segment_id) else {
        return Vec::new();
    };

    reachable_from(&graph, start)
        .into_iter()
        .map(|node| graph.node_segment(node).id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentType;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    fn activity(id: &str, deps: &[&str]) -> Segment {
        Segment::new(id, SegmentType::Activity, at(9), at(10)).depending_on(deps.iter().copied())
    }

    fn dependents_of(segments: &[Segment], id: &str) -> Vec<String> {
        find_dependents(segments, &id.into())
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn includes_transitive_dependents() {
        let segments = vec![activity("a", &[]), activity("b", &["a"]), activity("c", &["b"])];
        assert_eq!(dependents_of(&segments, "a"), vec!["b", "c"]);
        assert_eq!(dependents_of(&segments, "b"), vec!["c"]);
    }

    #[test]
    fn leaf_has_no_dependents() {
        let segments = vec![activity("a", &[]), activity("b", &["a"])];
        assert!(dependents_of(&segments, "b").is_empty());
    }

    #[test]
    fn unknown_target_yields_nothing() {
        let segments = vec![activity("a", &[])];
        assert!(dependents_of(&segments, "nope").is_empty());
    }

    #[test]
    fn shared_descendants_are_reported_once() {
        let segments = vec![
            activity("a", &[]),
            activity("b", &["a"]),
            activity("c", &["a"]),
            activity("d", &["b", "c"]),
        ];
        assert_eq!(dependents_of(&segments, "a"), vec!["b", "c", "d"]);
    }

    #[test]
    fn cycles_terminate_without_reporting_target() {
        let segments = vec![activity("a", &["c"]), activity("b", &["a"]), activity("c", &["b"])];
        assert_eq!(dependents_of(&segments, "a"), vec!["b", "c"]);
    }
}
