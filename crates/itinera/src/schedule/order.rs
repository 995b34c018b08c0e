//! Topological ordering of segments (Kahn's algorithm).
//!
//! # Determinism
//!
//! The ready queue is FIFO and is seeded with zero in-degree segments in input
//! order. Dependents are released in edge insertion order. Identical input
//! therefore always yields identical output.

use super::cycles::find_cycle;
use super::graph::build_graph;
use crate::domain::Segment;
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Order segments so each one comes after everything it explicitly depends on.
///
/// In-degree counts the incoming edges actually present in the graph, so a
/// dangling `depends_on` entry never holds a segment back. When IDs repeat,
/// only the first segment with that ID is returned.
///
/// # Errors
///
/// Returns [`Error::CircularDependency`] from the cycle check, which runs
/// before any sorting.
pub fn get_topological_order(segments: &[Segment]) -> Result<Vec<Segment>> {
    let graph = build_graph(segments);
    if let Some(path) = find_cycle(&graph) {
        return Err(Error::CircularDependency { path });
    }

    let mut in_degree: Vec<usize> = graph.node_indices().map(|n| graph.in_degree(n)).collect();
    let mut ready: VecDeque<_> = graph
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .collect();

    let mut ordered = Vec::with_capacity(graph.len());
    while let Some(node) = ready.pop_front() {
        ordered.push(graph.node_segment(node).clone());

        for next in graph.dependent_indices(node) {
            let remaining = &mut in_degree[next.index()];
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                ready.push_back(next);
            }
        }
    }

    debug_assert_eq!(ordered.len(), graph.len(), "acyclic graph must drain fully");
    Ok(ordered)
}
