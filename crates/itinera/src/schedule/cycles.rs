//! Cycle detection over explicit dependencies.
//!
//! Three-colour depth-first search: white nodes are unvisited, gray nodes are
//! on the current DFS path, black nodes are finished. Reaching a gray node
//! again closes a cycle, and the gray stack from that node onward is the
//! cycle itself.

use super::graph::{build_graph, DependencyGraph};
use crate::domain::{Segment, SegmentId};
use crate::error::{Error, Result};
use petgraph::graph::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Find one cycle in `graph`, if any.
///
/// Every node is tried as a root in input order, so disconnected components
/// are covered. The returned path starts at the node where the cycle was
/// entered and ends with that same node again.
pub fn find_cycle(graph: &DependencyGraph<'_>) -> Option<Vec<SegmentId>> {
    let mut marks = vec![Mark::White; graph.len()];

    for root in graph.node_indices() {
        if marks[root.index()] != Mark::White {
            continue;
        }
        if let Some(cycle) = visit(graph, root, &mut marks) {
            return Some(cycle);
        }
    }
    None
}

/// One node on the DFS path with its dependents and how far through them
/// the search has got.
struct Frame {
    node: NodeIndex,
    dependents: Vec<NodeIndex>,
    cursor: usize,
}

impl Frame {
    fn enter(graph: &DependencyGraph<'_>, node: NodeIndex, marks: &mut [Mark]) -> Self {
        marks[node.index()] = Mark::Gray;
        Self {
            node,
            dependents: graph.dependent_indices(node),
            cursor: 0,
        }
    }
}

// Explicit stack: chains can be far deeper than the thread stack allows.
fn visit(
    graph: &DependencyGraph<'_>,
    root: NodeIndex,
    marks: &mut [Mark],
) -> Option<Vec<SegmentId>> {
    let mut path = vec![Frame::enter(graph, root, marks)];

    while let Some(frame) = path.last_mut() {
        let Some(&next) = frame.dependents.get(frame.cursor) else {
            marks[frame.node.index()] = Mark::Black;
            path.pop();
            continue;
        };
        frame.cursor += 1;

        match marks[next.index()] {
            Mark::Gray => {
                let entry = path.iter().position(|f| f.node == next).unwrap_or(0);
                let cycle = path[entry..]
                    .iter()
                    .map(|f| f.node)
                    .chain(std::iter::once(next))
                    .map(|n| graph.node_segment(n).id.clone())
                    .collect();
                return Some(cycle);
            }
            Mark::White => path.push(Frame::enter(graph, next, marks)),
            Mark::Black => {}
        }
    }
    None
}

/// Check that explicit `depends_on` edges contain no cycle.
///
/// Inferred chronological edges are never part of this check.
///
/// # Errors
///
/// Returns [`Error::CircularDependency`] carrying the cycle path, e.g.
/// `[a, b, a]` when `a` and `b` depend on each other.
pub fn validate_no_cycles(segments: &[Segment]) -> Result<()> {
    let graph = build_graph(segments);
    match find_cycle(&graph) {
        Some(path) => {
            tracing::debug!(length = path.len() - 1, "explicit dependency cycle found");
            Err(Error::CircularDependency { path })
        }
        None => Ok(()),
    }
}
