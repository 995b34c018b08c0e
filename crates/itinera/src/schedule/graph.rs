//! Dependency graph construction using petgraph.
//!
//! # Edge Direction
//!
//! Edges point from **predecessor to dependent**: if segment B lists A in
//! `depends_on`, the graph holds `A -> B`. Walking outgoing edges from a node
//! therefore visits everything that has to move when it moves.
//!
//! Dependents are always reported in edge insertion order, which follows the
//! input order of segments and their `depends_on` lists. petgraph itself
//! yields outgoing edges newest-first, so [`DependencyGraph::dependent_indices`]
//! reverses them.

use crate::domain::{Segment, SegmentId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Where an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Declared through a segment's `depends_on` list.
    Explicit,

    /// Inferred from time adjacency.
    Chronological,
}

/// Ephemeral view of a segment list as a directed graph.
///
/// Borrows the segments it was built from; rebuilt for every engine call.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph<'a> {
    /// Nodes hold the segments themselves, in input order.
    graph: DiGraph<&'a Segment, EdgeOrigin>,

    /// Segment ID to node lookup. One entry per distinct ID.
    node_map: HashMap<&'a SegmentId, NodeIndex>,
}

impl<'a> DependencyGraph<'a> {
    /// Number of distinct segments.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` for a graph built from no segments.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if a segment with this ID is a node.
    pub fn contains(&self, id: &SegmentId) -> bool {
        self.node_map.contains_key(id)
    }

    /// IDs of the direct dependents of `id`, in edge insertion order.
    ///
    /// Duplicate edges show up as duplicate IDs. Unknown IDs have no dependents.
    pub fn dependents(&self, id: &SegmentId) -> Vec<&'a SegmentId> {
        self.index(id)
            .map(|node| {
                self.dependent_indices(node)
                    .into_iter()
                    .map(|next| &self.graph[next].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Origin of the first edge `from -> to`, if any.
    pub fn edge_origin(&self, from: &SegmentId, to: &SegmentId) -> Option<EdgeOrigin> {
        let edge = self.graph.find_edge(self.index(from)?, self.index(to)?)?;
        self.graph.edge_weight(edge).copied()
    }

    pub(super) fn index(&self, id: &SegmentId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub(super) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub(super) fn node_segment(&self, node: NodeIndex) -> &'a Segment {
        self.graph[node]
    }

    pub(super) fn dependent_indices(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut targets: Vec<NodeIndex> = self.graph.edges(node).map(|e| e.target()).collect();
        targets.reverse();
        targets
    }

    pub(super) fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    /// Add `from -> to` unless that edge already exists.
    ///
    /// Returns `false` when the edge was already present or either end is
    /// not a node.
    pub(super) fn add_edge_once(
        &mut self,
        from: &SegmentId,
        to: &SegmentId,
        origin: EdgeOrigin,
    ) -> bool {
        let (Some(from), Some(to)) = (self.index(from), self.index(to)) else {
            return false;
        };
        if self.graph.contains_edge(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, origin);
        true
    }
}

/// Build the explicit dependency graph for `segments`.
///
/// Every segment becomes a node; the first occurrence wins when IDs repeat.
/// Each `depends_on` entry naming a known segment becomes an edge from that
/// segment to the dependent. Entries naming unknown segments are dropped:
/// the referenced segment may have been deleted without its dependents being
/// updated.
pub fn build_graph(segments: &[Segment]) -> DependencyGraph<'_> {
    let mut graph = DependencyGraph::default();

    for segment in segments {
        if graph.node_map.contains_key(&segment.id) {
            tracing::debug!(segment = %segment.id, "ignoring repeated segment id");
            continue;
        }
        let node = graph.graph.add_node(segment);
        graph.node_map.insert(&segment.id, node);
    }

    for dependent in graph.graph.node_indices() {
        let segment = graph.graph[dependent];
        for predecessor in &segment.depends_on {
            match graph.node_map.get(predecessor) {
                Some(&from) => {
                    graph.graph.add_edge(from, dependent, EdgeOrigin::Explicit);
                }
                None => tracing::debug!(
                    segment = %segment.id,
                    missing = %predecessor,
                    "skipping dangling dependency"
                ),
            }
        }
    }

    graph
}
