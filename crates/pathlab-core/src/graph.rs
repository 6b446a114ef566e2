//! RouteGraph: the weighted undirected graph the trainer runs on.
//!
//! [`RouteGraph`] wraps a petgraph `UnGraph` behind a small capability
//! surface (`neighbors`, `weight`, `node_count`, labels) so the stepper and
//! the solution checker never depend on the storage representation. Nodes
//! are dense integer indices `0..N`, optionally annotated with a display
//! label. All mutations go through builder methods that enforce the graph
//! invariants: positive weights, no self-loops, last write wins on
//! duplicate edges. Once a graph is handed to a stepper it is only read.

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::NodeId;

/// Edge weight. Always positive.
pub type Weight = u32;

/// Per-node annotation. Only the fixed teaching example carries labels;
/// generated and user-supplied graphs leave them empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeTag {
    /// Optional display label (e.g. a city name).
    pub label: Option<String>,
}

/// Simple undirected weighted graph with dense node indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGraph {
    inner: UnGraph<NodeTag, Weight>,
}

impl RouteGraph {
    /// Creates a graph of `n` unlabeled nodes and no edges.
    pub fn with_nodes(n: usize) -> Self {
        let mut inner = UnGraph::with_capacity(n, n);
        for _ in 0..n {
            inner.add_node(NodeTag::default());
        }
        RouteGraph { inner }
    }

    /// Creates a graph whose nodes carry the given display labels, in
    /// index order.
    pub fn with_labeled_nodes<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = UnGraph::default();
        for label in labels {
            inner.add_node(NodeTag {
                label: Some(label.into()),
            });
        }
        RouteGraph { inner }
    }

    /// Builds a graph from `(u, v, weight)` triples, inferring the node set
    /// as `0..=max_id`. Duplicate edges take the last written weight.
    pub fn from_weighted_edges(edges: &[(u32, u32, u32)]) -> Result<Self, CoreError> {
        let node_count = edges
            .iter()
            .map(|&(u, v, _)| u.max(v) as usize + 1)
            .max()
            .unwrap_or(0);
        let mut graph = RouteGraph::with_nodes(node_count);
        for &(u, v, weight) in edges {
            graph.add_edge(NodeId(u), NodeId(v), weight)?;
        }
        Ok(graph)
    }

    /// Adds an undirected edge, or updates its weight if it already exists.
    ///
    /// Errors on self-loops, non-positive weights, and unknown endpoints.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, weight: Weight) -> Result<(), CoreError> {
        if u == v {
            return Err(CoreError::SelfLoop { id: u });
        }
        if weight == 0 {
            return Err(CoreError::InvalidWeight { u, v, weight });
        }
        for id in [u, v] {
            if !self.contains(id) {
                return Err(CoreError::NodeNotFound { id });
            }
        }
        self.inner.update_edge(u.into(), v.into(), weight);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// True when the node index exists.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.inner.node_count()
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices().map(NodeId::from)
    }

    /// Neighbors of `id` in ascending id order.
    ///
    /// The sort keeps every traversal deterministic regardless of edge
    /// insertion order.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut neighbors: Vec<NodeId> = self.inner.neighbors(id.into()).map(NodeId::from).collect();
        neighbors.sort();
        neighbors
    }

    /// Weight of the edge between `u` and `v`, if present.
    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<Weight> {
        self.inner
            .find_edge(u.into(), v.into())
            .and_then(|edge| self.inner.edge_weight(edge))
            .copied()
    }

    /// Display label of a node, if it has one.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.inner
            .node_weight(id.into())
            .and_then(|tag| tag.label.as_deref())
    }

    /// Label if present, otherwise the node index as text.
    pub fn display_name(&self, id: NodeId) -> String {
        match self.label(id) {
            Some(label) => label.to_owned(),
            None => id.to_string(),
        }
    }

    /// True when the graph carries display labels.
    pub fn has_labels(&self) -> bool {
        self.inner
            .node_weights()
            .any(|tag| tag.label.is_some())
    }

    /// All edges as `(lo, hi, weight)` triples, sorted ascending.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, Weight)> {
        let mut edges: Vec<(NodeId, NodeId, Weight)> = self
            .inner
            .edge_references()
            .map(|edge| {
                let a = NodeId::from(edge.source());
                let b = NodeId::from(edge.target());
                (a.min(b), a.max(b), *edge.weight())
            })
            .collect();
        edges.sort();
        edges
    }

    /// True when every node can reach every other node.
    pub fn is_connected(&self) -> bool {
        self.inner.node_count() > 0 && connected_components(&self.inner) == 1
    }

    /// Sums the edge weights along `path`. Returns `None` when the path is
    /// too short or uses an edge the graph does not have.
    pub fn total_path_weight(&self, path: &[NodeId]) -> Option<u64> {
        if path.len() < 2 {
            return None;
        }
        let mut total = 0u64;
        for pair in path.windows(2) {
            total += u64::from(self.weight(pair[0], pair[1])?);
        }
        Some(total)
    }
}
