//! The distance table: per-node best known cost and predecessor.
//!
//! This is the bookkeeping a student maintains on paper while tracing the
//! algorithm: one row per node, seeded to ∞ / unset, updated in place as
//! neighbors are examined. Rows are kept in ascending node-id order; the
//! presentation layer applies its own display sorting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::error::CoreError;
use crate::graph::RouteGraph;
use crate::id::NodeId;

/// One row of the distance table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceRow {
    /// Best known cost from the start node, ∞ until a path is found.
    pub cost: Cost,
    /// Node this row was last improved from, unset until then.
    pub predecessor: Option<NodeId>,
}

/// Mapping from every node to its [`DistanceRow`].
///
/// Mutated in place by the stepper; read-only for everyone else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceTable {
    rows: IndexMap<NodeId, DistanceRow>,
}

impl DistanceTable {
    /// Builds a fresh table for `graph`: one row per node in ascending id
    /// order, every cost ∞, every predecessor unset.
    pub fn seeded(graph: &RouteGraph) -> Self {
        let rows = graph
            .node_ids()
            .map(|id| (id, DistanceRow::default()))
            .collect();
        DistanceTable { rows }
    }

    /// Number of rows (= node count of the seeding graph).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a row.
    pub fn get(&self, node: NodeId) -> Option<&DistanceRow> {
        self.rows.get(&node)
    }

    /// Iterates rows in ascending node-id order.
    pub fn rows(&self) -> impl Iterator<Item = (NodeId, &DistanceRow)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    /// Updates a row in place.
    pub fn set_cost(
        &mut self,
        node: NodeId,
        cost: Cost,
        predecessor: Option<NodeId>,
    ) -> Result<(), CoreError> {
        let row = self
            .rows
            .get_mut(&node)
            .ok_or(CoreError::NodeNotFound { id: node })?;
        row.cost = cost;
        row.predecessor = predecessor;
        Ok(())
    }

    /// Returns the unvisited node with the minimum cost.
    ///
    /// Ties break to the lowest node id: the scan runs in ascending id
    /// order and only a strictly smaller cost displaces the candidate.
    /// Errors with [`CoreError::EmptyFrontier`] when every node has been
    /// visited already or the table is empty.
    pub fn min_unvisited(&self, visited: &[NodeId]) -> Result<NodeId, CoreError> {
        let mut best: Option<(NodeId, Cost)> = None;
        for (id, row) in self.rows() {
            if visited.contains(&id) {
                continue;
            }
            match best {
                Some((_, cost)) if row.cost >= cost => {}
                _ => best = Some((id, row.cost)),
            }
        }
        best.map(|(id, _)| id).ok_or(CoreError::EmptyFrontier)
    }
}
