//! Core error types for pathlab-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! the failure modes of the graph data model and the distance table.

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced by the pathlab-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node index was not found in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// An edge carried a non-positive weight.
    #[error("edge ({u},{v}) must have a positive weight, got {weight}")]
    InvalidWeight { u: NodeId, v: NodeId, weight: u32 },

    /// An edge connected a node to itself.
    #[error("self-loop on node {id} is not allowed")]
    SelfLoop { id: NodeId },

    /// The minimum search ran with every node already visited.
    ///
    /// Unreachable while the phase guards hold; hitting it indicates a
    /// modeling bug, not user error.
    #[error("no unvisited node left to select")]
    EmptyFrontier,
}
