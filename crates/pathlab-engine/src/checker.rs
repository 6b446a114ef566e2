//! Independent shortest-path computation for answer validation.
//!
//! The stepper traces Dijkstra the way a student does; this module runs the
//! standard priority-queue formulation and is the authority the student's
//! submitted path is checked against. Relaxation accepts equal costs
//! (`<=`), so among equal-cost paths the latest-discovered one keeps the
//! predecessor slot; the stepper's own table keeps the first (`<`). The two
//! can therefore disagree only when cost ties exist, which is accepted.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use pathlab_core::{Cost, NodeId, RouteGraph};

/// Errors from the solution checker.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Start or target lies outside the graph.
    #[error("node {id} is outside the graph")]
    NodeOutOfRange { id: NodeId },

    /// No path connects start and target (disconnected input graphs are
    /// never rejected up front, so this is reachable).
    #[error("no path from {start} to {target}")]
    NoPath { start: NodeId, target: NodeId },

    /// A submitted answer could not be read as a node sequence.
    #[error("could not read the answer: {message}")]
    BadAnswer { message: String },
}

/// Computes the shortest path from `start` to `target` as a node sequence,
/// both endpoints included.
pub fn shortest_path(
    graph: &RouteGraph,
    start: NodeId,
    target: NodeId,
) -> Result<Vec<NodeId>, CheckError> {
    for id in [start, target] {
        if !graph.contains(id) {
            return Err(CheckError::NodeOutOfRange { id });
        }
    }
    if start == target {
        return Ok(vec![start]);
    }

    let n = graph.node_count();
    let mut dist = vec![Cost::Unreachable; n];
    let mut predecessor: Vec<Option<NodeId>> = vec![None; n];
    // Min-heap on (cost, node id): equal costs pop the lower id first.
    let mut heap = BinaryHeap::new();

    dist[start.index()] = Cost::ZERO;
    heap.push(Reverse((0u64, start)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == target {
            break;
        }
        if Cost::Finite(cost) > dist[node.index()] {
            continue; // stale entry
        }
        for neighbor in graph.neighbors(node) {
            let weight = graph
                .weight(node, neighbor)
                .expect("neighbor iteration only yields existing edges");
            let candidate = Cost::Finite(cost) + weight;
            if candidate <= dist[neighbor.index()] {
                dist[neighbor.index()] = candidate;
                predecessor[neighbor.index()] = Some(node);
                let finite = candidate
                    .finite()
                    .expect("finite + weight stays finite");
                heap.push(Reverse((finite, neighbor)));
            }
        }
    }

    if dist[target.index()].is_unreachable() {
        return Err(CheckError::NoPath { start, target });
    }

    // Walk the predecessor chain back from the target.
    let mut path = vec![target];
    let mut node = target;
    while node != start {
        node = predecessor[node.index()]
            .expect("finite-cost nodes other than start have a predecessor");
        path.push(node);
    }
    path.reverse();
    Ok(path)
}

/// Shortest distance from `start` to `target`.
pub fn shortest_distance(
    graph: &RouteGraph,
    start: NodeId,
    target: NodeId,
) -> Result<u64, CheckError> {
    let path = shortest_path(graph, start, target)?;
    if path.len() < 2 {
        return Ok(0);
    }
    graph
        .total_path_weight(&path)
        .ok_or(CheckError::NoPath { start, target })
}

/// Parses a submitted answer: comma-separated node indices.
pub fn parse_answer(text: &str) -> Result<Vec<NodeId>, CheckError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CheckError::BadAnswer {
            message: "the answer is empty".into(),
        });
    }
    trimmed
        .split(',')
        .map(|token| {
            token.parse::<NodeId>().map_err(|_| CheckError::BadAnswer {
                message: format!("'{}' is not a node index", token.trim()),
            })
        })
        .collect()
}
