//! Stepper session state: phase, bookkeeping, and narration.
//!
//! All mutable session state lives in one serializable [`StepperState`]
//! value owned by the [`Stepper`](super::Stepper); presentation layers only
//! read committed snapshots of it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use pathlab_core::{DistanceTable, NodeId, RouteGraph};

/// An undirected edge as a normalized `(lo, hi)` pair.
pub type EdgePair = (NodeId, NodeId);

/// Edges highlighted for the active step. Rebuilt each cycle, so it stays
/// small: one entry per neighbor examined from the current node.
pub type EdgeSet = SmallVec<[EdgePair; 8]>;

/// The five phases of the human-legible trace.
///
/// `Init`, `Expand`, and `SelectNext` cycle until the target is selected;
/// `Arrived` waits for the student's answer; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepPhase {
    /// Nothing traced yet; the table is all ∞.
    Init,
    /// Examine the current node's unvisited neighbors.
    Expand,
    /// Select the cheapest unvisited node as the new current node.
    SelectNext,
    /// The target was selected; awaiting the student's answer.
    Arrived,
    /// The answer was correct; the final path is highlighted.
    Done,
}

impl StepPhase {
    /// Progress index 0..=4.
    pub fn index(self) -> u8 {
        match self {
            StepPhase::Init => 0,
            StepPhase::Expand => 1,
            StepPhase::SelectNext => 2,
            StepPhase::Arrived => 3,
            StepPhase::Done => 4,
        }
    }

    /// Heading shown above the narration.
    pub fn heading(self) -> &'static str {
        match self {
            StepPhase::Init => "Step 0: Initialize",
            StepPhase::Expand => "Step 1: Visit Nodes",
            StepPhase::SelectNext => "Step 2: Look For Next Node",
            StepPhase::Arrived => "Step 3: Finish",
            StepPhase::Done => "Congratulations! Your solution is correct.",
        }
    }
}

/// Narration shown alongside the diagram: a heading and explanation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub heading: String,
    pub lines: Vec<String>,
}

impl Narration {
    /// Narration for a phase with the given explanation lines.
    pub fn for_phase(phase: StepPhase, lines: Vec<String>) -> Self {
        Narration {
            heading: phase.heading().to_owned(),
            lines,
        }
    }

    /// The text shown before any step has run.
    pub fn placeholder() -> Self {
        Narration::for_phase(
            StepPhase::Init,
            vec!["Here will be the explanations of every step.".to_owned()],
        )
    }
}

/// The complete mutable state of one trace session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepperState {
    /// Current phase of the state machine.
    pub phase: StepPhase,
    /// Node currently being expanded, unset before the first step.
    pub current_node: Option<NodeId>,
    /// Edges examined in the active step (kept even when they did not
    /// improve the table; seeing the rejected candidates is the point).
    pub current_edges: EdgeSet,
    /// Visited nodes in visit order, no duplicates.
    pub visited: Vec<NodeId>,
    /// The distance table being filled in.
    pub table: DistanceTable,
    /// The checker's shortest path, computed when the target is selected.
    pub solution_path: Option<Vec<NodeId>>,
    /// Narration for the step that just ran.
    pub narration: Narration,
}

impl StepperState {
    /// Fresh state for a graph: phase `Init`, seeded table, nothing visited.
    pub fn fresh(graph: &RouteGraph) -> Self {
        StepperState {
            phase: StepPhase::Init,
            current_node: None,
            current_edges: EdgeSet::new(),
            visited: Vec::new(),
            table: DistanceTable::seeded(graph),
            solution_path: None,
            narration: Narration::placeholder(),
        }
    }
}
