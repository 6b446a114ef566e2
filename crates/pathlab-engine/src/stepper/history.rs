//! Snapshot stack for stepping backward.
//!
//! Every forward transition pushes a full deep copy of the pre-transition
//! [`StepperState`]; "previous step" pops and restores it. Snapshots are
//! owned values, so a popped state can never be corrupted by later
//! mutation. Depth grows by at most one per forward transition and is
//! bounded in practice by the node count of the graph.

use super::state::StepperState;

/// Stack of pre-transition snapshots, newest last.
#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    stack: Vec<StepperState>,
}

impl History {
    /// Pushes a deep copy of `state`.
    pub fn push(&mut self, state: &StepperState) {
        self.stack.push(state.clone());
    }

    /// Pops the most recent snapshot, if any.
    pub fn pop(&mut self) -> Option<StepperState> {
        self.stack.pop()
    }

    /// Number of stored snapshots.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Drops all snapshots (graph or endpoint change).
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathlab_core::{Cost, NodeId, RouteGraph};

    #[test]
    fn pop_restores_the_pushed_value() {
        let graph = RouteGraph::with_nodes(3);
        let mut history = History::default();
        let state = StepperState::fresh(&graph);
        history.push(&state);
        assert_eq!(history.depth(), 1);
        assert_eq!(history.pop().unwrap(), state);
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn snapshots_are_isolated_from_later_mutation() {
        let graph = RouteGraph::with_nodes(3);
        let mut history = History::default();
        let mut state = StepperState::fresh(&graph);
        history.push(&state);

        state
            .table
            .set_cost(NodeId(0), Cost::ZERO, Some(NodeId(0)))
            .unwrap();
        state.visited.push(NodeId(0));

        let restored = history.pop().unwrap();
        assert!(restored.visited.is_empty());
        assert_eq!(restored.table.get(NodeId(0)).unwrap().cost, Cost::Unreachable);
    }

    #[test]
    fn clear_empties_the_stack() {
        let graph = RouteGraph::with_nodes(2);
        let mut history = History::default();
        history.push(&StepperState::fresh(&graph));
        history.push(&StepperState::fresh(&graph));
        history.clear();
        assert_eq!(history.depth(), 0);
    }
}
