//! The stepwise algorithm engine: Dijkstra as a five-phase state machine.
//!
//! [`Stepper`] advances the distance table one human-legible step at a
//! time, the way a student traces the algorithm by hand, instead of the
//! priority-queue formulation: `Init` seeds the start row, `Expand`
//! examines the current node's unvisited neighbors, `SelectNext` picks the
//! cheapest unvisited node, `Arrived` waits for the student's answer, and
//! `Done` shows the confirmed path.
//!
//! Every forward transition pushes the pre-transition state onto a
//! [`History`] stack first, so "previous step" is an exact replay backward.
//! Guard failures (bad endpoints, exhausted frontier) mutate nothing and
//! push nothing.

mod history;
mod state;

use thiserror::Error;
use tracing::{debug, error, warn};

use pathlab_core::{CoreError, Cost, NodeId, RouteGraph};

use crate::checker;
use history::History;

pub use state::{EdgePair, EdgeSet, Narration, StepPhase, StepperState};

/// Errors raised by stepper construction and transitions.
#[derive(Debug, Error)]
pub enum StepError {
    /// The start node lies outside `[0, N)`.
    #[error("start node {id} is outside the graph (0..{node_count})")]
    InvalidStartNode { id: NodeId, node_count: usize },

    /// The target node lies outside `[0, N)`.
    #[error("target node {id} is outside the graph (0..{node_count})")]
    InvalidTargetNode { id: NodeId, node_count: usize },

    /// Start and target must differ for the trace to terminate.
    #[error("start and target are both {id}; pick two different nodes")]
    EndpointsEqual { id: NodeId },

    /// A phase invariant was violated. Indicates a modeling bug, not user
    /// error; the offending transition is halted with state unchanged.
    #[error("internal invariant violation: {message}")]
    Internal { message: String },
}

impl From<CoreError> for StepError {
    fn from(err: CoreError) -> Self {
        StepError::Internal {
            message: err.to_string(),
        }
    }
}

/// Result of submitting an answer while in the `Arrived` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The submitted path matches; the session is `Done`.
    Correct,
    /// Wrong or unreadable path; the session stays in `Arrived`.
    Incorrect,
    /// No answer is expected in the current phase.
    NotAwaitingAnswer,
}

/// The algorithm stepper: owns the graph, the session state, and the
/// snapshot history.
#[derive(Debug)]
pub struct Stepper {
    graph: RouteGraph,
    start: NodeId,
    target: NodeId,
    state: StepperState,
    history: History,
}

impl Stepper {
    /// Creates a stepper over `graph` with validated endpoints.
    pub fn new(graph: RouteGraph, start: NodeId, target: NodeId) -> Result<Self, StepError> {
        validate_endpoints(&graph, start, target)?;
        let state = StepperState::fresh(&graph);
        Ok(Stepper {
            graph,
            start,
            target,
            state,
            history: History::default(),
        })
    }

    /// The graph this session runs on. Read-only.
    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// The committed session state.
    pub fn state(&self) -> &StepperState {
        &self.state
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Number of stored snapshots (= forward transitions taken).
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    /// Replaces the endpoints and fully resets the session.
    pub fn set_endpoints(&mut self, start: NodeId, target: NodeId) -> Result<(), StepError> {
        validate_endpoints(&self.graph, start, target)?;
        self.start = start;
        self.target = target;
        self.reset();
        Ok(())
    }

    /// Clears history and returns to the `Init` phase.
    pub fn reset(&mut self) {
        self.state = StepperState::fresh(&self.graph);
        self.history.clear();
    }

    /// Advances the trace by one step.
    ///
    /// `Arrived` ignores advancement (the student must answer first) and
    /// `Done` only re-renders, so both leave the state untouched.
    pub fn advance(&mut self) -> Result<&StepperState, StepError> {
        match self.state.phase {
            StepPhase::Init => self.initialize()?,
            StepPhase::Expand => self.expand()?,
            StepPhase::SelectNext => self.select_next()?,
            StepPhase::Arrived => {}
            StepPhase::Done => self.redraw_done(),
        }
        Ok(&self.state)
    }

    /// Restores the most recent snapshot; no-op when history is empty.
    pub fn step_back(&mut self) -> &StepperState {
        if let Some(previous) = self.history.pop() {
            debug!(phase = ?previous.phase, "restored previous step");
            self.state = previous;
        }
        &self.state
    }

    /// Checks a submitted answer against the computed solution path.
    ///
    /// Unreadable input counts as an incorrect attempt: the narration
    /// carries the diagnostic and the student can retry.
    pub fn submit_answer(&mut self, text: &str) -> AnswerOutcome {
        if self.state.phase != StepPhase::Arrived {
            return AnswerOutcome::NotAwaitingAnswer;
        }

        let submitted = match checker::parse_answer(text) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(%err, "unreadable answer");
                self.state.narration = Narration::for_phase(
                    StepPhase::Arrived,
                    vec![
                        err.to_string(),
                        "Enter the path as comma-separated node numbers, e.g. 0,7,5.".to_owned(),
                    ],
                );
                return AnswerOutcome::Incorrect;
            }
        };

        match &self.state.solution_path {
            Some(solution) if *solution == submitted => {
                self.history.push(&self.state);
                self.state.current_edges = path_edges(solution);
                self.state.phase = StepPhase::Done;
                self.state.narration = Narration::for_phase(StepPhase::Done, Vec::new());
                debug!(from = "Arrived", to = "Done", "answer accepted");
                AnswerOutcome::Correct
            }
            _ => {
                self.state.narration = Narration::for_phase(
                    StepPhase::Arrived,
                    vec!["Sorry, your solution is incorrect. Please try again.".to_owned()],
                );
                AnswerOutcome::Incorrect
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// `Init -> Expand`: seed the start row and visit the start node.
    fn initialize(&mut self) -> Result<(), StepError> {
        validate_endpoints(&self.graph, self.start, self.target)?;
        self.history.push(&self.state);

        self.state
            .table
            .set_cost(self.start, Cost::ZERO, Some(self.start))?;
        self.state.visited.push(self.start);
        self.state.current_node = Some(self.start);
        self.state.phase = StepPhase::Expand;
        self.state.narration = Narration::for_phase(
            StepPhase::Expand,
            vec![format!(
                "First set the distance to the start node {} to 0.",
                self.graph.display_name(self.start)
            )],
        );
        debug!(from = "Init", to = "Expand", start = %self.start, "seeded start row");
        Ok(())
    }

    /// `Expand -> SelectNext`: examine every unvisited neighbor of the
    /// current node, recording each examined edge whether or not the
    /// candidate cost improved the table.
    fn expand(&mut self) -> Result<(), StepError> {
        let current = self.state.current_node.ok_or_else(|| StepError::Internal {
            message: "no active node in the visit phase".into(),
        })?;
        let current_cost = self
            .state
            .table
            .get(current)
            .ok_or(CoreError::NodeNotFound { id: current })?
            .cost;

        self.history.push(&self.state);

        for neighbor in self.graph.neighbors(current) {
            if self.state.visited.contains(&neighbor) {
                continue;
            }
            let weight = self
                .graph
                .weight(current, neighbor)
                .ok_or(CoreError::NodeNotFound { id: neighbor })?;
            let candidate = current_cost + weight;
            let known = self
                .state
                .table
                .get(neighbor)
                .ok_or(CoreError::NodeNotFound { id: neighbor })?
                .cost;
            // Strict <: an equal-cost alternative does not steal the
            // predecessor slot.
            if candidate < known {
                self.state
                    .table
                    .set_cost(neighbor, candidate, Some(current))?;
            }
            self.state
                .current_edges
                .push((current.min(neighbor), current.max(neighbor)));
        }

        let mut lines = vec!["Now look at the possible neighbours.".to_owned()];
        let already_visited: Vec<NodeId> = self
            .state
            .visited
            .iter()
            .copied()
            .filter(|&node| node != current)
            .collect();
        if !already_visited.is_empty() {
            lines.push(format!(
                "We will leave {} out as we have already visited them.",
                self.name_list(&already_visited)
            ));
        }
        lines.push(
            "Let's calculate the cumulative distance to every neighbour and compare it to the table."
                .to_owned(),
        );
        lines.push(
            "If the distance is lower than what is already in the table we update it, otherwise it stays."
                .to_owned(),
        );
        lines.push("The weights on the edges are hidden, so use the table below.".to_owned());

        self.state.phase = StepPhase::SelectNext;
        self.state.narration = Narration::for_phase(StepPhase::SelectNext, lines);
        debug!(from = "Expand", to = "SelectNext", current = %current, "examined neighbors");
        Ok(())
    }

    /// `SelectNext -> Expand | Arrived`: visit the cheapest unvisited node.
    fn select_next(&mut self) -> Result<(), StepError> {
        // Validate before pushing so a frontier violation halts the
        // transition with state and history untouched.
        let next = match self.state.table.min_unvisited(&self.state.visited) {
            Ok(next) => next,
            Err(err) => {
                error!(%err, "frontier exhausted in a non-terminal phase");
                return Err(err.into());
            }
        };

        self.history.push(&self.state);
        self.state.current_edges.clear();
        self.state.visited.push(next);
        self.state.current_node = Some(next);

        if next == self.target {
            match checker::shortest_path(&self.graph, self.start, self.target) {
                Ok(path) => self.state.solution_path = Some(path),
                Err(err) => {
                    // Disconnected user graphs are never rejected up front,
                    // so arriving without a usable path stays survivable.
                    warn!(%err, "target selected without a usable path");
                    self.state.solution_path = None;
                }
            }
            self.state.phase = StepPhase::Arrived;
            self.state.narration = Narration::for_phase(
                StepPhase::Arrived,
                vec![
                    "We have now arrived at our target node, so the shortest possible distance to it is found."
                        .to_owned(),
                    "Enter your solution for the fastest path below. If it is correct you will see the path on the graph."
                        .to_owned(),
                ],
            );
            debug!(from = "SelectNext", to = "Arrived", target = %next, "target reached");
        } else {
            let name = self.graph.display_name(next);
            self.state.phase = StepPhase::Expand;
            self.state.narration = Narration::for_phase(
                StepPhase::Expand,
                vec![
                    format!(
                        "You can see that {name} has the shortest known distance, so {name} becomes our new node."
                    ),
                    format!("{name} is not our target node, so we continue and repeat the previous step."),
                ],
            );
            debug!(from = "SelectNext", to = "Expand", next = %next, "new current node");
        }
        Ok(())
    }

    /// `Done -> Done`: idempotent re-render of the final highlight.
    fn redraw_done(&mut self) {
        if let Some(path) = self.state.solution_path.clone() {
            self.state.current_edges = path_edges(&path);
        }
        self.state.narration = Narration::for_phase(StepPhase::Done, Vec::new());
    }

    fn name_list(&self, nodes: &[NodeId]) -> String {
        nodes
            .iter()
            .map(|&node| self.graph.display_name(node))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Normalized edge pairs along a path.
fn path_edges(path: &[NodeId]) -> EdgeSet {
    path.windows(2)
        .map(|pair| (pair[0].min(pair[1]), pair[0].max(pair[1])))
        .collect()
}

fn validate_endpoints(
    graph: &RouteGraph,
    start: NodeId,
    target: NodeId,
) -> Result<(), StepError> {
    let node_count = graph.node_count();
    if !graph.contains(start) {
        return Err(StepError::InvalidStartNode {
            id: start,
            node_count,
        });
    }
    if !graph.contains(target) {
        return Err(StepError::InvalidTargetNode {
            id: target,
            node_count,
        });
    }
    if start == target {
        return Err(StepError::EndpointsEqual { id: start });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{self, fixed_example, GraphSource};
    use pathlab_core::RouteGraph;
    use proptest::prelude::*;

    fn ids(raw: &[u32]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    fn triangle() -> RouteGraph {
        RouteGraph::from_weighted_edges(&[(0, 1, 10), (1, 2, 10), (2, 0, 20)]).unwrap()
    }

    /// Advances until the stepper reaches `Arrived`, with a safety bound.
    fn run_to_arrival(stepper: &mut Stepper) {
        for _ in 0..10 * stepper.graph().node_count() + 10 {
            if stepper.state().phase == StepPhase::Arrived {
                return;
            }
            stepper.advance().unwrap();
        }
        panic!("stepper never arrived at the target");
    }

    #[test]
    fn endpoints_are_validated_on_construction() {
        let graph = triangle();
        assert!(matches!(
            Stepper::new(graph.clone(), NodeId(9), NodeId(1)),
            Err(StepError::InvalidStartNode { id: NodeId(9), .. })
        ));
        assert!(matches!(
            Stepper::new(graph.clone(), NodeId(0), NodeId(7)),
            Err(StepError::InvalidTargetNode { id: NodeId(7), .. })
        ));
        assert!(matches!(
            Stepper::new(graph, NodeId(1), NodeId(1)),
            Err(StepError::EndpointsEqual { id: NodeId(1) })
        ));
    }

    #[test]
    fn init_seeds_the_start_row() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        stepper.advance().unwrap();

        let state = stepper.state();
        assert_eq!(state.phase, StepPhase::Expand);
        assert_eq!(state.current_node, Some(NodeId(0)));
        assert_eq!(state.visited, ids(&[0]));
        let row = state.table.get(NodeId(0)).unwrap();
        assert_eq!(row.cost, Cost::ZERO);
        assert_eq!(row.predecessor, Some(NodeId(0)));
        assert_eq!(stepper.history_depth(), 1);
    }

    #[test]
    fn expand_records_edges_that_did_not_improve_the_table() {
        let mut stepper = Stepper::new(triangle(), NodeId(0), NodeId(2)).unwrap();
        stepper.advance().unwrap(); // Init -> Expand
        stepper.advance().unwrap(); // Expand from 0
        stepper.advance().unwrap(); // SelectNext -> 1
        stepper.advance().unwrap(); // Expand from 1

        let state = stepper.state();
        // Examining 2 via 1 costs 20, equal to the table entry: no update,
        // but the edge is still highlighted.
        assert_eq!(state.current_edges.as_slice(), &[(NodeId(1), NodeId(2))]);
        let row = state.table.get(NodeId(2)).unwrap();
        assert_eq!(row.cost, Cost::Finite(20));
        assert_eq!(row.predecessor, Some(NodeId(0)));
    }

    #[test]
    fn triangle_arrival_keeps_the_checker_tie_break() {
        let mut stepper = Stepper::new(triangle(), NodeId(0), NodeId(2)).unwrap();
        run_to_arrival(&mut stepper);

        let state = stepper.state();
        // The stepper's table kept predecessor 0 (strict <), while the
        // checker prefers the equal-cost two-hop path: documented tie
        // ambiguity.
        assert_eq!(state.solution_path, Some(ids(&[0, 1, 2])));
        assert_eq!(state.table.get(NodeId(2)).unwrap().predecessor, Some(NodeId(0)));
    }

    #[test]
    fn fixed_example_runs_berlin_to_kiel() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        run_to_arrival(&mut stepper);

        let state = stepper.state();
        assert_eq!(state.visited, ids(&[0, 6, 7, 4, 3, 5]));
        assert_eq!(state.table.get(NodeId(5)).unwrap().cost, Cost::Finite(375));
        assert_eq!(state.solution_path, Some(ids(&[0, 7, 5])));

        // The stepper's own predecessor chain agrees (no cost ties here),
        // and the path weight matches the checker's distance.
        assert_eq!(state.table.get(NodeId(5)).unwrap().predecessor, Some(NodeId(7)));
        assert_eq!(state.table.get(NodeId(7)).unwrap().predecessor, Some(NodeId(0)));
        let weight = stepper
            .graph()
            .total_path_weight(state.solution_path.as_deref().unwrap())
            .unwrap();
        assert_eq!(weight, 375);
    }

    #[test]
    fn narration_follows_the_select_transition() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        stepper.advance().unwrap();
        stepper.advance().unwrap();
        stepper.advance().unwrap(); // SelectNext picks Potsdam (35)

        let narration = &stepper.state().narration;
        assert_eq!(narration.heading, "Step 1: Visit Nodes");
        assert!(narration.lines[0].contains("Potsdam"));
    }

    #[test]
    fn correct_answer_finishes_the_session() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        run_to_arrival(&mut stepper);

        assert_eq!(stepper.submit_answer("0,7,5"), AnswerOutcome::Correct);
        let state = stepper.state();
        assert_eq!(state.phase, StepPhase::Done);
        assert_eq!(
            state.current_edges.as_slice(),
            &[(NodeId(0), NodeId(7)), (NodeId(5), NodeId(7))]
        );
    }

    #[test]
    fn wrong_answer_stays_in_arrived_with_a_retry_message() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        run_to_arrival(&mut stepper);
        let depth = stepper.history_depth();

        assert_eq!(stepper.submit_answer("0,6,4,1,3,5"), AnswerOutcome::Incorrect);
        assert_eq!(stepper.state().phase, StepPhase::Arrived);
        assert_eq!(stepper.history_depth(), depth);
        assert!(stepper.state().narration.lines[0].contains("incorrect"));
    }

    #[test]
    fn unreadable_answer_is_an_incorrect_attempt() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        run_to_arrival(&mut stepper);

        assert_eq!(stepper.submit_answer("0, what, 5"), AnswerOutcome::Incorrect);
        assert_eq!(stepper.state().phase, StepPhase::Arrived);
    }

    #[test]
    fn answers_outside_arrived_are_ignored() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        assert_eq!(stepper.submit_answer("0,7,5"), AnswerOutcome::NotAwaitingAnswer);
        assert_eq!(stepper.state().phase, StepPhase::Init);
    }

    #[test]
    fn done_advance_is_idempotent() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        run_to_arrival(&mut stepper);
        stepper.submit_answer("0,7,5");

        let before = stepper.state().clone();
        let depth = stepper.history_depth();
        stepper.advance().unwrap();
        stepper.advance().unwrap();
        assert_eq!(*stepper.state(), before);
        assert_eq!(stepper.history_depth(), depth);
    }

    #[test]
    fn step_back_without_history_is_a_no_op() {
        let mut stepper = Stepper::new(triangle(), NodeId(0), NodeId(2)).unwrap();
        let before = stepper.state().clone();
        stepper.step_back();
        assert_eq!(*stepper.state(), before);
    }

    #[test]
    fn forward_then_backward_replays_to_the_initial_state() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        let initial = stepper.state().clone();

        run_to_arrival(&mut stepper);
        stepper.submit_answer("0,7,5");
        let depth = stepper.history_depth();
        for _ in 0..depth {
            stepper.step_back();
        }

        assert_eq!(*stepper.state(), initial);
        assert_eq!(stepper.history_depth(), 0);
    }

    #[test]
    fn set_endpoints_resets_the_session() {
        let mut stepper = Stepper::new(fixed_example(), NodeId(0), NodeId(5)).unwrap();
        run_to_arrival(&mut stepper);

        stepper.set_endpoints(NodeId(2), NodeId(6)).unwrap();
        assert_eq!(stepper.state().phase, StepPhase::Init);
        assert!(stepper.state().visited.is_empty());
        assert_eq!(stepper.history_depth(), 0);

        assert!(stepper.set_endpoints(NodeId(2), NodeId(2)).is_err());
    }

    proptest! {
        /// The full trace agrees with the independent checker: the cost the
        /// table derives for the target equals the checker's shortest
        /// distance, and the stored solution path sums to it.
        #[test]
        fn full_run_matches_the_checker(seed in 0u64..500, n in 4u32..14) {
            let source = GraphSource::Random { n, k: 3, p: 0.4 };
            let graph = provider::build(&source, seed).unwrap();
            let target = NodeId(n - 1);
            let mut stepper = Stepper::new(graph.clone(), NodeId(0), target).unwrap();
            run_to_arrival(&mut stepper);

            let expected = checker::shortest_distance(&graph, NodeId(0), target).unwrap();
            let state = stepper.state();
            prop_assert_eq!(state.table.get(target).unwrap().cost, Cost::Finite(expected));
            let path = state.solution_path.as_deref().unwrap();
            prop_assert_eq!(graph.total_path_weight(path).unwrap(), expected);
        }

        /// Costs never increase once set below ∞.
        #[test]
        fn costs_are_monotonically_non_increasing(seed in 0u64..500, n in 4u32..14) {
            let source = GraphSource::Random { n, k: 3, p: 0.4 };
            let graph = provider::build(&source, seed).unwrap();
            let mut stepper = Stepper::new(graph, NodeId(0), NodeId(n - 1)).unwrap();

            let mut previous: Vec<Cost> =
                stepper.state().table.rows().map(|(_, row)| row.cost).collect();
            for _ in 0..10 * n + 10 {
                if stepper.state().phase == StepPhase::Arrived {
                    break;
                }
                stepper.advance().unwrap();
                let current: Vec<Cost> =
                    stepper.state().table.rows().map(|(_, row)| row.cost).collect();
                for (before, after) in previous.iter().zip(&current) {
                    prop_assert!(after <= before);
                }
                previous = current;
            }
        }

        /// Any forward prefix undone step-for-step restores the exact state.
        #[test]
        fn partial_round_trip_restores_state(
            seed in 0u64..200,
            n in 4u32..12,
            forward in 1usize..12,
        ) {
            let source = GraphSource::Random { n, k: 3, p: 0.3 };
            let graph = provider::build(&source, seed).unwrap();
            let mut stepper = Stepper::new(graph, NodeId(0), NodeId(n - 1)).unwrap();

            let before = stepper.state().clone();
            let depth_before = stepper.history_depth();
            let mut taken = 0;
            for _ in 0..forward {
                if stepper.state().phase == StepPhase::Arrived {
                    break;
                }
                stepper.advance().unwrap();
                taken += 1;
            }
            for _ in 0..taken {
                stepper.step_back();
            }
            prop_assert_eq!(stepper.state(), &before);
            prop_assert_eq!(stepper.history_depth(), depth_before);
        }
    }
}
