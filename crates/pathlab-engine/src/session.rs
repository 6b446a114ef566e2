//! Single-owner session controller.
//!
//! [`Session`] is the one place all mutable trainer state lives: the
//! selected source, the generated graph, the stepper, and the display
//! options. Every external event (select a source, change an endpoint,
//! advance, step back, submit an answer) becomes exactly one synchronous
//! state update, and every user-input failure recovers locally: the
//! previously valid graph and trace stay live while the error is surfaced
//! to the caller.

use thiserror::Error;
use tracing::warn;

use pathlab_core::{NodeId, RouteGraph};

use crate::provider::{self, GraphSource, ProviderError};
use crate::stepper::{AnswerOutcome, Narration, StepError, Stepper, StepperState};
use crate::view::{build_scene, build_table, GraphScene, Progress, TableView};

/// Presentation options. Display-only: changing them never resets the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Seed for the deterministic graph layout.
    pub layout_seed: u64,
    pub dark_mode: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            layout_seed: 1,
            dark_mode: false,
        }
    }
}

/// Errors surfaced to the presentation layer. All recoverable: the session
/// stays interactive and keeps its previous state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Step(#[from] StepError),
}

/// The interactive trainer session.
#[derive(Debug)]
pub struct Session {
    source: GraphSource,
    graph_seed: u64,
    stepper: Stepper,
    options: DisplayOptions,
}

impl Session {
    /// Builds a session from a source, a generation seed, and endpoints.
    pub fn new(
        source: GraphSource,
        graph_seed: u64,
        start: NodeId,
        target: NodeId,
        options: DisplayOptions,
    ) -> Result<Self, SessionError> {
        let graph = provider::build(&source, graph_seed)?;
        let stepper = Stepper::new(graph, start, target)?;
        Ok(Session {
            source,
            graph_seed,
            stepper,
            options,
        })
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &RouteGraph {
        self.stepper.graph()
    }

    pub fn state(&self) -> &StepperState {
        self.stepper.state()
    }

    pub fn source(&self) -> &GraphSource {
        &self.source
    }

    pub fn start(&self) -> NodeId {
        self.stepper.start()
    }

    pub fn target(&self) -> NodeId {
        self.stepper.target()
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    // -----------------------------------------------------------------------
    // Graph selection events
    // -----------------------------------------------------------------------

    /// Switches to a new graph source and resets the trace.
    ///
    /// On any failure (bad parameters, malformed edge list, endpoints that
    /// do not fit the new graph) nothing changes: the previous graph keeps
    /// being displayed and the error text is surfaced.
    pub fn select_source(&mut self, source: GraphSource) -> Result<(), SessionError> {
        let graph = provider::build(&source, self.graph_seed)?;
        let stepper = Stepper::new(graph, self.stepper.start(), self.stepper.target())
            .map_err(|err| {
                warn!(%err, "new graph rejected the current endpoints");
                err
            })?;
        self.source = source;
        self.stepper = stepper;
        Ok(())
    }

    /// Changes the generation seed and regenerates the current source.
    pub fn set_graph_seed(&mut self, seed: u64) -> Result<(), SessionError> {
        let graph = provider::build(&self.source, seed)?;
        let stepper = Stepper::new(graph, self.stepper.start(), self.stepper.target())?;
        self.graph_seed = seed;
        self.stepper = stepper;
        Ok(())
    }

    /// Changes the start node and fully resets the trace.
    pub fn set_start(&mut self, start: NodeId) -> Result<(), SessionError> {
        let target = self.stepper.target();
        self.stepper.set_endpoints(start, target)?;
        Ok(())
    }

    /// Changes the target node and fully resets the trace.
    pub fn set_target(&mut self, target: NodeId) -> Result<(), SessionError> {
        let start = self.stepper.start();
        self.stepper.set_endpoints(start, target)?;
        Ok(())
    }

    pub fn set_layout_seed(&mut self, seed: u64) {
        self.options.layout_seed = seed;
    }

    pub fn set_dark_mode(&mut self, on: bool) {
        self.options.dark_mode = on;
    }

    // -----------------------------------------------------------------------
    // Step events
    // -----------------------------------------------------------------------

    pub fn advance(&mut self) -> Result<&StepperState, StepError> {
        self.stepper.advance()
    }

    pub fn step_back(&mut self) -> &StepperState {
        self.stepper.step_back()
    }

    pub fn submit_answer(&mut self, text: &str) -> AnswerOutcome {
        self.stepper.submit_answer(text)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn scene(&self) -> GraphScene {
        build_scene(
            self.stepper.graph(),
            self.stepper.state(),
            self.stepper.start(),
            self.stepper.target(),
            self.options.layout_seed,
            self.options.dark_mode,
        )
    }

    pub fn table(&self) -> TableView {
        build_table(
            self.stepper.graph(),
            self.stepper.state(),
            self.stepper.start(),
            self.stepper.target(),
        )
    }

    pub fn progress(&self) -> Progress {
        Progress::for_phase(self.stepper.state().phase)
    }

    pub fn narration(&self) -> &Narration {
        &self.stepper.state().narration
    }

    /// The visited-nodes strip, in visit order.
    pub fn visited_summary(&self) -> String {
        let visited = &self.stepper.state().visited;
        if visited.is_empty() {
            "No nodes visited yet".to_owned()
        } else {
            visited
                .iter()
                .map(|node| node.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
