//! Plain-data view descriptions for presentation front-ends.
//!
//! Front-ends never touch the stepper's internals: they render a
//! [`GraphScene`], a [`TableView`], a [`Progress`] strip, and the narration
//! text, all built from committed state after a transition completes.

mod scene;
mod table;

use serde::{Deserialize, Serialize};

use crate::stepper::StepPhase;

pub use scene::{build_scene, GraphScene, NodeRole, SceneEdge, SceneNode};
pub use table::{build_table, RowMark, TableRow, TableView};

/// The four-stage progress strip shown between the step buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Stages filled in, counted from the left.
    pub filled: usize,
    /// Total stages shown.
    pub total: usize,
}

impl Progress {
    /// Progress for a phase: one stage per trace step, all four once the
    /// target is reached.
    pub fn for_phase(phase: StepPhase) -> Self {
        Progress {
            filled: (phase.index() as usize + 1).min(4),
            total: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fills_one_stage_per_step() {
        assert_eq!(Progress::for_phase(StepPhase::Init).filled, 1);
        assert_eq!(Progress::for_phase(StepPhase::Expand).filled, 2);
        assert_eq!(Progress::for_phase(StepPhase::SelectNext).filled, 3);
        assert_eq!(Progress::for_phase(StepPhase::Arrived).filled, 4);
        assert_eq!(Progress::for_phase(StepPhase::Done).filled, 4);
        assert_eq!(Progress::for_phase(StepPhase::Done).total, 4);
    }
}
