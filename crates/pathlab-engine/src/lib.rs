//! Stepwise Dijkstra trainer engine.
//!
//! The engine turns a validated weighted graph into a human-legible trace
//! of Dijkstra's algorithm: one logical step per external event, exactly as
//! a student would run it on paper. Layers, leaves first:
//!
//! - [`provider`]: builds graphs from a seeded random small-world topology,
//!   the fixed teaching example, or user-supplied edge-list text.
//! - [`stepper`]: the five-phase state machine over the distance table,
//!   with a snapshot history stack for stepping backward.
//! - [`checker`]: an independent priority-queue Dijkstra used to validate
//!   user-submitted answers and to draw the final path.
//! - [`view`]: plain-data scene/table/progress descriptions consumed by
//!   presentation front-ends.
//! - [`session`]: the single-owner controller tying the pieces together;
//!   every external event becomes one synchronous state update.

pub mod checker;
pub mod provider;
pub mod session;
pub mod stepper;
pub mod view;

pub use checker::CheckError;
pub use provider::{GraphSource, ProviderError};
pub use session::{DisplayOptions, Session, SessionError};
pub use stepper::{AnswerOutcome, StepError, StepPhase, Stepper, StepperState};
