//! Path cost arithmetic with an explicit "unreachable" value.
//!
//! Distance table rows start at [`Cost::Unreachable`] (the ∞ every student
//! writes into the first column) and only ever decrease as the trace
//! progresses. `Unreachable` compares greater than every finite cost, so
//! the minimum search and the relaxation comparison need no special cases.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::graph::Weight;

/// Best known cost to reach a node from the start.
///
/// Variant order matters: the derived `Ord` makes every `Finite` cost
/// compare less than `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// A concrete accumulated cost.
    Finite(u64),
    /// No path found yet (∞).
    Unreachable,
}

impl Cost {
    /// Cost of the start node itself.
    pub const ZERO: Cost = Cost::Finite(0);

    /// Returns the finite value, or `None` for `Unreachable`.
    pub fn finite(self) -> Option<u64> {
        match self {
            Cost::Finite(value) => Some(value),
            Cost::Unreachable => None,
        }
    }

    /// True when no path has been found yet.
    pub fn is_unreachable(self) -> bool {
        matches!(self, Cost::Unreachable)
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::Unreachable
    }
}

/// Extends a cost by one edge. `Unreachable` absorbs the addition, and
/// finite additions saturate, so a disconnected graph can never overflow
/// the accumulator.
impl Add<Weight> for Cost {
    type Output = Cost;

    fn add(self, weight: Weight) -> Cost {
        match self {
            Cost::Finite(value) => Cost::Finite(value.saturating_add(u64::from(weight))),
            Cost::Unreachable => Cost::Unreachable,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(value) => write!(f, "{}", value),
            Cost::Unreachable => write!(f, "∞"),
        }
    }
}
