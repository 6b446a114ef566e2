//! Graph providers: every way a session can obtain a weighted graph.
//!
//! A [`GraphSource`] names where the graph comes from; [`build`] turns it
//! into a validated [`RouteGraph`] or a structured [`ProviderError`]. The
//! caller (the session) recovers locally from every error: the previous
//! valid graph stays live and only the diagnostic text changes.

mod edge_list;
mod fixed;
mod random;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pathlab_core::{CoreError, RouteGraph};

pub use fixed::{fixed_example, FIXED_EXAMPLE_LABELS};

/// Default edge-list text offered to the user (a weight-tied triangle).
pub const DEFAULT_EDGE_LIST: &str = "(0,1,10),\n(1,2,10),\n(2,0,20)";

/// Where a session's graph comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphSource {
    /// Connected small-world topology with random `[1,100]` edge weights.
    Random {
        /// Node count, at least 2.
        n: u32,
        /// Ring-lattice neighbor count, `2 <= k <= n - 1`.
        k: u32,
        /// Rewiring probability in `[0, 1]`.
        p: f64,
    },
    /// The fixed 8-city labeled teaching example.
    FixedExample,
    /// User-supplied `(u,v,weight)` triples.
    EdgeList(String),
    /// CSV upload. Declared in the selection UI but never implemented.
    CsvUpload,
}

/// Errors produced while building a graph.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A generation parameter is out of range (e.g. `k > n - 1`).
    ///
    /// Surfaced to the user as a warning; no graph mutation occurs.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The edge-list text is malformed.
    #[error("invalid edge list at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// The selected source has no implementation.
    #[error("{what} is not supported")]
    Unsupported { what: &'static str },
}

impl From<CoreError> for ProviderError {
    fn from(err: CoreError) -> Self {
        ProviderError::InvalidParameter {
            message: err.to_string(),
        }
    }
}

/// Builds a graph from `source`. `seed` drives all randomness, so the same
/// source and seed always produce the same graph.
pub fn build(source: &GraphSource, seed: u64) -> Result<RouteGraph, ProviderError> {
    match source {
        GraphSource::Random { n, k, p } => random::connected_small_world(*n, *k, *p, seed),
        GraphSource::FixedExample => Ok(fixed::fixed_example()),
        GraphSource::EdgeList(text) => edge_list::build_from_text(text),
        GraphSource::CsvUpload => Err(ProviderError::Unsupported { what: "CSV upload" }),
    }
}
