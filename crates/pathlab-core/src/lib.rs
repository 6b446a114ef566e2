pub mod cost;
pub mod error;
pub mod graph;
pub mod id;
pub mod table;

// Re-export commonly used types
pub use cost::Cost;
pub use error::CoreError;
pub use graph::{RouteGraph, Weight};
pub use id::NodeId;
pub use table::{DistanceRow, DistanceTable};
