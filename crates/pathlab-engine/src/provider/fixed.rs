//! The fixed teaching example: eight German cities with fixed distances.
//!
//! Deterministic by construction, so every classroom run of the example
//! produces the same table and the same solution path.

use pathlab_core::{NodeId, RouteGraph};

/// City labels, indexed by node id.
pub const FIXED_EXAMPLE_LABELS: [&str; 8] = [
    "Berlin",
    "Bremen",
    "Düsseldorf",
    "Hamburg",
    "Hannover",
    "Kiel",
    "Potsdam",
    "Schwerin",
];

/// Fixed weighted edges of the example.
const FIXED_EXAMPLE_EDGES: [(u32, u32, u32); 10] = [
    (0, 6, 35),
    (0, 7, 224),
    (1, 2, 291),
    (1, 3, 128),
    (1, 4, 137),
    (2, 4, 292),
    (3, 5, 99),
    (3, 7, 112),
    (4, 6, 270),
    (5, 7, 151),
];

/// Builds the example graph.
pub fn fixed_example() -> RouteGraph {
    let mut graph = RouteGraph::with_labeled_nodes(FIXED_EXAMPLE_LABELS);
    for (u, v, weight) in FIXED_EXAMPLE_EDGES {
        graph
            .add_edge(NodeId(u), NodeId(v), weight)
            .expect("fixed example edge set is valid");
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_has_eight_labeled_cities() {
        let graph = fixed_example();
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 10);
        assert!(graph.has_labels());
        assert_eq!(graph.label(NodeId(0)), Some("Berlin"));
        assert_eq!(graph.label(NodeId(5)), Some("Kiel"));
    }

    #[test]
    fn example_is_connected() {
        assert!(fixed_example().is_connected());
    }

    #[test]
    fn known_distances_are_in_place() {
        let graph = fixed_example();
        assert_eq!(graph.weight(NodeId(0), NodeId(6)), Some(35));
        assert_eq!(graph.weight(NodeId(5), NodeId(7)), Some(151));
        assert_eq!(graph.weight(NodeId(0), NodeId(5)), None);
    }
}
