//! Styled distance-table description.
//!
//! Rows are presented the way the student reads them: sorted ascending by
//! cost (unreachable rows last, ties in id order), with the start and
//! target rows marked for the renderer to color.

use serde::{Deserialize, Serialize};

use pathlab_core::{Cost, NodeId, RouteGraph};

use crate::stepper::StepperState;

/// Renderer hint for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowMark {
    Start,
    Target,
}

/// One displayable table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub node: NodeId,
    /// Label if the graph has one, otherwise the node index as text.
    pub name: String,
    pub cost: Cost,
    /// Display name of the predecessor, empty until one is known.
    pub previous: String,
    pub mark: Option<RowMark>,
}

/// The full table description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    /// Header of the name column: "Cities" for labeled graphs, "Node"
    /// otherwise.
    pub index_title: String,
    pub rows: Vec<TableRow>,
}

/// Builds the table view for the committed stepper state.
pub fn build_table(
    graph: &RouteGraph,
    state: &StepperState,
    start: NodeId,
    target: NodeId,
) -> TableView {
    let mut rows: Vec<TableRow> = state
        .table
        .rows()
        .map(|(node, row)| {
            let mark = if node == start {
                Some(RowMark::Start)
            } else if node == target {
                Some(RowMark::Target)
            } else {
                None
            };
            TableRow {
                node,
                name: graph.display_name(node),
                cost: row.cost,
                previous: row
                    .predecessor
                    .map(|p| graph.display_name(p))
                    .unwrap_or_default(),
                mark,
            }
        })
        .collect();
    // Stable sort: equal costs keep ascending id order.
    rows.sort_by_key(|row| row.cost);

    TableView {
        index_title: if graph.has_labels() { "Cities" } else { "Node" }.to_owned(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fixed_example;
    use crate::stepper::Stepper;
    use pathlab_core::RouteGraph;

    #[test]
    fn fresh_table_keeps_id_order_and_marks_endpoints() {
        let graph = fixed_example();
        let stepper = Stepper::new(graph, NodeId(0), NodeId(5)).unwrap();
        let view = build_table(stepper.graph(), stepper.state(), NodeId(0), NodeId(5));

        assert_eq!(view.index_title, "Cities");
        assert_eq!(view.rows.len(), 8);
        // All costs are ∞, so the stable sort keeps id order.
        assert_eq!(view.rows[0].name, "Berlin");
        assert_eq!(view.rows[0].mark, Some(RowMark::Start));
        assert_eq!(view.rows[5].mark, Some(RowMark::Target));
        assert!(view.rows.iter().all(|row| row.previous.is_empty()));
    }

    #[test]
    fn rows_sort_ascending_by_cost_with_unreachable_last() {
        let graph = fixed_example();
        let mut stepper = Stepper::new(graph, NodeId(0), NodeId(5)).unwrap();
        stepper.advance().unwrap(); // cost[Berlin] = 0
        stepper.advance().unwrap(); // cost[Potsdam] = 35, cost[Schwerin] = 224

        let view = build_table(stepper.graph(), stepper.state(), NodeId(0), NodeId(5));
        assert_eq!(view.rows[0].name, "Berlin");
        assert_eq!(view.rows[0].cost, Cost::ZERO);
        assert_eq!(view.rows[1].name, "Potsdam");
        assert_eq!(view.rows[2].name, "Schwerin");
        assert_eq!(view.rows[2].previous, "Berlin");
        assert!(view.rows[3..].iter().all(|row| row.cost.is_unreachable()));
    }

    #[test]
    fn unlabeled_graphs_use_the_node_title() {
        let graph = RouteGraph::from_weighted_edges(&[(0, 1, 3)]).unwrap();
        let stepper = Stepper::new(graph, NodeId(0), NodeId(1)).unwrap();
        let view = build_table(stepper.graph(), stepper.state(), NodeId(0), NodeId(1));
        assert_eq!(view.index_title, "Node");
        assert_eq!(view.rows[0].name, "0");
    }
}
