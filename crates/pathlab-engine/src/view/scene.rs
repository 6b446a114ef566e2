//! Drawable graph description with a deterministic layout.
//!
//! Positions are computed from `layout_seed` alone: nodes start on a
//! jittered circle and relax through a fixed number of force-directed
//! iterations (springs along edges, charge between all pairs), so the same
//! seed always yields the same picture and changing the seed untangles an
//! unlucky drawing. Coordinates land in `[-1, 1]` on both axes; scaling to
//! pixels is the renderer's job.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use pathlab_core::{NodeId, RouteGraph, Weight};

use crate::stepper::{StepPhase, StepperState};

/// Relaxation iterations. Enough to settle classroom-sized graphs.
const LAYOUT_ITERATIONS: usize = 60;

/// Initial ring radius and jitter amplitude.
const RING_RADIUS: f64 = 0.8;
const JITTER: f64 = 0.05;

/// Visual role of a node in the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// The node being expanded right now.
    Current,
    Start,
    Target,
    Visited,
    Plain,
}

/// One drawable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub role: NodeRole,
}

/// One drawable edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: Weight,
    /// Part of the active step's highlight set (or the final path).
    pub highlighted: bool,
}

/// Everything a renderer needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphScene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    /// Weights are hidden during the trace (the student must use the
    /// table) and revealed once the target is reached.
    pub weights_visible: bool,
    pub dark_mode: bool,
}

/// Builds the scene for the committed stepper state.
pub fn build_scene(
    graph: &RouteGraph,
    state: &StepperState,
    start: NodeId,
    target: NodeId,
    layout_seed: u64,
    dark_mode: bool,
) -> GraphScene {
    let positions = layout_positions(graph, layout_seed);

    let nodes = graph
        .node_ids()
        .map(|id| {
            let role = if state.current_node == Some(id) {
                NodeRole::Current
            } else if id == start {
                NodeRole::Start
            } else if id == target {
                NodeRole::Target
            } else if state.visited.contains(&id) {
                NodeRole::Visited
            } else {
                NodeRole::Plain
            };
            let (x, y) = positions[id.index()];
            SceneNode {
                id,
                name: graph.display_name(id),
                x,
                y,
                role,
            }
        })
        .collect();

    let edges = graph
        .edges()
        .into_iter()
        .map(|(a, b, weight)| SceneEdge {
            a,
            b,
            weight,
            highlighted: state.current_edges.contains(&(a, b)),
        })
        .collect();

    GraphScene {
        nodes,
        edges,
        weights_visible: matches!(state.phase, StepPhase::Arrived | StepPhase::Done),
        dark_mode,
    }
}

/// Deterministic node positions in `[-1, 1]^2` for the given seed.
pub fn layout_positions(graph: &RouteGraph, seed: u64) -> Vec<(f64, f64)> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut positions: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / n as f64;
            (
                RING_RADIUS * angle.cos() + rng.gen_range(-JITTER..=JITTER),
                RING_RADIUS * angle.sin() + rng.gen_range(-JITTER..=JITTER),
            )
        })
        .collect();
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    let edges = graph.edges();
    // Fruchterman-Reingold with the area term for a [-1,1] square.
    let ideal = (4.0 / n as f64).sqrt();
    let mut temperature = 0.1;

    for _ in 0..LAYOUT_ITERATIONS {
        let mut displacement = vec![(0.0f64, 0.0f64); n];

        // Charge: every pair repels.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-4);
                let force = ideal * ideal / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                displacement[i].0 += fx;
                displacement[i].1 += fy;
                displacement[j].0 -= fx;
                displacement[j].1 -= fy;
            }
        }

        // Springs: endpoints attract.
        for &(a, b, _) in &edges {
            let (i, j) = (a.index(), b.index());
            let dx = positions[i].0 - positions[j].0;
            let dy = positions[i].1 - positions[j].1;
            let dist = (dx * dx + dy * dy).sqrt().max(1e-4);
            let force = dist * dist / ideal;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            displacement[i].0 -= fx;
            displacement[i].1 -= fy;
            displacement[j].0 += fx;
            displacement[j].1 += fy;
        }

        for i in 0..n {
            let (dx, dy) = displacement[i];
            let norm = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = norm.min(temperature);
            positions[i].0 = (positions[i].0 + dx / norm * step).clamp(-1.0, 1.0);
            positions[i].1 = (positions[i].1 + dy / norm * step).clamp(-1.0, 1.0);
        }
        temperature *= 0.95;
    }

    positions
}
