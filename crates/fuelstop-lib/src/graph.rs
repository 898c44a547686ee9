//! Transition graph between planning nodes.
//!
//! Every ordered pair of distinct nodes becomes a [`Transition`] carrying the
//! great-circle distance in the mode's distance unit, the travel time at the
//! carrier's speed and the fuel burned on the way. The graph is dense by
//! default; [`GraphBuildOptions::max_neighbors`] trims each node's fan-out to
//! its nearest neighbours using a KD-tree.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::carrier::CarrierParameters;
use crate::catalog::{Node, NodeKind};
use crate::mode::{DistanceUnit, TransportMode};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Directed edge between two nodes of a planning call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Index of the source node.
    pub from: usize,
    /// Index of the target node.
    pub to: usize,
    /// Great-circle distance in the mode's distance unit.
    pub distance: f64,
    /// Hours at the carrier's cruise speed.
    pub travel_time: f64,
    /// Fuel burned over `distance`, in the request's fuel unit.
    pub fuel_required: f64,
}

/// Options controlling graph construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphBuildOptions {
    /// Keep only transitions to the `k` nearest nodes of each node. The
    /// transition into the destination is always kept. `None` builds the
    /// dense graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_neighbors: Option<usize>,
}

impl GraphBuildOptions {
    pub fn dense() -> Self {
        Self::default()
    }

    pub fn nearest(k: usize) -> Self {
        Self {
            max_neighbors: Some(k),
        }
    }
}

/// Adjacency lists indexed by node position.
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    adjacency: Vec<Vec<Transition>>,
    distance_unit: DistanceUnit,
}

impl TransitionGraph {
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of directed transitions.
    pub fn transition_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing transitions of `node`, in ascending target order.
    pub fn transitions_from(&self, node: usize) -> &[Transition] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit
    }
}

/// Build the transition graph for `nodes` using the carrier's resolved
/// parameters.
pub fn build_transition_graph(
    nodes: &[Node],
    params: &CarrierParameters,
    mode: TransportMode,
    options: &GraphBuildOptions,
) -> TransitionGraph {
    let candidates = match options.max_neighbors {
        Some(k) if k + 1 < nodes.len() => nearest_candidates(nodes, k),
        _ => dense_candidates(nodes.len()),
    };

    let adjacency: Vec<Vec<Transition>> = candidates
        .into_iter()
        .enumerate()
        .map(|(from, targets)| {
            targets
                .into_iter()
                .map(|to| transition(nodes, from, to, params, mode))
                .collect()
        })
        .collect();

    let graph = TransitionGraph {
        adjacency,
        distance_unit: mode.distance_unit(),
    };
    debug!(
        nodes = graph.node_count(),
        transitions = graph.transition_count(),
        max_neighbors = ?options.max_neighbors,
        "built transition graph"
    );
    graph
}

fn transition(
    nodes: &[Node],
    from: usize,
    to: usize,
    params: &CarrierParameters,
    mode: TransportMode,
) -> Transition {
    let a = &nodes[from].coordinate;
    let b = &nodes[to].coordinate;
    let distance = match mode.distance_unit() {
        DistanceUnit::NauticalMiles => a.distance_nm(b),
        DistanceUnit::Kilometers => a.distance_km(b),
    };
    Transition {
        from,
        to,
        distance,
        travel_time: distance / params.speed,
        fuel_required: distance * params.consumption_per_distance,
    }
}

fn dense_candidates(count: usize) -> Vec<Vec<usize>> {
    (0..count)
        .map(|from| (0..count).filter(|&to| to != from).collect())
        .collect()
}

/// Target lists restricted to each node's `k` nearest neighbours, measured as
/// chord length on the unit sphere (monotonic in great-circle distance).
fn nearest_candidates(nodes: &[Node], k: usize) -> Vec<Vec<usize>> {
    let destination = nodes
        .iter()
        .position(|node| node.kind == NodeKind::Destination);

    let points: Vec<[f64; 3]> = nodes
        .iter()
        .map(|node| node.coordinate.unit_vector())
        .collect();

    let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
    for (index, point) in points.iter().enumerate() {
        tree.add(point, index);
    }

    points
        .iter()
        .enumerate()
        .map(|(from, point)| {
            // One extra slot because the node itself is always its own nearest.
            let mut targets: Vec<usize> = tree
                .nearest_n::<SquaredEuclidean>(point, k + 1)
                .into_iter()
                .map(|neighbour| neighbour.item)
                .filter(|&to| to != from)
                .take(k)
                .collect();

            if let Some(dest) = destination {
                if dest != from && !targets.contains(&dest) {
                    targets.push(dest);
                }
            }
            targets.sort_unstable();
            targets
        })
        .collect()
}
