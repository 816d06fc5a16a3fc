//! Dijkstra shortest paths over an [`ActiveSubgraph`].
//!
//! The frontier is a binary heap ordered by `(distance, node position)`, so
//! equal-distance entries pop in node-identifier order. Relaxation only
//! replaces a predecessor on a strictly shorter distance, which keeps the
//! first-discovered route among equals. Together these make every answer
//! deterministic for a given snapshot.

mod types;

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BinaryHeap},
};

use tracing::{Span, debug, instrument};

use crate::{
    ActiveSubgraph,
    error::{NetworkError, Result},
    graph::{EdgeId, NodeId},
};

pub use self::types::{DistanceMap, Path, RouteOutcome, WorkingEdgeSet};

/// Heap entry. Ordering is reversed so [`BinaryHeap`] pops the closest city,
/// and the lowest position among equals, first.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    distance: f64,
    position: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

struct Search {
    distance: Vec<Option<f64>>,
    previous: Vec<Option<(usize, EdgeId)>>,
}

impl Search {
    fn run(
        subgraph: &ActiveSubgraph,
        source: usize,
        target: Option<usize>,
        available: Option<&WorkingEdgeSet>,
    ) -> Self {
        let n = subgraph.node_count();
        let mut distance = vec![None; n];
        let mut previous = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        distance[source] = Some(0.0);
        heap.push(Frontier {
            distance: 0.0,
            position: source,
        });

        while let Some(Frontier {
            distance: reached,
            position,
        }) = heap.pop()
        {
            if settled[position] {
                continue;
            }
            settled[position] = true;
            if target == Some(position) {
                break;
            }
            for adjacent in subgraph.neighbours(position) {
                if available.is_some_and(|set| !set.contains(adjacent.edge)) {
                    continue;
                }
                let candidate = reached + adjacent.weight;
                let improves = distance[adjacent.neighbour].is_none_or(|known| candidate < known);
                if improves {
                    distance[adjacent.neighbour] = Some(candidate);
                    previous[adjacent.neighbour] = Some((position, adjacent.edge));
                    heap.push(Frontier {
                        distance: candidate,
                        position: adjacent.neighbour,
                    });
                }
            }
        }

        Self { distance, previous }
    }

    fn path_to(&self, subgraph: &ActiveSubgraph, target: usize) -> Option<Path> {
        let total_weight = self.distance[target]?;
        let mut positions = vec![target];
        let mut edges = Vec::new();
        let mut cursor = target;
        while let Some((parent, edge)) = self.previous[cursor] {
            positions.push(parent);
            edges.push(edge);
            cursor = parent;
        }
        positions.reverse();
        edges.reverse();
        let nodes = positions
            .into_iter()
            .filter_map(|position| subgraph.node_at(position).cloned())
            .collect();
        Some(Path::new(nodes, edges, total_weight))
    }
}

/// Maps a city to its snapshot position. Known but inactive cities resolve
/// to `None`; unknown cities are an error.
fn resolve(subgraph: &ActiveSubgraph, id: &NodeId) -> Result<Option<usize>> {
    match subgraph.position(id) {
        Some(position) => Ok(Some(position)),
        None if subgraph.knows(id) => Ok(None),
        None => Err(NetworkError::NoSuchNode { id: id.clone() }),
    }
}

pub(crate) fn route(
    subgraph: &ActiveSubgraph,
    source: &NodeId,
    destination: &NodeId,
    available: Option<&WorkingEdgeSet>,
) -> Result<RouteOutcome> {
    let from = resolve(subgraph, source)?;
    let to = resolve(subgraph, destination)?;
    let (Some(from), Some(to)) = (from, to) else {
        return Ok(RouteOutcome::Unreachable);
    };
    if from == to {
        return Ok(RouteOutcome::Found(Path::trivial(source.clone())));
    }
    let search = Search::run(subgraph, from, Some(to), available);
    Ok(search
        .path_to(subgraph, to)
        .map_or(RouteOutcome::Unreachable, RouteOutcome::Found))
}

/// Finds the cheapest route between two cities over the active roads.
///
/// # Errors
/// Returns [`NetworkError::NoSuchNode`] when either city is unknown. A
/// disabled endpoint, or one cut off by hazards, yields
/// [`RouteOutcome::Unreachable`].
///
/// # Examples
/// ```
/// use lifeline_core::{NetworkGraph, NodeId, shortest_path};
///
/// let mut graph = NetworkGraph::new();
/// for id in ["A", "B", "C"] {
///     graph.add_node(id, id)?;
/// }
/// graph.add_edge("A", "B", 1.0)?;
/// graph.add_edge("B", "C", 1.0)?;
/// graph.add_edge("A", "C", 5.0)?;
/// let outcome = shortest_path(&graph.active_subgraph(), &NodeId::from("A"), &NodeId::from("C"))?;
/// let path = outcome.path().expect("C is reachable");
/// assert_eq!(path.total_weight(), 2.0);
/// assert_eq!(path.nodes().len(), 3);
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[instrument(
    name = "routing.shortest_path",
    err,
    skip(subgraph),
    fields(
        source = %source,
        destination = %destination,
        reachable = tracing::field::Empty,
    ),
)]
pub fn shortest_path(
    subgraph: &ActiveSubgraph,
    source: &NodeId,
    destination: &NodeId,
) -> Result<RouteOutcome> {
    let outcome = route(subgraph, source, destination, None)?;
    Span::current().record("reachable", outcome.is_reachable());
    Ok(outcome)
}

/// Like [`shortest_path`], but only roads in `available` may be used.
///
/// # Errors
/// Returns [`NetworkError::NoSuchNode`] when either city is unknown.
pub fn shortest_path_within(
    subgraph: &ActiveSubgraph,
    source: &NodeId,
    destination: &NodeId,
    available: &WorkingEdgeSet,
) -> Result<RouteOutcome> {
    route(subgraph, source, destination, Some(available))
}

/// Computes the distance from `source` to every city it can reach.
///
/// A disabled source reaches nothing, not even itself.
///
/// # Errors
/// Returns [`NetworkError::NoSuchNode`] when `source` is unknown.
#[instrument(name = "routing.distances", err, skip(subgraph), fields(source = %source))]
pub fn distances_from(subgraph: &ActiveSubgraph, source: &NodeId) -> Result<DistanceMap> {
    let Some(from) = resolve(subgraph, source)? else {
        debug!("source is disabled");
        return Ok(DistanceMap::new(source.clone(), BTreeMap::new()));
    };
    let search = Search::run(subgraph, from, None, None);
    let distances = search
        .distance
        .iter()
        .enumerate()
        .filter_map(|(position, distance)| {
            let distance = (*distance)?;
            Some((subgraph.node_at(position)?.clone(), distance))
        })
        .collect();
    Ok(DistanceMap::new(source.clone(), distances))
}
