//! Greedy search for up to `k` edge-disjoint routes.
//!
//! Each round runs Dijkstra over a [`WorkingEdgeSet`] and derives the next
//! round's set by dropping the roads just used. Every route is the cheapest
//! one left over the remaining roads, but the set as a whole is not
//! guaranteed to be the cheapest collection of `k` disjoint routes; a
//! Suurballe or min-cost-flow formulation would be needed for that.

use tracing::{Span, debug, instrument};

use crate::{
    ActiveSubgraph,
    error::{NetworkError, Result},
    graph::NodeId,
    routing::{self, Path, RouteOutcome, WorkingEdgeSet},
};

/// Up to `k` pairwise edge-disjoint routes, cheapest first.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSet {
    requested: usize,
    paths: Vec<Path>,
}

impl PathSet {
    /// Returns how many routes were asked for.
    #[must_use]
    #[rustfmt::skip]
    pub fn requested(&self) -> usize { self.requested }

    /// Returns the routes found, in discovery order.
    #[must_use]
    #[rustfmt::skip]
    pub fn paths(&self) -> &[Path] { &self.paths }

    /// Returns the first and cheapest route, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&Path> {
        self.paths.first()
    }

    /// Returns the number of routes found.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.paths.len() }

    /// Returns `true` when no route was found.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.paths.is_empty() }

    /// Returns `true` when fewer than the requested routes exist.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.paths.len() < self.requested
    }

    /// Returns `true` when not a single route exists.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Finds up to `k` edge-disjoint routes from `source` to `destination`.
///
/// Routes may share intermediate cities but never a road. When the two
/// endpoints coincide the zero-length route is returned once, since it
/// consumes no road.
///
/// # Errors
/// Returns [`NetworkError::InvalidPathCount`] when `k` is zero and
/// [`NetworkError::NoSuchNode`] when either city is unknown.
///
/// # Examples
/// ```
/// use lifeline_core::{NetworkGraph, NodeId, find_k_disjoint_paths};
///
/// let mut graph = NetworkGraph::new();
/// for id in ["A", "B", "C", "D"] {
///     graph.add_node(id, id)?;
/// }
/// graph.add_edge("A", "B", 1.0)?;
/// graph.add_edge("B", "D", 1.0)?;
/// graph.add_edge("A", "C", 2.0)?;
/// graph.add_edge("C", "D", 2.0)?;
/// let set = find_k_disjoint_paths(
///     &graph.active_subgraph(),
///     &NodeId::from("A"),
///     &NodeId::from("D"),
///     3,
/// )?;
/// assert_eq!(set.len(), 2);
/// assert!(set.is_partial());
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[instrument(
    name = "disjoint.find_paths",
    err,
    skip(subgraph),
    fields(
        source = %source,
        destination = %destination,
        found = tracing::field::Empty,
    ),
)]
pub fn find_k_disjoint_paths(
    subgraph: &ActiveSubgraph,
    source: &NodeId,
    destination: &NodeId,
    k: usize,
) -> Result<PathSet> {
    if k == 0 {
        return Err(NetworkError::InvalidPathCount { requested: k });
    }

    let mut available = WorkingEdgeSet::from_subgraph(subgraph);
    let mut paths = Vec::new();
    while paths.len() < k {
        let RouteOutcome::Found(path) =
            routing::route(subgraph, source, destination, Some(&available))?
        else {
            debug!(found = paths.len(), "no further disjoint route");
            break;
        };
        if path.edges().is_empty() {
            paths.push(path);
            break;
        }
        available = available.without(&path);
        paths.push(path);
    }

    let set = PathSet { requested: k, paths };
    Span::current().record("found", set.len());
    if set.is_partial() {
        debug!(requested = k, found = set.len(), "path set partially satisfied");
        #[cfg(feature = "metrics")]
        metrics::counter!("lifeline_partial_path_sets_total").increment(1);
    }
    Ok(set)
}

#[cfg(test)]
mod property;
