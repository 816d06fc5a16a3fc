//! Result types produced by the shortest-path engine.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{
    ActiveSubgraph,
    graph::{EdgeId, NodeId},
};

/// A walk from a source city to a destination city.
///
/// `nodes` includes both endpoints; `edges[i]` joins `nodes[i]` and
/// `nodes[i + 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    total_weight: f64,
}

impl Path {
    pub(crate) fn new(nodes: Vec<NodeId>, edges: Vec<EdgeId>, total_weight: f64) -> Self {
        debug_assert_eq!(nodes.len(), edges.len() + 1);
        Self {
            nodes,
            edges,
            total_weight,
        }
    }

    /// The zero-length path that starts and ends at `node`.
    pub(crate) fn trivial(node: NodeId) -> Self {
        Self::new(vec![node], Vec::new(), 0.0)
    }

    /// Returns the visited cities, source first.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[NodeId] { &self.nodes }

    /// Returns the roads travelled, in order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[EdgeId] { &self.edges }

    /// Returns the summed road length.
    #[must_use]
    #[rustfmt::skip]
    pub fn total_weight(&self) -> f64 { self.total_weight }

    /// Returns the number of roads travelled.
    #[must_use]
    #[rustfmt::skip]
    pub fn hop_count(&self) -> usize { self.edges.len() }

    /// Returns the starting city.
    #[must_use]
    pub fn source(&self) -> &NodeId {
        &self.nodes[0]
    }

    /// Returns the final city.
    #[must_use]
    pub fn destination(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, node) in self.nodes.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        write!(f, " (cost {})", self.total_weight)
    }
}

/// Outcome of a point-to-point route query.
///
/// An unreachable destination is an ordinary answer, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    /// The cheapest route found.
    Found(Path),
    /// No route exists over the available roads.
    Unreachable,
}

impl RouteOutcome {
    /// Returns the route when one was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::Unreachable => None,
        }
    }

    /// Consumes the outcome, returning the route when one was found.
    #[must_use]
    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::Unreachable => None,
        }
    }

    /// Returns `true` when a route was found.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Shortest distances from one source to every reachable city.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMap {
    source: NodeId,
    distances: BTreeMap<NodeId, f64>,
}

impl DistanceMap {
    pub(crate) fn new(source: NodeId, distances: BTreeMap<NodeId, f64>) -> Self {
        Self { source, distances }
    }

    /// Returns the city the distances are measured from.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> &NodeId { &self.source }

    /// Returns the distance to `node`, or `None` when it is unreachable.
    #[must_use]
    pub fn distance_to(&self, node: &NodeId) -> Option<f64> {
        self.distances.get(node).copied()
    }

    /// Iterates over reachable cities in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, f64)> {
        self.distances.iter().map(|(node, distance)| (node, *distance))
    }

    /// Returns the number of reachable cities, the source included.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.distances.len() }

    /// Returns `true` when not even the source is reachable.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.distances.is_empty() }
}

/// The roads a restricted search may still use.
///
/// Removing roads produces a new set and leaves the original untouched, so a
/// caller can hand one set to each iteration without aliasing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WorkingEdgeSet {
    edges: BTreeSet<EdgeId>,
}

impl WorkingEdgeSet {
    /// Seeds the set with every road of the snapshot.
    #[must_use]
    pub fn from_subgraph(subgraph: &ActiveSubgraph) -> Self {
        Self {
            edges: subgraph.edges().iter().map(|edge| edge.id()).collect(),
        }
    }

    /// Returns `true` when `edge` is still available.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Returns the number of available roads.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.edges.len() }

    /// Returns `true` when no road is left.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.edges.is_empty() }

    /// Returns a copy of the set without the roads `path` travels.
    #[must_use]
    pub fn without(&self, path: &Path) -> Self {
        let mut edges = self.edges.clone();
        for edge in path.edges() {
            edges.remove(edge);
        }
        Self { edges }
    }
}

impl FromIterator<EdgeId> for WorkingEdgeSet {
    fn from_iter<I: IntoIterator<Item = EdgeId>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}
