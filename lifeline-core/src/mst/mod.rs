//! Minimum-cost backbone construction.
//!
//! Kruskal's algorithm over an [`ActiveSubgraph`]: roads are scanned in
//! ascending `(weight, edge id)` order and accepted whenever they join two
//! different components. A disconnected snapshot yields a minimum spanning
//! forest, one tree per component.

pub(crate) mod union_find;

use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::{
    ActiveSubgraph,
    error::{NetworkError, Result},
    graph::{ActiveEdge, EdgeId, NodeId},
};

use self::union_find::DisjointSet;

/// A road selected for the backbone.
#[derive(Clone, Debug, PartialEq)]
pub struct MstEdge {
    edge: EdgeId,
    source: NodeId,
    target: NodeId,
    weight: f64,
}

impl MstEdge {
    fn from_active(edge: &ActiveEdge) -> Self {
        Self {
            edge: edge.id(),
            source: edge.source().clone(),
            target: edge.target().clone(),
            weight: edge.weight(),
        }
    }

    /// Returns the selected road's identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge(&self) -> EdgeId { self.edge }

    /// Returns the first endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> &NodeId { &self.source }

    /// Returns the second endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> &NodeId { &self.target }

    /// Returns the road length.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f64 { self.weight }
}

/// The output of a minimum spanning forest computation.
///
/// When the active subgraph is connected, the forest is a minimum spanning
/// tree.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimumSpanningForest {
    edges: Vec<MstEdge>,
    total_weight: f64,
    component_count: usize,
}

impl MinimumSpanningForest {
    /// Returns the selected roads in acceptance order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[MstEdge] { &self.edges }

    /// Returns the summed length of the selected roads.
    #[must_use]
    #[rustfmt::skip]
    pub fn total_weight(&self) -> f64 { self.total_weight }

    /// Returns the number of connected components spanned.
    #[must_use]
    #[rustfmt::skip]
    pub fn component_count(&self) -> usize { self.component_count }

    /// Returns `true` when the forest spans a single connected component.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        self.component_count == 1
    }

    /// Returns `true` when `edge` was selected.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.iter().any(|selected| selected.edge == edge)
    }
}

fn kruskal_order(left: &ActiveEdge, right: &ActiveEdge) -> Ordering {
    left.weight()
        .total_cmp(&right.weight())
        .then_with(|| left.id().cmp(&right.id()))
}

/// Computes a minimum spanning forest of the active subgraph.
///
/// # Errors
/// Returns [`NetworkError::EmptyGraph`] when the snapshot has no active
/// cities.
///
/// # Examples
/// ```
/// use lifeline_core::{NetworkGraph, minimum_spanning_forest};
///
/// let mut graph = NetworkGraph::new();
/// for id in ["A", "B", "C"] {
///     graph.add_node(id, id)?;
/// }
/// graph.add_edge("A", "B", 1.0)?;
/// graph.add_edge("B", "C", 2.0)?;
/// graph.add_edge("A", "C", 5.0)?;
/// let forest = minimum_spanning_forest(&graph.active_subgraph())?;
/// assert_eq!(forest.total_weight(), 3.0);
/// assert!(forest.is_tree());
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[instrument(
    name = "mst.kruskal",
    err,
    skip(subgraph),
    fields(nodes = subgraph.node_count(), edges = subgraph.edge_count()),
)]
pub fn minimum_spanning_forest(subgraph: &ActiveSubgraph) -> Result<MinimumSpanningForest> {
    let node_count = subgraph.node_count();
    if node_count == 0 {
        return Err(NetworkError::EmptyGraph);
    }

    let mut candidates: Vec<&ActiveEdge> = subgraph.edges().iter().collect();
    candidates.sort_by(|left, right| kruskal_order(left, right));

    let mut components = DisjointSet::new(node_count);
    let mut edges = Vec::with_capacity(node_count.saturating_sub(1));
    let mut total_weight = 0.0;

    for candidate in candidates {
        if components.union(candidate.source_pos, candidate.target_pos) {
            total_weight += candidate.weight();
            edges.push(MstEdge::from_active(candidate));
            if components.components() == 1 {
                break;
            }
        }
    }

    debug!(
        selected = edges.len(),
        components = components.components(),
        total_weight,
        "spanning forest computed"
    );
    #[cfg(feature = "metrics")]
    metrics::histogram!("lifeline_mst_total_weight").record(total_weight);

    Ok(MinimumSpanningForest {
        edges,
        total_weight,
        component_count: components.components(),
    })
}

#[cfg(test)]
mod property;
#[cfg(test)]
mod tests;
