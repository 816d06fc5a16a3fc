//! The road-network model.
//!
//! [`NetworkGraph`] owns every city and road. Cities are never removed, only
//! deactivated; roads are never removed, only flagged as hazardous. Queries
//! never read the raw edge list: they run over an [`ActiveSubgraph`]
//! snapshot taken with [`NetworkGraph::active_subgraph`], so there is no
//! cached "active" state that could go stale after a mutation.

mod subgraph;

use std::{collections::HashMap, fmt, sync::Arc};

use tracing::debug;

use crate::error::{InvalidEdgeReason, NetworkError, Result};

pub use self::subgraph::{ActiveEdge, ActiveSubgraph, Adjacent};

/// Stable, unique identifier of a city.
///
/// # Examples
/// ```
/// use lifeline_core::NodeId;
///
/// let id = NodeId::from("Harbour");
/// assert_eq!(id.as_str(), "Harbour");
/// assert!(NodeId::from("A") < NodeId::from("B"));
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates an identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a road, assigned densely in insertion order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Wraps a raw edge index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw edge index.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A city in the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    label: String,
    active: bool,
}

impl Node {
    /// Returns the city's identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn id(&self) -> &NodeId { &self.id }

    /// Returns the display label.
    #[must_use]
    #[rustfmt::skip]
    pub fn label(&self) -> &str { &self.label }

    /// Returns `false` once the city has been disabled.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_active(&self) -> bool { self.active }
}

/// An undirected road between two cities.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    weight: f64,
    hazardous: bool,
    slots: (usize, usize),
}

impl Edge {
    /// Returns the road identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn id(&self) -> EdgeId { self.id }

    /// Returns the first endpoint, as supplied when the road was added.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> &NodeId { &self.source }

    /// Returns the second endpoint, as supplied when the road was added.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> &NodeId { &self.target }

    /// Returns the road length.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f64 { self.weight }

    /// Returns `true` while the road is flagged as hazardous.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_hazardous(&self) -> bool { self.hazardous }

    /// Returns `true` when `node` is one of the road's endpoints.
    #[must_use]
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// Owner of all cities and roads, plus their hazard and active flags.
///
/// # Examples
/// ```
/// use lifeline_core::NetworkGraph;
///
/// let mut graph = NetworkGraph::new();
/// graph.add_node("A", "Alpha")?;
/// graph.add_node("B", "Bravo")?;
/// let road = graph.add_edge("A", "B", 2.5)?;
/// graph.set_hazard(road, true)?;
/// assert_eq!(graph.active_subgraph().edge_count(), 0);
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    slots: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    pairs: HashMap<(usize, usize), EdgeId>,
}

impl NetworkGraph {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an active city.
    ///
    /// # Errors
    /// Returns [`NetworkError::DuplicateNode`] when `id` is already present.
    pub fn add_node(&mut self, id: impl Into<NodeId>, label: impl Into<String>) -> Result<()> {
        let id = id.into();
        if self.slots.contains_key(&id) {
            return Err(NetworkError::DuplicateNode { id });
        }
        self.slots.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id,
            label: label.into(),
            active: true,
        });
        Ok(())
    }

    /// Adds an undirected road and returns its identifier.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidEdge`] for self-loops or unknown
    /// endpoints, [`NetworkError::InvalidWeight`] when `weight` is not
    /// positive and finite, and [`NetworkError::DuplicateEdge`] when the pair
    /// is already joined. Duplicates are rejected rather than merged.
    pub fn add_edge(
        &mut self,
        left: impl Into<NodeId>,
        right: impl Into<NodeId>,
        weight: f64,
    ) -> Result<EdgeId> {
        let left = left.into();
        let right = right.into();
        let invalid = |reason| NetworkError::InvalidEdge {
            left: left.clone(),
            right: right.clone(),
            reason,
        };

        if left == right {
            return Err(invalid(InvalidEdgeReason::SelfLoop));
        }
        let left_slot = *self
            .slots
            .get(&left)
            .ok_or_else(|| invalid(InvalidEdgeReason::UnknownLeft))?;
        let right_slot = *self
            .slots
            .get(&right)
            .ok_or_else(|| invalid(InvalidEdgeReason::UnknownRight))?;

        if !(weight.is_finite() && weight > 0.0) {
            return Err(NetworkError::InvalidWeight {
                left,
                right,
                weight,
            });
        }

        let key = canonical_pair(left_slot, right_slot);
        if let Some(&existing) = self.pairs.get(&key) {
            return Err(NetworkError::DuplicateEdge {
                left,
                right,
                existing,
            });
        }

        let id = EdgeId::new(self.edges.len());
        self.pairs.insert(key, id);
        self.edges.push(Edge {
            id,
            source: left,
            target: right,
            weight,
            hazardous: false,
            slots: (left_slot, right_slot),
        });
        Ok(id)
    }

    /// Sets or clears the hazard flag on a road. Returns `true` when the flag
    /// changed.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchEdge`] when `edge` is unknown.
    pub fn set_hazard(&mut self, edge: EdgeId, hazardous: bool) -> Result<bool> {
        let road = self
            .edges
            .get_mut(edge.index())
            .ok_or(NetworkError::NoSuchEdge { edge })?;
        let changed = road.hazardous != hazardous;
        road.hazardous = hazardous;
        debug!(edge = %edge, hazardous, changed, "hazard flag updated");
        Ok(changed)
    }

    /// Enables or disables a city. Returns `true` when the flag changed.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when `id` is unknown.
    pub fn set_node_active(&mut self, id: &NodeId, active: bool) -> Result<bool> {
        let slot = self.slot(id)?;
        let node = &mut self.nodes[slot];
        let changed = node.active != active;
        node.active = active;
        debug!(node = %id, active, changed, "node state updated");
        Ok(changed)
    }

    /// Looks up a city.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.slots.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Looks up a road.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(edge.index())
    }

    /// Returns the road joining `left` and `right`, in either direction.
    #[must_use]
    pub fn edge_between(&self, left: &NodeId, right: &NodeId) -> Option<EdgeId> {
        let left = *self.slots.get(left)?;
        let right = *self.slots.get(right)?;
        self.pairs.get(&canonical_pair(left, right)).copied()
    }

    /// Returns `true` when `id` names a city, active or not.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.slots.contains_key(id)
    }

    /// Returns every city in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[Node] { &self.nodes }

    /// Returns every road in identifier order, hazardous or not.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the number of cities.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Returns the number of roads.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Takes an immutable snapshot of the active cities and roads.
    ///
    /// A road is active when it is not hazardous and both endpoints are
    /// active.
    #[must_use]
    pub fn active_subgraph(&self) -> ActiveSubgraph {
        ActiveSubgraph::capture(&self.nodes, &self.edges)
    }

    /// Ensures `id` names a known city.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when it does not.
    pub fn require_node(&self, id: &NodeId) -> Result<()> {
        self.slot(id).map(|_| ())
    }

    fn slot(&self, id: &NodeId) -> Result<usize> {
        self.slots
            .get(id)
            .copied()
            .ok_or_else(|| NetworkError::NoSuchNode { id: id.clone() })
    }
}

fn canonical_pair(left: usize, right: usize) -> (usize, usize) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}
