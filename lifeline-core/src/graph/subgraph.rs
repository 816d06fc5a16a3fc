//! Immutable snapshots of the active part of a [`super::NetworkGraph`].
//!
//! Active cities are stored in identifier order and addressed by their dense
//! position in that order. Algorithms that break ties "by node identifier"
//! simply compare positions.

use std::collections::{BTreeSet, HashMap};

use super::{Edge, EdgeId, Node, NodeId};

/// A road that survives into the active subgraph.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    weight: f64,
    pub(crate) source_pos: usize,
    pub(crate) target_pos: usize,
}

impl ActiveEdge {
    /// Returns the road identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn id(&self) -> EdgeId { self.id }

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

/// One entry of a city's adjacency list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjacent {
    /// Position of the neighbouring city.
    pub neighbour: usize,
    /// Road leading to the neighbour.
    pub edge: EdgeId,
    /// Length of that road.
    pub weight: f64,
}

/// Read-only view of the active cities and roads at one point in time.
///
/// The snapshot owns its data, so later mutations of the model never leak
/// into a computation already running over it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveSubgraph {
    nodes: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    inactive: BTreeSet<NodeId>,
    edges: Vec<ActiveEdge>,
    adjacency: Vec<Vec<Adjacent>>,
}

impl ActiveSubgraph {
    pub(super) fn capture(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut active: Vec<(usize, &NodeId)> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.active)
            .map(|(slot, node)| (slot, &node.id))
            .collect();
        active.sort_by(|left, right| left.1.cmp(right.1));

        let mut slot_positions = vec![None; nodes.len()];
        for (position, (slot, _)) in active.iter().enumerate() {
            slot_positions[*slot] = Some(position);
        }

        let ordered: Vec<NodeId> = active.into_iter().map(|(_, id)| id.clone()).collect();
        let positions = ordered
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();
        let inactive = nodes
            .iter()
            .filter(|node| !node.active)
            .map(|node| node.id.clone())
            .collect();

        let mut adjacency = vec![Vec::new(); ordered.len()];
        let mut kept = Vec::new();
        for edge in edges.iter().filter(|edge| !edge.hazardous) {
            let (Some(source_pos), Some(target_pos)) =
                (slot_positions[edge.slots.0], slot_positions[edge.slots.1])
            else {
                continue;
            };
            adjacency[source_pos].push(Adjacent {
                neighbour: target_pos,
                edge: edge.id,
                weight: edge.weight,
            });
            adjacency[target_pos].push(Adjacent {
                neighbour: source_pos,
                edge: edge.id,
                weight: edge.weight,
            });
            kept.push(ActiveEdge {
                id: edge.id,
                source: edge.source.clone(),
                target: edge.target.clone(),
                weight: edge.weight,
                source_pos,
                target_pos,
            });
        }
        for list in &mut adjacency {
            list.sort_by(|left, right| {
                left.neighbour
                    .cmp(&right.neighbour)
                    .then(left.edge.cmp(&right.edge))
            });
        }

        Self {
            nodes: ordered,
            positions,
            inactive,
            edges: kept,
            adjacency,
        }
    }

    /// Returns the number of active cities.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Returns the number of active roads.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns `true` when no city is active.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the active cities in identifier order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[NodeId] { &self.nodes }

    /// Returns the active roads in identifier order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[ActiveEdge] { &self.edges }

    /// Returns the cities that were disabled when the snapshot was taken.
    #[must_use]
    #[rustfmt::skip]
    pub fn inactive_nodes(&self) -> &BTreeSet<NodeId> { &self.inactive }

    /// Returns the dense position of an active city.
    #[must_use]
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Returns the city at `position`.
    #[must_use]
    pub fn node_at(&self, position: usize) -> Option<&NodeId> {
        self.nodes.get(position)
    }

    /// Returns `true` when `id` is active in this snapshot.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    /// Returns `true` when `id` was a known city, active or not, at capture
    /// time.
    #[must_use]
    pub fn knows(&self, id: &NodeId) -> bool {
        self.contains(id) || self.inactive.contains(id)
    }

    /// Looks up an active road.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&ActiveEdge> {
        self.edges
            .binary_search_by(|edge| edge.id.cmp(&id))
            .ok()
            .map(|index| &self.edges[index])
    }

    /// Returns the roads leaving the city at `position`, ordered by
    /// neighbour position and then road id.
    #[must_use]
    pub fn neighbours(&self, position: usize) -> &[Adjacent] {
        self.adjacency.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the number of active roads touching the city at `position`.
    #[must_use]
    pub fn degree(&self, position: usize) -> usize {
        self.neighbours(position).len()
    }
}
