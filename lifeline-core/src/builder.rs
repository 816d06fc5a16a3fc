//! Builder for [`Network`] instances.
//!
//! Cities and roads are recorded as they are declared and validated together
//! when [`NetworkBuilder::build`] runs, so a half-built network is never
//! observable.

use crate::{
    NetworkGraph,
    error::{NetworkError, Result},
    graph::NodeId,
    network::Network,
};

/// Declares cities, roads, and the control node of a [`Network`].
///
/// # Examples
/// ```
/// use lifeline_core::{NetworkBuilder, NodeId};
///
/// let network = NetworkBuilder::new()
///     .with_node("A", "Alpha")
///     .with_node("B", "Bravo")
///     .with_edge("A", "B", 3.0)
///     .with_control_node("B")
///     .build()?;
/// assert_eq!(network.control_node(), Some(&NodeId::from("B")));
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<(NodeId, String)>,
    edges: Vec<(NodeId, NodeId, f64)>,
    control: Option<NodeId>,
}

impl NetworkBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a city.
    #[must_use]
    pub fn with_node(mut self, id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        self.nodes.push((id.into(), label.into()));
        self
    }

    /// Declares a road between two declared cities.
    #[must_use]
    pub fn with_edge(
        mut self,
        left: impl Into<NodeId>,
        right: impl Into<NodeId>,
        weight: f64,
    ) -> Self {
        self.edges.push((left.into(), right.into(), weight));
        self
    }

    /// Chooses the city that failure reports judge reachability from.
    ///
    /// Defaults to the first declared city.
    #[must_use]
    pub fn with_control_node(mut self, id: impl Into<NodeId>) -> Self {
        self.control = Some(id.into());
        self
    }

    /// Returns the number of declared cities.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when `id` has been declared.
    #[must_use]
    pub fn declares(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|(node, _)| node == id)
    }

    /// Builds only the underlying model, without a control node.
    ///
    /// # Errors
    /// Returns the first [`NetworkError`] raised by
    /// [`NetworkGraph::add_node`] or [`NetworkGraph::add_edge`], in
    /// declaration order.
    pub fn build_graph(&self) -> Result<NetworkGraph> {
        let mut graph = NetworkGraph::new();
        for (id, label) in &self.nodes {
            graph.add_node(id.clone(), label.clone())?;
        }
        for (left, right, weight) in &self.edges {
            graph.add_edge(left.clone(), right.clone(), *weight)?;
        }
        Ok(graph)
    }

    /// Validates the declarations and constructs a [`Network`].
    ///
    /// # Errors
    /// Returns [`NetworkError::DuplicateNode`], [`NetworkError::InvalidEdge`],
    /// [`NetworkError::InvalidWeight`], or [`NetworkError::DuplicateEdge`]
    /// for bad declarations, and [`NetworkError::NoSuchNode`] when the
    /// control node was never declared.
    pub fn build(self) -> Result<Network> {
        let graph = self.build_graph()?;
        let control = match self.control {
            Some(control) if graph.contains_node(&control) => Some(control),
            Some(control) => return Err(NetworkError::NoSuchNode { id: control }),
            None => self.nodes.into_iter().next().map(|(id, _)| id),
        };
        Ok(Network::new(graph, control))
    }
}
