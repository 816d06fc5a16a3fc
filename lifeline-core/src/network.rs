//! The call-level facade over the road network.
//!
//! [`Network`] owns the model and exposes every query and mutation. Queries
//! take `&self` and mutations `&mut self`, so a single-threaded host can
//! never interleave them. [`SharedNetwork`] is the handle for hosts that
//! share one network across threads.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, instrument};

use crate::{
    ActiveSubgraph, NetworkGraph,
    coloring::{FrequencyPlan, assign_frequencies},
    disjoint::{PathSet, find_k_disjoint_paths},
    error::{NetworkError, Result},
    failure::{FailureReport, MonitoredRoute, connected_components, simulate_failure},
    graph::{EdgeId, NodeId},
    mst::{MinimumSpanningForest, minimum_spanning_forest},
    routing::{DistanceMap, RouteOutcome, distances_from, shortest_path},
};

/// A validated road network with its control node.
///
/// Only [`crate::NetworkBuilder::build`] creates one, so every query runs
/// against a fully constructed model.
#[derive(Clone, Debug)]
pub struct Network {
    graph: NetworkGraph,
    control: Option<NodeId>,
}

impl Network {
    pub(crate) fn new(graph: NetworkGraph, control: Option<NodeId>) -> Self {
        Self { graph, control }
    }

    /// Returns the underlying model.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &NetworkGraph { &self.graph }

    /// Returns the control node, or `None` for a network without cities.
    #[must_use]
    pub fn control_node(&self) -> Option<&NodeId> {
        self.control.as_ref()
    }

    /// Takes a snapshot of the active cities and roads.
    #[must_use]
    pub fn snapshot(&self) -> ActiveSubgraph {
        self.graph.active_subgraph()
    }

    /// Returns the road joining two cities, hazardous or not.
    #[must_use]
    pub fn edge_between(&self, left: &NodeId, right: &NodeId) -> Option<EdgeId> {
        self.graph.edge_between(left, right)
    }

    /// Computes the minimum-cost backbone of the active network.
    ///
    /// # Errors
    /// Returns [`NetworkError::EmptyGraph`] when no city is active.
    ///
    /// # Examples
    /// ```
    /// use lifeline_core::scenario;
    ///
    /// let network = scenario::reference_builder().build()?;
    /// assert_eq!(network.compute_mst()?.total_weight(), 18.0);
    /// # Ok::<(), lifeline_core::NetworkError>(())
    /// ```
    pub fn compute_mst(&self) -> Result<MinimumSpanningForest> {
        minimum_spanning_forest(&self.snapshot())
    }

    /// Finds the cheapest active route between two cities.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when either city is unknown.
    pub fn shortest_path(&self, source: &NodeId, destination: &NodeId) -> Result<RouteOutcome> {
        shortest_path(&self.snapshot(), source, destination)
    }

    /// Measures the distance from `source` to every reachable city.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when `source` is unknown.
    pub fn distances_from(&self, source: &NodeId) -> Result<DistanceMap> {
        distances_from(&self.snapshot(), source)
    }

    /// Finds up to `k` edge-disjoint routes.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] or
    /// [`NetworkError::InvalidPathCount`].
    pub fn find_k_disjoint_paths(
        &self,
        source: &NodeId,
        destination: &NodeId,
        k: usize,
    ) -> Result<PathSet> {
        find_k_disjoint_paths(&self.snapshot(), source, destination, k)
    }

    /// Partitions the active cities into connected components.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        connected_components(&self.snapshot())
    }

    /// Assigns radio frequencies to the active cities.
    #[must_use]
    pub fn assign_frequencies(&self) -> FrequencyPlan {
        assign_frequencies(&self.snapshot())
    }

    /// Flags or clears a road as hazardous.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchEdge`] when `edge` is unknown.
    pub fn mark_hazard(&mut self, edge: EdgeId, hazardous: bool) -> Result<()> {
        self.graph.set_hazard(edge, hazardous).map(|_| ())
    }

    /// Enables or disables a city.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when `node` is unknown.
    pub fn set_node_active(&mut self, node: &NodeId, active: bool) -> Result<()> {
        self.graph.set_node_active(node, active).map(|_| ())
    }

    /// Disables `node` and reports the consequences, judged from the control
    /// node.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when `node` or a monitored city is
    /// unknown, and [`NetworkError::InvalidPathCount`] when the monitored
    /// pair asks for zero routes.
    ///
    /// # Examples
    /// ```
    /// use lifeline_core::{MonitoredRoute, NodeId, scenario};
    ///
    /// let mut network = scenario::reference_builder().build()?;
    /// let route = MonitoredRoute::new("0", "7", 1);
    /// let report = network.simulate_failure(&NodeId::from("4"), Some(&route))?;
    /// assert_eq!(report.components().len(), 1);
    /// let impact = report.impact().expect("route was monitored");
    /// assert_eq!(impact.primary_cost_delta(), Some(2.0));
    /// network.restore_node(&NodeId::from("4"))?;
    /// # Ok::<(), lifeline_core::NetworkError>(())
    /// ```
    pub fn simulate_failure(
        &mut self,
        node: &NodeId,
        monitored: Option<&MonitoredRoute>,
    ) -> Result<FailureReport> {
        // Without a control node there is no city at all, so `node` is
        // rejected before the fallback is ever consulted.
        let control = self.control.clone().unwrap_or_else(|| node.clone());
        simulate_failure(&mut self.graph, node, &control, monitored)
    }

    /// Re-enables a city after a simulated failure.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoSuchNode`] when `node` is unknown.
    #[instrument(name = "network.restore_node", err, skip(self), fields(node = %node))]
    pub fn restore_node(&mut self, node: &NodeId) -> Result<()> {
        let changed = self.graph.set_node_active(node, true)?;
        info!(changed, "node restored");
        Ok(())
    }
}

/// Thread-safe handle to a [`Network`].
///
/// Queries hold the read lock only while taking a snapshot and compute
/// unlocked; mutations hold the write lock for one operation.
///
/// # Examples
/// ```
/// use std::thread;
///
/// use lifeline_core::{NodeId, SharedNetwork, scenario};
///
/// let shared = SharedNetwork::new(scenario::reference_builder().build()?);
/// let reader = shared.clone();
/// let weight = thread::spawn(move || reader.compute_mst().map(|mst| mst.total_weight()))
///     .join()
///     .expect("reader thread completes")?;
/// assert_eq!(weight, 18.0);
/// shared.set_node_active(&NodeId::from("3"), false)?;
/// assert_ne!(shared.compute_mst()?.total_weight(), 18.0);
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SharedNetwork {
    inner: Arc<RwLock<Network>>,
}

impl SharedNetwork {
    /// Wraps `network` for shared use.
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            inner: Arc::new(RwLock::new(network)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Network>> {
        self.inner.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Network>> {
        self.inner.write().map_err(poisoned)
    }

    /// Takes a snapshot under the read lock.
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] when a writer panicked.
    pub fn snapshot(&self) -> Result<ActiveSubgraph> {
        Ok(self.read()?.snapshot())
    }

    /// See [`Network::compute_mst`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] or [`NetworkError::EmptyGraph`].
    pub fn compute_mst(&self) -> Result<MinimumSpanningForest> {
        minimum_spanning_forest(&self.snapshot()?)
    }

    /// See [`Network::shortest_path`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] or [`NetworkError::NoSuchNode`].
    pub fn shortest_path(&self, source: &NodeId, destination: &NodeId) -> Result<RouteOutcome> {
        shortest_path(&self.snapshot()?, source, destination)
    }

    /// See [`Network::find_k_disjoint_paths`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`], [`NetworkError::NoSuchNode`],
    /// or [`NetworkError::InvalidPathCount`].
    pub fn find_k_disjoint_paths(
        &self,
        source: &NodeId,
        destination: &NodeId,
        k: usize,
    ) -> Result<PathSet> {
        find_k_disjoint_paths(&self.snapshot()?, source, destination, k)
    }

    /// See [`Network::assign_frequencies`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] when a writer panicked.
    pub fn assign_frequencies(&self) -> Result<FrequencyPlan> {
        Ok(assign_frequencies(&self.snapshot()?))
    }

    /// See [`Network::mark_hazard`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] or [`NetworkError::NoSuchEdge`].
    pub fn mark_hazard(&self, edge: EdgeId, hazardous: bool) -> Result<()> {
        self.write()?.mark_hazard(edge, hazardous)
    }

    /// See [`Network::set_node_active`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] or [`NetworkError::NoSuchNode`].
    pub fn set_node_active(&self, node: &NodeId, active: bool) -> Result<()> {
        self.write()?.set_node_active(node, active)
    }

    /// See [`Network::simulate_failure`]. The write lock is held for the
    /// whole simulation.
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] or the simulation's own errors.
    pub fn simulate_failure(
        &self,
        node: &NodeId,
        monitored: Option<&MonitoredRoute>,
    ) -> Result<FailureReport> {
        self.write()?.simulate_failure(node, monitored)
    }

    /// See [`Network::restore_node`].
    ///
    /// # Errors
    /// Returns [`NetworkError::LockPoisoned`] or [`NetworkError::NoSuchNode`].
    pub fn restore_node(&self, node: &NodeId) -> Result<()> {
        self.write()?.restore_node(node)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> NetworkError {
    NetworkError::LockPoisoned {
        resource: "network",
    }
}

