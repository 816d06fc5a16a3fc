//! Node-failure simulation.
//!
//! A simulation disables one city in the model and compares the network
//! before and after: which cities remain connected to each other, which ones
//! the control node can no longer reach, and how a monitored route pair is
//! affected. The failure persists in the model until the city is restored.

use std::collections::{BTreeSet, VecDeque};

use tracing::{Span, info, instrument};

use crate::{
    ActiveSubgraph, NetworkGraph,
    disjoint::{PathSet, find_k_disjoint_paths},
    error::Result,
    graph::NodeId,
};

/// A source/destination pair whose disjoint routes a simulation tracks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitoredRoute {
    /// Route origin.
    pub source: NodeId,
    /// Route destination.
    pub destination: NodeId,
    /// Number of disjoint routes requested.
    pub k: usize,
}

impl MonitoredRoute {
    /// Creates a monitored pair.
    #[must_use]
    pub fn new(source: impl Into<NodeId>, destination: impl Into<NodeId>, k: usize) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            k,
        }
    }
}

/// How a failure changed the routes of a monitored pair.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteImpact {
    route: MonitoredRoute,
    before: PathSet,
    after: PathSet,
}

impl RouteImpact {
    /// Returns the pair that was monitored.
    #[must_use]
    #[rustfmt::skip]
    pub fn route(&self) -> &MonitoredRoute { &self.route }

    /// Returns the routes available before the failure.
    #[must_use]
    #[rustfmt::skip]
    pub fn before(&self) -> &PathSet { &self.before }

    /// Returns the routes available after the failure.
    #[must_use]
    #[rustfmt::skip]
    pub fn after(&self) -> &PathSet { &self.after }

    /// Returns how much the cheapest route's cost changed, or `None` when
    /// either side has no route at all.
    #[must_use]
    pub fn primary_cost_delta(&self) -> Option<f64> {
        let before = self.before.primary()?.total_weight();
        let after = self.after.primary()?.total_weight();
        Some(after - before)
    }

    /// Returns the change in the number of disjoint routes.
    #[must_use]
    pub fn path_count_delta(&self) -> isize {
        self.after.len() as isize - self.before.len() as isize
    }

    /// Returns `true` when no route is left after the failure.
    #[must_use]
    pub fn no_route(&self) -> bool {
        self.after.is_unreachable()
    }
}

/// Outcome of one failure simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureReport {
    failed: NodeId,
    already_inactive: bool,
    control: NodeId,
    components: Vec<Vec<NodeId>>,
    newly_unreachable: Vec<NodeId>,
    impact: Option<RouteImpact>,
}

impl FailureReport {
    /// Returns the city that was disabled.
    #[must_use]
    #[rustfmt::skip]
    pub fn failed(&self) -> &NodeId { &self.failed }

    /// Returns `true` when the city was already disabled, in which case the
    /// model was left untouched.
    #[must_use]
    #[rustfmt::skip]
    pub fn already_inactive(&self) -> bool { self.already_inactive }

    /// Returns the control node reachability was judged from.
    #[must_use]
    #[rustfmt::skip]
    pub fn control(&self) -> &NodeId { &self.control }

    /// Returns the connected components of the surviving network. Each
    /// component is sorted and components are ordered by their smallest
    /// city.
    #[must_use]
    #[rustfmt::skip]
    pub fn components(&self) -> &[Vec<NodeId>] { &self.components }

    /// Returns the cities the control node reached before the failure but
    /// not after it, the failed city excluded.
    #[must_use]
    #[rustfmt::skip]
    pub fn newly_unreachable(&self) -> &[NodeId] { &self.newly_unreachable }

    /// Returns the impact on the monitored pair, when one was given.
    #[must_use]
    pub fn impact(&self) -> Option<&RouteImpact> {
        self.impact.as_ref()
    }

    /// Returns `true` when the surviving network is split into more than one
    /// component.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        self.components.len() > 1
    }
}

/// Partitions the active cities into connected components.
///
/// Components are sorted internally and ordered by their smallest city.
#[must_use]
pub fn connected_components(subgraph: &ActiveSubgraph) -> Vec<Vec<NodeId>> {
    let mut seen = vec![false; subgraph.node_count()];
    let mut components = Vec::new();
    for start in 0..subgraph.node_count() {
        if seen[start] {
            continue;
        }
        let mut members = sweep(subgraph, start, &mut seen);
        members.sort_unstable();
        components.push(
            members
                .into_iter()
                .filter_map(|position| subgraph.node_at(position).cloned())
                .collect(),
        );
    }
    components
}

/// Returns every city reachable from `origin`, itself included. A disabled
/// or unknown origin reaches nothing.
#[must_use]
pub fn reachable_from(subgraph: &ActiveSubgraph, origin: &NodeId) -> BTreeSet<NodeId> {
    let Some(start) = subgraph.position(origin) else {
        return BTreeSet::new();
    };
    let mut seen = vec![false; subgraph.node_count()];
    sweep(subgraph, start, &mut seen)
        .into_iter()
        .filter_map(|position| subgraph.node_at(position).cloned())
        .collect()
}

/// Breadth-first sweep from `start`, marking visits in `seen`.
fn sweep(subgraph: &ActiveSubgraph, start: usize, seen: &mut [bool]) -> Vec<usize> {
    let mut members = Vec::new();
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(position) = queue.pop_front() {
        members.push(position);
        for adjacent in subgraph.neighbours(position) {
            if !seen[adjacent.neighbour] {
                seen[adjacent.neighbour] = true;
                queue.push_back(adjacent.neighbour);
            }
        }
    }
    members
}

fn monitor(subgraph: &ActiveSubgraph, route: Option<&MonitoredRoute>) -> Result<Option<PathSet>> {
    route
        .map(|route| find_k_disjoint_paths(subgraph, &route.source, &route.destination, route.k))
        .transpose()
}

/// Disables `node` and reports the consequences.
///
/// Every input is validated before the model is touched, so an error leaves
/// the model unchanged.
///
/// # Errors
/// Returns [`crate::NetworkError::NoSuchNode`] when `node`, `control`, or a
/// monitored city is unknown, and
/// [`crate::NetworkError::InvalidPathCount`] when the monitored pair asks for
/// zero routes.
#[instrument(
    name = "failure.simulate",
    err,
    skip(graph, control, monitored),
    fields(
        node = %node,
        already_inactive = tracing::field::Empty,
        components = tracing::field::Empty,
        newly_unreachable = tracing::field::Empty,
    ),
)]
pub fn simulate_failure(
    graph: &mut NetworkGraph,
    node: &NodeId,
    control: &NodeId,
    monitored: Option<&MonitoredRoute>,
) -> Result<FailureReport> {
    graph.require_node(node)?;
    graph.require_node(control)?;

    let before = graph.active_subgraph();
    let reach_before = reachable_from(&before, control);
    let routes_before = monitor(&before, monitored)?;

    let already_inactive = !graph.set_node_active(node, false)?;

    let after = graph.active_subgraph();
    let reach_after = reachable_from(&after, control);
    let routes_after = monitor(&after, monitored)?;

    let components = connected_components(&after);
    let newly_unreachable: Vec<NodeId> = reach_before
        .difference(&reach_after)
        .filter(|city| *city != node)
        .cloned()
        .collect();
    let impact = match (monitored, routes_before, routes_after) {
        (Some(route), Some(before), Some(after)) => Some(RouteImpact {
            route: route.clone(),
            before,
            after,
        }),
        _ => None,
    };

    let span = Span::current();
    span.record("already_inactive", already_inactive);
    span.record("components", components.len());
    span.record("newly_unreachable", newly_unreachable.len());
    info!(
        node = %node,
        components = components.len(),
        newly_unreachable = newly_unreachable.len(),
        "failure simulated"
    );
    #[cfg(feature = "metrics")]
    metrics::counter!("lifeline_failure_simulations_total").increment(1);

    Ok(FailureReport {
        failed: node.clone(),
        already_inactive,
        control: control.clone(),
        components,
        newly_unreachable,
        impact,
    })
}
