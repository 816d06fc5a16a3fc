//! Radio-frequency planning with Welsh-Powell greedy colouring.
//!
//! Cities joined by an active road must not broadcast on the same
//! frequency. Cities are visited in descending degree order, ties broken by
//! identifier, and each takes the lowest frequency its already-assigned
//! neighbours leave free.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{ActiveSubgraph, graph::NodeId};

/// Frequency assignment for the active cities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyPlan {
    assignments: BTreeMap<NodeId, usize>,
    frequency_count: usize,
}

impl FrequencyPlan {
    /// Returns the frequency assigned to `node`, if it is active.
    #[must_use]
    pub fn frequency_of(&self, node: &NodeId) -> Option<usize> {
        self.assignments.get(node).copied()
    }

    /// Returns the number of distinct frequencies in use.
    #[must_use]
    #[rustfmt::skip]
    pub fn frequency_count(&self) -> usize { self.frequency_count }

    /// Iterates over `(city, frequency)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, usize)> {
        self.assignments.iter().map(|(node, frequency)| (node, *frequency))
    }

    /// Returns the number of cities covered.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.assignments.len() }

    /// Returns `true` when no city is covered.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.assignments.is_empty() }
}

/// Assigns frequencies to every active city.
///
/// # Examples
/// ```
/// use lifeline_core::{NetworkGraph, NodeId, assign_frequencies};
///
/// let mut graph = NetworkGraph::new();
/// for id in ["A", "B", "C"] {
///     graph.add_node(id, id)?;
/// }
/// graph.add_edge("A", "B", 1.0)?;
/// graph.add_edge("B", "C", 1.0)?;
/// let plan = assign_frequencies(&graph.active_subgraph());
/// assert_eq!(plan.frequency_count(), 2);
/// assert_eq!(plan.frequency_of(&NodeId::from("B")), Some(0));
/// # Ok::<(), lifeline_core::NetworkError>(())
/// ```
#[must_use]
#[instrument(name = "coloring.welsh_powell", skip(subgraph), fields(nodes = subgraph.node_count()))]
pub fn assign_frequencies(subgraph: &ActiveSubgraph) -> FrequencyPlan {
    let n = subgraph.node_count();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&left, &right| {
        subgraph
            .degree(right)
            .cmp(&subgraph.degree(left))
            .then(left.cmp(&right))
    });

    let mut assigned: Vec<Option<usize>> = vec![None; n];
    let mut taken = Vec::new();
    let mut frequency_count = 0;
    for position in order {
        taken.clear();
        taken.resize(frequency_count + 1, false);
        for adjacent in subgraph.neighbours(position) {
            if let Some(frequency) = assigned[adjacent.neighbour] {
                taken[frequency] = true;
            }
        }
        let frequency = taken.iter().position(|used| !used).unwrap_or(frequency_count);
        frequency_count = frequency_count.max(frequency + 1);
        assigned[position] = Some(frequency);
    }

    let assignments = assigned
        .into_iter()
        .enumerate()
        .filter_map(|(position, frequency)| {
            Some((subgraph.node_at(position)?.clone(), frequency?))
        })
        .collect();
    debug!(frequency_count, "frequencies assigned");
    FrequencyPlan {
        assignments,
        frequency_count,
    }
}

#[cfg(test)]
mod tests;
