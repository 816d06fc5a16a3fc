//! Fixture types for the backbone property tests.

use test_strategy::Arbitrary;

use crate::NetworkGraph;

/// Weight pattern used when generating roads.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum WeightDistribution {
    /// Weights drawn from a wide range, rarely tied.
    #[weight(3)]
    Spread,
    /// Weights drawn from `{1, 2}`, so ties dominate.
    #[weight(3)]
    Tied,
    /// Two islands with no road between them.
    #[weight(2)]
    Islands,
}

/// A generated network together with its raw road list.
#[derive(Clone, Debug)]
pub(super) struct ForestFixture {
    pub node_count: usize,
    /// `(left, right, weight)` using node positions.
    pub roads: Vec<(usize, usize, f64)>,
    pub distribution: WeightDistribution,
}

impl ForestFixture {
    /// Identifier used for the city at `position`.
    pub(super) fn city(position: usize) -> String {
        format!("n{position}")
    }

    /// Builds the model described by the fixture.
    pub(super) fn graph(&self) -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        for position in 0..self.node_count {
            graph
                .add_node(Self::city(position), Self::city(position))
                .expect("generated ids are unique");
        }
        for &(left, right, weight) in &self.roads {
            graph
                .add_edge(Self::city(left), Self::city(right), weight)
                .expect("generated roads are valid");
        }
        graph
    }
}
