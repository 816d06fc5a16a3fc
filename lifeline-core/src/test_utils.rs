//! Shared test utilities for `lifeline-core`.

use lifeline_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{EdgeId, NetworkGraph};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// Keeps every property suite aligned on the same `PROGTEST_CASES` and
/// `LIFELINE_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a network whose cities are labelled with their own identifiers.
pub(crate) fn network_of(nodes: &[&str], roads: &[(&str, &str, f64)]) -> NetworkGraph {
    let mut graph = NetworkGraph::new();
    for id in nodes {
        graph.add_node(*id, *id).expect("fresh id");
    }
    for (left, right, weight) in roads {
        graph.add_edge(*left, *right, *weight).expect("valid road");
    }
    graph
}

/// The four-city square used across the unit tests:
/// A-B=1, B-C=1, C-D=1, A-D=10, with edge ids 0..=3 in that order.
pub(crate) fn square() -> NetworkGraph {
    network_of(
        &["A", "B", "C", "D"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("C", "D", 1.0), ("A", "D", 10.0)],
    )
}

/// The square with the direct A-D road hazardous, leaving a single route.
pub(crate) fn single_route_square() -> NetworkGraph {
    let mut graph = square();
    graph.set_hazard(EdgeId::new(3), true).expect("edge exists");
    graph
}
