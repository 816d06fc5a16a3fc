//! Unit and property tests for frequency planning.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::{
    NetworkGraph, NodeId, scenario,
    test_utils::{network_of, suite_proptest_config},
};

use super::assign_frequencies;

fn id(value: &str) -> NodeId {
    NodeId::from(value)
}

#[test]
fn empty_network_needs_no_frequency() {
    let plan = assign_frequencies(&NetworkGraph::new().active_subgraph());
    assert!(plan.is_empty());
    assert_eq!(plan.frequency_count(), 0);
}

#[test]
fn isolated_cities_share_one_frequency() {
    let graph = network_of(&["A", "B", "C"], &[]);
    let plan = assign_frequencies(&graph.active_subgraph());
    assert_eq!(plan.frequency_count(), 1);
    assert!(plan.iter().all(|(_, frequency)| frequency == 0));
}

#[test]
fn triangle_needs_three_frequencies() {
    let graph = network_of(
        &["A", "B", "C"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 1.0)],
    );
    let plan = assign_frequencies(&graph.active_subgraph());
    assert_eq!(plan.frequency_count(), 3);
    assert_eq!(plan.frequency_of(&id("A")), Some(0));
    assert_eq!(plan.frequency_of(&id("B")), Some(1));
    assert_eq!(plan.frequency_of(&id("C")), Some(2));
}

#[test]
fn highest_degree_city_is_coloured_first() {
    let graph = network_of(
        &["A", "B", "C", "H"],
        &[("H", "A", 1.0), ("H", "B", 1.0), ("H", "C", 1.0)],
    );
    let plan = assign_frequencies(&graph.active_subgraph());
    assert_eq!(plan.frequency_of(&id("H")), Some(0));
    assert_eq!(plan.frequency_of(&id("A")), Some(1));
    assert_eq!(plan.frequency_count(), 2);
}

#[test]
fn disabled_cities_are_not_planned() {
    let mut graph = scenario::reference_graph().expect("scenario is valid");
    graph.set_node_active(&id("4"), false).expect("node exists");
    let plan = assign_frequencies(&graph.active_subgraph());
    assert_eq!(plan.len(), 7);
    assert_eq!(plan.frequency_of(&id("4")), None);
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn neighbours_never_share_a_frequency(
        n in 1_usize..=9,
        mask in vec(any::<bool>(), 36),
    ) {
        let mut graph = NetworkGraph::new();
        for position in 0..n {
            graph.add_node(position.to_string(), "").expect("fresh id");
        }
        let pairs = (0..n).flat_map(|left| ((left + 1)..n).map(move |right| (left, right)));
        for ((left, right), present) in pairs.zip(mask) {
            if present {
                graph
                    .add_edge(left.to_string(), right.to_string(), 1.0)
                    .expect("valid road");
            }
        }
        let subgraph = graph.active_subgraph();
        let plan = assign_frequencies(&subgraph);
        prop_assert_eq!(plan.len(), n);
        for edge in subgraph.edges() {
            prop_assert_ne!(plan.frequency_of(edge.source()), plan.frequency_of(edge.target()));
        }
        let max_degree = (0..n).map(|position| subgraph.degree(position)).max().unwrap_or(0);
        prop_assert!(plan.frequency_count() <= max_degree + 1);
    }
}
