//! Unit tests for the Kruskal backbone builder.

use rstest::rstest;

use crate::{
    EdgeId, NetworkError, NetworkGraph, NodeId, scenario,
    test_utils::{network_of as graph, square},
};

use super::minimum_spanning_forest;

fn selected(graph: &NetworkGraph) -> Vec<usize> {
    let forest = minimum_spanning_forest(&graph.active_subgraph()).expect("forest must succeed");
    forest.edges().iter().map(|edge| edge.edge().index()).collect()
}

#[test]
fn rejects_empty_graph() {
    let result = minimum_spanning_forest(&NetworkGraph::new().active_subgraph());
    assert_eq!(result, Err(NetworkError::EmptyGraph));
}

#[test]
fn rejects_graph_whose_cities_are_all_disabled() {
    let mut graph = graph(&["A"], &[]);
    graph
        .set_node_active(&NodeId::from("A"), false)
        .expect("node exists");
    assert_eq!(
        minimum_spanning_forest(&graph.active_subgraph()),
        Err(NetworkError::EmptyGraph)
    );
}

#[test]
fn four_city_square_selects_the_cheap_chain() {
    let graph = square();
    let forest = minimum_spanning_forest(&graph.active_subgraph()).expect("forest must succeed");
    assert_eq!(forest.total_weight(), 3.0);
    assert!(forest.is_tree());
    let pairs: Vec<(&str, &str)> = forest
        .edges()
        .iter()
        .map(|edge| (edge.source().as_str(), edge.target().as_str()))
        .collect();
    assert_eq!(pairs, vec![("A", "B"), ("B", "C"), ("C", "D")]);
    assert!(!forest.contains(EdgeId::new(3)));
}

#[test]
fn reference_scenario_backbone_weighs_eighteen() {
    let network = scenario::reference_graph().expect("scenario is valid");
    let forest =
        minimum_spanning_forest(&network.active_subgraph()).expect("forest must succeed");
    assert_eq!(forest.edges().len(), 7);
    assert_eq!(forest.total_weight(), 18.0);
}

#[test]
fn equal_weights_break_ties_by_lower_edge_id() {
    let graph = graph(
        &["A", "B", "C"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 1.0)],
    );
    assert_eq!(selected(&graph), vec![0, 1]);
}

#[rstest]
#[case::isolated_city(&["A", "B", "C"], &[("A", "B", 2.0)], 2, 1)]
#[case::two_islands(
    &["A", "B", "C", "D"],
    &[("A", "B", 2.0), ("C", "D", 3.0)],
    2,
    2
)]
#[case::no_roads(&["A", "B"], &[], 2, 0)]
fn disconnected_graphs_yield_a_forest(
    #[case] nodes: &[&str],
    #[case] edges: &[(&str, &str, f64)],
    #[case] expected_components: usize,
    #[case] expected_edges: usize,
) {
    let graph = graph(nodes, edges);
    let forest = minimum_spanning_forest(&graph.active_subgraph()).expect("forest must succeed");
    assert_eq!(forest.component_count(), expected_components);
    assert_eq!(forest.edges().len(), expected_edges);
    assert_eq!(forest.edges().len(), nodes.len() - expected_components);
    assert!(!forest.is_tree());
}

#[test]
fn hazardous_roads_are_left_out() {
    let mut graph = graph(
        &["A", "B", "C"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 4.0)],
    );
    graph.set_hazard(EdgeId::new(1), true).expect("edge exists");
    assert_eq!(selected(&graph), vec![0, 2]);
}

#[test]
fn disabling_and_re_enabling_restores_identical_forest() {
    let mut graph = scenario::reference_graph().expect("scenario is valid");
    let before = minimum_spanning_forest(&graph.active_subgraph()).expect("forest");
    let city = NodeId::from("3");
    graph.set_node_active(&city, false).expect("node exists");
    let during = minimum_spanning_forest(&graph.active_subgraph()).expect("forest");
    assert_ne!(during, before);
    graph.set_node_active(&city, true).expect("node exists");
    let after = minimum_spanning_forest(&graph.active_subgraph()).expect("forest");
    assert_eq!(after, before);
}
