//! Property tests for the disjoint-route finder.
//!
//! Checks on random small networks, with some roads hazardous and some
//! cities disabled, that routes never share a road, that every route is a
//! real walk over active roads, and that the first route costs exactly the
//! Dijkstra distance.

use std::collections::BTreeSet;

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    ActiveSubgraph, EdgeId, NetworkGraph, NodeId, distances_from, find_k_disjoint_paths,
    routing::Path, test_utils::suite_proptest_config,
};

#[derive(Clone, Debug)]
struct RouteFixture {
    graph: NetworkGraph,
    source: NodeId,
    destination: NodeId,
    k: usize,
}

fn city(position: usize) -> NodeId {
    NodeId::from(format!("c{position}"))
}

fn route_fixture() -> impl Strategy<Value = RouteFixture> {
    (2_usize..=7)
        .prop_flat_map(|n| {
            (
                Just(n),
                vec(
                    (any::<bool>(), 1_u8..=9, prop::bool::weighted(0.2)),
                    n * (n - 1) / 2,
                ),
                vec(prop::bool::weighted(0.15), n),
                0..n,
                0..n,
                1_usize..=4,
            )
        })
        .prop_map(|(n, roads, disabled, source, destination, k)| {
            let mut graph = NetworkGraph::new();
            for position in 0..n {
                graph
                    .add_node(city(position), format!("City {position}"))
                    .expect("generated ids are unique");
            }
            let pairs = (0..n).flat_map(|left| ((left + 1)..n).map(move |right| (left, right)));
            for ((left, right), (present, weight, hazardous)) in pairs.zip(roads) {
                if present {
                    let road = graph
                        .add_edge(city(left), city(right), f64::from(weight))
                        .expect("generated roads are valid");
                    graph.set_hazard(road, hazardous).expect("road was just added");
                }
            }
            for (position, off) in disabled.into_iter().enumerate() {
                graph
                    .set_node_active(&city(position), !off)
                    .expect("city was just added");
            }
            RouteFixture {
                graph,
                source: city(source),
                destination: city(destination),
                k,
            }
        })
}

fn check_walk(subgraph: &ActiveSubgraph, path: &Path) -> TestCaseResult {
    let mut total = 0.0;
    for (step, edge_id) in path.edges().iter().enumerate() {
        let edge = subgraph
            .edge(*edge_id)
            .ok_or_else(|| TestCaseError::fail(format!("{edge_id} is not an active road")))?;
        let (from, to) = (&path.nodes()[step], &path.nodes()[step + 1]);
        let joins = (edge.source() == from && edge.target() == to)
            || (edge.source() == to && edge.target() == from);
        prop_assert!(joins, "{} does not join {} and {}", edge_id, from, to);
        total += edge.weight();
    }
    prop_assert_eq!(total, path.total_weight());
    Ok(())
}

fn run_disjoint_property(fixture: &RouteFixture) -> TestCaseResult {
    let subgraph = fixture.graph.active_subgraph();
    let set = find_k_disjoint_paths(&subgraph, &fixture.source, &fixture.destination, fixture.k)
        .map_err(|err| TestCaseError::fail(format!("search failed: {err}")))?;

    prop_assert!(set.len() <= fixture.k);
    prop_assert_eq!(set.is_partial(), set.len() < fixture.k);

    let mut used: BTreeSet<EdgeId> = BTreeSet::new();
    for path in set.paths() {
        prop_assert_eq!(path.source(), &fixture.source);
        prop_assert_eq!(path.destination(), &fixture.destination);
        check_walk(&subgraph, path)?;
        for node in path.nodes() {
            let active = fixture.graph.node(node).is_some_and(|city| city.is_active());
            prop_assert!(active, "route passes disabled city {}", node);
        }
        for edge in path.edges() {
            let hazardous = fixture.graph.edge(*edge).is_none_or(|road| road.is_hazardous());
            prop_assert!(!hazardous, "route uses hazardous road {}", edge);
            prop_assert!(used.insert(*edge), "road {} appears in two routes", edge);
        }
    }

    let distances = distances_from(&subgraph, &fixture.source)
        .map_err(|err| TestCaseError::fail(format!("distances failed: {err}")))?;
    prop_assert_eq!(
        set.primary().map(Path::total_weight),
        distances.distance_to(&fixture.destination)
    );
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn routes_are_pairwise_edge_disjoint_walks(fixture in route_fixture()) {
        run_disjoint_property(&fixture)?;
    }
}
