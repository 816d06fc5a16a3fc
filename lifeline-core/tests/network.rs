//! Tests for the `Network` facade, its builder, and the shared handle.

use std::thread;

use lifeline_core::{
    EdgeId, InvalidEdgeReason, MonitoredRoute, Network, NetworkBuilder, NetworkError, NodeId,
    RouteOutcome, SharedNetwork, scenario,
};
use lifeline_test_support::tracing::RecordingLayer;
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn id(value: &str) -> NodeId {
    NodeId::from(value)
}

#[fixture]
fn square() -> Network {
    NetworkBuilder::new()
        .with_node("A", "Alpha")
        .with_node("B", "Bravo")
        .with_node("C", "Charlie")
        .with_node("D", "Delta")
        .with_edge("A", "B", 1.0)
        .with_edge("B", "C", 1.0)
        .with_edge("C", "D", 1.0)
        .with_edge("A", "D", 10.0)
        .build()
        .expect("square is valid")
}

#[fixture]
fn single_route_square(mut square: Network) -> Network {
    let direct = square.edge_between(&id("A"), &id("D")).expect("road exists");
    square.mark_hazard(direct, true).expect("edge exists");
    square
}

#[rstest]
fn control_node_defaults_to_first_city(square: Network) {
    assert_eq!(square.control_node(), Some(&id("A")));
}

#[rstest]
fn empty_network_builds_but_has_no_backbone() {
    let network = NetworkBuilder::new().build().expect("empty network is valid");
    assert_eq!(network.control_node(), None);
    assert_eq!(network.compute_mst(), Err(NetworkError::EmptyGraph));
    assert!(network.assign_frequencies().is_empty());
}

#[rstest]
#[case::unknown_control(
    NetworkBuilder::new().with_node("A", "A").with_control_node("Q"),
    NetworkError::NoSuchNode { id: NodeId::from("Q") }
)]
#[case::duplicate_city(
    NetworkBuilder::new().with_node("A", "A").with_node("A", "again"),
    NetworkError::DuplicateNode { id: NodeId::from("A") }
)]
#[case::self_loop(
    NetworkBuilder::new().with_node("A", "A").with_edge("A", "A", 1.0),
    NetworkError::InvalidEdge {
        left: NodeId::from("A"),
        right: NodeId::from("A"),
        reason: InvalidEdgeReason::SelfLoop,
    }
)]
#[case::duplicate_road(
    NetworkBuilder::new()
        .with_node("A", "A")
        .with_node("B", "B")
        .with_edge("A", "B", 1.0)
        .with_edge("B", "A", 2.0),
    NetworkError::DuplicateEdge {
        left: NodeId::from("B"),
        right: NodeId::from("A"),
        existing: EdgeId::new(0),
    }
)]
fn builder_rejects_bad_declarations(#[case] builder: NetworkBuilder, #[case] expected: NetworkError) {
    let err = builder.build().expect_err("declarations must be rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn square_backbone_is_the_cheap_chain(square: Network) {
    let mst = square.compute_mst().expect("network has cities");
    assert_eq!(mst.total_weight(), 3.0);
    assert_eq!(
        mst.edges().iter().map(|edge| edge.edge()).collect::<Vec<_>>(),
        vec![EdgeId::new(0), EdgeId::new(1), EdgeId::new(2)]
    );
}

#[rstest]
fn single_route_square_yields_one_partial_route(single_route_square: Network) {
    let set = single_route_square
        .find_k_disjoint_paths(&id("A"), &id("D"), 2)
        .expect("known cities");
    assert_eq!(set.len(), 1);
    assert!(set.is_partial());
    assert_eq!(set.primary().map(|path| path.total_weight()), Some(3.0));
}

#[rstest]
fn failing_the_middle_city_splits_the_single_route_square(mut single_route_square: Network) {
    let report = single_route_square
        .simulate_failure(&id("C"), None)
        .expect("known city");
    assert_eq!(
        report.components(),
        &[vec![id("A"), id("B")], vec![id("D")]]
    );
    let set = single_route_square
        .find_k_disjoint_paths(&id("A"), &id("D"), 1)
        .expect("known cities");
    assert!(set.is_unreachable());
    assert_eq!(
        single_route_square.shortest_path(&id("A"), &id("D")),
        Ok(RouteOutcome::Unreachable)
    );
}

#[rstest]
fn hazarding_the_sole_route_signals_unreachable(mut single_route_square: Network) {
    for (left, right) in [("A", "B"), ("B", "C"), ("C", "D")] {
        let edge = single_route_square
            .edge_between(&id(left), &id(right))
            .expect("road exists");
        single_route_square.mark_hazard(edge, true).expect("edge exists");
    }
    let set = single_route_square
        .find_k_disjoint_paths(&id("A"), &id("D"), 2)
        .expect("known cities");
    assert!(set.is_unreachable());
}

#[rstest]
fn failure_then_restore_is_idempotent() {
    let mut network = scenario::reference_builder().build().expect("scenario is valid");
    let mst = network.compute_mst().expect("cities exist");
    let paths = network
        .find_k_disjoint_paths(&id("0"), &id("7"), 2)
        .expect("known cities");
    let snapshot = network.snapshot();

    let report = network
        .simulate_failure(&id("3"), Some(&MonitoredRoute::new("0", "7", 2)))
        .expect("known city");
    assert!(!report.already_inactive());
    assert_ne!(network.snapshot(), snapshot);

    network.restore_node(&id("3")).expect("known city");
    assert_eq!(network.snapshot(), snapshot);
    assert_eq!(network.compute_mst(), Ok(mst));
    assert_eq!(
        network.find_k_disjoint_paths(&id("0"), &id("7"), 2),
        Ok(paths)
    );
}

#[rstest]
fn mutations_report_unknown_targets(mut square: Network) {
    assert_eq!(
        square.mark_hazard(EdgeId::new(42), true),
        Err(NetworkError::NoSuchEdge { edge: EdgeId::new(42) })
    );
    assert_eq!(
        square.restore_node(&id("Q")),
        Err(NetworkError::NoSuchNode { id: id("Q") })
    );
    assert_eq!(
        square.simulate_failure(&id("Q"), None),
        Err(NetworkError::NoSuchNode { id: id("Q") })
    );
}

#[rstest]
fn shared_network_serves_concurrent_readers() {
    let shared = SharedNetwork::new(scenario::reference_builder().build().expect("valid"));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = shared.clone();
            thread::spawn(move || {
                handle
                    .compute_mst()
                    .map(|mst| mst.total_weight())
                    .expect("reader must succeed")
            })
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().expect("reader completes"), 18.0);
    }

    let report = shared
        .simulate_failure(&id("5"), None)
        .expect("known city");
    assert_eq!(report.failed(), &id("5"));
    assert!(!shared.snapshot().expect("lock healthy").contains(&id("5")));
    shared.restore_node(&id("5")).expect("known city");
    assert_eq!(shared.compute_mst().map(|mst| mst.total_weight()), Ok(18.0));
}

#[rstest]
fn restore_emits_a_span_and_event(mut square: Network) {
    square.set_node_active(&id("B"), false).expect("known city");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || square.restore_node(&id("B")))
        .expect("known city");

    let span = layer
        .span_named("network.restore_node")
        .expect("restore span must be recorded");
    assert_eq!(span.fields.get("node"), Some(&"B".to_owned()));
    let events = layer.events_with_message("node restored");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::INFO);
    assert_eq!(events[0].fields.get("changed"), Some(&"true".to_owned()));
}
