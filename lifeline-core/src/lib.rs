//! Lifeline core library.
//!
//! Models a disaster-response road network and answers resilience questions
//! about it: the cheapest backbone that keeps every city connected, the
//! cheapest route and a set of edge-disjoint fallback routes between two
//! cities, the consequences of losing a city, and a radio-frequency plan in
//! which neighbouring cities never collide. A separate balancer keeps the
//! command hierarchy, a binary search tree of ranks, at minimum height.
//!
//! Every query runs over an [`ActiveSubgraph`] snapshot, which excludes
//! hazardous roads and disabled cities.
//!
//! With the `metrics` feature enabled the crate records
//! `lifeline_failure_simulations_total` and
//! `lifeline_partial_path_sets_total` counters and a
//! `lifeline_mst_total_weight` histogram through the `metrics` facade.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod coloring;
mod disjoint;
mod error;
mod failure;
mod graph;
mod hierarchy;
mod mst;
mod network;
mod routing;
pub mod scenario;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::NetworkBuilder,
    coloring::{FrequencyPlan, assign_frequencies},
    disjoint::{PathSet, find_k_disjoint_paths},
    error::{InvalidEdgeReason, NetworkError, NetworkErrorCode, Result},
    failure::{
        FailureReport, MonitoredRoute, RouteImpact, connected_components, reachable_from,
        simulate_failure,
    },
    graph::{ActiveEdge, ActiveSubgraph, Adjacent, Edge, EdgeId, NetworkGraph, Node, NodeId},
    hierarchy::{BalanceReport, HierarchyStats, HierarchyTree, balance_hierarchy, minimum_height},
    mst::{MinimumSpanningForest, MstEdge, minimum_spanning_forest},
    network::{Network, SharedNetwork},
    routing::{
        DistanceMap, Path, RouteOutcome, WorkingEdgeSet, distances_from, shortest_path,
        shortest_path_within,
    },
};
