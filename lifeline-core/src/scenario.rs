//! Built-in reference data.
//!
//! The reference network is eight cities, `0` to `7`, joined by twelve
//! roads. Its minimum spanning tree weighs 18. The command hierarchy is a
//! chain of seven ranks that, inserted in order, leans entirely right.

use crate::{NetworkBuilder, NetworkGraph, error::Result};

/// Roads of the reference network as `(left, right, weight)`.
pub const REFERENCE_ROADS: [(&str, &str, f64); 12] = [
    ("0", "1", 4.0),
    ("0", "2", 2.0),
    ("1", "2", 1.0),
    ("1", "3", 5.0),
    ("2", "3", 8.0),
    ("2", "4", 10.0),
    ("3", "4", 2.0),
    ("3", "5", 6.0),
    ("4", "5", 3.0),
    ("5", "6", 1.0),
    ("6", "7", 4.0),
    ("4", "7", 7.0),
];

/// Number of cities in the reference network.
pub const REFERENCE_CITY_COUNT: usize = 8;

/// Returns a builder preloaded with the reference network, its control
/// node set to city `0`.
#[must_use]
pub fn reference_builder() -> NetworkBuilder {
    let builder = (0..REFERENCE_CITY_COUNT).fold(NetworkBuilder::new(), |builder, city| {
        builder.with_node(city.to_string(), format!("City {city}"))
    });
    REFERENCE_ROADS
        .iter()
        .fold(builder, |builder, &(left, right, weight)| {
            builder.with_edge(left, right, weight)
        })
        .with_control_node("0")
}

/// Builds the bare reference model.
///
/// # Errors
/// Never fails in practice; the error type is shared with every other
/// model construction path.
pub fn reference_graph() -> Result<NetworkGraph> {
    reference_builder().build_graph()
}

/// Keys of the sample command hierarchy, in insertion order.
#[must_use]
pub fn command_hierarchy_keys() -> Vec<u32> {
    (20..=80).step_by(10).collect()
}
