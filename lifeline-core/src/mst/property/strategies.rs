//! Generators for small road networks.
//!
//! Networks stay small enough (at most seven cities and twelve roads) for
//! the oracle to enumerate every road subset.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{ForestFixture, WeightDistribution};

const MIN_NODES: usize = 1;
const MAX_NODES: usize = 7;
const MAX_ROADS: usize = 12;

pub(super) fn forest_fixture_strategy() -> impl Strategy<Value = ForestFixture> {
    (any::<WeightDistribution>(), any::<u64>()).prop_map(|(distribution, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(distribution, &mut rng)
    })
}

/// Generates a fixture for an explicitly chosen distribution.
pub(super) fn generate_fixture(
    distribution: WeightDistribution,
    rng: &mut SmallRng,
) -> ForestFixture {
    let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
    let split = match distribution {
        WeightDistribution::Islands => node_count / 2,
        WeightDistribution::Spread | WeightDistribution::Tied => 0,
    };
    let probability: f64 = rng.gen_range(0.3..=0.9);

    let mut roads = Vec::new();
    for left in 0..node_count {
        for right in (left + 1)..node_count {
            if roads.len() == MAX_ROADS {
                break;
            }
            if split > 0 && (left < split) != (right < split) {
                continue;
            }
            if rng.gen_bool(probability) {
                roads.push((left, right, draw_weight(distribution, rng)));
            }
        }
    }

    ForestFixture {
        node_count,
        roads,
        distribution,
    }
}

// Integral weights keep every sum exact.
fn draw_weight(distribution: WeightDistribution, rng: &mut SmallRng) -> f64 {
    match distribution {
        WeightDistribution::Tied => f64::from(rng.gen_range(1_u8..=2)),
        WeightDistribution::Spread | WeightDistribution::Islands => {
            f64::from(rng.gen_range(1_u16..=500))
        }
    }
}
