//! Brute-force minimum spanning forest oracle.

/// Weight and shape of the cheapest spanning forest.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct OracleForest {
    pub total_weight: f64,
    pub edge_count: usize,
    pub component_count: usize,
}

fn find(parent: &mut [usize], mut node: usize) -> usize {
    while parent[node] != node {
        parent[node] = parent[parent[node]];
        node = parent[node];
    }
    node
}

/// Returns `None` when `roads` contain a cycle, otherwise the number of
/// components left after joining them.
fn components_after(node_count: usize, roads: impl Iterator<Item = (usize, usize)>) -> Option<usize> {
    let mut parent: Vec<usize> = (0..node_count).collect();
    let mut components = node_count;
    for (left, right) in roads {
        let a = find(&mut parent, left);
        let b = find(&mut parent, right);
        if a == b {
            return None;
        }
        parent[b] = a;
        components -= 1;
    }
    Some(components)
}

/// Enumerates every road subset and keeps the cheapest acyclic one that
/// spans each component.
pub(super) fn brute_force_forest(
    node_count: usize,
    roads: &[(usize, usize, f64)],
) -> OracleForest {
    let mut parent: Vec<usize> = (0..node_count).collect();
    let mut component_count = node_count;
    for &(left, right, _) in roads {
        let a = find(&mut parent, left);
        let b = find(&mut parent, right);
        if a != b {
            parent[b] = a;
            component_count -= 1;
        }
    }
    let edge_count = node_count - component_count;

    let mut best = f64::INFINITY;
    for mask in 0_u32..(1 << roads.len()) {
        if mask.count_ones() as usize != edge_count {
            continue;
        }
        let chosen = || {
            roads
                .iter()
                .enumerate()
                .filter(move |(index, _)| mask & (1 << index) != 0)
                .map(|(_, road)| road)
        };
        if components_after(node_count, chosen().map(|&(l, r, _)| (l, r))).is_none() {
            continue;
        }
        let weight: f64 = chosen().map(|&(_, _, w)| w).sum();
        if weight < best {
            best = weight;
        }
    }

    OracleForest {
        total_weight: best,
        edge_count,
        component_count,
    }
}
