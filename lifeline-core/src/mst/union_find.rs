//! Disjoint-set forest used by Kruskal's algorithm.
//!
//! Path compression plus union by rank. Entries are dense node positions of
//! an [`crate::ActiveSubgraph`].

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            components: n,
        }
    }

    pub(crate) fn components(&self) -> usize {
        self.components
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Merges the sets holding `left` and `right`. Returns `false` when they
    /// already share a set.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> bool {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return false;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        self.components -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::DisjointSet;

    #[test]
    fn starts_with_one_component_per_entry() {
        let mut set = DisjointSet::new(4);
        assert_eq!(set.components(), 4);
        assert_ne!(set.find(0), set.find(3));
    }

    #[test]
    fn union_merges_once() {
        let mut set = DisjointSet::new(3);
        assert!(set.union(0, 1));
        assert!(!set.union(1, 0));
        assert!(set.union(2, 0));
        assert_eq!(set.components(), 1);
        assert_eq!(set.find(1), set.find(2));
    }

    #[test]
    fn long_chains_compress() {
        let mut set = DisjointSet::new(64);
        for node in 1..64 {
            set.union(node - 1, node);
        }
        let root = set.find(63);
        assert!((0..64).all(|node| set.find(node) == root));
        assert_eq!(set.components(), 1);
    }
}
