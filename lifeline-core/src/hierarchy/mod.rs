//! Command-hierarchy balancing with the Day-Stout-Warren algorithm.
//!
//! The hierarchy is a binary search tree stored in an arena: nodes live in a
//! `Vec` and refer to their children by index. Balancing first flattens the
//! tree into a right-leaning "vine" with right rotations, then folds the
//! vine back into a tree of minimum height with rounds of left rotations.
//! In-order key order is preserved throughout.
//!
//! The hierarchy is independent of the road network; it works on its own
//! snapshot of keys.

use std::cmp::Ordering;

use tracing::{debug, instrument};

/// Shape of a hierarchy tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HierarchyStats {
    /// Number of nodes on the longest root-to-leaf path.
    pub height: usize,
    /// Number of keys in the tree.
    pub len: usize,
}

/// Shape of a tree before and after one balancing pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BalanceReport {
    /// Shape before balancing.
    pub before: HierarchyStats,
    /// Shape after balancing.
    pub after: HierarchyStats,
    /// Rotations performed across both phases.
    pub rotations: usize,
}

#[derive(Clone, Debug)]
struct TreeNode<K> {
    key: K,
    left: Option<usize>,
    right: Option<usize>,
}

/// A pointer that DSW rewrites: either the root itself or some node's right
/// child. The root plays the role of the classic pseudo-root's right link.
#[derive(Clone, Copy, Debug)]
enum Link {
    Root,
    Right(usize),
}

/// An arena-backed binary search tree of distinct keys.
///
/// # Examples
/// ```
/// use lifeline_core::HierarchyTree;
///
/// let mut tree = HierarchyTree::from_keys([20, 30, 40, 50, 60, 70, 80]);
/// assert_eq!(tree.height(), 7);
/// let report = tree.balance();
/// assert_eq!(report.after.height, 3);
/// assert_eq!(tree.root_key(), Some(&50));
/// ```
#[derive(Clone, Debug)]
pub struct HierarchyTree<K> {
    nodes: Vec<TreeNode<K>>,
    root: Option<usize>,
}

impl<K> Default for HierarchyTree<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }
}

/// Returns the smallest possible height of a binary tree with `len` nodes,
/// that is `⌈log2(len + 1)⌉`.
#[must_use]
pub fn minimum_height(len: usize) -> usize {
    (usize::BITS - len.leading_zeros()) as usize
}

impl<K: Ord> HierarchyTree<K> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree by inserting `keys` one at a time, in iteration order.
    ///
    /// Sorted input therefore produces a fully skewed tree.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        let mut tree = Self::new();
        for key in keys {
            tree.insert(key);
        }
        tree
    }

    /// Inserts `key` as a new leaf. Returns `false`, leaving the tree
    /// unchanged, when the key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let Some(mut cursor) = self.root else {
            self.root = Some(self.push(key));
            return true;
        };
        loop {
            let node = &self.nodes[cursor];
            let (next, attach_left) = match key.cmp(&node.key) {
                Ordering::Less => (node.left, true),
                Ordering::Greater => (node.right, false),
                Ordering::Equal => return false,
            };
            if let Some(next) = next {
                cursor = next;
                continue;
            }
            let leaf = self.push(key);
            if attach_left {
                self.nodes[cursor].left = Some(leaf);
            } else {
                self.nodes[cursor].right = Some(leaf);
            }
            return true;
        }
    }

    /// Returns `true` when `key` is stored in the tree.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        let mut cursor = self.root;
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            cursor = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Balances the tree in place and reports its shape before and after.
    #[instrument(name = "hierarchy.balance", skip(self), fields(len = self.len()))]
    pub fn balance(&mut self) -> BalanceReport {
        let before = self.stats();
        let (vine_len, flatten_rotations) = self.tree_to_vine();
        let fold_rotations = self.vine_to_tree(vine_len);
        let after = self.stats();
        debug!(
            before = before.height,
            after = after.height,
            "hierarchy rebalanced"
        );
        BalanceReport {
            before,
            after,
            rotations: flatten_rotations + fold_rotations,
        }
    }

    fn push(&mut self, key: K) -> usize {
        self.nodes.push(TreeNode {
            key,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }
}

impl<K> HierarchyTree<K> {
    /// Returns the number of keys.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns `true` when the tree holds no key.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the key at the root.
    #[must_use]
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|index| &self.nodes[index].key)
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((index, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[index];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Returns the current shape.
    #[must_use]
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            height: self.height(),
            len: self.len(),
        }
    }

    /// Returns the keys in ascending order.
    #[must_use]
    pub fn in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(index) = cursor {
                stack.push(index);
                cursor = self.nodes[index].left;
            }
            let Some(index) = stack.pop() else {
                break;
            };
            keys.push(&self.nodes[index].key);
            cursor = self.nodes[index].right;
        }
        keys
    }

    /// Returns the keys grouped by depth, root level first, each level left
    /// to right.
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<&K>> {
        let mut levels = Vec::new();
        let mut frontier: Vec<usize> = self.root.into_iter().collect();
        while !frontier.is_empty() {
            levels.push(frontier.iter().map(|&index| &self.nodes[index].key).collect());
            frontier = frontier
                .iter()
                .flat_map(|&index| {
                    let node = &self.nodes[index];
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }
        levels
    }

    fn link(&self, link: Link) -> Option<usize> {
        match link {
            Link::Root => self.root,
            Link::Right(index) => self.nodes[index].right,
        }
    }

    fn set_link(&mut self, link: Link, target: Option<usize>) {
        match link {
            Link::Root => self.root = target,
            Link::Right(index) => self.nodes[index].right = target,
        }
    }

    /// Straightens the tree into a right-only chain. Returns the chain length
    /// and the number of right rotations performed.
    fn tree_to_vine(&mut self) -> (usize, usize) {
        let mut tail = Link::Root;
        let mut rest = self.link(tail);
        let mut len = 0;
        let mut rotations = 0;
        while let Some(node) = rest {
            if let Some(left) = self.nodes[node].left {
                self.nodes[node].left = self.nodes[left].right;
                self.nodes[left].right = Some(node);
                self.set_link(tail, Some(left));
                rest = Some(left);
                rotations += 1;
            } else {
                len += 1;
                tail = Link::Right(node);
                rest = self.nodes[node].right;
            }
        }
        (len, rotations)
    }

    /// Performs `count` left rotations down the right spine, skipping one
    /// node after each.
    fn compress(&mut self, count: usize) -> usize {
        let mut scanner = Link::Root;
        let mut rotations = 0;
        for _ in 0..count {
            let Some(child) = self.link(scanner) else {
                break;
            };
            let Some(grandchild) = self.nodes[child].right else {
                break;
            };
            self.set_link(scanner, Some(grandchild));
            self.nodes[child].right = self.nodes[grandchild].left;
            self.nodes[grandchild].left = Some(child);
            scanner = Link::Right(grandchild);
            rotations += 1;
        }
        rotations
    }

    fn vine_to_tree(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let full = (1_usize << (len + 1).ilog2()) - 1;
        let mut rotations = self.compress(len - full);
        let mut size = full;
        while size > 1 {
            size /= 2;
            rotations += self.compress(size);
        }
        rotations
    }
}

/// Builds a hierarchy from `keys` by sequential insertion and balances it.
///
/// Duplicate keys are ignored.
///
/// # Examples
/// ```
/// use lifeline_core::balance_hierarchy;
///
/// let tree = balance_hierarchy(1..=15);
/// assert_eq!(tree.height(), 4);
/// assert_eq!(tree.root_key(), Some(&8));
/// ```
#[must_use]
pub fn balance_hierarchy<K: Ord>(keys: impl IntoIterator<Item = K>) -> HierarchyTree<K> {
    let mut tree = HierarchyTree::from_keys(keys);
    tree.balance();
    tree
}

#[cfg(test)]
mod tests;
