//! Unit and property tests for DSW balancing.

use proptest::collection::vec;
use proptest::prelude::*;
use rstest::rstest;

use crate::{scenario, test_utils::suite_proptest_config};

use super::{HierarchyStats, HierarchyTree, balance_hierarchy, minimum_height};

#[test]
fn right_skewed_command_chain_balances_to_three_levels() {
    let mut tree = HierarchyTree::from_keys(scenario::command_hierarchy_keys());
    assert_eq!(tree.stats(), HierarchyStats { height: 7, len: 7 });
    let report = tree.balance();
    assert_eq!(report.before.height, 7);
    assert_eq!(report.after, HierarchyStats { height: 3, len: 7 });
    assert_eq!(
        tree.levels(),
        vec![vec![&50], vec![&30, &70], vec![&20, &40, &60, &80]]
    );
}

#[test]
fn empty_tree_is_valid() {
    let mut tree: HierarchyTree<u32> = HierarchyTree::new();
    let report = tree.balance();
    assert_eq!(report.after, HierarchyStats::default());
    assert_eq!(report.rotations, 0);
    assert!(tree.is_empty());
    assert!(tree.root_key().is_none());
    assert!(tree.levels().is_empty());
}

#[test]
fn duplicate_keys_are_ignored() {
    let mut tree = HierarchyTree::new();
    assert!(tree.insert(5));
    assert!(tree.insert(3));
    assert!(!tree.insert(5));
    assert_eq!(tree.len(), 2);
    assert!(tree.contains(&3));
    assert!(!tree.contains(&4));
}

#[test]
fn left_skewed_input_is_flattened_and_folded() {
    let tree = balance_hierarchy((1..=10).rev());
    let expected: Vec<i32> = (1..=10).collect();
    assert_eq!(tree.height(), 4);
    assert_eq!(tree.in_order(), expected.iter().collect::<Vec<_>>());
}

#[test]
fn string_keys_balance_like_numbers() {
    let tree = balance_hierarchy(["alpha", "bravo", "charlie", "delta", "echo"]);
    assert_eq!(tree.height(), 3);
    assert_eq!(
        tree.in_order(),
        vec![&"alpha", &"bravo", &"charlie", &"delta", &"echo"]
    );
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(2, 2)]
#[case(3, 2)]
#[case(4, 3)]
#[case(7, 3)]
#[case(8, 4)]
#[case(1023, 10)]
fn minimum_height_matches_ceil_log2(#[case] len: usize, #[case] expected: usize) {
    assert_eq!(minimum_height(len), expected);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(6)]
#[case(7)]
#[case(8)]
#[case(31)]
#[case(100)]
fn sorted_input_reaches_minimum_height(#[case] len: u32) {
    let tree = balance_hierarchy(0..len);
    assert_eq!(tree.height(), minimum_height(len as usize));
    assert_eq!(tree.len(), len as usize);
}

#[test]
fn balancing_a_balanced_tree_keeps_its_height() {
    let mut tree = balance_hierarchy(1..=15);
    let report = tree.balance();
    assert_eq!(report.before, report.after);
    assert_eq!(tree.root_key(), Some(&8));
}

proptest! {
    #![proptest_config(suite_proptest_config(256))]

    #[test]
    fn balancing_preserves_keys_and_minimises_height(keys in vec(0_u16..512, 0..96)) {
        let mut tree = HierarchyTree::from_keys(keys.iter().copied());
        let before: Vec<u16> = tree.in_order().into_iter().copied().collect();
        let report = tree.balance();
        let after: Vec<u16> = tree.in_order().into_iter().copied().collect();

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(&before, &expected);
        prop_assert_eq!(&after, &expected);
        prop_assert_eq!(report.after.height, minimum_height(expected.len()));
        prop_assert_eq!(tree.height(), report.after.height);
        prop_assert!(report.after.height <= report.before.height);
    }
}
