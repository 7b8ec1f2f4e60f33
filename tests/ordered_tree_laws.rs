//! Property-based tests for OrderedTree.
//!
//! These tests verify that OrderedTree keeps its ordering, linkage and
//! balance invariants under arbitrary sequences of inserts and removals.

use std::collections::BTreeMap;

use ordtree::OrderedTree;
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating an OrderedTree from a vector of key-value pairs.
fn arbitrary_tree(max_size: usize) -> impl Strategy<Value = OrderedTree<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<OrderedTree<i32, i32>>())
}

#[derive(Debug, Clone)]
enum Operation {
    Insert(i16, i32),
    Remove(i16),
}

/// Keys are drawn from a narrow range so removals regularly hit.
fn arbitrary_operations(max_len: usize) -> impl Strategy<Value = Vec<Operation>> {
    let operation = prop_oneof![
        3 => (any::<i16>().prop_map(|key| key % 64), any::<i32>())
            .prop_map(|(key, value)| Operation::Insert(key, value)),
        2 => any::<i16>().prop_map(|key| Operation::Remove(key % 64)),
    ];
    prop::collection::vec(operation, 0..max_len)
}

/// `ceil(log2(size + 1))`: the depth of a perfectly balanced tree.
fn minimal_depth(size: usize) -> usize {
    (usize::BITS - size.leading_zeros()) as usize
}

/// Upper bound on the height of a height-balanced tree: `1.45 * log2(size + 2)`.
#[allow(clippy::cast_precision_loss)]
fn maximal_depth(size: usize) -> f64 {
    1.45 * ((size + 2) as f64).log2()
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: iteration yields strictly ascending keys.
    #[test]
    fn prop_iteration_is_strictly_ascending(tree in arbitrary_tree(200)) {
        let keys: Vec<i32> = tree.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: the tree agrees with BTreeMap on contents after the same inserts.
    #[test]
    fn prop_contents_match_btreemap(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..200)
    ) {
        let tree: OrderedTree<i32, i32> = entries.iter().copied().collect();
        let expected: BTreeMap<i32, i32> = entries.into_iter().collect();

        prop_assert_eq!(tree.size(), expected.len());
        prop_assert!(tree.iter().eq(expected.iter()));
    }

    /// Law: a successor walk from the minimum and a predecessor walk from the
    /// maximum visit the same nodes in opposite orders.
    #[test]
    fn prop_successor_and_predecessor_walks_mirror(tree in arbitrary_tree(100)) {
        let mut forward = Vec::new();
        let mut cursor = tree.minimum();
        while let Some(node) = cursor {
            forward.push(*node.key());
            cursor = tree.successor(node);
        }

        let mut backward = Vec::new();
        let mut cursor = tree.maximum();
        while let Some(node) = cursor {
            backward.push(*node.key());
            cursor = tree.predecessor(node);
        }
        backward.reverse();

        prop_assert_eq!(forward.len(), tree.size());
        prop_assert_eq!(forward, backward);
    }

    /// Law: minimum and maximum hold the smallest and largest keys.
    #[test]
    fn prop_minimum_and_maximum_are_extremes(keys in prop::collection::vec(any::<i32>(), 1..100)) {
        let tree: OrderedTree<i32, ()> = keys.iter().map(|&key| (key, ())).collect();

        prop_assert_eq!(tree.minimum().map(|node| *node.key()), keys.iter().min().copied());
        prop_assert_eq!(tree.maximum().map(|node| *node.key()), keys.iter().max().copied());
    }
}

// =============================================================================
// Balance Laws
// =============================================================================

proptest! {
    /// Law: depth stays between the perfectly balanced and the worst balanced
    /// height for the number of entries.
    #[test]
    fn prop_depth_is_logarithmic(keys in prop::collection::vec(0..1000_i32, 0..1000)) {
        let tree: OrderedTree<i32, i32> = keys.into_iter().map(|key| (key, key)).collect();
        let size = tree.size();

        prop_assert!(tree.depth() >= minimal_depth(size));
        #[allow(clippy::cast_precision_loss)]
        let depth = tree.depth() as f64;
        prop_assert!(depth <= maximal_depth(size), "depth {} for {} entries", depth, size);
    }

    /// Law: every structural invariant holds after each single operation.
    #[test]
    fn prop_invariants_hold_after_every_operation(operations in arbitrary_operations(300)) {
        let mut tree = OrderedTree::new();
        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    tree.insert(key, value);
                }
                Operation::Remove(key) => {
                    tree.remove(&key);
                }
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }
    }
}

// =============================================================================
// Insert Laws
// =============================================================================

proptest! {
    /// Law: get after insert returns the inserted value.
    #[test]
    fn prop_get_insert_law(tree in arbitrary_tree(50), key: i32, value: i32) {
        let mut tree = tree;
        tree.insert(key, value);
        prop_assert_eq!(tree.get_value(&key), Ok(&value));
    }

    /// Law: re-inserting a present key changes neither size nor shape.
    #[test]
    fn prop_duplicate_insert_keeps_shape(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 1..100),
        pick: prop::sample::Index,
        value: i32
    ) {
        let mut tree: OrderedTree<i32, i32> = entries.iter().copied().collect();
        let (key, _) = entries[pick.index(entries.len())];
        let before = tree.to_string();
        let size = tree.size();

        tree.insert(key, value);

        prop_assert_eq!(tree.to_string(), before);
        prop_assert_eq!(tree.size(), size);
        prop_assert_eq!(tree.get_value(&key), Ok(&value));
    }
}

// =============================================================================
// Remove Laws
// =============================================================================

proptest! {
    /// Law: removing a present key returns its entry and drops only that key.
    #[test]
    fn prop_remove_returns_entry_and_drops_key(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 1..100),
        pick: prop::sample::Index
    ) {
        let mut tree: OrderedTree<i32, i32> = entries.iter().copied().collect();
        let expected: BTreeMap<i32, i32> = entries.iter().copied().collect();
        let (key, _) = entries[pick.index(entries.len())];

        let removed = tree.remove(&key).expect("key was inserted");

        prop_assert_eq!(removed.into_entry(), (key, expected[&key]));
        prop_assert!(!tree.contains(&key));
        prop_assert_eq!(tree.size(), expected.len() - 1);
        prop_assert!(expected.keys().filter(|other| **other != key).all(|other| tree.contains(other)));
    }

    /// Law: removing every key in any order leaves an empty tree.
    #[test]
    fn prop_remove_all_empties_tree(
        keys in prop::collection::vec(any::<i32>(), 0..100).prop_shuffle()
    ) {
        let mut tree: OrderedTree<i32, i32> = keys.iter().map(|&key| (key, key)).collect();
        for key in &keys {
            tree.remove(key);
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.size(), 0);
        prop_assert_eq!(tree.depth(), 0);
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }
}

// =============================================================================
// Clear Laws
// =============================================================================

proptest! {
    /// Law: clear always yields a tree equal to a new one.
    #[test]
    fn prop_clear_yields_empty_tree(tree in arbitrary_tree(100)) {
        let mut tree = tree;
        tree.clear();

        prop_assert_eq!(&tree, &OrderedTree::new());
        prop_assert!(tree.minimum().is_none());
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }
}
