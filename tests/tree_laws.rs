//! Property-based tests for Tree.
//!
//! These tests check Tree against `BTreeMap` as a model and verify that the
//! structural invariants survive arbitrary sequences of inserts and deletes.

use std::collections::BTreeMap;

use proptest::prelude::*;
use tree234::tree::{Tree, TreeError};

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Clone, Debug)]
enum Operation {
    Insert(i16, i32),
    Delete(i16),
}

/// Small key space so that deletes hit existing keys often.
fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-64i16..64, any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
        2 => (-64i16..64).prop_map(Operation::Delete),
    ]
}

fn arbitrary_tree(max_size: usize) -> impl Strategy<Value = Tree<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect())
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: any sequence of operations leaves Tree and BTreeMap holding the
    /// same entries, and every operation reports the same outcome.
    #[test]
    fn prop_agrees_with_btreemap(operations in prop::collection::vec(operation(), 0..300)) {
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    prop_assert_eq!(tree.insert(key, value), model.insert(key, value));
                }
                Operation::Delete(key) => {
                    let expected = match model.remove(&key) {
                        Some(value) => Ok(value),
                        None if tree.is_empty() => Err(TreeError::EmptyTree),
                        None => Err(TreeError::NotFound),
                    };
                    prop_assert_eq!(tree.delete(&key), expected);
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert!(tree.iter().eq(model.iter()));
    }

    /// Law: the tree stays well formed after every single operation.
    #[test]
    fn prop_invariants_hold_after_every_operation(
        operations in prop::collection::vec(operation(), 0..300)
    ) {
        let mut tree = Tree::new();
        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    tree.insert(key, value);
                }
                Operation::Delete(key) => {
                    let _ = tree.delete(&key);
                }
            }
            prop_assert_eq!(tree.validate(), Ok(()));
        }
    }
}

// =============================================================================
// Find-Insert-Delete Laws
// =============================================================================

proptest! {
    /// Law: find after insert returns the inserted value.
    #[test]
    fn prop_find_insert_law(mut tree in arbitrary_tree(64), key: i32, value: i32) {
        tree.insert(key, value);
        prop_assert_eq!(tree.find(&key), Some(&value));
    }

    /// Law: find after delete returns None.
    #[test]
    fn prop_find_delete_law(mut tree in arbitrary_tree(64), key: i32) {
        let _ = tree.delete(&key);
        prop_assert_eq!(tree.find(&key), None);
    }

    /// Law: delete does not affect other keys.
    #[test]
    fn prop_delete_preserves_other_keys(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 1..64),
        index: prop::sample::Index
    ) {
        let mut tree: Tree<i32, i32> = entries.iter().copied().collect();
        let before = tree.clone();
        let (removed, _) = entries[index.index(entries.len())];

        prop_assert!(tree.delete(&removed).is_ok());
        for (key, value) in &before {
            if *key != removed {
                prop_assert_eq!(tree.find(key), Some(value));
            }
        }
        prop_assert_eq!(tree.len(), before.len() - 1);
    }

    /// Law: a missing key leaves the tree exactly as it was.
    #[test]
    fn prop_delete_missing_is_noop(tree in arbitrary_tree(64), key: i32) {
        prop_assume!(!tree.contains_key(&key));
        let mut after = tree.clone();
        prop_assert!(after.delete(&key).is_err());
        prop_assert_eq!(after.node_count(), tree.node_count());
        prop_assert_eq!(after, tree);
    }
}

// =============================================================================
// Shape Laws
// =============================================================================

proptest! {
    /// Law: in-order traversal yields strictly increasing keys.
    #[test]
    fn prop_traversal_is_sorted(tree in arbitrary_tree(200)) {
        let keys: Vec<i32> = tree.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(keys.len(), tree.len());
    }

    /// Law: a 2-3-4 tree of depth d holds between 2^d - 1 and 4^d - 1
    /// entries.
    #[test]
    fn prop_depth_is_logarithmic(tree in arbitrary_tree(500)) {
        let depth = u32::try_from(tree.depth()).unwrap();
        prop_assert!(2usize.pow(depth) - 1 <= tree.len());
        prop_assert!(4usize.pow(depth) - 1 >= tree.len());
    }

    /// Law: node count lies between N / 3 and N.
    #[test]
    fn prop_node_count_is_bounded(tree in arbitrary_tree(500)) {
        prop_assert!(tree.node_count() <= tree.len());
        prop_assert!(tree.node_count() * 3 >= tree.len());
    }
}
