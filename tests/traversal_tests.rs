#![cfg(feature = "traversal")]
//! Tests for breadth-first traversal over tree nodes and entries.

use rstest::{fixture, rstest};
use tree234::traversal::breadth_first;
use tree234::tree::{EntryRef, NodeRef, Tree};

#[fixture]
fn ten() -> Tree<i32, i32> {
    (1..=10).map(|key| (key, key)).collect()
}

fn keys(node: &NodeRef<'_, i32, i32>) -> Vec<i32> {
    node.keys().into_iter().copied().collect()
}

// =============================================================================
// Node Traversal Tests
// =============================================================================

#[rstest]
fn test_nodes_visited_level_by_level(ten: Tree<i32, i32>) {
    let mut levels = Vec::new();
    ten.traverse_breadth_first(|node| levels.push(keys(&node)));

    assert_eq!(
        levels,
        vec![
            vec![4],
            vec![2],
            vec![6, 8],
            vec![1],
            vec![3],
            vec![5],
            vec![7],
            vec![9, 10],
        ]
    );
}

#[rstest]
fn test_every_node_visited_once(ten: Tree<i32, i32>) {
    let mut visited = Vec::new();
    ten.traverse_breadth_first(|node| visited.push(node.id()));
    visited.sort();
    visited.dedup();
    assert_eq!(visited.len(), ten.node_count());
}

#[rstest]
fn test_empty_tree_visits_nothing() {
    let tree: Tree<i32, i32> = Tree::new();
    let mut count = 0;
    tree.traverse_breadth_first(|_| count += 1);
    assert_eq!(count, 0);
}

#[rstest]
fn test_subtree_walk_from_inner_node(ten: Tree<i32, i32>) {
    let inner = ten.root().unwrap().children()[1];
    let mut seen = Vec::new();
    breadth_first(inner, |node: &NodeRef<'_, i32, i32>| seen.extend(keys(node)));
    assert_eq!(seen, vec![6, 8, 5, 7, 9, 10]);
}

// =============================================================================
// Entry Traversal Tests
// =============================================================================

#[rstest]
fn test_entries_reached_through_shared_subtrees(ten: Tree<i32, i32>) {
    let first = ten.root().unwrap().items().next().unwrap();
    let mut seen = Vec::new();
    breadth_first(first, |entry: &EntryRef<'_, i32, i32>| seen.push(*entry.key()));

    // 6 and 8 share the leaf [7]; it is still listed once.
    assert_eq!(seen, vec![4, 2, 6, 8, 1, 3, 5, 7, 9, 10]);
}

#[rstest]
fn test_leaf_entry_has_no_successors() {
    let tree: Tree<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
    let last = tree.root().unwrap().items().last().unwrap();
    let mut seen = Vec::new();
    breadth_first(last, |entry: &EntryRef<'_, i32, i32>| seen.push(*entry.key()));
    assert_eq!(seen, vec![2]);
}
