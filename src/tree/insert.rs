//! Insertion with top-down preemptive splitting.
//!
//! Every full node met on the way down is split before the descent goes on,
//! so the parent of any node being split always has room for the promoted
//! entry and the leaf reached at the bottom always has room for the new one.

use std::mem;

use arrayvec::ArrayVec;

use super::entry::Entry;
use super::node::{Node, Search};
use super::{MAX_CHILDREN, NodeId, Tree};
use crate::tracing_helpers::{debug_log, trace_log};

impl<K: Ord, V> Tree<K, V> {
    /// Inserts a key-value pair into the tree.
    ///
    /// If the tree already holds `key`, its value is replaced and the
    /// previous value is returned; the number of entries does not change.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "ONE"), Some("one"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            let root = self.allocate(Node::leaf(Entry::new(key, value), None));
            debug_log!(root = %root, "created root");
            self.root = Some(root);
            self.length = 1;
            return None;
        };

        let previous = self.insert_at(root, key, value, true);
        if previous.is_none() {
            self.length += 1;
        }
        previous
    }

    /// Recursive helper for insert.
    ///
    /// With `assure_capacity`, a full node is split first and the insertion
    /// restarts from the node the split resumes at, which already has room.
    fn insert_at(&mut self, id: NodeId, key: K, value: V, assure_capacity: bool) -> Option<V> {
        if assure_capacity && let Some(resume) = self.split_if_full(id) {
            return self.insert_at(resume, key, value, false);
        }

        trace_log!(node = %id, "insert descent");
        let node = self.node_mut(id);
        match node.search(&key) {
            Search::Found(index) => Some(mem::replace(&mut node.entries[index].value, value)),
            Search::GoDown(slot) => match node.children.get(slot).copied() {
                Some(child) => self.insert_at(child, key, value, true),
                None => {
                    node.entries.insert(slot, Entry::new(key, value));
                    None
                }
            },
        }
    }

    /// Splits `id` if it holds three entries, promoting the middle one.
    ///
    /// Returns the node the insertion resumes at, or `None` when `id` was not
    /// full. A full root keeps only the middle entry and gets two fresh
    /// children; any other node keeps its first entry, hands its last entry to
    /// a new right sibling, and pushes the middle entry into its parent.
    fn split_if_full(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.node_mut(id);
        if !node.is_full() {
            return None;
        }

        let (Some(right_entry), Some(middle)) = (node.entries.pop(), node.entries.pop()) else {
            unreachable!("a full node holds three entries");
        };
        let right_children: ArrayVec<NodeId, MAX_CHILDREN> = if node.is_leaf() {
            ArrayVec::new()
        } else {
            node.children.drain(2..).collect()
        };
        let parent = node.parent;

        match parent {
            None => {
                let left_entries = mem::take(&mut node.entries);
                let left_children = mem::take(&mut node.children);

                let left = self.allocate(Node::from_parts(left_entries, left_children, Some(id)));
                let right = self.allocate(Node::from_parts(
                    ArrayVec::from_iter([right_entry]),
                    right_children,
                    Some(id),
                ));
                self.adopt_children(left);
                self.adopt_children(right);

                let root = self.node_mut(id);
                root.entries.push(middle);
                root.children.push(left);
                root.children.push(right);
                debug_log!(root = %id, left = %left, right = %right, "split root");
                Some(id)
            }
            Some(parent) => {
                let Some(position) = self.node(parent).child_position(id) else {
                    unreachable!("node {id} is missing from its parent {parent}");
                };

                let sibling = self.allocate(Node::from_parts(
                    ArrayVec::from_iter([right_entry]),
                    right_children,
                    Some(parent),
                ));
                self.adopt_children(sibling);

                let parent_node = self.node_mut(parent);
                parent_node.entries.insert(position, middle);
                parent_node.children.insert(position + 1, sibling);
                debug_log!(node = %id, sibling = %sibling, parent = %parent, "split node");
                Some(parent)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
