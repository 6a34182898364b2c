//! Deletion with top-down borrow / fuse / pull-up rebalancing.
//!
//! Every 2-node met below the root is grown to at least two entries before
//! the descent continues, so the entry finally removed from a leaf never
//! leaves that leaf empty. Growing a node takes one of three shapes:
//!
//! - **borrow**: a sibling with spare entries lends one through the parent
//! - **pull-up**: node, sibling and a one-entry root collapse into the root
//! - **fuse**: node, sibling and the separating parent entry merge into one node
//!
//! An entry found in an internal node is swapped with its in-order successor,
//! the first entry of the leftmost leaf of its right subtree. Rebalancing on
//! the way down may move that entry into a lower node; the descent finds it
//! again by key.

use std::borrow::Borrow;
use std::mem;

use super::node::Search;
use super::{NodeId, Tree, TreeError};
use crate::tracing_helpers::{debug_log, trace_log, warn_log};

impl<K: Ord, V> Tree<K, V> {
    /// Removes `key` from the tree and returns its value.
    ///
    /// A missing key leaves the tree untouched.
    ///
    /// # Errors
    ///
    /// - [`TreeError::EmptyTree`] if the tree has no entries.
    /// - [`TreeError::NotFound`] if `key` is not present.
    /// - [`TreeError::InvariantViolation`] if rebalancing observes a node shape
    ///   a well-formed tree cannot have.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::{Tree, TreeError};
    ///
    /// let mut tree: Tree<i32, i32> = (1..=10).map(|key| (key, key * 10)).collect();
    /// assert_eq!(tree.delete(&6), Ok(60));
    /// assert_eq!(tree.delete(&6), Err(TreeError::NotFound));
    /// assert_eq!(tree.find(&6), None);
    /// assert_eq!(tree.len(), 9);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        if !self.contains_key(key) {
            return Err(TreeError::NotFound);
        }

        let (_, value) = match self.delete_from(root, key) {
            Ok(pair) => pair,
            Err(error) => {
                warn_log!(%error, "delete aborted");
                return Err(error);
            }
        };
        self.length -= 1;
        Ok(value)
    }

    /// Removes `key` from the tree, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let mut tree: Tree<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(tree.remove(&1), Some("one"));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.delete(key).ok()
    }

    /// Walks down from `start`, repairing 2-nodes, until the entry for `key`
    /// can be taken out of a leaf.
    fn delete_from<Q>(&mut self, start: NodeId, key: &Q) -> Result<(K, V), TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = start;
        // Node holding the internal entry that the successor will replace.
        let mut replace_in: Option<NodeId> = None;

        loop {
            current = self.fix_underflow(current)?;
            trace_log!(node = %current, "delete descent");

            let node = self.node(current);
            let search = node.search(key);
            match (search, node.children.is_empty()) {
                (Search::Found(index), true) => return self.remove_from_leaf(current, index),
                (Search::Found(index), false) => {
                    replace_in = Some(current);
                    current = node.children[index + 1];
                }
                (Search::GoDown(_), true) => {
                    return match replace_in {
                        Some(holder) => self.replace_with_successor(holder, current, key),
                        None => Err(TreeError::NotFound),
                    };
                }
                (Search::GoDown(slot), false) => current = node.children[slot],
            }
        }
    }

    /// Splices entry `index` out of `leaf`, releasing the leaf if it was the
    /// root's last entry.
    fn remove_from_leaf(&mut self, leaf: NodeId, index: usize) -> Result<(K, V), TreeError> {
        let node = self.node_mut(leaf);
        let entry = node
            .entries
            .pop_at(index)
            .ok_or_else(|| TreeError::invariant(leaf, "leaf entry vanished"))?;

        if node.entries.is_empty() {
            if node.parent.is_some() {
                return Err(TreeError::invariant(leaf, "non-root leaf emptied"));
            }
            self.release(leaf);
            self.root = None;
            debug_log!(root = %leaf, "released last node");
        }
        Ok(entry.into_pair())
    }

    /// Moves the first entry of `leaf` into the slot of `key` inside `holder`
    /// and returns the entry it replaces.
    fn replace_with_successor<Q>(
        &mut self,
        holder: NodeId,
        leaf: NodeId,
        key: &Q,
    ) -> Result<(K, V), TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let successor = self
            .node_mut(leaf)
            .entries
            .pop_at(0)
            .ok_or_else(|| TreeError::invariant(leaf, "successor leaf is empty"))?;

        let holder_node = self.node_mut(holder);
        let Search::Found(index) = holder_node.search(key) else {
            return Err(TreeError::invariant(holder, "replaced entry left its node"));
        };
        let removed = mem::replace(&mut holder_node.entries[index], successor);
        Ok(removed.into_pair())
    }

    /// Grows a non-root 2-node to at least two entries.
    ///
    /// Returns the node the descent continues from: `id` itself after a
    /// borrow, the merged node after a fuse, the root after a pull-up.
    fn fix_underflow(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let node = self.node(id);
        let Some(parent) = node.parent else {
            return Ok(id);
        };
        if !node.is_minimal() {
            return Ok(id);
        }

        let parent_node = self.node(parent);
        let position = parent_node
            .child_position(id)
            .ok_or_else(|| TreeError::invariant(id, "node is missing from its parent"))?;
        let left = position
            .checked_sub(1)
            .and_then(|left| parent_node.children.get(left).copied());
        let right = parent_node.children.get(position + 1).copied();

        if left.is_some_and(|left| !self.node(left).is_minimal()) {
            self.borrow_from_left(parent, position)?;
            return Ok(id);
        }
        if right.is_some_and(|right| !self.node(right).is_minimal()) {
            self.borrow_from_right(parent, position)?;
            return Ok(id);
        }
        if parent_node.is_minimal() {
            return self.pull_up(parent);
        }
        self.fuse(parent, position)
    }

    /// Rotates the last entry of the left sibling up through the parent and
    /// the parent's separator down into child `position`.
    fn borrow_from_left(&mut self, parent: NodeId, position: usize) -> Result<(), TreeError> {
        let parent_node = self.node(parent);
        let (left, current) = (parent_node.children[position - 1], parent_node.children[position]);

        let left_node = self.node_mut(left);
        let lent = left_node
            .entries
            .pop()
            .ok_or_else(|| TreeError::invariant(left, "left sibling has no entry to lend"))?;
        let moved_child = left_node.children.pop();

        let separator = mem::replace(&mut self.node_mut(parent).entries[position - 1], lent);
        let current_node = self.node_mut(current);
        current_node.entries.insert(0, separator);
        if let Some(child) = moved_child {
            current_node.children.insert(0, child);
            self.node_mut(child).parent = Some(current);
        }
        debug_log!(node = %current, sibling = %left, "borrowed from left sibling");
        Ok(())
    }

    /// Rotates the first entry of the right sibling up through the parent and
    /// the parent's separator down into child `position`.
    fn borrow_from_right(&mut self, parent: NodeId, position: usize) -> Result<(), TreeError> {
        let parent_node = self.node(parent);
        let (current, right) = (parent_node.children[position], parent_node.children[position + 1]);

        let right_node = self.node_mut(right);
        let lent = right_node
            .entries
            .pop_at(0)
            .ok_or_else(|| TreeError::invariant(right, "right sibling has no entry to lend"))?;
        let moved_child = right_node.children.pop_at(0);

        let separator = mem::replace(&mut self.node_mut(parent).entries[position], lent);
        let current_node = self.node_mut(current);
        current_node.entries.push(separator);
        if let Some(child) = moved_child {
            current_node.children.push(child);
            self.node_mut(child).parent = Some(current);
        }
        debug_log!(node = %current, sibling = %right, "borrowed from right sibling");
        Ok(())
    }

    /// Collapses a one-entry root and its two 2-node children into the root.
    ///
    /// The tree loses one level.
    fn pull_up(&mut self, root: NodeId) -> Result<NodeId, TreeError> {
        let root_node = self.node_mut(root);
        if root_node.parent.is_some() {
            return Err(TreeError::invariant(root, "pull-up below the root"));
        }
        let &[left, right] = root_node.children.as_slice() else {
            return Err(TreeError::invariant(root, "one-entry node without two children"));
        };
        let separator = root_node
            .entries
            .pop()
            .ok_or_else(|| TreeError::invariant(root, "one-entry node lost its entry"))?;
        root_node.children.clear();

        let right_node = self.release(right);
        let mut merged = self.release(left);
        merged.absorb(separator, right_node);

        let root_node = self.node_mut(root);
        root_node.entries = merged.entries;
        root_node.children = merged.children;
        self.adopt_children(root);
        debug_log!(root = %root, "pulled children up into root");
        Ok(root)
    }

    /// Merges child `position` with its left sibling (or its right sibling
    /// when it is the first child) and the separator between them.
    fn fuse(&mut self, parent: NodeId, position: usize) -> Result<NodeId, TreeError> {
        let left_position = position.saturating_sub(1);
        let parent_node = self.node_mut(parent);
        let separator = parent_node
            .entries
            .pop_at(left_position)
            .ok_or_else(|| TreeError::invariant(parent, "missing separator for fuse"))?;
        let right = parent_node
            .children
            .pop_at(left_position + 1)
            .ok_or_else(|| TreeError::invariant(parent, "missing sibling for fuse"))?;
        let left = parent_node.children[left_position];

        let right_node = self.release(right);
        self.node_mut(left).absorb(separator, right_node);
        self.adopt_children(left);
        debug_log!(node = %left, released = %right, parent = %parent, "fused siblings");
        Ok(left)
    }
}

// =============================================================================
// Tests
// =============================================================================
