//! In-memory ordered map built on a 2-3-4 tree.
//!
//! This module provides [`Tree`], a mutable ordered map where every node holds
//! one to three sorted entries and every internal node has exactly one more
//! child than it has entries.
//!
//! # Overview
//!
//! - O(log N) find
//! - O(log N) insert, with top-down preemptive splitting
//! - O(log N) delete, with top-down borrow / fuse / pull-up rebalancing
//! - O(N) in-order and breadth-first traversal
//! - O(1) len and `is_empty`
//!
//! Every structural repair is done on the way down, before the descent
//! continues, so the leaf reached at the bottom can always be mutated
//! without touching the levels above it again.
//!
//! # Examples
//!
//! ```rust
//! use tree234::tree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert(11, "eleven");
//! tree.insert(2, "two");
//! tree.insert(7, "seven");
//! assert_eq!(tree.depth(), 1);
//!
//! // A fourth key splits the full root.
//! tree.insert(8, "eight");
//! assert_eq!(tree.depth(), 2);
//! assert_eq!(tree.node_count(), 3);
//!
//! assert_eq!(tree.find(&7), Some(&"seven"));
//! assert_eq!(tree.delete(&7), Ok("seven"));
//! assert_eq!(tree.find(&7), None);
//! ```
//!
//! # Internal Structure
//!
//! Nodes live in a [`slab::Slab`] arena owned by the tree and refer to each
//! other through [`NodeId`] handles. Ownership flows strictly top-down; the
//! parent handle stored in each node is bookkeeping only.
//!
//! Entry `i` of a node sits between child slot `i` (its left subtree) and
//! child slot `i + 1` (its right subtree), so neighbouring entries share the
//! child between them.

use std::fmt;

mod delete;
mod entry;
mod error;
mod insert;
mod map;
mod node;
mod validate;

pub use entry::EntryRef;
pub use error::TreeError;
pub use map::Tree;
pub use map::TreeIntoIterator;
pub use map::TreeIterator;
pub use node::NodeRef;

/// Maximum number of entries a node may hold (a 4-node).
pub const MAX_ENTRIES: usize = 3;

/// Maximum number of children an internal node may hold.
pub const MAX_CHILDREN: usize = MAX_ENTRIES + 1;

/// Handle of a node inside a [`Tree`]'s arena.
///
/// Handles are only meaningful for the tree that produced them and may be
/// reused once the node they named has been released by a fuse or pull-up.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index of this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "n{}", self.0)
    }
}

static_assertions::assert_impl_all!(NodeId: Copy, Send, Sync, std::hash::Hash);
static_assertions::assert_impl_all!(Tree<i32, String>: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(TreeError: std::error::Error, Send, Sync);
