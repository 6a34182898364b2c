//! Breadth-first traversal over anything that can list its children.
//!
//! [`breadth_first`] visits a start item, then every item reachable through
//! [`Children::children`], level by level. Items already seen are skipped, so
//! structures whose children overlap (neighbouring tree entries share a
//! subtree) or that contain cycles are still visited once per item.
//!
//! # Examples
//!
//! ```rust
//! use tree234::traversal::{Children, breadth_first};
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Heap(u32);
//!
//! impl Children for Heap {
//!     fn children(&self) -> impl IntoIterator<Item = Self> {
//!         [2 * self.0, 2 * self.0 + 1]
//!             .into_iter()
//!             .filter(|&index| index <= 7)
//!             .map(Heap)
//!     }
//! }
//!
//! let mut order = Vec::new();
//! breadth_first(Heap(1), |node| order.push(node.0));
//! assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7]);
//! ```

use std::collections::VecDeque;
use std::hash::Hash;

#[cfg(feature = "fxhash")]
type SeenSet<T> = rustc_hash::FxHashSet<T>;

#[cfg(not(feature = "fxhash"))]
type SeenSet<T> = std::collections::HashSet<T>;

/// An item whose successors can be enumerated.
///
/// Implemented by [`NodeRef`](crate::tree::NodeRef), whose children are its
/// child nodes, and by [`EntryRef`](crate::tree::EntryRef), whose children are
/// the entries of its left and right subtrees.
pub trait Children: Sized {
    /// Returns the direct successors of this item, in visiting order.
    fn children(&self) -> impl IntoIterator<Item = Self>;
}

/// Visits `start` and everything reachable from it, breadth-first.
///
/// Each item is passed to `visitor` exactly once, in the order it was first
/// discovered.
///
/// # Complexity
///
/// O(V + E) where V is the number of reachable items and E the number of
/// child links followed.
pub fn breadth_first<T, F>(start: T, mut visitor: F)
where
    T: Children + Clone + Eq + Hash,
    F: FnMut(&T),
{
    let mut seen = SeenSet::default();
    let mut queue = VecDeque::new();
    seen.insert(start.clone());
    queue.push_back(start);

    while let Some(item) = queue.pop_front() {
        visitor(&item);
        for child in item.children() {
            if seen.insert(child.clone()) {
                queue.push_back(child);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
