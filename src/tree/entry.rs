//! Key/value entries and their read-only view.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use smallvec::SmallVec;

use super::node::NodeRef;
use super::{MAX_ENTRIES, NodeId, Tree};

#[cfg(feature = "traversal")]
use crate::traversal::Children;

// =============================================================================
// Entry Definition
// =============================================================================

/// One key/value slot inside a node.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

// =============================================================================
// EntryRef Definition
// =============================================================================

/// A read-only view of one entry of a [`Tree`].
///
/// Besides the key and value, the view exposes the entry's links: the
/// subtree to its left, the subtree to its right, and the next entry of the
/// same node.
///
/// # Examples
///
/// ```rust
/// use tree234::tree::Tree;
///
/// let tree: Tree<i32, &str> = [(1, "a"), (2, "b"), (3, "c"), (4, "d")].into_iter().collect();
/// let root = tree.root().unwrap();
/// let separator = root.items().next().unwrap();
///
/// assert_eq!(separator.key(), &2);
/// assert_eq!(separator.left().unwrap().keys().as_slice(), &[&1]);
/// assert_eq!(separator.right().unwrap().keys().as_slice(), &[&3, &4]);
/// assert!(separator.next().is_none());
/// ```
pub struct EntryRef<'a, K, V> {
    tree: &'a Tree<K, V>,
    node: NodeId,
    index: usize,
}

impl<'a, K, V> EntryRef<'a, K, V> {
    #[inline]
    pub(crate) const fn new(tree: &'a Tree<K, V>, node: NodeId, index: usize) -> Self {
        Self { tree, node, index }
    }

    fn entry(&self) -> &'a Entry<K, V> {
        &self.tree.node(self.node).entries[self.index]
    }

    /// Returns the key of this entry.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.entry().key
    }

    /// Returns the value of this entry.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.entry().value
    }

    /// Returns the key and value of this entry.
    #[must_use]
    pub fn as_pair(&self) -> (&'a K, &'a V) {
        let entry = self.entry();
        (&entry.key, &entry.value)
    }

    /// Returns the position of this entry inside its node.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the node holding this entry.
    #[must_use]
    pub const fn node(&self) -> NodeRef<'a, K, V> {
        NodeRef::new(self.tree, self.node)
    }

    /// Returns the subtree holding the keys just below this entry.
    ///
    /// Always `None` for entries of a leaf.
    #[must_use]
    pub fn left(&self) -> Option<NodeRef<'a, K, V>> {
        self.child_at(self.index)
    }

    /// Returns the subtree holding the keys just above this entry.
    ///
    /// Always `None` for entries of a leaf.
    #[must_use]
    pub fn right(&self) -> Option<NodeRef<'a, K, V>> {
        self.child_at(self.index + 1)
    }

    /// Returns the next entry of the same node, if any.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        let next_index = self.index + 1;
        (next_index < self.tree.node(self.node).entry_count())
            .then(|| Self::new(self.tree, self.node, next_index))
    }

    fn child_at(&self, slot: usize) -> Option<NodeRef<'a, K, V>> {
        self.tree
            .node(self.node)
            .children
            .get(slot)
            .map(|&child| NodeRef::new(self.tree, child))
    }

    /// Returns every entry of the left and right subtree roots, left first.
    ///
    /// Two neighbouring entries share a subtree, so their results overlap.
    #[must_use]
    pub fn child_entries(&self) -> SmallVec<[Self; 2 * MAX_ENTRIES]> {
        self.left()
            .into_iter()
            .chain(self.right())
            .flat_map(|child| child.items())
            .collect()
    }
}

impl<K, V> Clone for EntryRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for EntryRef<'_, K, V> {}

impl<K, V> PartialEq for EntryRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.node == other.node && self.index == other.index
    }
}

impl<K, V> Eq for EntryRef<'_, K, V> {}

impl<K, V> Hash for EntryRef<'_, K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
        self.index.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntryRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EntryRef")
            .field("node", &self.node)
            .field("index", &self.index)
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for EntryRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<{}: {}>", self.key(), self.value())
    }
}

#[cfg(feature = "traversal")]
impl<K, V> Children for EntryRef<'_, K, V> {
    fn children(&self) -> impl IntoIterator<Item = Self> {
        self.child_entries()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_tree() -> Tree<i32, i32> {
        (1..=7).map(|key| (key, key * 10)).collect()
    }

    #[rstest]
    fn test_entry_into_pair() {
        let entry = Entry::new(1, "one");
        assert_eq!(entry.into_pair(), (1, "one"));
    }

    #[rstest]
    fn test_next_walks_the_node() {
        let tree: Tree<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        let first = tree.root().unwrap().items().next().unwrap();
        let second = first.next().unwrap();
        let third = second.next().unwrap();

        assert_eq!(first.key(), &1);
        assert_eq!(second.key(), &2);
        assert_eq!(third.key(), &3);
        assert!(third.next().is_none());
    }

    #[rstest]
    fn test_leaf_entry_has_no_subtrees() {
        let tree: Tree<i32, i32> = [(1, 1)].into_iter().collect();
        let entry = tree.root().unwrap().items().next().unwrap();
        assert!(entry.left().is_none());
        assert!(entry.right().is_none());
        assert!(entry.child_entries().is_empty());
    }

    #[rstest]
    fn test_neighbouring_entries_share_a_subtree() {
        let tree = sample_tree();
        let root = tree.root().unwrap();
        let items: Vec<_> = root.items().collect();
        assert_eq!(items.len(), 2);

        for pair in items.windows(2) {
            assert!(pair[0].right().is_some());
            assert_eq!(pair[0].right(), pair[1].left());
        }
        assert_eq!(items[0].child_entries().len(), 2);
    }

    #[rstest]
    fn test_display_and_pair() {
        let tree: Tree<i32, &str> = [(5, "five")].into_iter().collect();
        let entry = tree.root().unwrap().items().next().unwrap();
        assert_eq!(entry.to_string(), "<5: five>");
        assert_eq!(entry.as_pair(), (&5, &"five"));
        assert_eq!(entry.index(), 0);
        assert_eq!(entry.node(), tree.root().unwrap());
    }
}
