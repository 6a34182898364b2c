//! Nodes of the 2-3-4 tree and their read-only view.
//!
//! A [`Node`] stores its entries and child handles in fixed-capacity arrays:
//! at most [`MAX_ENTRIES`] entries and, for internal nodes, exactly one more
//! child than entries. The structural operations that move entries between
//! nodes (split, borrow, fuse, pull-up) need the whole arena and live on
//! [`Tree`](super::Tree) in the `insert` and `delete` modules.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use arrayvec::ArrayVec;
use smallvec::SmallVec;

use super::entry::{Entry, EntryRef};
use super::{MAX_CHILDREN, MAX_ENTRIES, NodeId, Tree};

#[cfg(feature = "traversal")]
use crate::traversal::Children;

// =============================================================================
// Node Definition
// =============================================================================

/// Where a key belongs relative to the entries of one node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Search {
    /// The key is stored at this entry index.
    Found(usize),
    /// The key is not stored here; it belongs in child slot `usize`
    /// (or before entry `usize`, on a leaf).
    GoDown(usize),
}

/// Internal node structure of the 2-3-4 tree.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) entries: ArrayVec<Entry<K, V>, MAX_ENTRIES>,
    pub(crate) children: ArrayVec<NodeId, MAX_CHILDREN>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Creates a leaf holding a single entry.
    pub(crate) fn leaf(entry: Entry<K, V>, parent: Option<NodeId>) -> Self {
        let mut entries = ArrayVec::new();
        entries.push(entry);
        Self {
            entries,
            children: ArrayVec::new(),
            parent,
        }
    }

    /// Creates a node from already ordered parts.
    pub(crate) const fn from_parts(
        entries: ArrayVec<Entry<K, V>, MAX_ENTRIES>,
        children: ArrayVec<NodeId, MAX_CHILDREN>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            entries,
            children,
            parent,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// A 4-node: one more entry would overflow it.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// A 2-node: removing an entry would leave it empty.
    #[inline]
    pub(crate) fn is_minimal(&self) -> bool {
        self.entries.len() == 1
    }

    /// Walks the entries in order and reports where `key` lives or belongs.
    pub(crate) fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        for (index, entry) in self.entries.iter().enumerate() {
            match key.cmp(entry.key.borrow()) {
                Ordering::Equal => return Search::Found(index),
                Ordering::Less => return Search::GoDown(index),
                Ordering::Greater => {}
            }
        }
        Search::GoDown(self.entries.len())
    }

    /// Returns the slot `child` occupies in this node.
    pub(crate) fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&candidate| candidate == child)
    }

    /// Appends `separator` and then all of `right`'s entries and children.
    ///
    /// The caller re-parents the moved children.
    pub(crate) fn absorb(&mut self, separator: Entry<K, V>, right: Self) {
        self.entries.push(separator);
        self.entries.extend(right.entries);
        self.children.extend(right.children);
    }
}

// =============================================================================
// NodeRef Definition
// =============================================================================

/// A read-only view of one node of a [`Tree`].
///
/// `NodeRef` exposes the structural queries of a node: its entries, its
/// children, its parent and its neighbours. Two views are equal when they name
/// the same node of the same tree.
///
/// # Examples
///
/// ```rust
/// use tree234::tree::Tree;
///
/// let tree: Tree<i32, i32> = (1..=4).map(|key| (key, key)).collect();
/// let root = tree.root().unwrap();
/// let children = root.children();
///
/// assert!(root.is_root());
/// assert_eq!(children.len(), 2);
/// assert!(children[0].is_adjacent_to(&children[1]));
/// assert_eq!(children[1].parent(), Some(root));
/// ```
pub struct NodeRef<'a, K, V> {
    tree: &'a Tree<K, V>,
    id: NodeId,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    #[inline]
    pub(crate) const fn new(tree: &'a Tree<K, V>, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(self) -> &'a Node<K, V> {
        self.tree.node(self.id)
    }

    /// Returns the arena handle of this node.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the number of entries in this node (1 to 3).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.node().entry_count()
    }

    /// Returns `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Returns `true` if this node is the root of its tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Returns the entries of this node in key order.
    pub fn items(self) -> impl ExactSizeIterator<Item = EntryRef<'a, K, V>> {
        let tree = self.tree;
        let id = self.id;
        (0..self.entry_count()).map(move |index| EntryRef::new(tree, id, index))
    }

    /// Returns the keys of this node in order.
    #[must_use]
    pub fn keys(&self) -> SmallVec<[&'a K; MAX_ENTRIES]> {
        self.node().entries.iter().map(|entry| &entry.key).collect()
    }

    /// Returns the children of this node, left to right.
    #[must_use]
    pub fn children(&self) -> SmallVec<[Self; MAX_CHILDREN]> {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(|&child| Self::new(tree, child))
            .collect()
    }

    /// Returns the parent of this node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|parent| Self::new(self.tree, parent))
    }

    fn position(&self) -> Option<(&'a Node<K, V>, usize)> {
        let parent = self.tree.node(self.node().parent?);
        parent.child_position(self.id).map(|position| (parent, position))
    }

    /// Returns the sibling immediately to the left of this node.
    #[must_use]
    pub fn left_sibling(&self) -> Option<Self> {
        let (parent, position) = self.position()?;
        let sibling = parent.children.get(position.checked_sub(1)?)?;
        Some(Self::new(self.tree, *sibling))
    }

    /// Returns the sibling immediately to the right of this node.
    #[must_use]
    pub fn right_sibling(&self) -> Option<Self> {
        let (parent, position) = self.position()?;
        let sibling = parent.children.get(position + 1)?;
        Some(Self::new(self.tree, *sibling))
    }

    /// Returns `true` if `other` shares this node's parent and sits in the
    /// slot directly before or after it.
    #[must_use]
    pub fn is_adjacent_to(&self, other: &Self) -> bool {
        self.left_sibling().as_ref() == Some(other) || self.right_sibling().as_ref() == Some(other)
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K, V> PartialEq for NodeRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<K, V> Hash for NodeRef<'_, K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K: fmt::Debug, V> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("id", &self.id)
            .field("keys", &self.keys())
            .field("parent", &self.node().parent)
            .finish()
    }
}

/// Renders the node as its entries, e.g. `[<2: 3> <7: 2>]`.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (index, item) in self.items().enumerate() {
            if index > 0 {
                write!(formatter, " ")?;
            }
            write!(formatter, "{item}")?;
        }
        write!(formatter, "]")
    }
}

#[cfg(feature = "traversal")]
impl<K, V> Children for NodeRef<'_, K, V> {
    fn children(&self) -> impl IntoIterator<Item = Self> {
        Self::children(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn node_of(keys: &[i32]) -> Node<i32, ()> {
        let entries = keys.iter().map(|&key| Entry::new(key, ())).collect();
        Node::from_parts(entries, ArrayVec::new(), None)
    }

    #[rstest]
    #[case(&[10], 5, Search::GoDown(0))]
    #[case(&[10], 10, Search::Found(0))]
    #[case(&[10], 15, Search::GoDown(1))]
    #[case(&[10, 20, 30], 25, Search::GoDown(2))]
    #[case(&[10, 20, 30], 30, Search::Found(2))]
    #[case(&[10, 20, 30], 35, Search::GoDown(3))]
    fn test_search(#[case] keys: &[i32], #[case] key: i32, #[case] expected: Search) {
        assert_eq!(node_of(keys).search(&key), expected);
    }

    #[rstest]
    fn test_capacity_queries() {
        assert!(node_of(&[1]).is_minimal());
        assert!(!node_of(&[1]).is_full());
        assert!(node_of(&[1, 2, 3]).is_full());
        assert!(node_of(&[1, 2]).is_leaf());
        assert_eq!(node_of(&[1, 2]).entry_count(), 2);
    }

    #[rstest]
    fn test_absorb_appends_separator_and_right() {
        let mut left = node_of(&[1]);
        left.absorb(Entry::new(2, ()), node_of(&[3]));
        let keys: Vec<i32> = left.entries.iter().map(|entry| entry.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_siblings_and_adjacency() {
        let tree: Tree<i32, i32> = [7, 8, 4, 5, 6, 9, 3, 10, 11]
            .into_iter()
            .map(|key| (key, key))
            .collect();
        let children = tree.root().unwrap().children();
        assert_eq!(children.len(), 4);

        assert!(children[0].left_sibling().is_none());
        assert_eq!(children[0].right_sibling(), Some(children[1]));
        assert_eq!(children[3].left_sibling(), Some(children[2]));
        assert!(children[3].right_sibling().is_none());

        assert!(children[1].is_adjacent_to(&children[2]));
        assert!(!children[0].is_adjacent_to(&children[2]));
        assert!(!children[0].is_adjacent_to(&children[0]));
        assert!(!tree.root().unwrap().is_adjacent_to(&children[0]));
    }

    #[rstest]
    fn test_display() {
        let tree: Tree<i32, i32> = [(7, 2), (2, 3)].into_iter().collect();
        assert_eq!(tree.root().unwrap().to_string(), "[<2: 3> <7: 2>]");
    }
}
