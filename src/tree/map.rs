//! The [`Tree`] map type: storage, lookups, traversal and trait impls.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use slab::Slab;

use super::NodeId;
use super::node::{Node, NodeRef, Search};

// =============================================================================
// Tree Definition
// =============================================================================

/// An in-memory ordered map implemented as a 2-3-4 tree.
///
/// Keys must implement `Ord`. Every node holds one to three entries in key
/// order, every internal node has one more child than it has entries, and
/// every leaf sits at the same depth.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `find`         | O(log N)          |
/// | `insert`       | O(log N)          |
/// | `delete`       | O(log N)          |
/// | `min`/`max`    | O(log N)          |
/// | `depth`        | O(log N)          |
/// | `iter`         | O(N)              |
/// | `len`          | O(1)              |
/// | `node_count`   | O(1)              |
///
/// # Examples
///
/// ```rust
/// use tree234::tree::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert(3, "three");
/// tree.insert(1, "one");
/// tree.insert(2, "two");
///
/// let keys: Vec<&i32> = tree.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
///
/// // Inserting an existing key replaces its value.
/// assert_eq!(tree.insert(1, "ONE"), Some("one"));
/// assert_eq!(tree.find(&1), Some(&"ONE"));
/// ```
#[derive(Clone)]
pub struct Tree<K, V> {
    /// Arena owning every node of the tree
    pub(super) nodes: Slab<Node<K, V>>,
    /// Root node, `None` while the tree is empty
    pub(super) root: Option<NodeId>,
    /// Number of entries
    pub(super) length: usize,
}

impl<K, V> Tree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let tree: Tree<i32, String> = Tree::new();
    /// assert!(tree.is_empty());
    /// assert!(tree.root().is_none());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of nodes currently allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let tree: Tree<i32, i32> = [(11, 1), (2, 3), (7, 2), (8, 2)].into_iter().collect();
    /// assert_eq!(tree.node_count(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of levels in the tree, 0 when empty.
    ///
    /// All leaves share the same depth, so following the leftmost path is
    /// enough.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.root;
        while let Some(id) = current {
            depth += 1;
            current = self.node(id).children.first().copied();
        }
        depth
    }

    /// Removes every entry and releases every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.length = 0;
    }

    /// Returns a view of the root node, or `None` when the tree is empty.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|root| NodeRef::new(self, root))
    }

    /// Returns a view of the node with the given handle, if it is allocated.
    #[must_use]
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_, K, V>> {
        self.nodes
            .contains(id.index())
            .then(|| NodeRef::new(self, id))
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        NodeId::new(self.nodes.insert(node))
    }

    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        self.nodes.remove(id.index())
    }

    /// Points the parent handle of every child of `id` back at `id`.
    pub(crate) fn adopt_children(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.node_mut(child).parent = Some(id);
        }
    }

    /// Returns the smallest entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let tree: Tree<i32, &str> = [(3, "three"), (1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(tree.min(), Some((&1, &"one")));
    /// assert_eq!(tree.max(), Some((&3, &"three")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut node = self.node(self.root?);
        while let Some(&child) = node.children.first() {
            node = self.node(child);
        }
        node.entries.first().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the largest entry.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut node = self.node(self.root?);
        while let Some(&child) = node.children.last() {
            node = self.node(child);
        }
        node.entries.last().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let tree: Tree<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
    /// let entries: Vec<_> = tree.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"a"), (&2, &"b")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> TreeIterator<'_, K, V> {
        let mut entries = Vec::with_capacity(self.length);
        self.traverse(|key, value| entries.push((key, value)));
        TreeIterator {
            entries,
            current_index: 0,
        }
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Calls `function` for every entry in ascending key order.
    ///
    /// For each node: the subtree left of the first entry, the entry, the
    /// subtree right of it, then the next entry, and so on.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let tree: Tree<i32, i32> = (1..=10).map(|key| (key, key * key)).collect();
    /// let mut sum = 0;
    /// tree.traverse(|_, value| sum += value);
    /// assert_eq!(sum, 385);
    /// ```
    pub fn traverse<'a, F>(&'a self, mut function: F)
    where
        F: FnMut(&'a K, &'a V),
    {
        if let Some(root) = self.root {
            self.traverse_node(root, &mut function);
        }
    }

    fn traverse_node<'a, F>(&'a self, id: NodeId, function: &mut F)
    where
        F: FnMut(&'a K, &'a V),
    {
        let node = self.node(id);
        for (index, entry) in node.entries.iter().enumerate() {
            if let Some(&left) = node.children.get(index) {
                self.traverse_node(left, function);
            }
            function(&entry.key, &entry.value);
        }
        if let Some(&last) = node.children.get(node.entries.len()) {
            self.traverse_node(last, function);
        }
    }

    /// Calls `visitor` once for every node, breadth-first from the root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let tree: Tree<i32, i32> = (1..=10).map(|key| (key, key)).collect();
    /// let mut visited = Vec::new();
    /// tree.traverse_breadth_first(|node| visited.push(node.entry_count()));
    ///
    /// assert_eq!(visited.len(), tree.node_count());
    /// assert_eq!(visited[0], tree.root().unwrap().entry_count());
    /// ```
    #[cfg(feature = "traversal")]
    pub fn traverse_breadth_first<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeRef<'_, K, V>),
    {
        if let Some(root) = self.root() {
            crate::traversal::breadth_first(root, |node| visitor(*node));
        }
    }

    fn drain_node(nodes: &mut Slab<Node<K, V>>, id: NodeId, output: &mut Vec<(K, V)>) {
        let node = nodes.remove(id.index());
        let mut children = node.children.into_iter();
        for entry in node.entries {
            if let Some(left) = children.next() {
                Self::drain_node(nodes, left, output);
            }
            output.push(entry.into_pair());
        }
        if let Some(last) = children.next() {
            Self::drain_node(nodes, last, output);
        }
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Returns a reference to the value stored under `key`.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    /// A missing key, including any key of an empty tree, is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.find("hello"), None);
    ///
    /// tree.insert("hello".to_string(), 42);
    /// assert_eq!(tree.find("hello"), Some(&42));
    /// assert_eq!(tree.find("world"), None);
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_from_node(self.root, key)
    }

    /// Recursive helper for find.
    fn find_from_node<Q>(&self, id: Option<NodeId>, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        id.and_then(|id| {
            let node = self.node(id);
            match node.search(key) {
                Search::Found(index) => Some(&node.entries[index].value),
                Search::GoDown(slot) => self.find_from_node(node.children.get(slot).copied(), key),
            }
        })
    }

    /// Alias of [`find`](Self::find).
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key)
    }

    /// Returns `true` if the tree holds a value for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let mut tree: Tree<i32, i32> = [(1, 10)].into_iter().collect();
    /// if let Some(value) = tree.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(tree.find(&1), Some(&11));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root?;
        loop {
            match self.node(current).search(key) {
                Search::Found(index) => {
                    return Some(&mut self.node_mut(current).entries[index].value);
                }
                Search::GoDown(slot) => current = *self.node(current).children.get(slot)?,
            }
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`Tree`] in key order.
pub struct TreeIterator<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    current_index: usize,
}

impl<'a, K, V> Iterator for TreeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.current_index).copied()?;
        self.current_index += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for TreeIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

/// An owning iterator over key-value pairs of a [`Tree`] in key order.
pub struct TreeIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for TreeIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for TreeIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for Tree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for Tree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for Tree<K, V> {
    type Item = (K, V);
    type IntoIter = TreeIntoIterator<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.length);
        if let Some(root) = self.root.take() {
            Self::drain_node(&mut self.nodes, root, &mut entries);
        }
        TreeIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = TreeIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Tree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for Tree<K, V> {}

/// Hashes the length, then every (key, value) pair in key order, so trees
/// holding the same entries hash alike whatever their shape.
impl<K: Hash, V: Hash> Hash for Tree<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Tree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for Tree<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct TreeVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> TreeVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for TreeVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = Tree<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut tree = Tree::new();
        while let Some((key, value)) = access.next_entry()? {
            tree.insert(key, value);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Tree<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn squares(count: i32) -> Tree<i32, i32> {
        (1..=count).map(|key| (key, key * key)).collect()
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_tree() {
        let tree: Tree<i32, String> = Tree::new();
        assert_eq!(format!("{tree}"), "{}");
    }

    #[rstest]
    fn test_display_multiple_elements_sorted() {
        let tree: Tree<i32, String> = [
            (3, "three".to_string()),
            (1, "one".to_string()),
            (2, "two".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(format!("{tree}"), "{1: one, 2: two, 3: three}");
        assert_eq!(format!("{tree:?}"), r#"{1: "one", 2: "two", 3: "three"}"#);
    }

    // =========================================================================
    // Lookup Tests
    // =========================================================================

    #[rstest]
    fn test_find_on_empty_tree() {
        let tree: Tree<i32, i32> = Tree::new();
        assert_eq!(tree.find(&1), None);
        assert!(!tree.contains_key(&1));
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        assert_eq!(tree.depth(), 0);
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(64)]
    #[case(500)]
    fn test_find_every_key(#[case] count: i32) {
        let tree = squares(count);
        for key in 1..=count {
            assert_eq!(tree.find(&key), Some(&(key * key)));
        }
        assert_eq!(tree.find(&0), None);
        assert_eq!(tree.find(&(count + 1)), None);
    }

    #[rstest]
    fn test_get_mut_updates_in_place() {
        let mut tree = squares(20);
        *tree.get_mut(&13).unwrap() = -1;
        assert_eq!(tree.get(&13), Some(&-1));
        assert_eq!(tree.get_mut(&21), None);
    }

    #[rstest]
    fn test_min_max() {
        let tree = squares(50);
        assert_eq!(tree.min(), Some((&1, &1)));
        assert_eq!(tree.max(), Some((&50, &2500)));
    }

    // =========================================================================
    // Traversal Tests
    // =========================================================================

    #[rstest]
    fn test_iter_sorted() {
        let tree: Tree<i32, i32> = [5, 3, 9, 1, 7, 2, 8].into_iter().map(|key| (key, 0)).collect();
        let keys: Vec<i32> = tree.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3, 5, 7, 8, 9]);
        assert_eq!(tree.iter().len(), 7);
    }

    #[rstest]
    fn test_into_iter_releases_nodes_in_order() {
        let tree = squares(30);
        let entries: Vec<(i32, i32)> = tree.into_iter().collect();
        assert_eq!(entries.len(), 30);
        assert!(entries.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[rstest]
    fn test_depth_and_node_count() {
        let tree = squares(10);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.node_count(), 8);
    }

    #[rstest]
    fn test_clear() {
        let mut tree = squares(10);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert!(tree.root().is_none());
    }

    #[rstest]
    fn test_node_ref_for_released_handle() {
        let tree = squares(3);
        let root = tree.root().unwrap().id();
        assert!(tree.node_ref(root).is_some());
        assert!(tree.node_ref(NodeId::new(root.index() + 100)).is_none());
    }

    // =========================================================================
    // Equality Tests
    // =========================================================================

    #[rstest]
    fn test_eq_ignores_shape() {
        let ascending = squares(12);
        let descending: Tree<i32, i32> = (1..=12).rev().map(|key| (key, key * key)).collect();
        assert_eq!(ascending, descending);
        assert_ne!(ascending, squares(11));
    }

    #[rstest]
    fn test_clone_is_independent() {
        let original = squares(5);
        let mut copy = original.clone();
        copy.insert(6, 36);
        assert_eq!(original.len(), 5);
        assert_eq!(copy.len(), 6);
    }
}
