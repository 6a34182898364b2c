//! Structural self-check of a [`Tree`].

use super::{MAX_ENTRIES, NodeId, Tree, TreeError};

/// Key range a subtree must stay inside, both ends exclusive.
struct Bounds<'a, K> {
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

/// Totals gathered while walking the tree.
#[derive(Default)]
struct Census {
    nodes: usize,
    entries: usize,
    leaf_depth: Option<usize>,
}

impl<K: Ord, V> Tree<K, V> {
    /// Checks every structural invariant of the tree.
    ///
    /// Verifies that each node holds one to three entries in strictly
    /// increasing key order, that internal nodes have exactly one more child
    /// than entries, that child keys fall between the surrounding separator
    /// keys, that every parent handle matches the node owning the child, that
    /// all leaves share one depth, and that the entry and node totals agree
    /// with the tree's bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvariantViolation`] naming the first offending
    /// node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tree234::tree::Tree;
    ///
    /// let mut tree: Tree<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// for key in (0..100).step_by(3) {
    ///     tree.delete(&key).unwrap();
    /// }
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            if self.length != 0 || !self.nodes.is_empty() {
                return Err(TreeError::invariant(
                    NodeId::new(0),
                    "empty tree still owns entries or nodes",
                ));
            }
            return Ok(());
        };

        if self.node(root).parent.is_some() {
            return Err(TreeError::invariant(root, "root has a parent"));
        }

        let mut census = Census::default();
        let bounds = Bounds {
            lower: None,
            upper: None,
        };
        self.validate_node(root, &bounds, 1, &mut census)?;

        if census.entries != self.length {
            return Err(TreeError::invariant(
                root,
                format!("counted {} entries, expected {}", census.entries, self.length),
            ));
        }
        if census.nodes != self.nodes.len() {
            return Err(TreeError::invariant(
                root,
                format!("reached {} nodes, arena holds {}", census.nodes, self.nodes.len()),
            ));
        }
        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        bounds: &Bounds<'_, K>,
        depth: usize,
        census: &mut Census,
    ) -> Result<(), TreeError> {
        if !self.nodes.contains(id.index()) {
            return Err(TreeError::invariant(id, "dangling node handle"));
        }
        let node = self.node(id);
        let count = node.entries.len();
        if !(1..=MAX_ENTRIES).contains(&count) {
            return Err(TreeError::invariant(id, format!("holds {count} entries")));
        }

        let keys: Vec<&K> = node.entries.iter().map(|entry| &entry.key).collect();
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TreeError::invariant(id, "keys are not strictly increasing"));
        }
        if bounds.lower.is_some_and(|lower| keys[0] <= lower)
            || bounds.upper.is_some_and(|upper| keys[count - 1] >= upper)
        {
            return Err(TreeError::invariant(id, "key outside the separator range"));
        }

        census.nodes += 1;
        census.entries += count;

        if node.is_leaf() {
            return match census.leaf_depth {
                Some(expected) if expected != depth => Err(TreeError::invariant(
                    id,
                    format!("leaf at depth {depth}, expected {expected}"),
                )),
                Some(_) => Ok(()),
                None => {
                    census.leaf_depth = Some(depth);
                    Ok(())
                }
            };
        }

        if node.children.len() != count + 1 {
            return Err(TreeError::invariant(
                id,
                format!("{} children for {count} entries", node.children.len()),
            ));
        }

        for (slot, &child) in node.children.iter().enumerate() {
            if self.nodes.get(child.index()).and_then(|child| child.parent) != Some(id) {
                return Err(TreeError::invariant(child, "parent handle does not match"));
            }
            let child_bounds = Bounds {
                lower: slot.checked_sub(1).map_or(bounds.lower, |left| Some(keys[left])),
                upper: keys.get(slot).copied().or(bounds.upper),
            };
            self.validate_node(child, &child_bounds, depth + 1, census)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
