//! Error type for tree operations.

use thiserror::Error;

use super::NodeId;

/// Errors reported by [`Tree`](super::Tree) operations.
///
/// A missing key is not fatal: [`Tree::find`](super::Tree::find) reports it
/// as `None`, and [`Tree::delete`](super::Tree::delete) reports it as
/// [`TreeError::NotFound`] without touching the tree.
///
/// # Examples
///
/// ```rust
/// use tree234::tree::{Tree, TreeError};
///
/// let mut tree: Tree<i32, &str> = Tree::new();
/// assert_eq!(tree.delete(&1), Err(TreeError::EmptyTree));
///
/// tree.insert(1, "one");
/// assert_eq!(tree.delete(&2), Err(TreeError::NotFound));
/// assert_eq!(TreeError::NotFound.to_string(), "key not found");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The key is not present in the tree.
    #[error("key not found")]
    NotFound,
    /// The operation needs at least one entry but the tree has no root.
    #[error("tree is empty")]
    EmptyTree,
    /// A node was observed in a shape a well-formed 2-3-4 tree cannot have.
    #[error("invariant violated at node {node}: {reason}")]
    InvariantViolation {
        /// The node where the violation was observed.
        node: NodeId,
        /// What was wrong with it.
        reason: String,
    },
}

impl TreeError {
    /// Creates an invariant violation error for `node`.
    pub(crate) fn invariant(node: NodeId, reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            node,
            reason: reason.into(),
        }
    }
}
