//! # tree234
//!
//! An in-memory ordered map built on a 2-3-4 tree.
//!
//! ## Overview
//!
//! Every node of a 2-3-4 tree holds one, two or three keys and every leaf
//! sits at the same depth. This crate keeps that shape with single-pass,
//! top-down algorithms:
//!
//! - **Insert**: full nodes are split on the way down, so the new key always
//!   lands in a leaf with room for it.
//! - **Delete**: 2-nodes are grown on the way down by borrowing from a
//!   sibling, fusing with one, or pulling both children up into the root.
//! - **Traversal**: in-order iteration over entries, plus a generic
//!   breadth-first walk usable over nodes or entries.
//!
//! ## Feature Flags
//!
//! - `traversal` (default): the [`traversal`] module and breadth-first walks
//! - `serde`: `Serialize`/`Deserialize` for [`Tree`](tree::Tree) as a map
//! - `fxhash`: use `rustc-hash` for the breadth-first seen-set
//! - `tracing`: emit structural events (splits, borrows, fuses) via `tracing`
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use tree234::prelude::*;
//!
//! let mut tree: Tree<i32, &str> = Tree::new();
//! for (key, value) in [(8, "eight"), (6, "six"), (9, "nine")] {
//!     tree.insert(key, value);
//! }
//! assert_eq!(tree.find(&6), Some(&"six"));
//! assert_eq!(tree.delete(&6), Ok("six"));
//! assert_eq!(tree.delete(&6), Err(TreeError::NotFound));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use tree234::prelude::*;
/// ```
pub mod prelude {
    pub use crate::tree::*;

    #[cfg(feature = "traversal")]
    pub use crate::traversal::*;
}

mod tracing_helpers;

pub mod tree;

#[cfg(feature = "traversal")]
pub mod traversal;
