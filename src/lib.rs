//! # ordtree
//!
//! An in-memory ordered map backed by a self-balancing binary search tree.
//!
//! ## Overview
//!
//! [`OrderedTree`] maps keys with a total order to values. Nodes link to
//! their parents, so the tree can be walked in key order from any node
//! without an auxiliary list:
//!
//! - **Map operations**: insert (replacing on duplicate keys), get,
//!   `get_value`, contains, remove, clear
//! - **Aggregate queries**: size, depth
//! - **Navigation**: minimum, maximum, successor, predecessor
//!
//! ## Feature Flags
//!
//! - `tree`: the tree module (default)
//! - `serde`: `Serialize`/`Deserialize` for [`OrderedTree`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use ordtree::prelude::*;
//!
//! let mut tree = OrderedTree::new();
//! tree.insert(10, 10);
//! tree.insert(4, 4);
//! tree.insert(7, 7);
//!
//! assert_eq!(tree.size(), 3);
//! assert_eq!(tree.minimum().map(|node| *node.key()), Some(4));
//! assert!(matches!(tree.get_value(&1), Err(TreeError::KeyNotFound { .. })));
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
/// use ordtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::TreeError;

    #[cfg(feature = "tree")]
    pub use crate::tree::*;
}

mod error;

pub use error::TreeError;

#[cfg(feature = "tree")]
pub mod tree;

#[cfg(feature = "tree")]
pub use tree::{NodeRef, OrderedTree, RemovedNode, Role};
