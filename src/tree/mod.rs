//! Ordered map on a height-balanced binary search tree with parent links.
//!
//! - [`OrderedTree`]: the container
//! - [`NodeRef`]: a borrowed handle to one node, able to step to its
//!   neighbours in key order
//! - [`RemovedNode`]: an entry handed back by [`OrderedTree::remove`]
//!
//! # Structure
//!
//! Nodes are kept in an arena and linked by index, parent links included.
//! Each node records which side of its parent it hangs on ([`Role`]) and the
//! height of its subtree. After an insertion or removal every node on the
//! affected path is re-weighed, and a node whose subtrees differ in height by
//! two is rotated back into balance. Between operations the subtrees of every
//! node differ in height by at most one, so the depth stays within about
//! `1.44 * log2(n)`.
//!
//! # Ordered traversal
//!
//! No linked list threads the entries together: the successor of a node is
//! the minimum of its right subtree or, failing that, the first ancestor
//! reached from a left child. The predecessor is the mirror image.
//!
//! ```rust
//! use ordtree::OrderedTree;
//!
//! let tree: OrderedTree<i32, i32> = (0..=10).map(|key| (key, key)).collect();
//!
//! let mut forward = Vec::new();
//! let mut cursor = tree.minimum();
//! while let Some(node) = cursor {
//!     forward.push(*node.key());
//!     cursor = node.successor();
//! }
//!
//! let mut backward = Vec::new();
//! let mut cursor = tree.maximum();
//! while let Some(node) = cursor {
//!     backward.push(*node.key());
//!     cursor = node.predecessor();
//! }
//!
//! backward.reverse();
//! assert_eq!(forward, backward);
//! ```

mod cursor;
mod iter;
mod linkage;
mod map;
mod node;
#[cfg(feature = "serde")]
mod serde;

pub use cursor::NodeRef;
pub use iter::OrderedTreeIterator;
pub use map::OrderedTree;
pub use map::RemovedNode;
pub use node::Role;
