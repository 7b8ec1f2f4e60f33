//! Borrowed handles to individual nodes.

use std::fmt;

use super::map::OrderedTree;
use super::node::{Node, NodeId, Role};

/// A read-only handle to one node of an [`OrderedTree`].
///
/// The handle borrows the tree, so the tree cannot be mutated while any
/// handle is alive. Handles are `Copy` and can step to their neighbours in
/// key order with [`successor`](Self::successor) and
/// [`predecessor`](Self::predecessor).
///
/// # Examples
///
/// ```rust
/// use ordtree::{OrderedTree, Role};
///
/// let tree: OrderedTree<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
/// let root = tree.root().unwrap();
/// assert_eq!(root.key(), &2);
/// assert_eq!(root.role(), Role::Root);
///
/// let left = root.left().unwrap();
/// assert_eq!(left.value(), &10);
/// assert_eq!(left.parent().map(|parent| *parent.key()), Some(2));
/// assert_eq!(left.successor().map(|next| *next.key()), Some(2));
/// ```
pub struct NodeRef<'a, K, V> {
    tree: &'a OrderedTree<K, V>,
    id: NodeId,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(super) const fn new(tree: &'a OrderedTree<K, V>, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub(super) const fn id(&self) -> NodeId {
        self.id
    }

    pub(super) fn belongs_to(&self, tree: &OrderedTree<K, V>) -> bool {
        std::ptr::eq(self.tree, tree)
    }

    fn node(&self) -> &'a Node<K, V> {
        let tree: &'a OrderedTree<K, V> = self.tree;
        &tree.arena[self.id]
    }

    fn step(&self, link: Option<NodeId>) -> Option<Self> {
        link.map(|id| Self::new(self.tree, id))
    }

    /// The node's key.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.node().key
    }

    /// The node's value.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.node().value
    }

    /// Key and value together.
    #[must_use]
    pub fn entry(&self) -> (&'a K, &'a V) {
        let node = self.node();
        (&node.key, &node.value)
    }

    /// The left child.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.step(self.node().left)
    }

    /// The right child.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.step(self.node().right)
    }

    /// The parent node; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.step(self.node().parent)
    }

    /// Where this node hangs relative to its parent.
    #[must_use]
    pub fn role(&self) -> Role {
        self.node().role
    }

    /// Height of the right subtree minus height of the left subtree.
    ///
    /// Always within `-1..=1` between operations. Exposed for debugging;
    /// the exact value depends on the rotations performed so far.
    #[must_use]
    pub fn balance(&self) -> i16 {
        self.node().balance
    }

    /// Number of levels in the subtree rooted here (1 for a leaf).
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.node().height)
    }

    /// `true` when the node has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node().is_root()
    }

    /// `true` when the node is its parent's left child.
    #[must_use]
    pub fn is_left_child(&self) -> bool {
        self.node().is_left_child()
    }

    /// `true` when the node is its parent's right child.
    #[must_use]
    pub fn is_right_child(&self) -> bool {
        self.node().is_right_child()
    }

    /// `true` for a leaf.
    #[must_use]
    pub fn has_no_children(&self) -> bool {
        self.node().has_no_children()
    }

    /// `true` when at least one child is present.
    #[must_use]
    pub fn has_child(&self) -> bool {
        self.node().has_child()
    }

    /// `true` when exactly one child is present.
    #[must_use]
    pub fn has_one_child(&self) -> bool {
        self.node().has_one_child()
    }

    /// `true` when both children are present.
    #[must_use]
    pub fn has_two_children(&self) -> bool {
        self.node().has_two_children()
    }

    /// `true` when a left child is present.
    #[must_use]
    pub fn has_left_child(&self) -> bool {
        self.node().has_left_child()
    }

    /// `true` when a right child is present.
    #[must_use]
    pub fn has_right_child(&self) -> bool {
        self.node().has_right_child()
    }

    /// `true` when the left subtree is taller.
    #[must_use]
    pub fn leans_left(&self) -> bool {
        self.node().leans_left()
    }

    /// `true` when the right subtree is taller.
    #[must_use]
    pub fn leans_right(&self) -> bool {
        self.node().leans_right()
    }

    /// The next node in key order.
    #[must_use]
    pub fn successor(&self) -> Option<Self> {
        self.step(self.tree.successor_of(self.id))
    }

    /// The previous node in key order.
    #[must_use]
    pub fn predecessor(&self) -> Option<Self> {
        self.step(self.tree.predecessor_of(self.id))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

/// Two handles are equal when they point at the same node of the same tree.
impl<K, V> PartialEq for NodeRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.belongs_to(other.tree) && self.id == other.id
    }
}

impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("role", &self.role())
            .field("balance", &self.balance())
            .finish()
    }
}

/// `[key, role: left child, parent: 4, balance: 0]`; the parent is omitted for
/// the root.
impl<K: fmt::Display, V> fmt::Display for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}, role: {}", self.key(), self.role())?;
        if let Some(parent) = self.parent() {
            write!(formatter, ", parent: {}", parent.key())?;
        }
        write!(formatter, ", balance: {}]", self.balance())
    }
}
