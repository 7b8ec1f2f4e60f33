//! Node slots and the arena that stores them.
//!
//! Every node lives in a slot of an [`Arena`] and is addressed by a
//! [`NodeId`]. The `left`/`right` links own their target in the sense that a
//! node is reachable from the tree only through them; `parent` is a plain
//! back-index used for upward walks and never keeps anything alive.

use std::fmt;
use std::ops::{Index, IndexMut};

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node slot inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

// =============================================================================
// Role
// =============================================================================

/// Position of a node relative to its parent.
///
/// `Root` implies the node has no parent. A subtree that has been detached
/// from its parent is rooted at a node with role `Root` until it is attached
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The node has no parent.
    Root,
    /// The node is its parent's left child.
    Left,
    /// The node is its parent's right child.
    Right,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Root => "root",
            Self::Left => "left child",
            Self::Right => "right child",
        };
        formatter.write_str(text)
    }
}

// =============================================================================
// Node
// =============================================================================

/// Storage and linkage unit of the tree.
///
/// `height` counts levels of the subtree rooted here (1 for a leaf) and
/// `balance` is `height(right) - height(left)`. Both are refreshed by the
/// linkage primitives whenever a child link changes.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) role: Role,
    pub(crate) height: u8,
    pub(crate) balance: i16,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            left: None,
            right: None,
            role: Role::Root,
            height: 1,
            balance: 0,
        }
    }

    pub(crate) const fn has_no_children(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) const fn has_child(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    pub(crate) const fn has_one_child(&self) -> bool {
        self.left.is_some() != self.right.is_some()
    }

    pub(crate) const fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub(crate) const fn has_left_child(&self) -> bool {
        self.left.is_some()
    }

    pub(crate) const fn has_right_child(&self) -> bool {
        self.right.is_some()
    }

    pub(crate) const fn is_root(&self) -> bool {
        matches!(self.role, Role::Root)
    }

    pub(crate) const fn is_left_child(&self) -> bool {
        matches!(self.role, Role::Left)
    }

    pub(crate) const fn is_right_child(&self) -> bool {
        matches!(self.role, Role::Right)
    }

    pub(crate) const fn leans_left(&self) -> bool {
        self.balance < 0
    }

    pub(crate) const fn leans_right(&self) -> bool {
        self.balance > 0
    }

    /// The link that holds the child playing `role`.
    pub(crate) const fn child(&self, role: Role) -> Option<NodeId> {
        match role {
            Role::Left => self.left,
            Role::Right => self.right,
            Role::Root => None,
        }
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Slot storage for nodes with recycling of vacated slots.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    vacant: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Stores a new detached leaf and returns its id.
    pub(crate) fn allocate(&mut self, key: K, value: V) -> NodeId {
        let node = Node::new(key, value);
        if let Some(id) = self.vacant.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Takes the node out of its slot; the slot becomes reusable.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("node {id} released twice"));
        self.vacant.push(id);
        node
    }

    /// Exchanges the key and value of two distinct nodes, leaving links alone.
    pub(crate) fn swap_entries(&mut self, first: NodeId, second: NodeId) {
        debug_assert_ne!(first, second, "swapping a node with itself");
        if let Ok([Some(first), Some(second)]) = self
            .slots
            .get_disjoint_mut([first.index(), second.index()])
        {
            std::mem::swap(&mut first.key, &mut second.key);
            std::mem::swap(&mut first.value, &mut second.value);
        }
    }

    /// Number of occupied slots.
    pub(crate) fn occupied(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("dangling node id {id}"))
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("dangling node id {id}"))
    }
}
