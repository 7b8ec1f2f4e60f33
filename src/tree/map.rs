//! The ordered map container.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use super::cursor::NodeRef;
use super::node::{Arena, NodeId, Role};
use crate::error::TreeError;

// =============================================================================
// OrderedTree Definition
// =============================================================================

/// An ordered map backed by a height-balanced binary search tree.
///
/// Nodes keep a link to their parent, so ordered traversal steps from node to
/// node through the tree itself: [`minimum`](Self::minimum) /
/// [`maximum`](Self::maximum) give the ends and
/// [`successor`](Self::successor) / [`predecessor`](Self::predecessor) walk
/// between them.
///
/// Inserting a key that is already present replaces its value and leaves the
/// shape of the tree alone.
///
/// # Time Complexity
///
/// | Operation                     | Complexity |
/// |-------------------------------|------------|
/// | `new`                         | O(1)       |
/// | `insert`                      | O(log N)   |
/// | `get` / `contains`            | O(log N)   |
/// | `remove`                      | O(log N)   |
/// | `minimum` / `maximum`         | O(log N)   |
/// | `successor` / `predecessor`   | O(1) amortized over a full walk |
/// | `len` / `size`                | O(N)       |
/// | `depth`                       | O(N)       |
///
/// # Examples
///
/// ```rust
/// use ordtree::OrderedTree;
///
/// let mut tree = OrderedTree::new();
/// tree.insert(10, "ten");
/// tree.insert(4, "four");
/// tree.insert(7, "seven");
///
/// assert_eq!(tree.size(), 3);
/// assert!(tree.contains(&7));
/// assert_eq!(tree.get_value(&10), Ok(&"ten"));
///
/// let keys: Vec<&i32> = tree.keys().collect();
/// assert_eq!(keys, vec![&4, &7, &10]);
/// ```
#[derive(Clone)]
pub struct OrderedTree<K, V> {
    pub(super) arena: Arena<K, V>,
    pub(super) root: Option<NodeId>,
}

/// Outcome of inserting below a node.
enum Insertion<V> {
    /// A node was added; `grew` tells whether the subtree got taller.
    Inserted { grew: bool },
    /// The key was present; carries the value it used to map to.
    Updated(V),
}

/// An entry taken out of the tree by [`OrderedTree::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode<K, V> {
    key: K,
    value: V,
}

impl<K, V> RemovedNode<K, V> {
    /// The key that was removed.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The value the key mapped to.
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Takes the entry apart.
    pub fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

// =============================================================================
// Structure-only operations
// =============================================================================

impl<K, V> OrderedTree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, String> = OrderedTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.depth(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Counts the entries by walking the whole tree.
    ///
    /// # Complexity
    ///
    /// O(N); the count is not cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count_from(self.root)
    }

    /// Alias for [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.len()
    }

    fn count_from(&self, link: Option<NodeId>) -> usize {
        link.map_or(0, |id| {
            let node = &self.arena[id];
            self.count_from(node.left) + 1 + self.count_from(node.right)
        })
    }

    /// Height of the tree: 0 when empty, 1 for a single node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, i32> = (0..7).map(|key| (key, key)).collect();
    /// assert_eq!(tree.depth(), 3);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_from(self.root)
    }

    fn depth_from(&self, link: Option<NodeId>) -> usize {
        link.map_or(0, |id| {
            let node = &self.arena[id];
            1 + self.depth_from(node.left).max(self.depth_from(node.right))
        })
    }

    /// Drops every entry and resets the tree to the empty state.
    pub fn clear(&mut self) {
        tracing::debug!(released = self.arena.occupied(), "clearing tree");
        self.arena.clear();
        self.root = None;
    }

    /// Handle to the root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.handle(self.root)
    }

    /// The node with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    /// let first = tree.minimum().unwrap();
    /// assert_eq!((first.key(), first.value()), (&1, &"a"));
    /// ```
    #[must_use]
    pub fn minimum(&self) -> Option<NodeRef<'_, K, V>> {
        self.handle(self.root.map(|root| self.subtree_minimum(root)))
    }

    /// The node with the largest key.
    #[must_use]
    pub fn maximum(&self) -> Option<NodeRef<'_, K, V>> {
        self.handle(self.root.map(|root| self.subtree_maximum(root)))
    }

    /// The node following `node` in key order, `None` after the maximum.
    ///
    /// `node` must come from this tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, i32> = (0..=10).map(|key| (key, key)).collect();
    /// let mut cursor = tree.minimum();
    /// let mut seen = Vec::new();
    /// while let Some(node) = cursor {
    ///     seen.push(*node.value());
    ///     cursor = tree.successor(node);
    /// }
    /// assert_eq!(seen, (0..=10).collect::<Vec<_>>());
    /// ```
    #[must_use]
    pub fn successor(&self, node: NodeRef<'_, K, V>) -> Option<NodeRef<'_, K, V>> {
        debug_assert!(node.belongs_to(self), "node handle from another tree");
        self.handle(self.successor_of(node.id()))
    }

    /// The node preceding `node` in key order, `None` before the minimum.
    ///
    /// `node` must come from this tree.
    #[must_use]
    pub fn predecessor(&self, node: NodeRef<'_, K, V>) -> Option<NodeRef<'_, K, V>> {
        debug_assert!(node.belongs_to(self), "node handle from another tree");
        self.handle(self.predecessor_of(node.id()))
    }

    fn handle(&self, link: Option<NodeId>) -> Option<NodeRef<'_, K, V>> {
        link.map(|id| NodeRef::new(self, id))
    }

    pub(super) fn subtree_minimum(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(left) = self.arena[current].left {
            current = left;
        }
        current
    }

    pub(super) fn subtree_maximum(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(right) = self.arena[current].right {
            current = right;
        }
        current
    }

    /// Right subtree's minimum, or the first ancestor reached from its left.
    pub(super) fn successor_of(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.arena[id].right {
            return Some(self.subtree_minimum(right));
        }
        let mut current = id;
        while self.arena[current].is_right_child() {
            current = self.arena[current].parent?;
        }
        self.arena[current].parent
    }

    /// Left subtree's maximum, or the first ancestor reached from its right.
    pub(super) fn predecessor_of(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.arena[id].left {
            return Some(self.subtree_maximum(left));
        }
        let mut current = id;
        while self.arena[current].is_left_child() {
            current = self.arena[current].parent?;
        }
        self.arena[current].parent
    }

    /// Walks up from the previous root to whichever node now plays `Root`.
    fn reanchor_root(&mut self, previous: NodeId) {
        let mut current = previous;
        while !self.arena[current].is_root() {
            match self.arena[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        if current != previous {
            tracing::trace!(from = %previous, to = %current, "root re-anchored");
        }
        self.root = Some(current);
    }

    /// Rebalances every node from `start` up to the root and records the top.
    fn rebalance_upward(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            let top = self.rebalance(current);
            match self.arena[top].parent {
                Some(parent) => current = parent,
                None => {
                    self.root = Some(top);
                    break;
                }
            }
        }
    }

    /// Unlinks a node with at most one child, splicing that child into its
    /// place. Returns the former parent, where rebalancing starts.
    fn splice_out(&mut self, id: NodeId) -> Option<NodeId> {
        debug_assert!(!self.arena[id].has_two_children(), "{id} has two children");
        let child = if self.arena[id].has_left_child() {
            self.detach_left(id)
        } else {
            self.detach_right(id)
        };
        match self.detach_from_parent(id) {
            Some((parent, role)) => {
                if let Some(child) = child {
                    self.attach(parent, child, role);
                }
                Some(parent)
            }
            None => {
                self.root = child;
                None
            }
        }
    }
}

// =============================================================================
// Key-located operations
// =============================================================================

impl<K: Ord, V> OrderedTree<K, V> {
    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced and the previous
    /// value returned; the shape of the tree does not change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "ONE"), Some("one"));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            self.root = Some(self.arena.allocate(key, value));
            return None;
        };
        match self.insert_below(root, key, value) {
            Insertion::Updated(previous) => Some(previous),
            Insertion::Inserted { .. } => {
                self.reanchor_root(root);
                None
            }
        }
    }

    fn insert_below(&mut self, id: NodeId, key: K, value: V) -> Insertion<V> {
        let height_before = self.arena[id].height;
        let role = match key.cmp(&self.arena[id].key) {
            Ordering::Less => Role::Left,
            Ordering::Greater => Role::Right,
            Ordering::Equal => {
                let previous = std::mem::replace(&mut self.arena[id].value, value);
                return Insertion::Updated(previous);
            }
        };
        if let Some(child) = self.arena[id].child(role) {
            match self.insert_below(child, key, value) {
                Insertion::Inserted { grew: true } => {}
                settled => return settled,
            }
        } else {
            let leaf = self.arena.allocate(key, value);
            self.attach(id, leaf, role);
        }
        let top = self.rebalance(id);
        Insertion::Inserted {
            grew: self.arena[top].height > height_before,
        }
    }

    fn locate<Q>(&self, link: Option<NodeId>, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        link.and_then(|id| {
            let node = &self.arena[id];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => self.locate(node.left, key),
                Ordering::Greater => self.locate(node.right, key),
                Ordering::Equal => Some(id),
            }
        })
    }

    /// Returns a handle to the node holding `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<String, i32> = [("hello".to_string(), 42)].into_iter().collect();
    /// assert_eq!(tree.get("hello").map(|node| *node.value()), Some(42));
    /// assert!(tree.get("world").is_none());
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.handle(self.locate(self.root, key))
    }

    /// Returns a mutable reference to the value under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.locate(self.root, key)?;
        Some(&mut self.arena[id].value)
    }

    /// Returns the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] naming the key when it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::{OrderedTree, TreeError};
    ///
    /// let tree: OrderedTree<i32, i32> = [(10, 10)].into_iter().collect();
    /// assert_eq!(tree.get_value(&10), Ok(&10));
    /// assert_eq!(
    ///     tree.get_value(&1),
    ///     Err(TreeError::KeyNotFound { key: "1".to_string() })
    /// );
    /// ```
    pub fn get_value<Q>(&self, key: &Q) -> Result<&V, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        self.locate(self.root, key)
            .map(|id| &self.arena[id].value)
            .ok_or_else(|| TreeError::key_not_found(key))
    }

    /// Returns `true` if the tree holds `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns `true` if the tree holds every one of `keys`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, i32> = [10, 4, 7].into_iter().map(|key| (key, key)).collect();
    /// assert!(tree.contains_all(&[10, 4, 7]));
    /// assert!(!tree.contains_all(&[10, 5]));
    /// ```
    #[must_use]
    pub fn contains_all<'q, Q, I>(&self, keys: I) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        keys.into_iter().all(|key| self.contains(key))
    }

    /// Removes `key` and hands its entry back to the caller.
    ///
    /// Returns `None` and leaves the tree untouched when the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let mut tree: OrderedTree<i32, &str> = [(0, "zero"), (1, "one")].into_iter().collect();
    /// let removed = tree.remove(&0).unwrap();
    /// assert_eq!((removed.key(), removed.value()), (&0, &"zero"));
    /// assert!(!tree.contains(&0));
    /// assert!(tree.remove(&0).is_none());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<RemovedNode<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.locate(self.root, key)?;
        // A node with two children trades entries with its successor, which
        // has at most one child and is unlinked in its place.
        let victim = if self.arena[target].has_two_children() {
            let successor = self.subtree_minimum(self.arena[target].right?);
            self.arena.swap_entries(target, successor);
            successor
        } else {
            target
        };
        let splice_point = self.splice_out(victim);
        let node = self.arena.release(victim);
        if let Some(parent) = splice_point {
            self.rebalance_upward(parent);
        }
        tracing::debug!(slot = %victim, "removed entry");
        Some(RemovedNode {
            key: node.key,
            value: node.value,
        })
    }

    /// Walks the whole tree and reports the first broken structural invariant.
    ///
    /// Checks key order, parent/child/role agreement, cached heights,
    /// balance within one level, a single root and that no node is
    /// unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvariantViolation`] describing the problem.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            return if self.arena.occupied() == 0 {
                Ok(())
            } else {
                Err(TreeError::violation("empty tree still owns nodes"))
            };
        };
        let node = &self.arena[root];
        if !node.is_root() || node.parent.is_some() {
            return Err(TreeError::violation(format!(
                "root {root} has role {} and parent {:?}",
                node.role, node.parent
            )));
        }
        let mut reachable = 0;
        self.check_subtree(root, None, None, &mut reachable)?;
        if reachable == self.arena.occupied() {
            Ok(())
        } else {
            Err(TreeError::violation(format!(
                "{reachable} nodes reachable but {} allocated",
                self.arena.occupied()
            )))
        }
    }

    /// Returns the subtree height.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        reachable: &mut usize,
    ) -> Result<u8, TreeError> {
        *reachable += 1;
        let node = &self.arena[id];
        if lower.is_some_and(|lower| node.key <= *lower)
            || upper.is_some_and(|upper| node.key >= *upper)
        {
            return Err(TreeError::violation(format!("{id} is out of key order")));
        }

        let mut heights = [0_u8; 2];
        for (slot, role) in [Role::Left, Role::Right].into_iter().enumerate() {
            let Some(child) = node.child(role) else {
                continue;
            };
            let child_node = &self.arena[child];
            if child_node.parent != Some(id) || child_node.role != role {
                return Err(TreeError::violation(format!(
                    "{child} hangs on the {role} side of {id} but records parent {:?} as {}",
                    child_node.parent, child_node.role
                )));
            }
            let (lower, upper) = match role {
                Role::Left => (lower, Some(&node.key)),
                _ => (Some(&node.key), upper),
            };
            heights[slot] = self.check_subtree(child, lower, upper, reachable)?;
        }

        let [left, right] = heights;
        let height = left.max(right) + 1;
        let balance = i16::from(right) - i16::from(left);
        if node.height != height || node.balance != balance {
            return Err(TreeError::violation(format!(
                "{id} caches height {} balance {} but has height {height} balance {balance}",
                node.height, node.balance
            )));
        }
        if balance.abs() > 1 {
            return Err(TreeError::violation(format!("{id} is skewed by {balance}")));
        }
        Ok(height)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Renders one node per line in key order.
impl<K: fmt::Display, V> fmt::Display for OrderedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = self.minimum();
        while let Some(node) = cursor {
            writeln!(formatter, "{node}")?;
            cursor = node.successor();
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(OrderedTree<i32, String>: Send, Sync, Clone);

// =============================================================================
// Tests
// =============================================================================
