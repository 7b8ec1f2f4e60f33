//! In-order iteration built on successor/predecessor stepping.

use std::iter::FusedIterator;

use super::map::OrderedTree;
use super::node::NodeId;

/// An iterator over the entries of an [`OrderedTree`] in key order.
///
/// Each step follows parent/child links from the previous node; no entries
/// are buffered. Iterating from both ends stops once the two cursors meet.
pub struct OrderedTreeIterator<'a, K, V> {
    tree: &'a OrderedTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a, K, V> OrderedTreeIterator<'a, K, V> {
    fn entry(&self, id: NodeId) -> (&'a K, &'a V) {
        let tree: &'a OrderedTree<K, V> = self.tree;
        let node = &tree.arena[id];
        (&node.key, &node.value)
    }

    /// Marks the iterator exhausted when the cursors have met.
    fn settle(&mut self) -> bool {
        let met = self.front == self.back;
        if met {
            self.front = None;
            self.back = None;
        }
        met
    }
}

impl<'a, K, V> Iterator for OrderedTreeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.front?;
        if !self.settle() {
            self.front = self.tree.successor_of(current);
        }
        Some(self.entry(current))
    }
}

impl<K, V> DoubleEndedIterator for OrderedTreeIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.back?;
        if !self.settle() {
            self.back = self.tree.predecessor_of(current);
        }
        Some(self.entry(current))
    }
}

impl<K, V> FusedIterator for OrderedTreeIterator<'_, K, V> {}

impl<K, V> OrderedTree<K, V> {
    /// Returns an iterator over entries in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    /// let forward: Vec<_> = tree.iter().collect();
    /// assert_eq!(forward, vec![(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    ///
    /// let backward: Vec<&i32> = tree.iter().rev().map(|(key, _)| key).collect();
    /// assert_eq!(backward, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> OrderedTreeIterator<'_, K, V> {
        OrderedTreeIterator {
            tree: self,
            front: self.root.map(|root| self.subtree_minimum(root)),
            back: self.root.map(|root| self.subtree_maximum(root)),
        }
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedTreeIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
