//! Structural primitives: attach, detach, rotate and rebalance.
//!
//! Every primitive keeps both directions of a link and the child's [`Role`]
//! in step, and re-weighs the node whose child link changed. Weights are
//! recomputed bottom-up: a node is always re-weighed after the children that
//! were just linked under it.

use super::map::OrderedTree;
use super::node::{NodeId, Role};

/// Where a detached subtree used to hang: the parent and the side it hung on.
pub(super) type Anchor = Option<(NodeId, Role)>;

impl<K, V> OrderedTree<K, V> {
    // =========================================================================
    // Weights
    // =========================================================================

    fn height_of(&self, link: Option<NodeId>) -> u8 {
        link.map_or(0, |id| self.arena[id].height)
    }

    /// Recomputes the cached height and balance of `id` from its children.
    pub(super) fn reweigh(&mut self, id: NodeId) {
        let left = self.height_of(self.arena[id].left);
        let right = self.height_of(self.arena[id].right);
        let node = &mut self.arena[id];
        node.height = left.max(right) + 1;
        node.balance = i16::from(right) - i16::from(left);
    }

    // =========================================================================
    // Attach / Detach
    // =========================================================================

    pub(super) fn attach_left(&mut self, parent: NodeId, child: NodeId) {
        self.attach(parent, child, Role::Left);
    }

    pub(super) fn attach_right(&mut self, parent: NodeId, child: NodeId) {
        self.attach(parent, child, Role::Right);
    }

    /// Installs `child` on the `role` side of `parent`.
    ///
    /// `child` must be detached and the slot on `parent` must be empty.
    pub(super) fn attach(&mut self, parent: NodeId, child: NodeId, role: Role) {
        debug_assert!(self.arena[child].parent.is_none(), "{child} is still attached");
        debug_assert!(
            self.arena[parent].child(role).is_none(),
            "{parent} already has a {role}"
        );
        match role {
            Role::Left => self.arena[parent].left = Some(child),
            Role::Right => self.arena[parent].right = Some(child),
            Role::Root => unreachable!("a child cannot be attached as root"),
        }
        let node = &mut self.arena[child];
        node.parent = Some(parent);
        node.role = role;
        self.reweigh(parent);
    }

    pub(super) fn detach_left(&mut self, parent: NodeId) -> Option<NodeId> {
        let child = self.arena[parent].left.take()?;
        self.release_link(parent, child);
        Some(child)
    }

    pub(super) fn detach_right(&mut self, parent: NodeId) -> Option<NodeId> {
        let child = self.arena[parent].right.take()?;
        self.release_link(parent, child);
        Some(child)
    }

    /// Unlinks `id` from its parent, returning where it used to hang.
    pub(super) fn detach_from_parent(&mut self, id: NodeId) -> Anchor {
        let parent = self.arena[id].parent?;
        let role = self.arena[id].role;
        let detached = match role {
            Role::Left => self.detach_left(parent),
            Role::Right => self.detach_right(parent),
            Role::Root => None,
        };
        debug_assert_eq!(detached, Some(id), "{id} is not linked from its parent");
        Some((parent, role))
    }

    /// Hangs `id` where a detached subtree used to be; with no anchor it stays
    /// a root.
    pub(super) fn reattach(&mut self, anchor: Anchor, id: NodeId) {
        if let Some((parent, role)) = anchor {
            self.attach(parent, id, role);
        }
    }

    fn release_link(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.arena[child];
        node.parent = None;
        node.role = Role::Root;
        self.reweigh(parent);
    }

    // =========================================================================
    // Rotations
    // =========================================================================

    /// Rotates the subtree at `id` to the left and returns its new top.
    ///
    /// A right child leaning left is first rotated right (the double
    /// rotation case). The pivot takes over the role and parent of `id`.
    pub(super) fn rotate_left(&mut self, id: NodeId) -> NodeId {
        if let Some(pivot) = self.arena[id].right
            && self.arena[pivot].leans_left()
        {
            tracing::trace!(node = %pivot, "double rotation: right around pivot first");
            self.lift_left_child(pivot);
        }
        self.lift_right_child(id)
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub(super) fn rotate_right(&mut self, id: NodeId) -> NodeId {
        if let Some(pivot) = self.arena[id].left
            && self.arena[pivot].leans_right()
        {
            tracing::trace!(node = %pivot, "double rotation: left around pivot first");
            self.lift_right_child(pivot);
        }
        self.lift_left_child(id)
    }

    /// Single left rotation: the right child of `id` moves up into its place.
    fn lift_right_child(&mut self, id: NodeId) -> NodeId {
        let anchor = self.detach_from_parent(id);
        let Some(pivot) = self.detach_right(id) else {
            self.reattach(anchor, id);
            return id;
        };
        tracing::trace!(node = %id, pivot = %pivot, "rotating left");
        if let Some(inner) = self.detach_left(pivot) {
            self.attach_right(id, inner);
        }
        self.attach_left(pivot, id);
        self.reattach(anchor, pivot);
        pivot
    }

    /// Single right rotation: the left child of `id` moves up into its place.
    fn lift_left_child(&mut self, id: NodeId) -> NodeId {
        let anchor = self.detach_from_parent(id);
        let Some(pivot) = self.detach_left(id) else {
            self.reattach(anchor, id);
            return id;
        };
        tracing::trace!(node = %id, pivot = %pivot, "rotating right");
        if let Some(inner) = self.detach_right(pivot) {
            self.attach_left(id, inner);
        }
        self.attach_right(pivot, id);
        self.reattach(anchor, pivot);
        pivot
    }

    /// Re-weighs `id` and rotates when it is skewed by more than one level.
    /// Returns the node now at the top of this subtree.
    pub(super) fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.reweigh(id);
        let balance = self.arena[id].balance;
        debug_assert!(balance.abs() <= 2, "{id} skewed by {balance}");
        let top = if balance > 1 {
            self.rotate_left(id)
        } else if balance < -1 {
            self.rotate_right(id)
        } else {
            id
        };
        debug_assert!(self.arena[top].balance.abs() <= 1, "{top} left unbalanced");
        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Builds a tree by hand: keys are attached exactly as listed, with no
    /// rebalancing.
    fn chain(keys: &[i32], role: Role) -> (OrderedTree<i32, i32>, Vec<NodeId>) {
        let mut tree = OrderedTree::new();
        let ids: Vec<NodeId> = keys
            .iter()
            .map(|&key| tree.arena.allocate(key, key))
            .collect();
        for pair in ids.windows(2).rev() {
            tree.attach(pair[0], pair[1], role);
        }
        tree.root = ids.first().copied();
        (tree, ids)
    }

    #[rstest]
    fn test_attach_sets_parent_role_and_weight() {
        let (tree, ids) = chain(&[2, 1], Role::Left);

        assert_eq!(tree.arena[ids[0]].left, Some(ids[1]));
        assert_eq!(tree.arena[ids[1]].parent, Some(ids[0]));
        assert_eq!(tree.arena[ids[1]].role, Role::Left);
        assert!(tree.arena[ids[1]].is_left_child());
        assert_eq!(tree.arena[ids[0]].height, 2);
        assert_eq!(tree.arena[ids[0]].balance, -1);
    }

    #[rstest]
    fn test_detach_clears_both_directions() {
        let (mut tree, ids) = chain(&[1, 2], Role::Right);

        assert_eq!(tree.detach_right(ids[0]), Some(ids[1]));
        assert_eq!(tree.arena[ids[0]].right, None);
        assert_eq!(tree.arena[ids[1]].parent, None);
        assert!(tree.arena[ids[1]].is_root());
        assert_eq!(tree.arena[ids[0]].balance, 0);
        assert_eq!(tree.detach_right(ids[0]), None);
        assert_eq!(tree.detach_left(ids[0]), None);
    }

    #[rstest]
    fn test_single_left_rotation_on_right_chain() {
        let (mut tree, ids) = chain(&[1, 2, 3], Role::Right);
        assert_eq!(tree.arena[ids[0]].balance, 2);

        let top = tree.rebalance(ids[0]);

        assert_eq!(top, ids[1]);
        assert!(tree.arena[top].is_root());
        assert_eq!(tree.arena[top].left, Some(ids[0]));
        assert_eq!(tree.arena[top].right, Some(ids[2]));
        assert_eq!(tree.arena[ids[0]].role, Role::Left);
        assert_eq!(tree.arena[top].balance, 0);
        assert_eq!(tree.arena[top].height, 2);
    }

    #[rstest]
    fn test_single_right_rotation_on_left_chain() {
        let (mut tree, ids) = chain(&[3, 2, 1], Role::Left);

        let top = tree.rebalance(ids[0]);

        assert_eq!(top, ids[1]);
        assert_eq!(tree.arena[top].left, Some(ids[2]));
        assert_eq!(tree.arena[top].right, Some(ids[0]));
        assert!(tree.arena[ids[0]].is_right_child());
    }

    #[rstest]
    fn test_double_rotation_when_pivot_leans_the_other_way() {
        let mut tree = OrderedTree::new();
        let one = tree.arena.allocate(1, 1);
        let three = tree.arena.allocate(3, 3);
        let two = tree.arena.allocate(2, 2);
        tree.attach_left(three, two);
        tree.attach_right(one, three);
        tree.root = Some(one);

        let top = tree.rebalance(one);

        assert_eq!(top, two);
        assert_eq!(tree.arena[two].left, Some(one));
        assert_eq!(tree.arena[two].right, Some(three));
        assert!(tree.arena[two].is_root());
        assert!(tree.arena[two].has_two_children());
        assert_eq!(tree.arena[two].balance, 0);
    }

    #[rstest]
    fn test_rotation_keeps_position_under_parent() {
        // 10 -> right: 20 -> right: 30 -> right: 40, rotate at 20
        let (mut tree, ids) = chain(&[10, 20, 30, 40], Role::Right);

        let top = tree.rotate_left(ids[1]);

        assert_eq!(top, ids[2]);
        assert_eq!(tree.arena[ids[0]].right, Some(ids[2]));
        assert_eq!(tree.arena[ids[2]].parent, Some(ids[0]));
        assert!(tree.arena[ids[2]].is_right_child());
        assert_eq!(tree.arena[ids[2]].left, Some(ids[1]));
        assert_eq!(tree.arena[ids[0]].height, 3);
    }

    #[rstest]
    fn test_rotation_without_pivot_is_noop() {
        let (mut tree, ids) = chain(&[1], Role::Right);

        assert_eq!(tree.rotate_left(ids[0]), ids[0]);
        assert_eq!(tree.rotate_right(ids[0]), ids[0]);
        assert!(tree.arena[ids[0]].is_root());
    }
}
