use core::ops::Not;

use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node. The rebalancing code is written once against a
/// `Side` and its opposite so that the mirrored cases cannot drift apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone)]
pub(crate) struct RbNode<K> {
    key: K,
    color: Color,
    // Owning links, indexed by `Side`.
    children: [Option<Handle>; 2],
    // Navigational only; `None` for the root.
    parent: Option<Handle>,
}

impl<K> RbNode<K> {
    /// Creates a detached red node.
    pub(crate) fn new(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            color: Color::Red,
            children: [None, None],
            parent,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    /// Replaces the key, returning the old one.
    pub(crate) fn replace_key(&mut self, key: K) -> K {
        core::mem::replace(&mut self.key, key)
    }

    pub(crate) fn into_key(self) -> K {
        self.key
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        self.children[side as usize]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        self.children[side as usize] = child;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.child(Side::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.child(Side::Right)
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Returns the side on which `child` hangs off this node, if it does.
    pub(crate) fn side_of(&self, child: Option<Handle>) -> Option<Side> {
        if self.left() == child {
            Some(Side::Left)
        } else if self.right() == child {
            Some(Side::Right)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn sides_are_mirrors() {
        assert_eq!(!Side::Left, Side::Right);
        assert_eq!(!Side::Right, Side::Left);
        assert_eq!(!!Side::Left, Side::Left);
    }

    #[test]
    fn new_nodes_are_red_leaves() {
        let node = RbNode::new(7, None);
        assert!(node.is_red());
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn side_of_finds_child_link() {
        let left = Handle::from_index(1);
        let right = Handle::from_index(2);
        let mut node = RbNode::new(0, None);
        node.set_child(Side::Left, Some(left));
        node.set_child(Side::Right, Some(right));

        assert_eq!(node.side_of(Some(left)), Some(Side::Left));
        assert_eq!(node.side_of(Some(right)), Some(Side::Right));
        assert_eq!(node.side_of(Some(Handle::from_index(3))), None);
    }
}
