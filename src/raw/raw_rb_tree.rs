use alloc::format;
use core::cmp::Ordering;
use core::fmt;

use super::arena::Arena;
use super::handle::Handle;
use super::rb_node::{Color, RbNode, Side};
use crate::error::InvariantViolation;
use crate::tracing_helpers::trace_log;

/// The core red-black tree backing `RbTree`.
///
/// Children are owning links by convention: a node's slot is released only
/// after the link that owned it has been overwritten. Parent links are
/// rewritten in the same operation as every ownership change (rotation,
/// splice, attach) so they never go stale.
#[derive(Clone)]
pub(crate) struct RawRbTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<RbNode<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<K> RawRbTree<K> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &RbNode<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut RbNode<K> {
        self.nodes.get_mut(handle)
    }

    /// Absent positions count as black.
    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.node(h).is_red())
    }

    #[inline]
    fn is_black(&self, handle: Option<Handle>) -> bool {
        !self.is_red(handle)
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).set_color(color);
    }

    #[inline]
    fn child(&self, handle: Handle, side: Side) -> Option<Handle> {
        self.node(handle).child(side)
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).parent()
    }

    /// Follows `side` links from `handle` to the end: the minimum for
    /// `Side::Left`, the maximum for `Side::Right`.
    pub(crate) fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(next) = self.child(handle, side) {
            handle = next;
        }
        handle
    }

    /// The first node in in-order (`Side::Left`) or reverse order (`Side::Right`).
    pub(crate) fn first(&self, side: Side) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, side))
    }

    /// The in-order neighbour of `handle` towards `side`: the successor for
    /// `Side::Right`, the predecessor for `Side::Left`.
    pub(crate) fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(sub) = self.child(handle, side) {
            return Some(self.extreme(sub, !side));
        }
        let mut current = handle;
        let mut parent = self.parent(current);
        while let Some(p) = parent
            && self.child(p, side) == Some(current)
        {
            current = p;
            parent = self.parent(p);
        }
        parent
    }

    /// Points whatever owned `old` (the root slot or a child link of `parent`)
    /// at `new`. The caller fixes `new`'s parent link.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self
                    .node(p)
                    .side_of(Some(old))
                    .expect("`RawRbTree::replace_child()` - `old` is not a child of `parent`!");
                self.node_mut(p).set_child(side, new);
            }
        }
    }

    /// Rotates `x` down towards `dir`; its child on the opposite side takes its
    /// place. `Side::Left` is a left rotation.
    fn rotate(&mut self, x: Handle, dir: Side) {
        let y = self
            .child(x, !dir)
            .expect("`RawRbTree::rotate()` - rotation pivot is missing!");
        trace_log!(dir = ?dir, "rotate");
        let parent = self.parent(x);

        let inner = self.child(y, dir);
        self.node_mut(x).set_child(!dir, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(x));
        }

        self.replace_child(parent, x, Some(y));
        self.node_mut(y).set_parent(parent);

        self.node_mut(y).set_child(dir, Some(x));
        self.node_mut(x).set_parent(Some(y));
    }
}

impl<K> RawRbTree<K> {
    /// Iterative descent; `None` if no key compares equal.
    pub(crate) fn find<C>(&self, key: &K, cmp: &C) -> Option<Handle>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match cmp(key, node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts `key` as a new red node and rebalances.
    /// Returns `false`, leaving the tree untouched, if an equal key exists.
    pub(crate) fn insert<C>(&mut self, key: K, cmp: &C) -> bool
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut parent = None;
        let mut current = self.root;
        let mut side = Side::Left;
        while let Some(handle) = current {
            let node = self.node(handle);
            side = match cmp(&key, node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return false,
            };
            parent = Some(handle);
            current = node.child(side);
        }

        let z = self.nodes.alloc(RbNode::new(key, parent));
        match parent {
            None => self.root = Some(z),
            Some(p) => self.node_mut(p).set_child(side, Some(z)),
        }

        self.insert_fixup(z);
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        true
    }

    /// Restores "no red node has a red child" after attaching red `z`.
    fn insert_fixup(&mut self, mut z: Handle) {
        while let Some(mut p) = self.parent(z)
            && self.node(p).is_red()
        {
            let mut g = self
                .parent(p)
                .expect("`RawRbTree::insert_fixup()` - red parent cannot be the root!");
            let side = if self.child(g, Side::Left) == Some(p) {
                Side::Left
            } else {
                Side::Right
            };
            let uncle = self.child(g, !side);

            if let Some(u) = uncle
                && self.node(u).is_red()
            {
                trace_log!(side = ?side, "insert fixup: red uncle, recolor");
                self.set_color(p, Color::Black);
                self.set_color(u, Color::Black);
                self.set_color(g, Color::Red);
                z = g;
                continue;
            }

            if self.child(p, !side) == Some(z) {
                trace_log!(side = ?side, "insert fixup: inner child, rotate parent");
                z = p;
                self.rotate(z, side);
                p = self.parent(z).expect("`RawRbTree::insert_fixup()` - rotated node lost its parent!");
                g = self.parent(p).expect("`RawRbTree::insert_fixup()` - rotated node lost its grandparent!");
            }

            trace_log!(side = ?side, "insert fixup: outer child, rotate grandparent");
            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            self.rotate(g, !side);
        }
    }

    /// Removes the node holding `key` and returns the key.
    ///
    /// A node with two children keeps its slot and takes over its in-order
    /// successor's key; the successor (which has at most one child) is the
    /// node physically spliced out.
    pub(crate) fn erase<C>(&mut self, key: &K, cmp: &C) -> Option<K>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let z = self.find(key, cmp)?;
        let target = match (self.node(z).left(), self.node(z).right()) {
            (Some(_), Some(right)) => self.extreme(right, Side::Left),
            _ => z,
        };

        let node = self.node(target);
        let x = node.left().or(node.right());
        let x_parent = node.parent();
        let removed_color = node.color();

        self.replace_child(x_parent, target, x);
        if let Some(x) = x {
            self.node_mut(x).set_parent(x_parent);
        }

        let spliced = self.nodes.take(target);
        let erased = if target == z {
            spliced.into_key()
        } else {
            self.node_mut(z).replace_key(spliced.into_key())
        };

        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        Some(erased)
    }

    /// Restores uniform black-height after a black node was spliced out above
    /// position `x` (possibly empty) under `parent`.
    fn erase_fixup(&mut self, mut x: Option<Handle>, mut parent: Option<Handle>) {
        while x != self.root && self.is_black(x) {
            let p = parent.expect("`RawRbTree::erase_fixup()` - non-root position has no parent!");
            let side = if self.child(p, Side::Left) == x {
                Side::Left
            } else {
                Side::Right
            };
            let mut w = self
                .child(p, !side)
                .expect("`RawRbTree::erase_fixup()` - double-black position has no sibling!");

            if self.node(w).is_red() {
                trace_log!(side = ?side, "erase fixup: red sibling, rotate parent");
                self.set_color(w, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                w = self
                    .child(p, !side)
                    .expect("`RawRbTree::erase_fixup()` - rotation left no sibling!");
            }

            let near = self.child(w, side);
            let far = self.child(w, !side);
            if self.is_black(near) && self.is_black(far) {
                trace_log!(side = ?side, "erase fixup: black nephews, push deficiency up");
                self.set_color(w, Color::Red);
                x = Some(p);
                parent = self.parent(p);
                continue;
            }

            if self.is_black(far) {
                trace_log!(side = ?side, "erase fixup: red near nephew, rotate sibling");
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(w, Color::Red);
                self.rotate(w, !side);
                w = self
                    .child(p, !side)
                    .expect("`RawRbTree::erase_fixup()` - rotation left no sibling!");
            }

            trace_log!(side = ?side, "erase fixup: red far nephew, rotate parent");
            let parent_color = self.node(p).color();
            self.set_color(w, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.child(w, !side) {
                self.set_color(far, Color::Black);
            }
            self.rotate(p, side);
            x = self.root;
            parent = None;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }
}

impl<K: fmt::Debug> RawRbTree<K> {
    /// Checks every red-black and search-tree invariant, reporting the first
    /// violation found.
    pub(crate) fn verify<C>(&self, cmp: &C) -> Result<(), InvariantViolation>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let result = self.check(cmp);
        #[cfg(feature = "tracing")]
        if let Err(violation) = &result {
            crate::tracing_helpers::error_log!(%violation, "red-black tree invariant violated");
        }
        result
    }

    fn check<C>(&self, cmp: &C) -> Result<(), InvariantViolation>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let Some(root) = self.root else {
            return Ok(());
        };

        let node = self.node(root);
        if node.parent().is_some() {
            return Err(InvariantViolation::ParentLinkMismatch {
                key: format!("{:?}", node.key()),
            });
        }
        if node.is_red() {
            return Err(InvariantViolation::RedRoot {
                key: format!("{:?}", node.key()),
            });
        }

        let count = self.check_links(root, None, None, cmp)?;
        if count != self.len() {
            return Err(InvariantViolation::LenMismatch {
                recorded: self.len(),
                actual: count,
            });
        }

        self.black_height(Some(root)).map(|_| ())
    }

    /// Pre-order scan for parent-link, ordering and red-red violations.
    /// Keys in the subtree must lie strictly between `lower` and `upper`.
    /// Returns the number of nodes visited.
    fn check_links<C>(&self, handle: Handle, lower: Option<&K>, upper: Option<&K>, cmp: &C) -> Result<usize, InvariantViolation>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let node = self.node(handle);
        let key = node.key();

        let out_of_bounds = |bound: &K| InvariantViolation::OrderViolation {
            key: format!("{key:?}"),
            bound: format!("{bound:?}"),
        };
        if let Some(lower) = lower
            && cmp(key, lower) != Ordering::Greater
        {
            return Err(out_of_bounds(lower));
        }
        if let Some(upper) = upper
            && cmp(key, upper) != Ordering::Less
        {
            return Err(out_of_bounds(upper));
        }

        let mut count = 1;
        for side in [Side::Left, Side::Right] {
            let Some(child) = node.child(side) else {
                continue;
            };
            let child_node = self.node(child);
            if child_node.parent() != Some(handle) {
                return Err(InvariantViolation::ParentLinkMismatch {
                    key: format!("{:?}", child_node.key()),
                });
            }
            if node.is_red() && child_node.is_red() {
                return Err(InvariantViolation::RedRedAdjacency {
                    parent: format!("{key:?}"),
                    child: format!("{:?}", child_node.key()),
                });
            }
            let (lower, upper) = match side {
                Side::Left => (lower, Some(key)),
                Side::Right => (Some(key), upper),
            };
            count += self.check_links(child, lower, upper, cmp)?;
        }
        Ok(count)
    }

    /// Black-height of the subtree at `handle`, counting the empty position
    /// below a leaf as 1.
    fn black_height(&self, handle: Option<Handle>) -> Result<usize, InvariantViolation> {
        let Some(handle) = handle else {
            return Ok(1);
        };
        let node = self.node(handle);
        let left = self.black_height(node.left())?;
        let right = self.black_height(node.right())?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch {
                key: format!("{:?}", node.key()),
                left,
                right,
            });
        }
        Ok(left + usize::from(!node.is_red()))
    }
}
