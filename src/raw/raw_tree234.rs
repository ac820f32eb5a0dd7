use alloc::format;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use super::arena::Arena;
use super::btree_node::{BTreeNode, MAX_CHILDREN, MAX_KEYS, MIN_KEYS, SearchResult};
use super::handle::Handle;
use crate::error::InvariantViolation;
use crate::tracing_helpers::debug_log;

/// The core 2-3-4 tree backing `Tree234`.
///
/// Full nodes are split on the way down, so an insertion never has to walk
/// back up the tree.
#[derive(Clone)]
pub(crate) struct RawTree234<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<BTreeNode<K>>,
    /// Handle to the root node; an empty tree has an empty leaf root.
    root: Handle,
    /// Total number of keys in the tree.
    len: usize,
}

impl<K> RawTree234<K> {
    /// Creates a tree whose root is an empty leaf.
    pub(crate) fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.max(1));
        let root = nodes.alloc(BTreeNode::new_leaf());
        Self { nodes, root, len: 0 }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(BTreeNode::new_leaf());
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &BTreeNode<K> {
        self.nodes.get(handle)
    }

    /// Number of node levels; every leaf sits at the same depth.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.node(self.root);
        while !current.is_leaf() {
            current = self.node(current.child(0));
            height += 1;
        }
        height
    }

    /// Splits the full child at `index` of `parent`, promoting its median into
    /// `parent` and linking the new right sibling after it.
    fn split_child(&mut self, parent: Handle, index: usize) {
        let child = self.node(parent).child(index);
        let (median, right) = self.nodes.get_mut(child).split();
        let right = self.nodes.alloc(right);
        self.nodes.get_mut(parent).insert_separator(index, median, right);
    }
}

impl<K> RawTree234<K> {
    pub(crate) fn contains<C>(&self, key: &K, cmp: &C) -> bool
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut current = self.root;
        loop {
            let node = self.node(current);
            match node.search(key, cmp) {
                SearchResult::Found => return true,
                SearchResult::GoDown(_) if node.is_leaf() => return false,
                SearchResult::GoDown(index) => current = node.child(index),
            }
        }
    }

    /// Inserts `key`, splitting every full node met on the way down.
    /// Returns `false` if an equal key is already present.
    pub(crate) fn insert<C>(&mut self, key: K, cmp: &C) -> bool
    where
        C: Fn(&K, &K) -> Ordering,
    {
        if self.node(self.root).is_full() {
            debug_log!(len = self.len, "2-3-4 tree: splitting full root");
            let old_root = self.root;
            self.root = self.nodes.alloc(BTreeNode::new_root_above(old_root));
            self.split_child(self.root, 0);
        }

        let mut current = self.root;
        loop {
            let node = self.node(current);
            let mut index = match node.search(&key, cmp) {
                SearchResult::Found => return false,
                SearchResult::GoDown(index) => index,
            };

            if node.is_leaf() {
                self.nodes.get_mut(current).insert_key(index, key);
                self.len += 1;
                return true;
            }

            if self.node(node.child(index)).is_full() {
                debug_log!(index, "2-3-4 tree: splitting full child");
                self.split_child(current, index);
                match cmp(&key, self.node(current).key(index)) {
                    Ordering::Equal => return false,
                    Ordering::Greater => index += 1,
                    Ordering::Less => {}
                }
            }

            current = self.node(current).child(index);
        }
    }
}

impl<K: fmt::Debug> RawTree234<K> {
    /// Checks the 2-3-4 structural bounds and search ordering, reporting the
    /// first violation found.
    pub(crate) fn verify<C>(&self, cmp: &C) -> Result<(), InvariantViolation>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut leaf_depth = None;
        let result = self
            .check_node(self.root, 0, None, None, &mut leaf_depth, cmp)
            .and_then(|count| {
                if count == self.len {
                    Ok(())
                } else {
                    Err(InvariantViolation::LenMismatch {
                        recorded: self.len,
                        actual: count,
                    })
                }
            });
        #[cfg(feature = "tracing")]
        if let Err(violation) = &result {
            crate::tracing_helpers::error_log!(%violation, "2-3-4 tree invariant violated");
        }
        result
    }

    /// Returns the number of keys in the subtree at `handle`, whose keys must
    /// all lie strictly between `lower` and `upper`.
    fn check_node<C>(
        &self,
        handle: Handle,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        leaf_depth: &mut Option<usize>,
        cmp: &C,
    ) -> Result<usize, InvariantViolation>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let node = self.node(handle);
        let keys = node.keys();
        let describe = || -> String { format!("{keys:?}") };

        let min_keys = if handle == self.root { 0 } else { MIN_KEYS };
        if !(min_keys..=MAX_KEYS).contains(&keys.len()) {
            return Err(InvariantViolation::KeyCountOutOfRange {
                keys: describe(),
                count: keys.len(),
            });
        }
        if keys.windows(2).any(|pair| cmp(&pair[0], &pair[1]) != Ordering::Less) {
            return Err(InvariantViolation::KeysNotIncreasing { keys: describe() });
        }
        if let (Some(first), Some(lower)) = (keys.first(), lower)
            && cmp(first, lower) != Ordering::Greater
        {
            return Err(InvariantViolation::OrderViolation {
                key: format!("{first:?}"),
                bound: format!("{lower:?}"),
            });
        }
        if let (Some(last), Some(upper)) = (keys.last(), upper)
            && cmp(last, upper) != Ordering::Less
        {
            return Err(InvariantViolation::OrderViolation {
                key: format!("{last:?}"),
                bound: format!("{upper:?}"),
            });
        }

        if node.is_leaf() {
            let expected = *leaf_depth.get_or_insert(depth);
            if expected != depth {
                return Err(InvariantViolation::LeafDepthMismatch {
                    keys: describe(),
                    expected,
                    found: depth,
                });
            }
            return Ok(keys.len());
        }

        let children = node.children();
        if children.len() != keys.len() + 1 || children.len() > MAX_CHILDREN {
            return Err(InvariantViolation::ChildCountMismatch {
                keys: describe(),
                key_count: keys.len(),
                child_count: children.len(),
            });
        }

        let mut count = keys.len();
        for (i, &child) in children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(&keys[i - 1]) };
            let child_upper = if i == keys.len() { upper } else { Some(&keys[i]) };
            count += self.check_node(child, depth + 1, child_lower, child_upper, leaf_depth, cmp)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn natural(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    fn build(keys: &[i32]) -> RawTree234<i32> {
        let mut tree = RawTree234::new();
        for &key in keys {
            tree.insert(key, &natural);
        }
        tree
    }

    fn keys_of(tree: &RawTree234<i32>, handle: Handle) -> Vec<i32> {
        tree.node(handle).keys().to_vec()
    }

    fn collect(tree: &RawTree234<i32>, handle: Handle, out: &mut Vec<i32>) {
        let node = tree.node(handle);
        if node.is_leaf() {
            out.extend_from_slice(node.keys());
            return;
        }
        for (i, key) in node.keys().iter().enumerate() {
            collect(tree, node.child(i), out);
            out.push(*key);
        }
        collect(tree, node.child(node.key_count()), out);
    }

    #[test]
    fn empty_tree_is_a_single_empty_leaf() {
        let tree: RawTree234<i32> = RawTree234::new();
        assert!(tree.node(tree.root()).is_leaf());
        assert_eq!(tree.node(tree.root()).key_count(), 0);
        assert_eq!(tree.height(), 1);
        tree.verify(&natural).unwrap();
    }

    #[test]
    fn fourth_insert_splits_the_root() {
        let tree = build(&[17, 15, 49]);
        assert_eq!(keys_of(&tree, tree.root()), [15, 17, 49]);

        let tree = build(&[17, 15, 49, 34]);
        let root = tree.node(tree.root());
        assert!(!root.is_leaf());
        assert_eq!(root.keys(), [17]);
        assert_eq!(root.children().len(), 2);
        assert_eq!(keys_of(&tree, root.child(0)), [15]);
        assert_eq!(keys_of(&tree, root.child(1)), [34, 49]);
        assert_eq!(tree.height(), 2);
        tree.verify(&natural).unwrap();
    }

    #[test]
    fn duplicate_equal_to_promoted_median_is_rejected() {
        // Root [20] with a full right child [30 40 50]; inserting 40 splits
        // that child and meets 40 as the promoted median.
        let mut tree = build(&[10, 20, 30, 40, 50]);
        assert_eq!(keys_of(&tree, tree.root()), [20]);
        assert_eq!(keys_of(&tree, tree.node(tree.root()).child(1)), [30, 40, 50]);

        assert!(!tree.insert(40, &natural));
        assert_eq!(keys_of(&tree, tree.root()), [20, 40]);
        assert_eq!(tree.len(), 5);
        tree.verify(&natural).unwrap();
    }

    #[test]
    fn duplicates_are_rejected_in_leaves_and_internal_nodes() {
        let mut tree = build(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let len = tree.len();
        for key in 1..=8 {
            assert!(!tree.insert(key, &natural));
        }
        assert_eq!(tree.len(), len);
        tree.verify(&natural).unwrap();
    }

    #[test]
    fn clear_resets_to_empty_leaf() {
        let mut tree = build(&[5, 1, 9, 3, 7]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(!tree.contains(&5, &natural));
        tree.verify(&natural).unwrap();
    }

    #[test]
    fn verify_reports_unsorted_keys() {
        let mut tree = RawTree234::new();
        let root = tree.root();
        tree.nodes.get_mut(root).insert_key(0, 2);
        tree.nodes.get_mut(root).insert_key(1, 1);
        tree.len = 2;
        assert_eq!(
            tree.verify(&natural),
            Err(InvariantViolation::KeysNotIncreasing { keys: "[2, 1]".into() })
        );
    }

    #[test]
    fn verify_reports_len_mismatch() {
        let mut tree = build(&[1, 2]);
        tree.len = 3;
        assert_eq!(
            tree.verify(&natural),
            Err(InvariantViolation::LenMismatch { recorded: 3, actual: 2 })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn invariants_hold_after_every_insert(keys in prop::collection::vec(0i32..1000, 0..500)) {
            let mut tree = RawTree234::new();
            let mut model = alloc::collections::BTreeSet::new();

            for key in keys {
                prop_assert_eq!(tree.insert(key, &natural), model.insert(key));
                prop_assert_eq!(tree.verify(&natural), Ok(()));
            }

            let mut in_order = vec![];
            collect(&tree, tree.root(), &mut in_order);
            prop_assert_eq!(in_order, model.iter().copied().collect::<Vec<_>>());
            for key in 0..1000 {
                prop_assert_eq!(tree.contains(&key, &natural), model.contains(&key));
            }
        }
    }
}
