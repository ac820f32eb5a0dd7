use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;

/// Minimum degree `t` of the 2-3-4 tree.
pub(crate) const MIN_DEGREE: usize = 2;
pub(crate) const MAX_KEYS: usize = 2 * MIN_DEGREE - 1;
pub(crate) const MIN_KEYS: usize = MIN_DEGREE - 1;
pub(crate) const MAX_CHILDREN: usize = 2 * MIN_DEGREE;

/// A 2-3-4 tree node. A node with no children is a leaf; an internal node
/// always has exactly one more child than keys.
#[derive(Clone)]
pub(crate) struct BTreeNode<K> {
    keys: SmallVec<[K; MAX_KEYS]>,
    children: SmallVec<[Handle; MAX_CHILDREN]>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// An equal key is already in the node.
    Found,
    /// Key was not found; index is where it would be inserted, and the child
    /// to descend into.
    GoDown(usize),
}

impl<K> BTreeNode<K> {
    /// Creates a new empty leaf node.
    pub(crate) fn new_leaf() -> Self {
        Self {
            keys: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    /// Creates an internal node with `child` as its only child, ready to take
    /// the median of that child when it is split.
    pub(crate) fn new_root_above(child: Handle) -> Self {
        let mut children = SmallVec::new();
        children.push(child);
        Self {
            keys: SmallVec::new(),
            children,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.keys.len() == MAX_KEYS
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Binary search with a caller-supplied comparison.
    #[inline]
    pub(crate) fn search<C>(&self, key: &K, cmp: &C) -> SearchResult
    where
        C: Fn(&K, &K) -> Ordering,
    {
        match self.keys.binary_search_by(|k| cmp(k, key)) {
            Ok(_) => SearchResult::Found,
            Err(idx) => SearchResult::GoDown(idx),
        }
    }

    /// Inserts a key at `index` in a leaf.
    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        debug_assert!(self.is_leaf(), "`BTreeNode::insert_key()` - node is not a leaf!");
        self.keys.insert(index, key);
    }

    /// Takes a promoted median at `index`, with the split-off right half of
    /// child `index` becoming child `index + 1`.
    pub(crate) fn insert_separator(&mut self, index: usize, median: K, right: Handle) {
        self.keys.insert(index, median);
        self.children.insert(index + 1, right);
    }

    /// Splits a full node around its median key. The node keeps the keys (and
    /// children) left of the median; the returned node holds the rest.
    pub(crate) fn split(&mut self) -> (K, BTreeNode<K>) {
        assert!(self.is_full(), "`BTreeNode::split()` - node is not full!");
        let mid = MIN_DEGREE - 1;

        let mut right = BTreeNode::new_leaf();
        right.keys = self.keys.drain(mid + 1..).collect();
        if !self.is_leaf() {
            right.children = self.children.drain(MIN_DEGREE..).collect();
        }

        let median = self
            .keys
            .pop()
            .expect("`BTreeNode::split()` - full node has a median!");
        (median, right)
    }
}
