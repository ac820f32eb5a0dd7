use core::cmp::Ordering;

use super::RbTree;
use crate::raw::RawRbTree;

impl<K: Ord> RbTree<K> {
    /// Creates an empty tree with room for at least `capacity` keys before
    /// the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree: RbTree<i32> = RbTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, K::cmp)
    }
}

impl<K, C> RbTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty tree ordered by `cmp` with room for at least
    /// `capacity` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree = RbTree::with_capacity_and_comparator(8, |a: &u8, b: &u8| b.cmp(a));
    /// assert!(tree.capacity() >= 8);
    /// ```
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        RbTree {
            raw: RawRbTree::with_capacity(capacity),
            cmp,
        }
    }
}

impl<K, C> RbTree<K, C> {
    /// Returns the number of keys the tree can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
