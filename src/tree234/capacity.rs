use core::cmp::Ordering;

use super::Tree234;
use crate::raw::RawTree234;

impl<K: Ord> Tree234<K> {
    /// Creates an empty tree with room for at least `capacity` nodes before
    /// the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let tree: Tree234<i32> = Tree234::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, K::cmp)
    }
}

impl<K, C> Tree234<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty tree ordered by `cmp` with room for at least
    /// `capacity` nodes.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Tree234 {
            raw: RawTree234::with_capacity(capacity),
            cmp,
        }
    }
}

impl<K, C> Tree234<K, C> {
    /// Returns the number of nodes the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
