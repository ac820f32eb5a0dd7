use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::InvariantViolation;
use crate::raw::{Handle, RawRbTree, Side};

mod capacity;

/// An ordered set based on a red-black tree.
///
/// Keys are ordered by a comparison function, [`Ord::cmp`] unless one is
/// supplied through [`RbTree::with_comparator`]. Every node carries a color
/// bit, and insertion and erasure rebalance with rotations and recoloring so
/// that the height stays O(log n).
///
/// Nodes live in an arena and refer to each other by handle. Each node also
/// records its parent, which is what lets [`iter`](RbTree::iter) walk the
/// tree without a stack.
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use rb234::RbTree;
///
/// let mut tree = RbTree::new();
/// for key in [47, 43, 23, 90, 95, 27] {
///     tree.insert(key);
/// }
/// tree.verify().unwrap();
///
/// assert!(tree.contains(&27));
/// assert!(tree.erase(&27));
/// assert!(!tree.erase(&27));
///
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [23, 43, 47, 90, 95]);
/// assert_eq!(tree.inorder().to_string(), "23 43 47 90 95");
/// ```
///
/// A tree ordered by a custom comparison:
///
/// ```
/// use rb234::RbTree;
///
/// let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub struct RbTree<K, C = fn(&K, &K) -> Ordering> {
    raw: RawRbTree<K>,
    cmp: C,
}

/// An iterator over the keys of an `RbTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RbTree`].
///
/// [`iter`]: RbTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K: 'a> {
    raw: &'a RawRbTree<K>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// Displays the keys of an `RbTree` in ascending order, separated by spaces.
///
/// This `struct` is created by the [`inorder`] method on [`RbTree`].
///
/// [`inorder`]: RbTree::inorder
pub struct InOrder<'a, K: 'a> {
    iter: Iter<'a, K>,
}

/// Displays the structure of an `RbTree`, one node per line.
///
/// This `struct` is created by the [`print_tree`] method on [`RbTree`].
///
/// [`print_tree`]: RbTree::print_tree
pub struct PrintTree<'a, K: 'a> {
    raw: &'a RawRbTree<K>,
}

impl<K: Ord> RbTree<K> {
    /// Makes a new, empty `RbTree` ordered by [`Ord::cmp`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> Self {
        RbTree {
            raw: RawRbTree::new(),
            cmp: K::cmp,
        }
    }
}

impl<K, C> RbTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Makes a new, empty `RbTree` ordered by `cmp`.
    ///
    /// `cmp` must be a total order; keys comparing [`Ordering::Equal`] are
    /// treated as duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// assert!(tree.insert("pear"));
    /// assert!(!tree.insert("plum")); // same length, so a duplicate
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        RbTree {
            raw: RawRbTree::new(),
            cmp,
        }
    }

    /// Returns `true` if the tree contains a key equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree = RbTree::from([1, 2, 3]);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains(&self, key: &K) -> bool {
        self.raw.find(key, &self.cmp).is_some()
    }

    /// Adds a key to the tree.
    ///
    /// Returns whether the key was newly inserted. A key equal to one already
    /// present is dropped and the tree is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// assert!(tree.insert(2));
    /// assert!(!tree.insert(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key, &self.cmp)
    }

    /// Removes the key equal to `key`. Returns whether such a key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::from([2]);
    /// assert!(tree.erase(&2));
    /// assert!(!tree.erase(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, key: &K) -> bool {
        self.raw.erase(key, &self.cmp).is_some()
    }

    /// Removes and returns the key equal to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::from([2]);
    /// assert_eq!(tree.take(&2), Some(2));
    /// assert_eq!(tree.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.raw.erase(key, &self.cmp)
    }

    /// Checks the red-black invariants: the root is black, no red node has a
    /// red child, every path from a node down to an empty position crosses the
    /// same number of black nodes, and keys are in search-tree order. Parent
    /// links and the recorded length are checked as well.
    ///
    /// This is a self-test hook. A violation means the tree is corrupt.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree: RbTree<_> = (0..100).collect();
    /// assert_eq!(tree.verify(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn verify(&self) -> Result<(), InvariantViolation>
    where
        K: fmt::Debug,
    {
        self.raw.verify(&self.cmp)
    }
}

impl<K, C> RbTree<K, C> {
    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree = RbTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(Side::Left),
            back: self.raw.first(Side::Right),
            remaining: self.raw.len(),
        }
    }

    /// Returns a [`Display`](fmt::Display) adapter that prints the keys in
    /// ascending order, separated by single spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree = RbTree::from([3, 1, 2]);
    /// assert_eq!(tree.inorder().to_string(), "1 2 3");
    /// ```
    pub fn inorder(&self) -> InOrder<'_, K> {
        InOrder { iter: self.iter() }
    }

    /// Returns a [`Display`](fmt::Display) adapter that dumps the tree
    /// structure: one line per node in pre-order (node, left subtree, right
    /// subtree), indented two spaces per level and tagged `(R)` or `(B)`.
    ///
    /// The exact format is a debugging aid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let tree = RbTree::from([2, 1, 3]);
    /// assert_eq!(tree.print_tree().to_string(), "(B) 2\n  (R) 1\n  (R) 3\n");
    /// ```
    pub fn print_tree(&self) -> PrintTree<'_, K> {
        PrintTree { raw: &self.raw }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key, keeping the comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::RbTree;
    ///
    /// let mut tree = RbTree::from([1, 2]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Clone, C: Clone> Clone for RbTree<K, C> {
    fn clone(&self) -> Self {
        RbTree {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for RbTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> Default for RbTree<K> {
    fn default() -> Self {
        RbTree::new()
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K, C> Extend<K> for RbTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: 'a + Copy, C> Extend<&'a K> for RbTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for RbTree<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K, C> IntoIterator for &'a RbTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.front = self.raw.step(handle, Side::Right);
        self.remaining -= 1;
        Some(self.raw.node(handle).key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.back = self.raw.step(handle, Side::Left);
        self.remaining -= 1;
        Some(self.raw.node(handle).key())
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: fmt::Display> fmt::Display for InOrder<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.iter.clone().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<K: fmt::Display> fmt::Display for PrintTree<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node<K: fmt::Display>(
            raw: &RawRbTree<K>,
            handle: Option<Handle>,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let Some(handle) = handle else {
                return Ok(());
            };
            let node = raw.node(handle);
            let tag = if node.is_red() { "(R)" } else { "(B)" };
            writeln!(f, "{:indent$}{tag} {}", "", node.key(), indent = depth * 2)?;
            write_node(raw, node.left(), depth + 1, f)?;
            write_node(raw, node.right(), depth + 1, f)
        }

        write_node(self.raw, self.raw.root(), 0, f)
    }
}
