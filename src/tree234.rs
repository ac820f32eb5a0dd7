use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::InvariantViolation;
use crate::raw::{BTreeNode, Handle, RawTree234};

mod capacity;

/// An ordered set based on a 2-3-4 tree (a B-tree of minimum degree 2).
///
/// Every node holds one to three keys (the root may be empty) and every
/// internal node has one more child than it has keys. Insertion splits full
/// nodes on the way down, promoting their middle key, so all leaves stay at
/// the same depth. Keys cannot be removed.
///
/// # Examples
///
/// ```
/// use rb234::Tree234;
///
/// let mut tree = Tree234::new();
/// for key in [17, 15, 49, 34] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.print_tree().to_string(), "[17]\n  [15]\n  [34 49]\n");
/// assert_eq!(tree.inorder().to_string(), "15 17 34 49");
/// tree.verify().unwrap();
/// ```
pub struct Tree234<K, C = fn(&K, &K) -> Ordering> {
    raw: RawTree234<K>,
    cmp: C,
}

/// An iterator over the keys of a `Tree234`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`Tree234`].
///
/// [`iter`]: Tree234::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K: 'a> {
    raw: &'a RawTree234<K>,
    // Nodes on the path to the next key, each with the index of its next key.
    stack: SmallVec<[(Handle, usize); 16]>,
    remaining: usize,
}

/// Displays the keys of a `Tree234` in ascending order, separated by spaces.
///
/// This `struct` is created by the [`inorder`] method on [`Tree234`].
///
/// [`inorder`]: Tree234::inorder
pub struct InOrder<'a, K: 'a> {
    iter: Iter<'a, K>,
}

/// Displays the structure of a `Tree234`, one bracketed node per line.
///
/// This `struct` is created by the [`print_tree`] method on [`Tree234`].
///
/// [`print_tree`]: Tree234::print_tree
pub struct PrintTree<'a, K: 'a> {
    raw: &'a RawTree234<K>,
}

impl<K: Ord> Tree234<K> {
    /// Makes a new `Tree234` ordered by [`Ord::cmp`]. Its root is an empty leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::new();
    /// tree.insert(1);
    /// assert_eq!(tree.height(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(K::cmp)
    }
}

impl<K, C> Tree234<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Makes a new `Tree234` ordered by `cmp`.
    ///
    /// `cmp` must be a total order; keys comparing [`Ordering::Equal`] are
    /// treated as duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.extend([1, 3, 2]);
    /// assert_eq!(tree.inorder().to_string(), "3 2 1");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Tree234 {
            raw: RawTree234::new(),
            cmp,
        }
    }

    /// Returns `true` if the tree contains a key equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let tree = Tree234::from([1, 2, 3, 4, 5]);
    /// assert!(tree.contains(&4));
    /// assert!(!tree.contains(&6));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains(&self, key: &K) -> bool {
        self.raw.contains(key, &self.cmp)
    }

    /// Adds a key to the tree, splitting full nodes on the way down.
    ///
    /// Returns whether the key was newly inserted; a duplicate is dropped.
    /// A full root is split before the search starts, so even a duplicate
    /// can grow the tree by one level.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::new();
    /// assert!(tree.insert(5));
    /// assert!(!tree.insert(5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key, &self.cmp)
    }

    /// Checks the 2-3-4 invariants: every non-root node holds one to three
    /// keys, keys within a node strictly increase, each internal node has one
    /// more child than keys, child keys fall between the neighbouring
    /// separators, and all leaves share a depth.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let tree: Tree234<_> = (0..100).collect();
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

impl<K, C> Tree234<K, C> {
    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let tree: Tree234<_> = [9, 3, 6].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 6, 9]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            raw: &self.raw,
            stack: SmallVec::new(),
            remaining: self.raw.len(),
        };
        iter.descend_leftmost(self.raw.root());
        iter
    }

    /// Returns a [`Display`](fmt::Display) adapter that prints the keys in
    /// ascending order, separated by single spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let tree = Tree234::from([3, 1, 2]);
    /// assert_eq!(tree.inorder().to_string(), "1 2 3");
    /// ```
    pub fn inorder(&self) -> InOrder<'_, K> {
        InOrder { iter: self.iter() }
    }

    /// Returns a [`Display`](fmt::Display) adapter that dumps the tree
    /// structure: one line per node in pre-order, indented two spaces per
    /// level, keys in brackets (`[15 17 49]`).
    ///
    /// The exact format is a debugging aid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let tree = Tree234::from([1, 2, 3, 4]);
    /// assert_eq!(tree.print_tree().to_string(), "[2]\n  [1]\n  [3 4]\n");
    /// ```
    pub fn print_tree(&self) -> PrintTree<'_, K> {
        PrintTree { raw: &self.raw }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
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
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::new();
    /// assert!(tree.is_empty());
    /// tree.insert(1);
    /// assert!(!tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of node levels, which is 1 for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::new();
    /// tree.extend([1, 2, 3]);
    /// assert_eq!(tree.height(), 1);
    /// tree.insert(4);
    /// assert_eq!(tree.height(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Removes every key, leaving a single empty leaf as the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb234::Tree234;
    ///
    /// let mut tree = Tree234::from([1, 2, 3, 4]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.print_tree().to_string(), "[]\n");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Clone, C: Clone> Clone for Tree234<K, C> {
    fn clone(&self) -> Self {
        Tree234 {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for Tree234<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> Default for Tree234<K> {
    fn default() -> Self {
        Tree234::new()
    }
}

impl<K: Ord> FromIterator<K> for Tree234<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Tree234::new();
        tree.extend(iter);
        tree
    }
}

impl<K, C> Extend<K> for Tree234<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for Tree234<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K, C> IntoIterator for &'a Tree234<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<'a, K> Iter<'a, K> {
    /// Pushes `handle` and its chain of first children down to a leaf.
    fn descend_leftmost(&mut self, mut handle: Handle) {
        loop {
            self.stack.push((handle, 0));
            let node: &BTreeNode<K> = self.raw.node(handle);
            if node.is_leaf() {
                return;
            }
            handle = node.child(0);
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let raw = self.raw;
        while let Some((handle, index)) = self.stack.last_mut() {
            let node = raw.node(*handle);
            if *index == node.key_count() {
                self.stack.pop();
                continue;
            }

            let key = node.key(*index);
            *index += 1;
            if !node.is_leaf() {
                let next_child = node.child(*index);
                self.descend_leftmost(next_child);
            }
            self.remaining -= 1;
            return Some(key);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
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
        Iter {
            raw: self.raw,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
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
            raw: &RawTree234<K>,
            handle: Handle,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let node = raw.node(handle);
            write!(f, "{:indent$}[", "", indent = depth * 2)?;
            for (i, key) in node.keys().iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{key}")?;
            }
            f.write_str("]\n")?;
            for &child in node.children() {
                write_node(raw, child, depth + 1, f)?;
            }
            Ok(())
        }

        write_node(self.raw, self.raw.root(), 0, f)
    }
}
