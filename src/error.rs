use alloc::string::String;

/// A structural invariant that [`RbTree::verify`](crate::RbTree::verify) or
/// [`Tree234::verify`](crate::Tree234::verify) found broken.
///
/// Keys are rendered with their `Debug` representation. A violation means the
/// tree itself is corrupt; there is nothing to recover.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// The red-black root is red.
    #[error("root {key} is red")]
    RedRoot { key: String },

    /// A red node has a red child.
    #[error("red node {parent} has red child {child}")]
    RedRedAdjacency { parent: String, child: String },

    /// Two subtrees of one node disagree on black-height.
    #[error("black-height mismatch at {key}: left {left}, right {right}")]
    BlackHeightMismatch { key: String, left: usize, right: usize },

    /// A key sits on the wrong side of an ancestor's key.
    #[error("key {key} is out of order relative to {bound}")]
    OrderViolation { key: String, bound: String },

    /// A node's recorded parent is not the node that owns it.
    #[error("parent link of {key} does not match its owner")]
    ParentLinkMismatch { key: String },

    /// A 2-3-4 node holds too few or too many keys.
    #[error("node {keys} holds {count} keys")]
    KeyCountOutOfRange { keys: String, count: usize },

    /// A 2-3-4 internal node does not have exactly one more child than keys.
    #[error("node {keys} has {key_count} keys but {child_count} children")]
    ChildCountMismatch { keys: String, key_count: usize, child_count: usize },

    /// Keys within a 2-3-4 node are not strictly increasing.
    #[error("keys of node {keys} are not strictly increasing")]
    KeysNotIncreasing { keys: String },

    /// A 2-3-4 leaf is not at the same depth as the others.
    #[error("leaf {keys} at depth {found}, expected depth {expected}")]
    LeafDepthMismatch { keys: String, expected: usize, found: usize },

    /// The recorded length disagrees with the number of keys reachable from the root.
    #[error("tree records {recorded} keys but holds {actual}")]
    LenMismatch { recorded: usize, actual: usize },
}
