//! Balanced ordered-set trees for Rust.
//!
//! This crate provides two independent ordered sets over a user-supplied
//! total order:
//!
//! - [`RbTree`] - a red-black tree with insertion, erasure, membership and an
//!   invariant [`verify`](RbTree::verify)er.
//! - [`Tree234`] - a 2-3-4 tree (B-tree of minimum degree 2) that splits full
//!   nodes on the way down during insertion. It supports insertion only.
//!
//! Both keep their keys in order and offer an in-order [`iter`](RbTree::iter),
//! an [`inorder`](RbTree::inorder) trace and a [`print_tree`](RbTree::print_tree)
//! structural dump.
//!
//! # Example
//!
//! ```
//! use rb234::{RbTree, Tree234};
//!
//! let keys = [47, 43, 23, 90, 95, 27, 67, 80, 88, 29];
//!
//! let mut rb = RbTree::new();
//! let mut b = Tree234::new();
//! for key in keys {
//!     rb.insert(key);
//!     b.insert(key);
//!     rb.verify().unwrap();
//!     b.verify().unwrap();
//! }
//!
//! assert!(rb.erase(&27));
//! assert!(!rb.contains(&27));
//! assert_eq!(rb.inorder().to_string(), "23 29 43 47 67 80 88 90 95");
//! assert_eq!(b.inorder().to_string(), "23 27 29 43 47 67 80 88 90 95");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **`tracing`** - Logs rotations, fixup cases, node splits and invariant
//!   violations through the [`tracing`](https://docs.rs/tracing) crate
//!
//! # Implementation
//!
//! Nodes live in an arena and link to each other by handle, so the trees
//! contain no unsafe code. Red-black nodes also record their parent; the
//! rebalancing code is written once for a left/right `Side` and its mirror.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod raw;
mod tracing_helpers;

pub mod rb_tree;
pub mod tree234;

pub use error::InvariantViolation;
pub use rb_tree::RbTree;
pub use tree234::Tree234;
