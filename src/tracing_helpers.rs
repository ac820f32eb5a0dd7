//! Logging macros that cost nothing unless the `tracing` feature is enabled.
//!
//! With the feature on, each macro forwards to the matching `tracing` macro,
//! so fields use the usual `tracing` syntax (`name = value`, `?debug`,
//! `%display`). With it off, the arguments are discarded unexpanded.
//!
//! ```bash
//! # Watch the rebalancing cases taken by the red-black tree tests
//! RUST_LOG=rb234=trace cargo test --features tracing --test rb_tree
//! ```

#![allow(unused_macros, unused_imports)]

/// Trace-level logging: rotations and fixup cases.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging: node splits and root growth.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Error-level logging: invariant violations found by `verify()`.
#[cfg(feature = "tracing")]
macro_rules! error_log {
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! error_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use error_log;
pub(crate) use trace_log;
