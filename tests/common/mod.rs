//! Shared test setup.
//!
//! Run with the crate's `tracing` feature to see rebalancing events:
//!
//! ```bash
//! RUST_LOG=rb234=trace cargo test --features tracing --test rb_tree -- --nocapture
//! ```

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Ensures the subscriber is only installed once per test binary.
static INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default `warn`)
/// that writes through the test harness's captured output.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
