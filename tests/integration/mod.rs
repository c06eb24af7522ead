//! Integration test suite for spritemux
//!
//! End-to-end tests driving the public API the way a host build system
//! would: classify, report usage from concurrent tasks, close the pass,
//! and check the emitted sprites and the cumulative output mapping.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **partitioning**: Usage-signature grouping scenarios and
//!   order-independence across interleaved reports
//! - **assembly**: Filename templates, content hashing, and determinism
//! - **passes**: Multi-pass behavior, the cumulative mapping, and the
//!   process-wide tracker
//! - **delegation**: Subordinate builds reporting into the top-level
//!   registry

mod assembly;
mod delegation;
mod passes;

/// Opt-in log output for debugging test failures, driven by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
