//! # Integration Tests
//!
//! Cross-component flows wired against the in-memory ledger, the mock
//! metadata gateway, and both cache store implementations.

pub mod lifecycle;
pub mod transfer_flow;
pub mod verify_flow;

/// Route client logs to the test harness; honors `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
