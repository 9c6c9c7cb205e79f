//! # Certchain Client Test Suite
//!
//! Unified test crate for cross-component flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-component choreography
//!     ├── lifecycle.rs      # Initialize, mint, verify, enumerate
//!     ├── transfer_flow.rs  # Transfer invariants and failure paths
//!     ├── reconcile_flow.rs # Sync, reset purge, optimistic confirm
//!     └── verify_flow.rs    # File authentication round trips
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p certchain-tests
//!
//! # One flow
//! cargo test -p certchain-tests integration::transfer_flow
//! ```

pub mod integration;
