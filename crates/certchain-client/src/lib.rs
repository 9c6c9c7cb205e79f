//! # Certchain Client
//!
//! Client-side interaction and reconciliation layer for the certificate
//! registry program.
//!
//! ## Purpose
//!
//! Everything between an application and the certificate ledger:
//! - Deterministic program-derived addresses for state, certificates, and
//!   transfer records
//! - Typed account fetches and a retrying submission pipeline
//! - Registry enumeration over the program's sequential ID space
//! - A transfer state machine with at-most-once fee semantics
//! - Cache-vs-ledger reconciliation with ledger-reset detection
//! - Content-addressed file verification against certificate metadata
//!
//! ## Module Structure
//!
//! ```text
//! certchain-client/
//! ├── domain/          # Account schemas, cache records, errors
//! ├── algorithms/      # Address derivation, digests, merge rules
//! ├── ports/           # Outbound traits: ledger, gateway, cache store
//! ├── adapters/        # In-memory ledger, HTTP gateway, JSON file store
//! ├── application/     # ChainClient, registry, transfer, sync, verify
//! └── config.rs        # ClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{HttpMetadataGateway, InMemoryLedger, JsonFileCacheStore};
pub use algorithms::{
    certificate_address, digests_match, extract_file_digest, program_state_address, sha256_hex,
    transaction_record_address,
};
pub use application::{
    CertificateRegistry, ChainClient, FileAuthenticator, ReconciliationEngine,
    TransferOrchestrator, TransferStep,
};
pub use config::{ClientConfig, NETWORK_FEE_ESTIMATE_LAMPORTS};
pub use domain::{
    AccountData, Address, BusinessRuleViolation, CacheEntry, Certificate, CertificateMetadata,
    ClientError, Cluster, MatchSource, MetadataAttribute, ProgramState, RegistryStats, Signature,
    SyncOutcome, SyncState, TransactionRecord, TransferQuote, TransferReceipt, TransferValidation,
    VerificationVerdict, WalletCache,
};
pub use ports::{CacheStore, Instruction, LedgerRpc, MetadataGateway};

/// Crate version, from the workspace manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
