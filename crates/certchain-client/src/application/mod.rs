//! # Application Module
//!
//! Orchestration services composing the ports and algorithms into the
//! client's use cases.

pub mod authenticate;
pub mod chain_client;
pub mod reconcile;
pub mod registry;
pub mod transfer;

pub use authenticate::FileAuthenticator;
pub use chain_client::ChainClient;
pub use reconcile::ReconciliationEngine;
pub use registry::CertificateRegistry;
pub use transfer::{TransferOrchestrator, TransferStep};
