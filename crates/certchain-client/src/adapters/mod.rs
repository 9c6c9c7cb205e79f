//! # Adapters Module
//!
//! Concrete implementations of the outbound ports: an in-process ledger
//! with full program semantics, an HTTP metadata gateway, and a JSON file
//! cache store.

pub mod http_gateway;
pub mod json_store;
pub mod memory_ledger;

pub use http_gateway::HttpMetadataGateway;
pub use json_store::JsonFileCacheStore;
pub use memory_ledger::InMemoryLedger;
