//! # Ports Module
//!
//! Outbound trait boundaries: the ledger program, the metadata gateway,
//! and the local cache store. Mock implementations live next to their
//! traits for use in tests.

pub mod gateway;
pub mod ledger;
pub mod store;

pub use gateway::{MetadataGateway, MockMetadataGateway};
pub use ledger::{Instruction, LedgerRpc};
pub use store::{CacheStore, MemoryCacheStore};
