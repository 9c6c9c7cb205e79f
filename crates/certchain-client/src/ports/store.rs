//! # Cache Store Port
//!
//! Outbound trait for client-local durable storage. Everything is
//! namespaced by wallet address so switching wallets cannot leak state.

use crate::domain::{Address, ClientError, WalletCache};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Wallet-scoped durable key-value persistence - outbound port.
///
/// Implementations must serialize writes internally: interleaved async
/// flows may store the same wallet's cache back to back, and the last
/// write must be a complete document, never a torn merge of two.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the cache for a wallet; an absent wallet loads as the empty
    /// default.
    async fn load(&self, wallet: Address) -> Result<WalletCache, ClientError>;

    /// Persist the full cache document for a wallet.
    async fn store(&self, wallet: Address, cache: &WalletCache) -> Result<(), ClientError>;

    /// Drop everything stored for a wallet: entries, sync time, and count
    /// bookkeeping.
    async fn purge(&self, wallet: Address) -> Result<(), ClientError>;
}

/// In-memory cache store for testing.
#[derive(Default)]
pub struct MemoryCacheStore {
    caches: Mutex<HashMap<Address, WalletCache>>,
}

impl MemoryCacheStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self, wallet: Address) -> Result<WalletCache, ClientError> {
        Ok(self
            .caches
            .lock()
            .expect("cache store poisoned")
            .get(&wallet)
            .cloned()
            .unwrap_or_default())
    }

    async fn store(&self, wallet: Address, cache: &WalletCache) -> Result<(), ClientError> {
        self.caches
            .lock()
            .expect("cache store poisoned")
            .insert(wallet, cache.clone());
        Ok(())
    }

    async fn purge(&self, wallet: Address) -> Result<(), ClientError> {
        self.caches
            .lock()
            .expect("cache store poisoned")
            .remove(&wallet);
        Ok(())
    }
}
