//! # Reconciliation Engine
//!
//! Brings one wallet's local cache into agreement with ledger truth. Runs
//! only when called; connect-time scheduling is the caller's concern, and
//! there is no background loop here.
//!
//! Every pass re-evaluates the reset predicate first: reconciling against
//! a regenerated ledger would resurrect stale certificate identities, so a
//! detected reset purges the wallet's cache and bookkeeping wholesale.

use crate::algorithms::{detect_reset, refresh_merge, smart_merge, MergeResult};
use crate::domain::{Address, CacheEntry, ClientError, SyncOutcome};
use crate::ports::{CacheStore, LedgerRpc};
use crate::{CertificateRegistry, ChainClient};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Cache-vs-ledger reconciliation for one configured program.
pub struct ReconciliationEngine<L, S> {
    registry: CertificateRegistry<L>,
    store: Arc<S>,
}

impl<L: LedgerRpc, S: CacheStore> ReconciliationEngine<L, S> {
    /// Engine over a chain client and a cache store.
    pub fn new(client: ChainClient<L>, store: Arc<S>) -> Self {
        Self {
            registry: CertificateRegistry::new(client),
            store,
        }
    }

    /// Non-destructive sync: ledger fields win, local overlay carries over,
    /// and local-only entries survive while the wallet still owns them.
    /// Idempotent; safe to call any number of times.
    pub async fn smart_sync(&self, wallet: Address) -> Result<SyncOutcome, ClientError> {
        self.sync_with(wallet, false).await
    }

    /// Destructive refresh: overlay still carries over per ID, but every
    /// local entry absent from the ledger is dropped.
    pub async fn force_refresh(&self, wallet: Address) -> Result<SyncOutcome, ClientError> {
        self.sync_with(wallet, true).await
    }

    async fn sync_with(
        &self,
        wallet: Address,
        destructive: bool,
    ) -> Result<SyncOutcome, ClientError> {
        let state = match self.registry.program_state().await {
            Ok(state) => state,
            Err(ClientError::NotInitialized) => {
                // Nothing authoritative to reconcile against; leave local
                // data untouched rather than guessing.
                info!(wallet = %wallet.short(), "program not initialized, sync skipped");
                return Ok(SyncOutcome::NotInitialized);
            }
            Err(e) => return Err(e),
        };

        let cache = self.store.load(wallet).await?;
        if detect_reset(
            state.certificate_count,
            cache.last_known_count,
            cache.entries.len(),
        ) {
            warn!(
                wallet = %wallet.short(),
                current = state.certificate_count,
                last_known = cache.last_known_count,
                cached = cache.entries.len(),
                "ledger reset detected, purging wallet cache"
            );
            self.store.purge(wallet).await?;
            return Ok(SyncOutcome::ResetPurged);
        }

        let authoritative = self.registry.list_active(Some(wallet)).await?;
        let now = now_epoch();
        let MergeResult {
            entries,
            kept_local,
            dropped_local,
        } = if destructive {
            refresh_merge(&authoritative, &cache.entries, now)
        } else {
            smart_merge(&authoritative, &cache.entries, wallet, now)
        };

        let total = entries.len();
        let updated = crate::domain::WalletCache {
            entries,
            last_sync_epoch: Some(now),
            last_known_count: state.certificate_count,
        };
        self.store.store(wallet, &updated).await?;

        info!(
            wallet = %wallet.short(),
            total,
            kept_local,
            dropped_local,
            destructive,
            "reconciliation complete"
        );
        Ok(SyncOutcome::Synced {
            total,
            kept_local,
            dropped_local,
        })
    }

    /// Write an optimistic entry into a wallet's cache ahead of the next
    /// sync. Used by flows that already know what the ledger will say.
    pub async fn record_optimistic(
        &self,
        wallet: Address,
        entry: CacheEntry,
    ) -> Result<(), ClientError> {
        let mut cache = self.store.load(wallet).await?;
        cache.upsert(entry);
        self.store.store(wallet, &cache).await
    }
}
