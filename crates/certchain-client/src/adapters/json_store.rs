//! # JSON File Cache Store
//!
//! [`CacheStore`] adapter persisting one JSON document per wallet under a
//! base directory. Writes go through a temp file followed by a rename, so
//! a crash mid-write leaves the previous document intact.

use crate::domain::{Address, ClientError, WalletCache};
use crate::ports::CacheStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Wallet caches as JSON files on disk.
pub struct JsonFileCacheStore {
    base_dir: PathBuf,
    // Serializes writers; concurrent stores of the same wallet must not
    // interleave their temp-file dance.
    write_lock: Mutex<()>,
}

impl JsonFileCacheStore {
    /// Store rooted at `base_dir`. The directory is created on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn wallet_path(&self, wallet: Address) -> PathBuf {
        self.base_dir.join(format!("{wallet}.json"))
    }
}

fn storage_err(context: &str, path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::Storage(format!("{context} {}: {err}", path.display()))
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn load(&self, wallet: Address) -> Result<WalletCache, ClientError> {
        let path = self.wallet_path(wallet);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WalletCache::default())
            }
            Err(e) => return Err(storage_err("failed to read", &path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| storage_err("corrupt cache file", &path, e))
    }

    async fn store(&self, wallet: Address, cache: &WalletCache) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().await;
        let path = self.wallet_path(wallet);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| storage_err("failed to create", &self.base_dir, e))?;
        let bytes = serde_json::to_vec_pretty(cache)
            .map_err(|e| storage_err("failed to encode", &path, e))?;
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| storage_err("failed to write", &tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| storage_err("failed to commit", &path, e))?;

        debug!(wallet = %wallet.short(), entries = cache.entries.len(), "cache stored");
        Ok(())
    }

    async fn purge(&self, wallet: Address) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().await;
        let path = self.wallet_path(wallet);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("failed to remove", &path, e)),
        }
    }
}
