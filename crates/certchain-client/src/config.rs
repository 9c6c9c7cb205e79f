//! # Client Configuration

use crate::domain::{Address, Cluster};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed per-transaction network fee estimate, in lamports. Quotes use
/// this instead of asking the RPC node for a fee schedule.
pub const NETWORK_FEE_ESTIMATE_LAMPORTS: u64 = 5_000;

/// Tunables for the client layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deployed certificate program.
    pub program_id: Address,
    /// Cluster the RPC endpoint belongs to; gates airdrop behavior.
    pub cluster: Cluster,
    /// Base URL used to resolve `ipfs://` metadata URIs.
    pub gateway_base_url: String,
    /// Submission attempts before giving up on transient failures.
    pub max_submit_attempts: u32,
    /// First retry delay; each further attempt doubles it.
    pub backoff_base: Duration,
    /// Per-request metadata fetch timeout.
    pub metadata_timeout: Duration,
    /// During verification scans, pause after this many gateway fetches.
    pub scan_throttle_every: usize,
    /// Length of that pause.
    pub scan_throttle_pause: Duration,
    /// Balance below which the client tries to top up before submitting.
    pub min_balance_lamports: u64,
    /// Amount requested per airdrop on clusters that allow it.
    pub airdrop_lamports: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: Address::ZERO,
            cluster: Cluster::Devnet,
            gateway_base_url: "https://gateway.pinata.cloud".to_string(),
            max_submit_attempts: 3,
            backoff_base: Duration::from_secs(1),
            metadata_timeout: Duration::from_secs(10),
            scan_throttle_every: 3,
            scan_throttle_pause: Duration::from_millis(100),
            min_balance_lamports: 10_000_000,
            airdrop_lamports: 2_000_000_000,
        }
    }
}

impl ClientConfig {
    /// Config for tests: no real delays anywhere.
    pub fn for_testing(program_id: Address) -> Self {
        Self {
            program_id,
            backoff_base: Duration::ZERO,
            scan_throttle_pause: Duration::ZERO,
            ..Self::default()
        }
    }
}
