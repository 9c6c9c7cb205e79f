//! # Domain Value Objects
//!
//! Immutable value types shared across the client layer.

use super::errors::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lamports per SOL, for display conversions.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Transaction signature returned by the ledger on submission.
pub type Signature = String;

/// A 32-byte account address.
///
/// Rendered and parsed as 64 lowercase hex characters; "well-formed
/// address" throughout the crate means exactly that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 32]);

    /// Construct from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    /// Raw byte view, used as a seed component in address derivation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Shortened form for logs ("1a2b3c4d..").
    pub fn short(&self) -> String {
        format!("{}..", &self.to_string()[..8])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short())
    }
}

impl FromStr for Address {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)
            .map_err(|_| ClientError::InvalidAddress(format!("not hex: {s}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ClientError::InvalidAddress(format!("expected 32 bytes: {s}")))?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Ledger cluster the client is pointed at.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// Production network. No airdrops.
    MainnetBeta,
    /// Public test network.
    Testnet,
    /// Public development network.
    Devnet,
    /// Local validator.
    Localhost,
}

impl Cluster {
    /// Whether automatic funding requests are available here.
    pub fn supports_airdrop(&self) -> bool {
        matches!(self, Cluster::Devnet | Cluster::Localhost)
    }
}

/// Cost breakdown for one transfer, in lamports. Informational and safe to
/// recompute any number of times.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferQuote {
    /// Platform fee read from program state.
    pub platform_fee: u64,
    /// Fixed network-fee estimate.
    pub network_fee_estimate: u64,
    /// Sum of the above.
    pub total: u64,
}

impl TransferQuote {
    /// Build a quote from a platform fee and a network estimate.
    pub fn new(platform_fee: u64, network_fee_estimate: u64) -> Self {
        Self {
            platform_fee,
            network_fee_estimate,
            total: platform_fee + network_fee_estimate,
        }
    }

    /// Total cost in SOL, for display.
    pub fn total_sol(&self) -> f64 {
        self.total as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// Outcome of pre-submission transfer validation. An empty issue list means
/// the transfer may proceed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferValidation {
    /// Human-readable problems found; any entry blocks submission.
    pub issues: Vec<String>,
    /// Current on-chain owner at validation time.
    pub current_owner: Address,
    /// Whether the certificate is active.
    pub is_active: bool,
    /// Transfer count captured at validation time. This exact value seeds
    /// the transaction-record address on submission.
    pub transfer_count: u32,
    /// Platform fee at validation time.
    pub platform_fee: u64,
}

impl TransferValidation {
    /// Whether submission is allowed.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Result of one confirmed transfer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Correlation ID of the attempt.
    pub attempt_id: uuid::Uuid,
    /// Certificate that moved.
    pub certificate_id: u64,
    /// Owner before the transfer.
    pub previous_owner: Address,
    /// Owner after the transfer.
    pub new_owner: Address,
    /// Platform fee charged, in lamports.
    pub fee_paid: u64,
    /// Confirmed ledger signature.
    pub signature: Signature,
    /// Transfer count after the transfer.
    pub transfer_count: u32,
    /// Address of the on-chain transaction record for this step.
    pub record_address: Address,
}

/// Aggregate view over one owner's certificates.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryStats {
    /// Active certificates owned.
    pub total: usize,
    /// How many of those are verified.
    pub verified: usize,
    /// Sum of transfer counts.
    pub total_transfers: u64,
    /// Distinct issuer names.
    pub unique_issuers: usize,
}

/// Where a file-hash match was found.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Matched a digest cached locally; no network involved.
    Local,
    /// Matched a digest embedded in a certificate's off-chain metadata.
    Ledger,
    /// No match anywhere.
    None,
}

/// Verdict of content-addressed file verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationVerdict {
    /// Whether the file matched a known certificate digest.
    pub matched: bool,
    /// Matching certificate, when there is one.
    pub certificate_id: Option<u64>,
    /// Where the match came from.
    pub match_source: MatchSource,
    /// Hex digest computed for the uploaded bytes.
    pub digest: String,
    /// Certificates whose metadata was actually compared.
    pub scanned: usize,
    /// Certificates excluded because their metadata could not be fetched or
    /// carried no digest.
    pub skipped: usize,
}

impl VerificationVerdict {
    /// A no-match verdict.
    pub fn no_match(digest: String, scanned: usize, skipped: usize) -> Self {
        Self {
            matched: false,
            certificate_id: None,
            match_source: MatchSource::None,
            digest,
            scanned,
            skipped,
        }
    }

    /// A match verdict.
    pub fn matched(digest: String, certificate_id: u64, source: MatchSource) -> Self {
        Self {
            matched: true,
            certificate_id: Some(certificate_id),
            match_source: source,
            digest,
            scanned: 0,
            skipped: 0,
        }
    }
}

/// Outcome of one reconciliation pass.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Cache merged against ledger truth.
    Synced {
        /// Entries in the cache after the pass.
        total: usize,
        /// Local-only entries kept (not yet visible on-chain).
        kept_local: usize,
        /// Local-only entries dropped (ownership moved away, or forced).
        dropped_local: usize,
    },
    /// A ledger reset was detected; cache and bookkeeping were purged.
    ResetPurged,
    /// Program not initialized; local data left untouched.
    NotInitialized,
}
