//! # Domain Entities
//!
//! On-chain account schemas and the client-side cache records built on top
//! of them.
//!
//! Account payloads decode into the explicit [`AccountData`] enum and then
//! into a concrete type via [`LedgerAccount`]; a payload of the wrong kind
//! fails fast as `MalformedAccount` instead of surviving as a loose map.

use super::errors::BusinessRuleViolation;
use super::value_objects::{Address, Signature};
use serde::{Deserialize, Serialize};

/// Maximum title length accepted by the program.
pub const MAX_TITLE_LEN: usize = 64;
/// Maximum description length accepted by the program.
pub const MAX_DESCRIPTION_LEN: usize = 512;
/// Maximum issuer name length accepted by the program.
pub const MAX_ISSUER_NAME_LEN: usize = 64;
/// Maximum recipient name length accepted by the program.
pub const MAX_RECIPIENT_NAME_LEN: usize = 64;

/// URI scheme prefixes the program accepts for certificate metadata.
pub const ACCEPTED_URI_PREFIXES: [&str; 2] = ["ipfs://", "https://ipfs.io/ipfs/"];

/// Platform fee set by `initialize`, in lamports.
pub const INITIAL_PLATFORM_FEE: u64 = 5;
/// Lowest fee `update_platform_fee` accepts.
pub const PLATFORM_FEE_MIN: u64 = 1;
/// Highest fee `update_platform_fee` accepts.
pub const PLATFORM_FEE_MAX: u64 = 15;

/// Global program state singleton. Source of truth for the next
/// certificate ID and the required transfer fee.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramState {
    /// Set once by `initialize`.
    pub initialized: bool,
    /// Number of certificates ever minted; the next ID is `count + 1`.
    pub certificate_count: u64,
    /// Fee charged per transfer, in lamports.
    pub platform_fee_lamports: u64,
    /// Account that collects fees and may update settings.
    pub platform_address: Address,
}

/// One issued certificate. Never physically deleted; `is_active` is the
/// soft-delete flag.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Certificate {
    /// 1-based sequential ID, immutable and unique.
    pub certificate_id: u64,
    /// Certificate title (max 64 chars).
    pub title: String,
    /// Free-form description (max 512 chars).
    pub description: String,
    /// Issuing organization name.
    pub issuer_name: String,
    /// Recipient name.
    pub recipient_name: String,
    /// Issue time, epoch seconds.
    pub issue_date: i64,
    /// Current owner. Changes only through transfers.
    pub owner: Address,
    /// Original creator. Immutable.
    pub creator: Address,
    /// Flipped to true by `verify_certificate`.
    pub is_verified: bool,
    /// Number of completed transfers. Only ever increases.
    pub transfer_count: u32,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Off-chain metadata document URI.
    pub metadata_uri: String,
}

/// On-chain receipt of one transfer event, keyed by
/// `(certificate_id, previous_owner, transfer count at the time)` to
/// prevent replay of the same transfer step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Certificate that was transferred.
    pub certificate_id: u64,
    /// Owner who performed the transfer.
    pub previous_owner: Address,
    /// Platform fee paid, in lamports.
    pub fee_amount: u64,
    /// Transfer time, epoch seconds.
    pub timestamp: i64,
    /// Whether the fee was credited to the platform.
    pub credited: bool,
}

/// Decoded account payload, tagged by kind.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountData {
    /// The program-state singleton.
    ProgramState(ProgramState),
    /// A certificate account.
    Certificate(Certificate),
    /// A transfer transaction record.
    TransactionRecord(TransactionRecord),
}

impl AccountData {
    /// Kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AccountData::ProgramState(_) => "program_state",
            AccountData::Certificate(_) => "certificate",
            AccountData::TransactionRecord(_) => "transaction_record",
        }
    }
}

/// Strongly-typed decode from a tagged account payload.
pub trait LedgerAccount: Sized {
    /// Kind name expected in the payload, for error messages.
    const KIND: &'static str;

    /// Extract this type from a payload, `None` on kind mismatch.
    fn from_account(data: AccountData) -> Option<Self>;
}

impl LedgerAccount for ProgramState {
    const KIND: &'static str = "program_state";

    fn from_account(data: AccountData) -> Option<Self> {
        match data {
            AccountData::ProgramState(s) => Some(s),
            _ => None,
        }
    }
}

impl LedgerAccount for Certificate {
    const KIND: &'static str = "certificate";

    fn from_account(data: AccountData) -> Option<Self> {
        match data {
            AccountData::Certificate(c) => Some(c),
            _ => None,
        }
    }
}

impl LedgerAccount for TransactionRecord {
    const KIND: &'static str = "transaction_record";

    fn from_account(data: AccountData) -> Option<Self> {
        match data {
            AccountData::TransactionRecord(r) => Some(r),
            _ => None,
        }
    }
}

/// Validate `create_certificate` inputs the way the program does, so bad
/// requests can be rejected client-side before costing a signature.
pub fn validate_create_inputs(
    title: &str,
    description: &str,
    metadata_uri: &str,
    issuer_name: &str,
    recipient_name: &str,
) -> Result<(), BusinessRuleViolation> {
    if title.is_empty() || issuer_name.is_empty() || recipient_name.is_empty() {
        return Err(BusinessRuleViolation::EmptyRequiredField);
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(BusinessRuleViolation::TitleTooLong);
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(BusinessRuleViolation::DescriptionTooLong);
    }
    if issuer_name.len() > MAX_ISSUER_NAME_LEN {
        return Err(BusinessRuleViolation::IssuerNameTooLong);
    }
    if recipient_name.len() > MAX_RECIPIENT_NAME_LEN {
        return Err(BusinessRuleViolation::RecipientNameTooLong);
    }
    if !ACCEPTED_URI_PREFIXES.iter().any(|p| metadata_uri.starts_with(p)) {
        return Err(BusinessRuleViolation::InvalidUri);
    }
    Ok(())
}

/// Whether a certificate has confirmed on-chain truth behind its cached
/// ledger fields, or only an optimistic local write.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Written locally ahead of reconciliation; may be stale.
    Optimistic,
    /// Reflects a reconciled ledger fetch.
    Confirmed,
}

/// One certificate as held in the wallet-scoped local cache: the ledger
/// fields plus client-only overlay the ledger does not track.
///
/// Ledger fields are advisory here (the chain is authoritative); the
/// overlay fields are authoritative locally and survive reconciliation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// Ledger-tracked fields, possibly stale.
    pub certificate: Certificate,
    /// Data-URI preview of the certificate image, if captured at mint time.
    pub image_preview: Option<String>,
    /// Hex digest of the original uploaded file.
    pub file_hash: Option<String>,
    /// Signature of the transaction that minted or last moved this entry.
    pub transaction_signature: Option<Signature>,
    /// Gateway-resolved URI for the metadata document.
    pub metadata_gateway_uri: Option<String>,
    /// When this entry was first created locally, epoch seconds.
    pub created_at: i64,
    /// Optimistic vs confirmed.
    pub sync_state: SyncState,
}

impl CacheEntry {
    /// Entry ID shorthand.
    pub fn certificate_id(&self) -> u64 {
        self.certificate.certificate_id
    }

    /// Build a confirmed entry straight from a ledger fetch, with an empty
    /// overlay.
    pub fn confirmed(certificate: Certificate, created_at: i64) -> Self {
        Self {
            certificate,
            image_preview: None,
            file_hash: None,
            transaction_signature: None,
            metadata_gateway_uri: None,
            created_at,
            sync_state: SyncState::Confirmed,
        }
    }
}

/// Everything the client persists for one wallet: the cache entries plus
/// the reconciliation bookkeeping. Purged wholesale on ledger reset or
/// wallet disconnect.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WalletCache {
    /// Cached certificates, sorted by ID descending.
    pub entries: Vec<CacheEntry>,
    /// Last successful reconciliation, epoch seconds.
    pub last_sync_epoch: Option<i64>,
    /// Ledger certificate count observed at the last reconciliation; input
    /// to reset detection.
    pub last_known_count: u64,
}

impl WalletCache {
    /// Find an entry by certificate ID.
    pub fn entry(&self, certificate_id: u64) -> Option<&CacheEntry> {
        self.entries.iter().find(|e| e.certificate_id() == certificate_id)
    }

    /// Insert or replace the entry for its certificate ID, keeping the
    /// ID-descending order.
    pub fn upsert(&mut self, entry: CacheEntry) {
        self.entries.retain(|e| e.certificate_id() != entry.certificate_id());
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.certificate_id().cmp(&a.certificate_id()));
    }
}
