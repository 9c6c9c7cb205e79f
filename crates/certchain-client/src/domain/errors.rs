//! # Domain Errors
//!
//! Failure taxonomy for the client layer.
//!
//! An absent account is *not* an error anywhere in this crate: fetches
//! return `Option` and callers decide what absence means ("not minted yet"
//! vs. "not yet visible"). Everything that is an error is typed here.

use thiserror::Error;

/// Client error types.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Pre-submission validation found one or more problems. The attempt is
    /// blocked before anything reaches the ledger and is never retried.
    #[error("transfer validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Transient network failure (congestion, stale blockhash, RPC hiccup).
    /// Eligible for retry with backoff.
    #[error("transient network failure: {0}")]
    TransientNetwork(String),

    /// The ledger program rejected the transaction with a business-rule
    /// code. Never retried.
    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleViolation),

    /// Submission retry budget exhausted.
    #[error("transaction failed after {attempts} attempts")]
    RetriesExhausted {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// The program state account is missing or not yet initialized, in a
    /// context where initialization is required.
    #[error("certificate program is not initialized on the ledger")]
    NotInitialized,

    /// Account bytes decoded, but not into the expected account type.
    #[error("malformed account data: {0}")]
    MalformedAccount(String),

    /// Off-chain metadata is missing, malformed, or inconsistent with
    /// on-chain data. Non-fatal for scans; fatal only where integrity is
    /// the whole point.
    #[error("metadata integrity issue: {0}")]
    IntegrityMismatch(String),

    /// Client-local durable storage failed.
    #[error("cache storage error: {0}")]
    Storage(String),

    /// Metadata gateway fetch failed (HTTP error, timeout, bad JSON).
    #[error("metadata gateway error: {0}")]
    Gateway(String),

    /// Address string did not parse into a 32-byte address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The transaction-record seed encodes the transfer count in a single
    /// byte; counts above 255 cannot be derived. The limit is inherited
    /// from the deployed program's seed layout and surfaced as a typed
    /// failure instead of a silent truncation.
    #[error("transfer count {count} exceeds the single-byte record seed limit of 255")]
    TransferCountSeedOverflow {
        /// Transfer count that could not be encoded
        count: u32,
    },

    /// The signing wallet cannot cover the estimated cost. Not retryable
    /// and not a program rule; on test clusters the client requests an
    /// airdrop once before reporting this.
    #[error("insufficient funds: have {balance} lamports, need {required}")]
    InsufficientFunds {
        /// Current wallet balance in lamports
        balance: u64,
        /// Estimated lamports required
        required: u64,
    },

    /// A signing operation was attempted on a read-only client.
    #[error("no signing wallet attached to this client")]
    MissingSigner,
}

impl ClientError {
    /// Whether a retry with backoff could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::TransientNetwork(_))
    }
}

/// Ledger-enforced invariant violations, mirrored from the program's error
/// codes. Messages are user-facing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRuleViolation {
    /// Program state already exists.
    #[error("the program has already been initialized")]
    AlreadyInitialized,

    /// Title longer than 64 characters.
    #[error("title exceeds the 64 character limit")]
    TitleTooLong,

    /// Description longer than 512 characters.
    #[error("description exceeds the 512 character limit")]
    DescriptionTooLong,

    /// Issuer name longer than 64 characters.
    #[error("issuer name exceeds the 64 character limit")]
    IssuerNameTooLong,

    /// Recipient name longer than 64 characters.
    #[error("recipient name exceeds the 64 character limit")]
    RecipientNameTooLong,

    /// A required field was empty.
    #[error("a required field is empty")]
    EmptyRequiredField,

    /// Metadata URI does not use an accepted scheme prefix.
    #[error("metadata URI must start with \"ipfs://\" or \"https://ipfs.io/ipfs/\"")]
    InvalidUri,

    /// No certificate with that ID, or the account does not match it.
    #[error("invalid certificate ID")]
    InvalidCertificateId,

    /// Certificate was already verified.
    #[error("certificate is already verified")]
    AlreadyVerified,

    /// Verifier is neither the creator nor the platform authority.
    #[error("this wallet is not authorized to verify the certificate")]
    UnauthorizedVerifier,

    /// Fee updater is not the platform authority.
    #[error("this wallet is not authorized to update platform settings")]
    UnauthorizedUpdater,

    /// Certificate is soft-deleted.
    #[error("this certificate is inactive and cannot be used")]
    InactiveCertificate,

    /// Signer does not own the certificate.
    #[error("you are not the owner of this certificate")]
    NotCertificateOwner,

    /// Transfer target equals the current owner.
    #[error("cannot transfer to the same wallet address")]
    SameOwner,

    /// Fee outside the accepted 1..=15 range.
    #[error("platform fee must be between 1 and 15")]
    InvalidPlatformFee,

    /// A counter would overflow.
    #[error("numeric overflow - too many certificates or transfers")]
    NumericalOverflow,
}
