//! # Ledger Port
//!
//! Outbound trait for the on-chain program. The program itself is an
//! external collaborator; this port exposes exactly the operations it
//! defines plus the raw account/balance reads the client needs.

use crate::domain::{AccountData, Address, ClientError, Signature};
use async_trait::async_trait;

/// One of the ledger program's instructions.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// Create the program-state singleton. Fails if already initialized.
    Initialize,
    /// Mint the next sequential certificate.
    CreateCertificate {
        /// Certificate title (max 64 chars).
        title: String,
        /// Description (max 512 chars).
        description: String,
        /// Off-chain metadata URI; must use an accepted scheme prefix.
        metadata_uri: String,
        /// Issuer name (max 64 chars).
        issuer_name: String,
        /// Recipient name (max 64 chars).
        recipient_name: String,
    },
    /// Mark a certificate as verified.
    VerifyCertificate {
        /// Target certificate.
        certificate_id: u64,
    },
    /// Change the platform fee. Restricted to the platform address.
    UpdatePlatformFee {
        /// New fee in lamports; accepted range is 1..=15.
        new_fee_lamports: u64,
    },
    /// Move ownership of a certificate, charging the platform fee.
    TransferCertificate {
        /// Certificate to move.
        certificate_id: u64,
        /// Receiving wallet.
        new_owner: Address,
    },
}

impl Instruction {
    /// Instruction name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Initialize => "initialize",
            Instruction::CreateCertificate { .. } => "create_certificate",
            Instruction::VerifyCertificate { .. } => "verify_certificate",
            Instruction::UpdatePlatformFee { .. } => "update_platform_fee",
            Instruction::TransferCertificate { .. } => "transfer_certificate",
        }
    }
}

/// RPC boundary to the ledger - outbound port.
///
/// `fetch_raw` returning `None` is a valid outcome ("account does not
/// exist yet"), never an error. `submit` waits for the strongest finality
/// the backend offers before returning a signature.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch and decode an account, `None` if absent.
    async fn fetch_raw(&self, address: Address) -> Result<Option<AccountData>, ClientError>;

    /// Submit an instruction signed by `signer` and wait for finalization.
    async fn submit(
        &self,
        instruction: Instruction,
        signer: Address,
    ) -> Result<Signature, ClientError>;

    /// Current balance of an account, in lamports.
    async fn balance(&self, address: Address) -> Result<u64, ClientError>;

    /// Request test-network funding for an account.
    async fn request_airdrop(
        &self,
        address: Address,
        lamports: u64,
    ) -> Result<Signature, ClientError>;
}
