//! # Chain Client
//!
//! Typed access to the ledger plus the submission pipeline: balance
//! top-up on test clusters, bounded retries with exponential backoff for
//! transient failures, and immediate surfacing of program rejections.

use crate::config::ClientConfig;
use crate::domain::{Address, ClientError, LedgerAccount, Signature};
use crate::ports::{Instruction, LedgerRpc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ledger access for one configured program, optionally with a signing
/// wallet attached.
pub struct ChainClient<L> {
    ledger: Arc<L>,
    config: Arc<ClientConfig>,
    signer: Option<Address>,
}

impl<L> Clone for ChainClient<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            config: Arc::clone(&self.config),
            signer: self.signer,
        }
    }
}

impl<L: LedgerRpc> ChainClient<L> {
    /// Client without a signing wallet. Fetches work; submissions fail
    /// with [`ClientError::MissingSigner`].
    pub fn read_only(ledger: Arc<L>, config: ClientConfig) -> Self {
        Self {
            ledger,
            config: Arc::new(config),
            signer: None,
        }
    }

    /// Client that signs as `signer`.
    pub fn with_signer(ledger: Arc<L>, config: ClientConfig, signer: Address) -> Self {
        Self {
            ledger,
            config: Arc::new(config),
            signer: Some(signer),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attached signing wallet, if any.
    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    fn require_signer(&self) -> Result<Address, ClientError> {
        self.signer.ok_or(ClientError::MissingSigner)
    }

    /// Fetch and decode an account as `T`. Absence is `Ok(None)`; a payload
    /// of the wrong kind is [`ClientError::MalformedAccount`].
    pub async fn fetch_account<T: LedgerAccount>(
        &self,
        address: Address,
    ) -> Result<Option<T>, ClientError> {
        match self.ledger.fetch_raw(address).await? {
            None => Ok(None),
            Some(data) => {
                let found = data.kind();
                T::from_account(data).map(Some).ok_or_else(|| {
                    ClientError::MalformedAccount(format!(
                        "account {} holds {found}, expected {}",
                        address.short(),
                        T::KIND
                    ))
                })
            }
        }
    }

    /// Current balance of the signing wallet.
    pub async fn signer_balance(&self) -> Result<u64, ClientError> {
        self.ledger.balance(self.require_signer()?).await
    }

    /// Top up the signing wallet if it is under the configured minimum and
    /// the cluster hands out airdrops. A failed airdrop is logged and
    /// swallowed; the subsequent submission reports the real shortfall.
    pub async fn ensure_funded(&self) -> Result<(), ClientError> {
        let signer = self.require_signer()?;
        if !self.config.cluster.supports_airdrop() {
            return Ok(());
        }
        let balance = self.ledger.balance(signer).await?;
        if balance >= self.config.min_balance_lamports {
            return Ok(());
        }
        info!(
            wallet = %signer.short(),
            balance,
            "balance under minimum, requesting airdrop"
        );
        match self
            .ledger
            .request_airdrop(signer, self.config.airdrop_lamports)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "airdrop request failed, continuing unfunded");
                Ok(())
            }
        }
    }

    /// Submit an instruction, retrying transient failures with exponential
    /// backoff up to the configured attempt budget. Program rejections and
    /// other non-transient errors return immediately.
    pub async fn submit(&self, instruction: Instruction) -> Result<Signature, ClientError> {
        let signer = self.require_signer()?;
        self.ensure_funded().await?;

        let name = instruction.name();
        let max = self.config.max_submit_attempts.max(1);
        for attempt in 1..=max {
            match self.ledger.submit(instruction.clone(), signer).await {
                Ok(signature) => {
                    debug!(instruction = name, attempt, "submission confirmed");
                    return Ok(signature);
                }
                Err(e) if e.is_transient() && attempt < max => {
                    let delay = self.config.backoff_base * 2u32.pow(attempt - 1);
                    warn!(
                        instruction = name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient submission failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    warn!(instruction = name, attempts = max, "retry budget exhausted");
                    return Err(ClientError::RetriesExhausted { attempts: max });
                }
                Err(e) => return Err(e),
            }
        }
        Err(ClientError::RetriesExhausted { attempts: max })
    }
}
