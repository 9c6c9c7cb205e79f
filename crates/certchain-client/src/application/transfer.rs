//! # Transfer Orchestrator
//!
//! Drives one certificate transfer through its sequential steps:
//! validate, estimate cost, submit, write the optimistic local entry, then
//! reconcile. Each attempt carries a v4 correlation id through the logs.
//!
//! At-most-once semantics come from the transaction-record address: it is
//! derived from the transfer count captured at validation time, so a
//! duplicate submission of an already-confirmed transfer lands on an
//! occupied record address (and fails ownership anyway).

use crate::algorithms::transaction_record_address;
use crate::config::NETWORK_FEE_ESTIMATE_LAMPORTS;
use crate::domain::{
    Address, CacheEntry, ClientError, SyncState, TransferQuote, TransferReceipt,
    TransferValidation,
};
use crate::ports::{CacheStore, Instruction, LedgerRpc};
use crate::{CertificateRegistry, ChainClient, ReconciliationEngine};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use uuid::Uuid;

/// Step of a transfer attempt, for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStep {
    /// Pre-submission checks.
    Validating,
    /// Quote computation.
    EstimatingCost,
    /// Ledger submission with retries.
    Submitting,
    /// Optimistic cache write.
    LocalUpdate,
    /// Post-submission sync.
    Reconciling,
}

impl TransferStep {
    fn name(&self) -> &'static str {
        match self {
            TransferStep::Validating => "validating",
            TransferStep::EstimatingCost => "estimating_cost",
            TransferStep::Submitting => "submitting",
            TransferStep::LocalUpdate => "local_update",
            TransferStep::Reconciling => "reconciling",
        }
    }
}

/// Orchestrates certificate transfers for one signing wallet.
pub struct TransferOrchestrator<L, S> {
    client: ChainClient<L>,
    registry: CertificateRegistry<L>,
    engine: ReconciliationEngine<L, S>,
}

impl<L: LedgerRpc, S: CacheStore> TransferOrchestrator<L, S> {
    /// Orchestrator over a signing chain client and a cache store.
    pub fn new(client: ChainClient<L>, store: Arc<S>) -> Self {
        Self {
            registry: CertificateRegistry::new(client.clone()),
            engine: ReconciliationEngine::new(client.clone(), store),
            client,
        }
    }

    /// Cost quote for one transfer at the current platform fee. Idempotent
    /// and side-effect free.
    pub async fn estimate_costs(&self) -> Result<TransferQuote, ClientError> {
        let state = self.registry.program_state().await?;
        Ok(TransferQuote::new(
            state.platform_fee_lamports,
            NETWORK_FEE_ESTIMATE_LAMPORTS,
        ))
    }

    /// Pre-submission validation. Collects every problem instead of
    /// stopping at the first, and captures the transfer count that will
    /// seed the record address on submission.
    pub async fn validate(
        &self,
        certificate_id: u64,
        new_owner: Address,
    ) -> Result<TransferValidation, ClientError> {
        let signer = self
            .client
            .signer()
            .ok_or(ClientError::MissingSigner)?;
        let state = self.registry.program_state().await?;
        let certificate = self
            .registry
            .fetch_one(certificate_id)
            .await?
            .ok_or(ClientError::BusinessRule(
                crate::domain::BusinessRuleViolation::InvalidCertificateId,
            ))?;

        let mut issues = Vec::new();
        if certificate.owner != signer {
            issues.push("you are not the owner of this certificate".to_string());
        }
        if !certificate.is_active {
            issues.push("this certificate is inactive and cannot be transferred".to_string());
        }
        if new_owner == certificate.owner {
            issues.push("cannot transfer to the same wallet address".to_string());
        }
        if new_owner == Address::ZERO {
            issues.push("recipient address is not a valid wallet".to_string());
        }

        let required = state.platform_fee_lamports + NETWORK_FEE_ESTIMATE_LAMPORTS;
        let balance = self.client.signer_balance().await?;
        if balance < required {
            issues.push(format!(
                "insufficient balance: have {balance} lamports, need {required}"
            ));
        }

        Ok(TransferValidation {
            issues,
            current_owner: certificate.owner,
            is_active: certificate.is_active,
            transfer_count: certificate.transfer_count,
            platform_fee: state.platform_fee_lamports,
        })
    }

    /// Run one transfer end to end and return its receipt.
    pub async fn transfer(
        &self,
        certificate_id: u64,
        new_owner: Address,
    ) -> Result<TransferReceipt, ClientError> {
        let attempt_id = Uuid::new_v4();
        let signer = self
            .client
            .signer()
            .ok_or(ClientError::MissingSigner)?;
        info!(
            %attempt_id,
            certificate_id,
            new_owner = %new_owner.short(),
            "transfer attempt started"
        );

        self.log_step(attempt_id, TransferStep::Validating);
        let validation = self.validate(certificate_id, new_owner).await?;
        if !validation.is_valid() {
            warn!(%attempt_id, issues = validation.issues.len(), "transfer blocked by validation");
            return Err(ClientError::Validation(validation.issues));
        }

        self.log_step(attempt_id, TransferStep::EstimatingCost);
        let quote = TransferQuote::new(validation.platform_fee, NETWORK_FEE_ESTIMATE_LAMPORTS);

        self.log_step(attempt_id, TransferStep::Submitting);
        // Derived before submission so a count past the seed limit fails
        // here instead of half-way through.
        let record_address = transaction_record_address(
            &self.client.config().program_id,
            certificate_id,
            &validation.current_owner,
            validation.transfer_count,
        )?;
        let signature = self
            .client
            .submit(Instruction::TransferCertificate {
                certificate_id,
                new_owner,
            })
            .await?;

        self.log_step(attempt_id, TransferStep::LocalUpdate);
        let transfer_count = validation.transfer_count + 1;
        if let Some(mut certificate) = self.registry.fetch_one(certificate_id).await? {
            // Ahead of reconciliation, mirror what the ledger should now
            // say; the next sync confirms or corrects it.
            certificate.owner = new_owner;
            certificate.transfer_count = transfer_count;
            let mut entry = CacheEntry::confirmed(certificate, now_epoch());
            entry.sync_state = SyncState::Optimistic;
            entry.transaction_signature = Some(signature.clone());
            self.engine.record_optimistic(signer, entry).await?;
        }

        self.log_step(attempt_id, TransferStep::Reconciling);
        self.engine.smart_sync(signer).await?;

        info!(%attempt_id, certificate_id, %signature, "transfer confirmed");
        Ok(TransferReceipt {
            attempt_id,
            certificate_id,
            previous_owner: validation.current_owner,
            new_owner,
            fee_paid: quote.platform_fee,
            signature,
            transfer_count,
            record_address,
        })
    }

    fn log_step(&self, attempt_id: Uuid, step: TransferStep) {
        info!(%attempt_id, step = step.name(), "transfer step");
    }
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
