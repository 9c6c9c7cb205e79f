//! # In-Memory Ledger
//!
//! [`LedgerRpc`] adapter that evaluates the certificate program's rules
//! in-process. Used by every flow test; the rules here mirror the deployed
//! program instruction for instruction so client-side behavior can be
//! exercised without a validator.

use crate::algorithms::{certificate_address, program_state_address, transaction_record_address};
use crate::domain::{
    validate_create_inputs, AccountData, Address, BusinessRuleViolation, Certificate, ClientError,
    ProgramState, Signature, TransactionRecord, INITIAL_PLATFORM_FEE, PLATFORM_FEE_MAX,
    PLATFORM_FEE_MIN,
};
use crate::ports::{Instruction, LedgerRpc};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

struct LedgerState {
    accounts: HashMap<Address, AccountData>,
    balances: HashMap<Address, u64>,
    /// Next N submissions fail as transient before reaching the program.
    transient_failures: u32,
    clock: i64,
}

/// In-process ledger with full program semantics.
pub struct InMemoryLedger {
    program_id: Address,
    inner: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Empty ledger for a program ID. Nothing is initialized yet.
    pub fn new(program_id: Address) -> Self {
        Self {
            program_id,
            inner: Mutex::new(LedgerState {
                accounts: HashMap::new(),
                balances: HashMap::new(),
                transient_failures: 0,
                clock: 1_700_000_000,
            }),
        }
    }

    /// Fund an account directly, bypassing airdrop plumbing.
    pub fn credit(&self, address: Address, lamports: u64) {
        let mut inner = self.inner.lock().expect("ledger poisoned");
        *inner.balances.entry(address).or_insert(0) += lamports;
    }

    /// Make the next `n` submissions fail with a transient network error.
    pub fn inject_transient_failures(&self, n: u32) {
        self.inner.lock().expect("ledger poisoned").transient_failures = n;
    }

    /// Overwrite an account payload, for constructing corrupt-state tests.
    pub fn put_account(&self, address: Address, data: AccountData) {
        self.inner
            .lock()
            .expect("ledger poisoned")
            .accounts
            .insert(address, data);
    }

    fn state_address(&self) -> Address {
        program_state_address(&self.program_id)
    }

    fn apply(
        &self,
        inner: &mut LedgerState,
        instruction: Instruction,
        signer: Address,
    ) -> Result<(), ClientError> {
        let state_addr = self.state_address();
        match instruction {
            Instruction::Initialize => {
                if let Some(AccountData::ProgramState(state)) = inner.accounts.get(&state_addr) {
                    if state.initialized {
                        return Err(BusinessRuleViolation::AlreadyInitialized.into());
                    }
                }
                inner.accounts.insert(
                    state_addr,
                    AccountData::ProgramState(ProgramState {
                        initialized: true,
                        certificate_count: 0,
                        platform_fee_lamports: INITIAL_PLATFORM_FEE,
                        platform_address: signer,
                    }),
                );
                Ok(())
            }

            Instruction::CreateCertificate {
                title,
                description,
                metadata_uri,
                issuer_name,
                recipient_name,
            } => {
                let mut state = self.read_state(inner)?;
                validate_create_inputs(
                    &title,
                    &description,
                    &metadata_uri,
                    &issuer_name,
                    &recipient_name,
                )?;
                state.certificate_count = state
                    .certificate_count
                    .checked_add(1)
                    .ok_or(BusinessRuleViolation::NumericalOverflow)?;
                let certificate_id = state.certificate_count;
                let certificate = Certificate {
                    certificate_id,
                    title,
                    description,
                    issuer_name,
                    recipient_name,
                    issue_date: inner.clock,
                    owner: signer,
                    creator: signer,
                    is_verified: false,
                    transfer_count: 0,
                    is_active: true,
                    metadata_uri,
                };
                inner.accounts.insert(
                    certificate_address(&self.program_id, certificate_id),
                    AccountData::Certificate(certificate),
                );
                inner
                    .accounts
                    .insert(state_addr, AccountData::ProgramState(state));
                Ok(())
            }

            Instruction::VerifyCertificate { certificate_id } => {
                let state = self.read_state(inner)?;
                let mut certificate = self.read_certificate(inner, certificate_id)?;
                if !certificate.is_active {
                    return Err(BusinessRuleViolation::InactiveCertificate.into());
                }
                if certificate.is_verified {
                    return Err(BusinessRuleViolation::AlreadyVerified.into());
                }
                if signer != certificate.creator && signer != state.platform_address {
                    return Err(BusinessRuleViolation::UnauthorizedVerifier.into());
                }
                certificate.is_verified = true;
                inner.accounts.insert(
                    certificate_address(&self.program_id, certificate_id),
                    AccountData::Certificate(certificate),
                );
                Ok(())
            }

            Instruction::UpdatePlatformFee { new_fee_lamports } => {
                let mut state = self.read_state(inner)?;
                if signer != state.platform_address {
                    return Err(BusinessRuleViolation::UnauthorizedUpdater.into());
                }
                if !(PLATFORM_FEE_MIN..=PLATFORM_FEE_MAX).contains(&new_fee_lamports) {
                    return Err(BusinessRuleViolation::InvalidPlatformFee.into());
                }
                state.platform_fee_lamports = new_fee_lamports;
                inner
                    .accounts
                    .insert(state_addr, AccountData::ProgramState(state));
                Ok(())
            }

            Instruction::TransferCertificate {
                certificate_id,
                new_owner,
            } => {
                let state = self.read_state(inner)?;
                let mut certificate = self.read_certificate(inner, certificate_id)?;
                if !certificate.is_active {
                    return Err(BusinessRuleViolation::InactiveCertificate.into());
                }
                if signer != certificate.owner {
                    return Err(BusinessRuleViolation::NotCertificateOwner.into());
                }
                if new_owner == certificate.owner {
                    return Err(BusinessRuleViolation::SameOwner.into());
                }

                let fee = state.platform_fee_lamports;
                let balance = inner.balances.get(&signer).copied().unwrap_or(0);
                if balance < fee {
                    return Err(ClientError::InsufficientFunds {
                        balance,
                        required: fee,
                    });
                }

                // Record keyed by the count before this transfer: replaying
                // the same step lands on an occupied address.
                let record_addr = transaction_record_address(
                    &self.program_id,
                    certificate_id,
                    &certificate.owner,
                    certificate.transfer_count,
                )?;

                inner.balances.insert(signer, balance - fee);
                *inner.balances.entry(state.platform_address).or_insert(0) += fee;

                let record = TransactionRecord {
                    certificate_id,
                    previous_owner: certificate.owner,
                    fee_amount: fee,
                    timestamp: inner.clock,
                    credited: true,
                };
                certificate.owner = new_owner;
                certificate.transfer_count = certificate
                    .transfer_count
                    .checked_add(1)
                    .ok_or(BusinessRuleViolation::NumericalOverflow)?;

                inner.accounts.insert(
                    certificate_address(&self.program_id, certificate_id),
                    AccountData::Certificate(certificate),
                );
                inner
                    .accounts
                    .insert(record_addr, AccountData::TransactionRecord(record));
                Ok(())
            }
        }
    }

    fn read_state(&self, inner: &LedgerState) -> Result<ProgramState, ClientError> {
        match inner.accounts.get(&self.state_address()) {
            Some(AccountData::ProgramState(state)) if state.initialized => Ok(*state),
            _ => Err(ClientError::NotInitialized),
        }
    }

    fn read_certificate(
        &self,
        inner: &LedgerState,
        certificate_id: u64,
    ) -> Result<Certificate, ClientError> {
        match inner
            .accounts
            .get(&certificate_address(&self.program_id, certificate_id))
        {
            Some(AccountData::Certificate(c)) => Ok(c.clone()),
            _ => Err(BusinessRuleViolation::InvalidCertificateId.into()),
        }
    }
}

#[async_trait]
impl LedgerRpc for InMemoryLedger {
    async fn fetch_raw(&self, address: Address) -> Result<Option<AccountData>, ClientError> {
        let inner = self.inner.lock().expect("ledger poisoned");
        Ok(inner.accounts.get(&address).cloned())
    }

    async fn submit(
        &self,
        instruction: Instruction,
        signer: Address,
    ) -> Result<Signature, ClientError> {
        let mut inner = self.inner.lock().expect("ledger poisoned");
        if inner.transient_failures > 0 {
            inner.transient_failures -= 1;
            return Err(ClientError::TransientNetwork(
                "blockhash not found".to_string(),
            ));
        }
        inner.clock += 1;
        self.apply(&mut inner, instruction, signer)?;
        Ok(uuid::Uuid::new_v4().simple().to_string())
    }

    async fn balance(&self, address: Address) -> Result<u64, ClientError> {
        let inner = self.inner.lock().expect("ledger poisoned");
        Ok(inner.balances.get(&address).copied().unwrap_or(0))
    }

    async fn request_airdrop(
        &self,
        address: Address,
        lamports: u64,
    ) -> Result<Signature, ClientError> {
        self.credit(address, lamports);
        Ok(uuid::Uuid::new_v4().simple().to_string())
    }
}
