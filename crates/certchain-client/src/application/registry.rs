//! # Certificate Registry
//!
//! Read-side enumeration over the program's certificate accounts. The
//! ledger has no secondary index, so listing walks ids `1..=count` and
//! derives each address; the walk is O(N) by design and the fetch strategy
//! stays behind the port so a batched backend can slot in later.

use crate::algorithms::{certificate_address, program_state_address};
use crate::domain::{Address, Certificate, ClientError, ProgramState, RegistryStats};
use crate::ports::LedgerRpc;
use crate::ChainClient;
use std::collections::HashSet;
use tracing::{debug, info};

/// Registry reads against one configured program.
pub struct CertificateRegistry<L> {
    client: ChainClient<L>,
}

impl<L: LedgerRpc> CertificateRegistry<L> {
    /// Registry over a chain client.
    pub fn new(client: ChainClient<L>) -> Self {
        Self { client }
    }

    /// Fetch the program-state singleton, erroring if it is absent or not
    /// yet initialized.
    pub async fn program_state(&self) -> Result<ProgramState, ClientError> {
        let address = program_state_address(&self.client.config().program_id);
        match self.client.fetch_account::<ProgramState>(address).await? {
            Some(state) if state.initialized => Ok(state),
            _ => Err(ClientError::NotInitialized),
        }
    }

    /// Whether the program state exists and is initialized. A count of
    /// zero with initialized state is "initialized, nothing minted yet",
    /// not "missing".
    pub async fn is_initialized(&self) -> Result<bool, ClientError> {
        let address = program_state_address(&self.client.config().program_id);
        Ok(self
            .client
            .fetch_account::<ProgramState>(address)
            .await?
            .map(|s| s.initialized)
            .unwrap_or(false))
    }

    /// Fetch one certificate by ID, `None` if that ID was never minted.
    pub async fn fetch_one(&self, certificate_id: u64) -> Result<Option<Certificate>, ClientError> {
        let address = certificate_address(&self.client.config().program_id, certificate_id);
        self.client.fetch_account(address).await
    }

    /// All active certificates in ascending ID order, optionally filtered
    /// to one owner. Vacant ids are skipped and counted, never fatal.
    ///
    /// Missing or uninitialized program state lists as the empty set;
    /// callers that need to distinguish that case use [`is_initialized`]
    /// or [`program_state`].
    ///
    /// [`is_initialized`]: Self::is_initialized
    /// [`program_state`]: Self::program_state
    pub async fn list_active(
        &self,
        owner_filter: Option<Address>,
    ) -> Result<Vec<Certificate>, ClientError> {
        let state = match self.program_state().await {
            Ok(state) => state,
            Err(ClientError::NotInitialized) => {
                debug!("program not initialized, listing nothing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let mut certificates = Vec::new();
        let mut vacant = 0usize;
        let mut inactive = 0usize;

        for id in 1..=state.certificate_count {
            match self.fetch_one(id).await? {
                None => {
                    debug!(certificate_id = id, "vacant certificate id, skipping");
                    vacant += 1;
                }
                Some(cert) if !cert.is_active => inactive += 1,
                Some(cert) => {
                    if owner_filter.map_or(true, |owner| cert.owner == owner) {
                        certificates.push(cert);
                    }
                }
            }
        }

        info!(
            count = state.certificate_count,
            listed = certificates.len(),
            vacant,
            inactive,
            "registry enumeration complete"
        );
        Ok(certificates)
    }

    /// Aggregate view over one owner's active certificates.
    pub async fn stats(&self, owner: Address) -> Result<RegistryStats, ClientError> {
        let owned = self.list_active(Some(owner)).await?;
        let issuers: HashSet<&str> = owned.iter().map(|c| c.issuer_name.as_str()).collect();
        Ok(RegistryStats {
            total: owned.len(),
            verified: owned.iter().filter(|c| c.is_verified).count(),
            total_transfers: owned.iter().map(|c| u64::from(c.transfer_count)).sum(),
            unique_issuers: issuers.len(),
        })
    }
}
