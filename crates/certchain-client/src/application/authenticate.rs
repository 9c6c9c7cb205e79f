//! # File Authenticator
//!
//! Content-addressed verification: given a file's bytes, decide whether
//! any certificate on record attests to them. Local cache digests are
//! checked first (no network); otherwise every active certificate's
//! metadata is scanned oldest-first, throttled, with per-item fetch
//! failures skipped and counted so the verdict is honest about coverage.

use crate::algorithms::{digests_match, extract_file_digest, sha256_hex};
use crate::config::ClientConfig;
use crate::domain::{
    integrity_issues, Address, BusinessRuleViolation, ClientError, MatchSource,
    VerificationVerdict,
};
use crate::ports::{CacheStore, LedgerRpc, MetadataGateway};
use crate::{CertificateRegistry, ChainClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// File verification against the certificate registry.
pub struct FileAuthenticator<L, G, S> {
    registry: CertificateRegistry<L>,
    gateway: Arc<G>,
    store: Arc<S>,
    config: ClientConfig,
}

impl<L, G, S> FileAuthenticator<L, G, S>
where
    L: LedgerRpc,
    G: MetadataGateway,
    S: CacheStore,
{
    /// Authenticator over a chain client, metadata gateway, and cache
    /// store.
    pub fn new(client: ChainClient<L>, gateway: Arc<G>, store: Arc<S>) -> Self {
        let config = client.config().clone();
        Self {
            registry: CertificateRegistry::new(client),
            gateway,
            store,
            config,
        }
    }

    /// Verify a file's bytes against known certificate digests.
    ///
    /// Resolution order: the wallet's local cache first (case-insensitive
    /// digest comparison, no network), then a full ledger scan. Requires
    /// an initialized program only when the scan is reached.
    pub async fn verify(
        &self,
        wallet: Address,
        file: &[u8],
    ) -> Result<VerificationVerdict, ClientError> {
        let digest = sha256_hex(file);
        debug!(wallet = %wallet.short(), digest = %digest, "verifying file digest");

        let cache = self.store.load(wallet).await?;
        for entry in &cache.entries {
            if let Some(cached) = &entry.file_hash {
                if digests_match(cached, &digest) {
                    info!(certificate_id = entry.certificate_id(), "local digest match");
                    return Ok(VerificationVerdict::matched(
                        digest,
                        entry.certificate_id(),
                        MatchSource::Local,
                    ));
                }
            }
        }

        if !self.registry.is_initialized().await? {
            return Err(ClientError::NotInitialized);
        }

        // Oldest first, so long-standing certificates answer before
        // recent mints.
        let certificates = self.registry.list_active(None).await?;
        let mut scanned = 0usize;
        let mut skipped = 0usize;
        for (index, certificate) in certificates.iter().enumerate() {
            let metadata = match self.gateway.fetch_metadata(&certificate.metadata_uri).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(
                        certificate_id = certificate.certificate_id,
                        error = %e,
                        "metadata fetch failed, skipping certificate"
                    );
                    skipped += 1;
                    self.throttle(index).await;
                    continue;
                }
            };

            match extract_file_digest(&metadata) {
                Some(known) => {
                    scanned += 1;
                    if digests_match(known, &digest) {
                        info!(
                            certificate_id = certificate.certificate_id,
                            scanned, skipped, "ledger digest match"
                        );
                        let mut verdict = VerificationVerdict::matched(
                            digest,
                            certificate.certificate_id,
                            MatchSource::Ledger,
                        );
                        verdict.scanned = scanned;
                        verdict.skipped = skipped;
                        return Ok(verdict);
                    }
                }
                None => {
                    debug!(
                        certificate_id = certificate.certificate_id,
                        "metadata carries no digest attribute"
                    );
                    skipped += 1;
                }
            }
            self.throttle(index).await;
        }

        info!(scanned, skipped, "no digest match found");
        Ok(VerificationVerdict::no_match(digest, scanned, skipped))
    }

    async fn throttle(&self, index: usize) {
        let every = self.config.scan_throttle_every;
        if every > 0 && (index + 1) % every == 0 {
            tokio::time::sleep(self.config.scan_throttle_pause).await;
        }
    }

    /// Integrity report for one certificate: fetch its metadata and list
    /// every discrepancy against the on-chain fields. Issues are advisory.
    pub async fn audit(&self, certificate_id: u64) -> Result<Vec<String>, ClientError> {
        let certificate = self
            .registry
            .fetch_one(certificate_id)
            .await?
            .ok_or(ClientError::BusinessRule(
                BusinessRuleViolation::InvalidCertificateId,
            ))?;

        let metadata = match self.gateway.fetch_metadata(&certificate.metadata_uri).await {
            Ok(metadata) => metadata,
            Err(e) => return Ok(vec![format!("metadata document unreachable: {e}")]),
        };

        let mut issues = integrity_issues(&certificate, &metadata);
        if extract_file_digest(&metadata).is_none() {
            issues.push("metadata carries no file digest attribute".to_string());
        }
        Ok(issues)
    }
}
