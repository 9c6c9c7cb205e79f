//! # HTTP Metadata Gateway
//!
//! [`MetadataGateway`] adapter over an HTTP IPFS gateway. `ipfs://` URIs
//! are rewritten onto the configured gateway; `https://` URIs are fetched
//! as-is.

use crate::domain::{CertificateMetadata, ClientError};
use crate::ports::MetadataGateway;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Metadata fetcher backed by `reqwest`.
pub struct HttpMetadataGateway {
    client: reqwest::Client,
    gateway_base_url: String,
}

impl HttpMetadataGateway {
    /// Build a gateway client with a per-request timeout.
    ///
    /// Falls back to a default client if the builder rejects the
    /// configuration, which only happens with a malformed TLS setup.
    pub fn new(gateway_base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            gateway_base_url: gateway_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a certificate URI to a fetchable URL.
    pub fn resolve(&self, uri: &str) -> String {
        match uri.strip_prefix("ipfs://") {
            Some(cid) => format!("{}/ipfs/{}", self.gateway_base_url, cid),
            None => uri.to_string(),
        }
    }
}

#[async_trait]
impl MetadataGateway for HttpMetadataGateway {
    async fn fetch_metadata(&self, uri: &str) -> Result<CertificateMetadata, ClientError> {
        let url = self.resolve(uri);
        debug!(%url, "fetching certificate metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Gateway(format!("request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(ClientError::Gateway(format!(
                "gateway returned {} for {url}",
                response.status()
            )));
        }
        response
            .json::<CertificateMetadata>()
            .await
            .map_err(|e| ClientError::Gateway(format!("bad metadata document: {e}")))
    }
}
