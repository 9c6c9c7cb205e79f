//! # Metadata Gateway Port
//!
//! Outbound trait for the off-chain metadata store, plus a mock for tests.

use crate::domain::{CertificateMetadata, ClientError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Content-addressed metadata store - outbound port.
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Fetch and decode the metadata document at a URI.
    ///
    /// Implementations apply a bounded timeout; a timeout surfaces as
    /// [`ClientError::Gateway`] like any other fetch failure.
    async fn fetch_metadata(&self, uri: &str) -> Result<CertificateMetadata, ClientError>;
}

/// In-memory metadata gateway for testing.
#[derive(Default)]
pub struct MockMetadataGateway {
    documents: Mutex<HashMap<String, CertificateMetadata>>,
    failing: Mutex<HashSet<String>>,
}

impl MockMetadataGateway {
    /// Empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under a URI.
    pub fn insert(&self, uri: impl Into<String>, metadata: CertificateMetadata) {
        self.documents
            .lock()
            .expect("gateway mock poisoned")
            .insert(uri.into(), metadata);
    }

    /// Make fetches of a URI fail, simulating an unreachable document.
    pub fn fail_uri(&self, uri: impl Into<String>) {
        self.failing
            .lock()
            .expect("gateway mock poisoned")
            .insert(uri.into());
    }
}

#[async_trait]
impl MetadataGateway for MockMetadataGateway {
    async fn fetch_metadata(&self, uri: &str) -> Result<CertificateMetadata, ClientError> {
        if self.failing.lock().expect("gateway mock poisoned").contains(uri) {
            return Err(ClientError::Gateway(format!("unreachable: {uri}")));
        }
        self.documents
            .lock()
            .expect("gateway mock poisoned")
            .get(uri)
            .cloned()
            .ok_or_else(|| ClientError::Gateway(format!("not found: {uri}")))
    }
}
