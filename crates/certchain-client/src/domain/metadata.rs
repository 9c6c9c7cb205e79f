//! # Off-Chain Metadata
//!
//! The JSON document the pinning service stores for each certificate. The
//! ledger only holds its URI; descriptive fields and the original file's
//! content digest live here.

use super::entities::Certificate;
use serde::{Deserialize, Serialize};

/// One `{trait_type, value}` pair from the metadata attribute list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataAttribute {
    /// Attribute key.
    pub trait_type: String,
    /// Attribute value.
    pub value: String,
}

/// Certificate metadata document, as fetched from the gateway.
///
/// Fields beyond `name`/`description`/`attributes` vary across historical
/// uploads, so everything else is optional with defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateMetadata {
    /// Display name; expected to match the on-chain title.
    #[serde(default)]
    pub name: String,
    /// Description; expected to match the on-chain description.
    #[serde(default)]
    pub description: String,
    /// Image URI.
    #[serde(default)]
    pub image: String,
    /// Attribute list; one entry carries the original file's digest.
    #[serde(default)]
    pub attributes: Vec<MetadataAttribute>,
    /// Issuer name as uploaded.
    #[serde(default)]
    pub issuer: String,
    /// Recipient name as uploaded.
    #[serde(default)]
    pub recipient: String,
}

impl CertificateMetadata {
    /// Look up an attribute value by key.
    pub fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| a.value.as_str())
    }
}

/// Compare a metadata document against its on-chain certificate and list
/// every discrepancy. Issues are advisory: scans record them and continue.
pub fn integrity_issues(certificate: &Certificate, metadata: &CertificateMetadata) -> Vec<String> {
    let mut issues = Vec::new();

    if metadata.name.is_empty() && metadata.description.is_empty() && metadata.attributes.is_empty()
    {
        issues.push("metadata document is empty or structurally invalid".to_string());
        return issues;
    }

    if metadata.name != certificate.title {
        issues.push(format!(
            "metadata name {:?} does not match on-chain title {:?}",
            metadata.name, certificate.title
        ));
    }
    if metadata.description != certificate.description {
        issues.push("metadata description does not match on-chain description".to_string());
    }

    issues
}
