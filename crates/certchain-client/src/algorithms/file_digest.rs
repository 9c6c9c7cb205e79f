//! # File Digests
//!
//! Content hashing for file authentication, plus extraction of the stored
//! digest from metadata documents.

use crate::domain::CertificateMetadata;
use sha2::{Digest, Sha256};

/// Attribute keys that have historically carried the original file's
/// digest. All spellings mean the same thing.
pub const DIGEST_ATTRIBUTE_KEYS: [&str; 4] = ["IPFS Hash", "File Hash", "SHA256", "FileHash"];

/// SHA-256 digest of the full byte content, as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Case-insensitive digest comparison.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Pull the stored file digest out of a metadata document, trying each
/// recognized attribute key in order.
pub fn extract_file_digest(metadata: &CertificateMetadata) -> Option<&str> {
    DIGEST_ATTRIBUTE_KEYS
        .iter()
        .find_map(|key| metadata.attribute(key))
}
