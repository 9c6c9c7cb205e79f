//! # Algorithms Module
//!
//! Pure functions: address derivation, file digests, cache merge rules.

pub mod address_derivation;
pub mod cache_merge;
pub mod file_digest;

pub use address_derivation::{
    certificate_address, program_state_address, transaction_record_address,
    MAX_TRANSFER_SEED_COUNT,
};
pub use cache_merge::{detect_reset, merge_entry, refresh_merge, smart_merge, MergeResult};
pub use file_digest::{digests_match, extract_file_digest, sha256_hex, DIGEST_ATTRIBUTE_KEYS};
