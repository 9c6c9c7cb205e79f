//! # Cache Merge Rules
//!
//! Pure reconciliation logic: merging the authoritative on-chain set into
//! the wallet-scoped cache, and detecting ledger resets. No I/O here; the
//! reconciliation engine feeds these functions and persists the result.

use crate::domain::{Address, CacheEntry, Certificate, SyncState};

/// Outcome of a merge pass over one wallet's cache.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeResult {
    /// New cache contents, sorted by certificate ID descending.
    pub entries: Vec<CacheEntry>,
    /// Local-only entries kept because the wallet still appears to own
    /// them (e.g. a very recent mint not yet visible in enumeration).
    pub kept_local: usize,
    /// Local-only entries dropped.
    pub dropped_local: usize,
}

/// Merge one authoritative certificate with any existing cache entry for
/// the same ID. Ledger-tracked fields come from the chain; client-only
/// overlay fields carry over. The result is always `Confirmed`.
pub fn merge_entry(
    certificate: &Certificate,
    existing: Option<&CacheEntry>,
    now_epoch: i64,
) -> CacheEntry {
    match existing {
        Some(prev) => CacheEntry {
            certificate: certificate.clone(),
            image_preview: prev.image_preview.clone(),
            file_hash: prev.file_hash.clone(),
            transaction_signature: prev.transaction_signature.clone(),
            metadata_gateway_uri: prev.metadata_gateway_uri.clone(),
            created_at: prev.created_at,
            sync_state: SyncState::Confirmed,
        },
        None => CacheEntry::confirmed(certificate.clone(), now_epoch),
    }
}

/// Non-destructive merge: authoritative certificates win, overlay carries
/// over per ID, and local-only entries survive only while the cache still
/// says the wallet owns them.
pub fn smart_merge(
    authoritative: &[Certificate],
    local: &[CacheEntry],
    wallet: Address,
    now_epoch: i64,
) -> MergeResult {
    let mut entries: Vec<CacheEntry> = authoritative
        .iter()
        .map(|cert| {
            let existing = local.iter().find(|e| e.certificate_id() == cert.certificate_id);
            merge_entry(cert, existing, now_epoch)
        })
        .collect();

    let mut kept_local = 0;
    let mut dropped_local = 0;
    for entry in local {
        let on_chain = authoritative
            .iter()
            .any(|c| c.certificate_id == entry.certificate_id());
        if on_chain {
            continue;
        }
        if entry.certificate.owner == wallet {
            // Not yet visible on-chain; keep until the ledger catches up.
            kept_local += 1;
            entries.push(entry.clone());
        } else {
            dropped_local += 1;
        }
    }

    entries.sort_by(|a, b| b.certificate_id().cmp(&a.certificate_id()));
    MergeResult {
        entries,
        kept_local,
        dropped_local,
    }
}

/// Destructive merge: overlay fields are still preserved per ID, but any
/// local entry absent from the authoritative set is dropped
/// unconditionally.
pub fn refresh_merge(
    authoritative: &[Certificate],
    local: &[CacheEntry],
    now_epoch: i64,
) -> MergeResult {
    let mut entries: Vec<CacheEntry> = authoritative
        .iter()
        .map(|cert| {
            let existing = local.iter().find(|e| e.certificate_id() == cert.certificate_id);
            merge_entry(cert, existing, now_epoch)
        })
        .collect();

    let dropped_local = local
        .iter()
        .filter(|e| {
            !authoritative
                .iter()
                .any(|c| c.certificate_id == e.certificate_id())
        })
        .count();

    entries.sort_by(|a, b| b.certificate_id().cmp(&a.certificate_id()));
    MergeResult {
        entries,
        kept_local: 0,
        dropped_local,
    }
}

/// Ledger reset predicate, evaluated before any merge.
///
/// A reset is flagged when the count collapsed to zero while the client
/// still holds entries, or when it regressed by at least as many
/// certificates as are cached. Continuing to reconcile against a
/// regenerated ledger would silently resurrect stale identities.
pub fn detect_reset(current_count: u64, last_known_count: u64, cached_entries: usize) -> bool {
    if current_count == 0 && last_known_count > 0 && cached_entries > 0 {
        return true;
    }
    if current_count > 0
        && last_known_count > current_count
        && last_known_count - current_count >= cached_entries as u64
    {
        return true;
    }
    false
}
