//! # Address Derivation
//!
//! Deterministic program-derived addresses. Pure functions: the same
//! `(program id, seeds)` always yield the same address, with no network
//! access anywhere in this module.
//!
//! Seed layouts mirror the deployed program exactly, including the 8-byte
//! little-endian certificate ID and the single-byte transfer count in the
//! transaction-record seed.

use crate::domain::{Address, ClientError};
use sha2::{Digest, Sha256};

/// Seed tag for the program-state singleton.
pub const PROGRAM_STATE_SEED: &[u8] = b"program_state";
/// Seed tag for certificate accounts.
pub const CERTIFICATE_SEED: &[u8] = b"certificate_nft";
/// Seed tag for transfer transaction records.
pub const TRANSACTION_SEED: &[u8] = b"transaction";

/// Highest transfer count the single-byte record seed can encode.
pub const MAX_TRANSFER_SEED_COUNT: u32 = u8::MAX as u32;

/// Domain separator appended after the program ID.
const PDA_MARKER: &[u8] = b"certchain_pda_v1";

fn derive(program_id: &Address, seeds: &[&[u8]]) -> Address {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    Address::new(hasher.finalize().into())
}

/// Address of the program-state singleton.
pub fn program_state_address(program_id: &Address) -> Address {
    derive(program_id, &[PROGRAM_STATE_SEED])
}

/// Address of the certificate account for an ID.
pub fn certificate_address(program_id: &Address, certificate_id: u64) -> Address {
    derive(
        program_id,
        &[CERTIFICATE_SEED, &certificate_id.to_le_bytes()],
    )
}

/// Address of the transaction record for one transfer step.
///
/// The seed includes the certificate's transfer count *at the time of the
/// transfer* as a single byte, which is what gives transfers at-most-once
/// semantics: resubmitting the same logical transfer reuses the same
/// address until the ledger advances the count.
///
/// The one-byte encoding caps a certificate at 255 recorded transfers;
/// counts beyond that fail with [`ClientError::TransferCountSeedOverflow`]
/// rather than deriving an ambiguous address.
pub fn transaction_record_address(
    program_id: &Address,
    certificate_id: u64,
    previous_owner: &Address,
    transfer_count: u32,
) -> Result<Address, ClientError> {
    if transfer_count > MAX_TRANSFER_SEED_COUNT {
        return Err(ClientError::TransferCountSeedOverflow {
            count: transfer_count,
        });
    }
    Ok(derive(
        program_id,
        &[
            TRANSACTION_SEED,
            &certificate_id.to_le_bytes(),
            previous_owner.as_bytes(),
            &[transfer_count as u8],
        ],
    ))
}
