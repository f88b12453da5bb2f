//! Deterministic address derivations for program-owned accounts.
//!
//! Both sides of the protocol re-derive these addresses from the same seeds,
//! so every derivation here must agree byte-for-byte with the on-chain
//! programs.

use {
    crate::{constants::ESCROW_SEED, error::Error},
    solana_sdk::pubkey::Pubkey,
};

/// Address of the proxy program's metadata account for a stream. Seeded by
/// the stream metadata address alone.
pub fn proxy_metadata_address(
    stream_metadata: &Pubkey,
    proxy_program: &Pubkey,
) -> Result<(Pubkey, u8), Error> {
    Pubkey::try_find_program_address(&[stream_metadata.as_ref()], proxy_program)
        .ok_or(Error::NoValidBump)
}

/// Address of the escrow token account the Streamflow program holds the
/// deposited funds in.
pub fn escrow_address(
    stream_metadata: &Pubkey,
    streamflow_program: &Pubkey,
) -> Result<(Pubkey, u8), Error> {
    Pubkey::try_find_program_address(
        &[ESCROW_SEED, stream_metadata.as_ref()],
        streamflow_program,
    )
    .ok_or(Error::NoValidBump)
}

/// Associated token account of `wallet` for `mint`.
pub fn associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(wallet, mint)
}
