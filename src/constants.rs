//! Well-known addresses and protocol constants for the vesting proxy and the
//! Streamflow program it wraps.

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Default id of the non-linear vesting proxy program.
pub const PROXY_PROGRAM_ID: Pubkey = pubkey!("strn1sS2qKxs7SgJ1xx4trPKSWdqxFim6HFG9ETXiCL");

/// Streamflow vesting program on mainnet-beta.
pub const STREAMFLOW_PROGRAM_ID: Pubkey = pubkey!("strmRqUCoQUgGUan5YhzUZa6KqdzwX5L6FpUxfmKg5m");

/// Streamflow vesting program on devnet.
pub const STREAMFLOW_DEVNET_PROGRAM_ID: Pubkey =
    pubkey!("HqDGZjaVRXJ9MGRQEw7qDc2rAr6iH1n1kAQdCZaCMfMZ");

/// Streamflow fee treasury; collects the protocol's share of every stream.
pub const STREAMFLOW_TREASURY: Pubkey = pubkey!("5SEpbdjFK5FxwTvfsGMXVQTD2v4M2c5tyRTxhdsPkgDw");

/// Authority that services scheduled withdrawals.
pub const WITHDRAWOR: Pubkey = pubkey!("wdrwhnCv4pzW8beKsbPa4S2UDZrXenjg16KJdKSpb5u");

/// Oracle account consulted by the Streamflow program for fee percentages.
pub const FEE_ORACLE: Pubkey = pubkey!("B743wFVk2pCYhV91cn287e1xY7f1vt4gdY48hhNiuQmT");

/// Seed prefix for escrow token accounts owned by the Streamflow program.
pub const ESCROW_SEED: &[u8] = b"strm";

/// Scale factor for the fixed-point increase and penalty rates.
pub const RATE_PRECISION: u64 = 1_000_000_000;

/// Compute-unit limit requested for stream creation transactions.
pub const CREATE_COMPUTE_UNIT_LIMIT: u32 = 240_000;
