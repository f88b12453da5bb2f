//! Instruction builders for the vesting proxy program and for direct
//! withdrawals against the Streamflow program.
//!
//! Account order is the wire contract: both programs address accounts purely
//! by position. Builders take named-field account structs so call sites
//! cannot get the order wrong, and append any caller-supplied extra accounts
//! verbatim after the fixed list.

use {
    crate::state::CreateParams,
    solana_sdk::{
        hash::hash,
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program, sysvar,
    },
};

/// 8-byte method discriminant: sha256 of the canonical
/// `"global:<method>"` dispatch string, truncated.
pub fn sighash(method: &str) -> [u8; 8] {
    let digest = hash(format!("global:{method}").as_bytes());
    let mut discriminant = [0u8; 8];
    discriminant.copy_from_slice(&digest.to_bytes()[..8]);
    discriminant
}

pub struct CreateAccounts {
    pub sender: Pubkey,
    pub sender_tokens: Pubkey,
    pub recipient: Pubkey,
    pub recipient_tokens: Pubkey,
    pub proxy_metadata: Pubkey,
    pub proxy_tokens: Pubkey,
    pub stream_metadata: Pubkey,
    pub escrow_tokens: Pubkey,
    pub withdrawor: Pubkey,
    pub partner: Pubkey,
    pub partner_tokens: Pubkey,
    pub mint: Pubkey,
    pub fee_oracle: Pubkey,
    pub streamflow_program: Pubkey,
}

/// Create a stream through the proxy program.
///
/// # Account references
///   0. `[SIGNER, WRITE]` Sender and fee payer
///   1. `[WRITE]` Sender's associated token account
///   2. `[WRITE]` Recipient
///   3. `[WRITE]` Recipient's associated token account
///   4. `[WRITE]` Proxy metadata (derived from the stream metadata)
///   5. `[WRITE]` Proxy's associated token account
///   6. `[SIGNER, WRITE]` Stream metadata (fresh keypair)
///   7. `[WRITE]` Escrow token account (derived under Streamflow)
///   8. `[WRITE]` Withdrawor authority
///   9. `[WRITE]` Partner
///  10. `[WRITE]` Partner's associated token account
///  11. `[]` Token mint
///  12. `[]` Fee oracle
///  13. `[]` Rent sysvar
///  14. `[]` Streamflow program
///  15. `[]` Token program
///  16. `[]` Associated token program
///  17. `[]` System program
pub fn create(
    accounts: &CreateAccounts,
    params: &CreateParams,
    program_id: &Pubkey,
    extra_accounts: &[AccountMeta],
) -> Instruction {
    let mut keys = vec![
        AccountMeta::new(accounts.sender, true),
        AccountMeta::new(accounts.sender_tokens, false),
        AccountMeta::new(accounts.recipient, false),
        AccountMeta::new(accounts.recipient_tokens, false),
        AccountMeta::new(accounts.proxy_metadata, false),
        AccountMeta::new(accounts.proxy_tokens, false),
        AccountMeta::new(accounts.stream_metadata, true),
        AccountMeta::new(accounts.escrow_tokens, false),
        AccountMeta::new(accounts.withdrawor, false),
        AccountMeta::new(accounts.partner, false),
        AccountMeta::new(accounts.partner_tokens, false),
        AccountMeta::new_readonly(accounts.mint, false),
        AccountMeta::new_readonly(accounts.fee_oracle, false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(accounts.streamflow_program, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    keys.extend_from_slice(extra_accounts);
    Instruction::new_with_borsh(*program_id, &(sighash("create"), params), keys)
}

pub struct CancelAccounts {
    pub sender: Pubkey,
    pub sender_tokens: Pubkey,
    pub recipient: Pubkey,
    pub recipient_tokens: Pubkey,
    pub proxy_metadata: Pubkey,
    pub proxy_tokens: Pubkey,
    pub stream_metadata: Pubkey,
    pub escrow_tokens: Pubkey,
    pub streamflow_treasury: Pubkey,
    pub streamflow_treasury_tokens: Pubkey,
    pub partner: Pubkey,
    pub partner_tokens: Pubkey,
    pub mint: Pubkey,
    pub streamflow_program: Pubkey,
}

/// Cancel a stream through the proxy program. Carries no arguments.
///
/// # Account references
///   0. `[SIGNER, WRITE]` Cancel authority
///   1. `[WRITE]` Sender's associated token account
///   2. `[WRITE]` Recipient
///   3. `[WRITE]` Recipient's associated token account
///   4. `[WRITE]` Proxy metadata
///   5. `[WRITE]` Proxy's associated token account
///   6. `[WRITE]` Stream metadata
///   7. `[WRITE]` Escrow token account
///   8. `[WRITE]` Streamflow treasury
///   9. `[WRITE]` Streamflow treasury's associated token account
///  10. `[WRITE]` Partner
///  11. `[WRITE]` Partner's associated token account
///  12. `[]` Token mint
///  13. `[]` Streamflow program
///  14. `[]` Token program
pub fn cancel(
    accounts: &CancelAccounts,
    program_id: &Pubkey,
    extra_accounts: &[AccountMeta],
) -> Instruction {
    let mut keys = vec![
        AccountMeta::new(accounts.sender, true),
        AccountMeta::new(accounts.sender_tokens, false),
        AccountMeta::new(accounts.recipient, false),
        AccountMeta::new(accounts.recipient_tokens, false),
        AccountMeta::new(accounts.proxy_metadata, false),
        AccountMeta::new(accounts.proxy_tokens, false),
        AccountMeta::new(accounts.stream_metadata, false),
        AccountMeta::new(accounts.escrow_tokens, false),
        AccountMeta::new(accounts.streamflow_treasury, false),
        AccountMeta::new(accounts.streamflow_treasury_tokens, false),
        AccountMeta::new(accounts.partner, false),
        AccountMeta::new(accounts.partner_tokens, false),
        AccountMeta::new_readonly(accounts.mint, false),
        AccountMeta::new_readonly(accounts.streamflow_program, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];
    keys.extend_from_slice(extra_accounts);
    Instruction::new_with_bytes(*program_id, &sighash("cancel"), keys)
}

pub struct UpdateReleaseAccounts {
    pub sender: Pubkey,
    pub proxy_metadata: Pubkey,
    pub stream_metadata: Pubkey,
    pub withdrawor: Pubkey,
    pub streamflow_program: Pubkey,
}

/// Apply the next release-rate increase through the proxy program. Carries
/// no arguments.
///
/// # Account references
///   0. `[SIGNER, WRITE]` Sender
///   1. `[WRITE]` Proxy metadata
///   2. `[WRITE]` Stream metadata
///   3. `[WRITE]` Withdrawor authority
///   4. `[]` Streamflow program
///   5. `[]` System program
pub fn update_release(
    accounts: &UpdateReleaseAccounts,
    program_id: &Pubkey,
    extra_accounts: &[AccountMeta],
) -> Instruction {
    let mut keys = vec![
        AccountMeta::new(accounts.sender, true),
        AccountMeta::new(accounts.proxy_metadata, false),
        AccountMeta::new(accounts.stream_metadata, false),
        AccountMeta::new(accounts.withdrawor, false),
        AccountMeta::new_readonly(accounts.streamflow_program, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    keys.extend_from_slice(extra_accounts);
    Instruction::new_with_bytes(*program_id, &sighash("update_release"), keys)
}

pub struct WithdrawAccounts {
    pub authority: Pubkey,
    pub recipient: Pubkey,
    pub recipient_tokens: Pubkey,
    pub stream_metadata: Pubkey,
    pub escrow_tokens: Pubkey,
    pub streamflow_treasury: Pubkey,
    pub streamflow_treasury_tokens: Pubkey,
    pub sender: Pubkey,
    pub sender_tokens: Pubkey,
    pub mint: Pubkey,
}

/// Reserved tail of the withdraw argument block.
const WITHDRAW_RESERVED: [u8; 10] = [0; 10];

/// Withdraw released funds, issued directly against the Streamflow program
/// and bypassing the proxy. Arguments are the withdrawal amount followed by
/// a reserved tail.
///
/// # Account references
///   0. `[SIGNER, WRITE]` Withdraw authority
///   1. `[WRITE]` Recipient
///   2. `[WRITE]` Recipient's associated token account
///   3. `[WRITE]` Stream metadata
///   4. `[WRITE]` Escrow token account
///   5. `[WRITE]` Streamflow treasury
///   6. `[WRITE]` Streamflow treasury's associated token account
///   7. `[WRITE]` Sender
///   8. `[WRITE]` Sender's associated token account
///   9. `[]` Token mint
///  10. `[]` Token program
pub fn withdraw(
    accounts: &WithdrawAccounts,
    amount: u64,
    streamflow_program: &Pubkey,
    extra_accounts: &[AccountMeta],
) -> Instruction {
    let mut keys = vec![
        AccountMeta::new(accounts.authority, true),
        AccountMeta::new(accounts.recipient, false),
        AccountMeta::new(accounts.recipient_tokens, false),
        AccountMeta::new(accounts.stream_metadata, false),
        AccountMeta::new(accounts.escrow_tokens, false),
        AccountMeta::new(accounts.streamflow_treasury, false),
        AccountMeta::new(accounts.streamflow_treasury_tokens, false),
        AccountMeta::new(accounts.sender, false),
        AccountMeta::new(accounts.sender_tokens, false),
        AccountMeta::new_readonly(accounts.mint, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];
    keys.extend_from_slice(extra_accounts);
    Instruction::new_with_borsh(
        *streamflow_program,
        &(sighash("withdraw"), amount, WITHDRAW_RESERVED),
        keys,
    )
}
