//! Recovery of a stream's creation accounts from ledger history.
//!
//! The client keeps no local state, so mutating an existing stream first
//! means finding the transaction that created it: page backward through the
//! stream account's signature history until the oldest signature, fetch that
//! transaction, and read the account roles out of its final instruction by
//! position.

use {
    crate::error::Error,
    solana_client::{
        rpc_client::{GetConfirmedSignaturesForAddress2Config, RpcClient},
        rpc_config::RpcTransactionConfig,
    },
    solana_sdk::{
        commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
        transaction::VersionedTransaction,
    },
    solana_transaction_status::UiTransactionEncoding,
};

/// Maximum signatures per history page; the RPC node caps requests at this.
pub const SIGNATURE_PAGE_LIMIT: usize = 1000;

// Positions of the semantic roles within the creation instruction's account
// list. Fixed by the proxy program's create instruction shape.
const SENDER_POSITION: usize = 0;
const RECIPIENT_POSITION: usize = 2;
const PROXY_METADATA_POSITION: usize = 4;
const STREAM_METADATA_POSITION: usize = 6;
const PARTNER_POSITION: usize = 9;
const MINT_POSITION: usize = 11;
const STREAMFLOW_PROGRAM_POSITION: usize = 14;

/// The two ledger capabilities the resolver needs. Implemented for
/// [`RpcClient`] and by in-memory mocks in tests.
pub trait StreamHistory {
    /// Up to `limit` most recent transaction signatures mentioning
    /// `address`, newest first, strictly older than `before` when set.
    fn signatures_before(
        &self,
        address: &Pubkey,
        before: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<Signature>, Error>;

    /// The full transaction for `signature`, or `None` if it cannot be
    /// decoded.
    fn transaction(&self, signature: &Signature) -> Result<Option<VersionedTransaction>, Error>;
}

impl StreamHistory for RpcClient {
    fn signatures_before(
        &self,
        address: &Pubkey,
        before: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<Signature>, Error> {
        let config = GetConfirmedSignaturesForAddress2Config {
            before,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::confirmed()),
        };
        let statuses = self.get_signatures_for_address_with_config(address, config)?;
        statuses
            .into_iter()
            .map(|status| status.signature.parse().map_err(Error::from))
            .collect()
    }

    fn transaction(&self, signature: &Signature) -> Result<Option<VersionedTransaction>, Error> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };
        let confirmed = self.get_transaction_with_config(signature, config)?;
        Ok(confirmed.transaction.transaction.decode())
    }
}

/// Accounts recovered from a stream's creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationAccounts {
    pub sender: Pubkey,
    pub recipient: Pubkey,
    pub proxy_metadata: Pubkey,
    pub stream_metadata: Pubkey,
    pub partner: Pubkey,
    pub mint: Pubkey,
    pub streamflow_program: Pubkey,
}

/// Oldest signature in `stream_id`'s history, or `None` if the account has
/// no recorded activity.
///
/// Pages backward in chunks of [`SIGNATURE_PAGE_LIMIT`], anchoring each
/// request on the last signature of the previous page. A short page means
/// the history is exhausted and its last entry is the oldest; a full page
/// advances the anchor and continues. The pages must be fetched serially,
/// each request depends on the previous page's anchor.
pub fn earliest_signature<C: StreamHistory>(
    client: &C,
    stream_id: &Pubkey,
) -> Result<Option<Signature>, Error> {
    let mut anchor: Option<Signature> = None;
    loop {
        let page = client.signatures_before(stream_id, anchor, SIGNATURE_PAGE_LIMIT)?;
        let last = match page.last() {
            Some(last) => *last,
            None => return Ok(anchor),
        };
        if page.len() < SIGNATURE_PAGE_LIMIT {
            return Ok(Some(last));
        }
        anchor = Some(last);
    }
}

/// Recover the account roles supplied when `stream_id` was created.
///
/// The creation transaction is assumed to be the oldest one referencing the
/// stream account; the roles are read from its final instruction by
/// position. Fails with [`Error::StreamNotFound`] if the account has no
/// history at all, in which case no further queries are issued.
pub fn resolve_creation_accounts<C: StreamHistory>(
    client: &C,
    stream_id: &Pubkey,
) -> Result<CreationAccounts, Error> {
    let signature =
        earliest_signature(client, stream_id)?.ok_or(Error::StreamNotFound(*stream_id))?;
    let transaction = client
        .transaction(&signature)?
        .ok_or(Error::TransactionUnavailable(signature))?;

    let message = transaction.message;
    let account_keys = message.static_account_keys();
    let instruction = message
        .instructions()
        .last()
        .ok_or(Error::MalformedCreationTransaction(*stream_id))?;
    let key_at = |position: usize| -> Result<Pubkey, Error> {
        instruction
            .accounts
            .get(position)
            .and_then(|index| account_keys.get(*index as usize))
            .copied()
            .ok_or(Error::MalformedCreationTransaction(*stream_id))
    };

    Ok(CreationAccounts {
        sender: key_at(SENDER_POSITION)?,
        recipient: key_at(RECIPIENT_POSITION)?,
        proxy_metadata: key_at(PROXY_METADATA_POSITION)?,
        stream_metadata: key_at(STREAM_METADATA_POSITION)?,
        partner: key_at(PARTNER_POSITION)?,
        mint: key_at(MINT_POSITION)?,
        streamflow_program: key_at(STREAMFLOW_PROGRAM_POSITION)?,
    })
}
