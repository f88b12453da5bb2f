//! Error surface of the client: the vesting program's numbered rejection
//! codes and the command-level failure taxonomy.

use {
    crate::state::LayoutError,
    num_derive::{FromPrimitive, ToPrimitive},
    num_traits::FromPrimitive,
    solana_client::client_error::ClientError,
    solana_sdk::{
        decode_error::DecodeError,
        instruction::InstructionError,
        pubkey::Pubkey,
        signature::{ParseSignatureError, Signature},
        transaction::TransactionError,
    },
    thiserror::Error,
};

/// Custom error codes returned by the vesting proxy program.
///
/// The table is append-only: codes and messages are part of the program's
/// public surface and must match it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum VestingProgramError {
    #[error("An initialize instruction was sent to an account that has already been initialized")]
    AccountAlreadyInitialized = 6000,

    #[error("Accounts not writable!")]
    AccountsNotWritable,

    #[error("Arithmetic error")]
    ArithmeticError,

    #[error("Invalid escrow account")]
    InvalidEscrowAccount,

    #[error("Invalid Metadata!")]
    InvalidMetadata,

    #[error("Invalid metadata account")]
    InvalidMetadataAccount,

    #[error("Metadata account data must be 1104 bytes long")]
    InvalidMetadataSize,

    #[error("Invalid increase rate, should be great than 1")]
    InvalidIncreaseRate,

    #[error("Invalid penalty rate, should be between 0 and 1")]
    InvalidPenaltyRate,

    #[error("Provided accounts don't match the ones in contract.")]
    MetadataAccountMismatch,

    #[error("Sender mint does not match accounts mint!")]
    MintMismatch,

    #[error("Provided account(s) is/are not valid associated token accounts.")]
    NotAssociated,

    #[error("Recipient not transferable for account")]
    TransferNotAllowed,

    #[error("Metadata state account must be initialized")]
    UninitializedMetadata,

    #[error("Authority does not have permission for this action")]
    Unauthorized,

    #[error("Release amount has already been updated in this period")]
    AmountAlreadyUpdated,

    #[error("All funds are already unlocked")]
    AllFundsUnlocked,
}

impl VestingProgramError {
    pub fn from_code(code: u32) -> Option<Self> {
        FromPrimitive::from_u32(code)
    }
}

impl<E> DecodeError<E> for VestingProgramError {
    fn type_of() -> &'static str {
        "VestingProgramError"
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("RPC error")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("malformed signature in RPC response")]
    InvalidSignature(#[from] ParseSignatureError),

    #[error("no valid program-derived address for the given seeds")]
    NoValidBump,

    #[error("stream name exceeds the 64-byte name buffer")]
    NameTooLong,

    #[error("no transaction history found for stream {0}")]
    StreamNotFound(Pubkey),

    #[error("transaction {0} could not be decoded")]
    TransactionUnavailable(Signature),

    #[error("creation transaction for stream {0} has an unexpected account shape")]
    MalformedCreationTransaction(Pubkey),

    #[error("account {0} does not exist")]
    AccountNotFound(Pubkey),

    #[error("vesting program rejected the transaction: {0}")]
    Program(VestingProgramError),

    #[error("vesting program rejected the transaction with unrecognized code {0}")]
    UnrecognizedProgramError(u32),
}

impl Error {
    /// Classify a failed submission: custom program-error codes become their
    /// named kinds, everything else stays a transport error.
    pub fn from_submission(err: ClientError) -> Self {
        if let Some(TransactionError::InstructionError(_, InstructionError::Custom(code))) =
            err.get_transaction_error()
        {
            return match VestingProgramError::from_code(code) {
                Some(program_err) => Error::Program(program_err),
                None => Error::UnrecognizedProgramError(code),
            };
        }
        Error::Client(err)
    }
}
