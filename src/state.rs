//! Wire layouts shared with the vesting proxy program and the Streamflow
//! program it delegates to.
//!
//! Field order and widths are the wire contract: integers are little-endian,
//! booleans occupy one byte, pubkeys are 32 raw bytes, and `ix_padding` is a
//! u32-length-prefixed byte string. None of these may change once published.

use {
    borsh::{BorshDeserialize, BorshSerialize},
    solana_sdk::pubkey::Pubkey,
    thiserror::Error,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("account data is shorter than the declared layout")]
    MalformedLayout,

    #[error("unrecognized discriminant {0}")]
    UnknownVariant(u8),
}

/// Creation parameters accepted by the proxy program's `create` instruction
/// and embedded verbatim in [`ProxyContract`].
///
/// `increase_rate` and `penalty_rate` are fixed-point integers scaled by
/// 10^9; the scaling is a caller convention, the wire carries plain `u32`s.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub start_time: u64,
    pub net_amount_deposited: u64,
    pub period: u64,
    pub amount_per_period: u64,
    pub cliff: u64,
    pub cliff_amount: u64,
    pub cancelable_by_sender: bool,
    pub cancelable_by_recipient: bool,
    pub automatic_withdrawal: bool,
    pub transferable_by_sender: bool,
    pub transferable_by_recipient: bool,
    pub can_topup: bool,
    pub stream_name: [u8; 64],
    pub withdraw_frequency: u64,
    pub pausable: bool,
    pub can_update_rate: bool,
    pub increase_rate: u32,
    pub penalty_rate: u32,
    pub is_penalized: bool,
}

impl CreateParams {
    pub const LEN: usize = 137;

    pub fn decode(data: &[u8]) -> Result<Self, LayoutError> {
        decode_fixed(data, Self::LEN)
    }

    /// The stream name with trailing zero padding stripped.
    pub fn name(&self) -> String {
        decode_stream_name(&self.stream_name)
    }
}

/// Creation parameters as recorded on the Streamflow side, embedded in
/// [`StreamContract`]. Shares the head of [`CreateParams`] but carries no
/// rate fields; the slot they would occupy is the unused `ghost` word.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct StreamParams {
    pub start_time: u64,
    pub net_amount_deposited: u64,
    pub period: u64,
    pub amount_per_period: u64,
    pub cliff: u64,
    pub cliff_amount: u64,
    pub cancelable_by_sender: bool,
    pub cancelable_by_recipient: bool,
    pub automatic_withdrawal: bool,
    pub transferable_by_sender: bool,
    pub transferable_by_recipient: bool,
    pub can_topup: bool,
    pub stream_name: [u8; 64],
    pub withdraw_frequency: u64,
    pub ghost: u32,
    pub pausable: bool,
    pub can_update_rate: bool,
}

impl StreamParams {
    pub const LEN: usize = 132;

    pub fn decode(data: &[u8]) -> Result<Self, LayoutError> {
        decode_fixed(data, Self::LEN)
    }

    pub fn name(&self) -> String {
        decode_stream_name(&self.stream_name)
    }
}

/// State of the proxy program's per-stream metadata account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProxyContract {
    pub magic: u64,
    pub version: u8,
    pub sender: Pubkey,
    pub sender_tokens: Pubkey,
    pub recipient: Pubkey,
    pub recipient_tokens: Pubkey,
    pub mint: Pubkey,
    pub stream: Pubkey,
    pub end_time: u64,
    pub last_available: u64,
    pub last_release_update_time: u64,
    pub stream_canceled_at: u64,
    pub ix: CreateParams,
    pub ix_padding: Vec<u8>,
}

impl ProxyContract {
    /// Encoded size with an empty `ix_padding`.
    pub const MIN_LEN: usize = 374;

    pub fn decode(data: &[u8]) -> Result<Self, LayoutError> {
        decode_fixed(data, Self::MIN_LEN)
    }
}

/// State of the Streamflow metadata account backing a stream.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct StreamContract {
    pub magic: u64,
    pub version: u8,
    pub created_at: u64,
    pub amount_withdrawn: u64,
    pub canceled_at: u64,
    pub end_time: u64,
    pub last_withdrawn_at: u64,
    pub sender: Pubkey,
    pub sender_tokens: Pubkey,
    pub recipient: Pubkey,
    pub recipient_tokens: Pubkey,
    pub mint: Pubkey,
    pub escrow_tokens: Pubkey,
    pub streamflow_treasury: Pubkey,
    pub streamflow_treasury_tokens: Pubkey,
    pub streamflow_fee_total: u64,
    pub streamflow_fee_withdrawn: u64,
    pub streamflow_fee_percent: f32,
    pub partner: Pubkey,
    pub partner_tokens: Pubkey,
    pub partner_fee_total: u64,
    pub partner_fee_withdrawn: u64,
    pub partner_fee_percent: f32,
    pub ix: StreamParams,
    pub ix_padding: Vec<u8>,
    pub closed: bool,
    pub current_pause_start: u64,
    pub pause_cumulative: u64,
    pub last_rate_change_time: u64,
    pub funds_unlocked_at_last_rate_change: u64,
}

impl StreamContract {
    /// Encoded size with an empty `ix_padding`. On chain the account is
    /// padded out to 1104 bytes.
    pub const MIN_LEN: usize = 578;

    pub fn decode(data: &[u8]) -> Result<Self, LayoutError> {
        decode_fixed(data, Self::MIN_LEN)
    }

    pub fn state(&self) -> StreamState {
        if self.closed {
            StreamState::Closed
        } else if self.current_pause_start > 0 {
            StreamState::Paused
        } else {
            StreamState::Scheduled
        }
    }
}

/// Lifecycle of a stream, as a one-byte tagged union. Variants carry no
/// fields; the discriminant is the entire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Scheduled,
    Paused,
    Closed,
}

impl StreamState {
    pub fn encode(&self) -> [u8; 1] {
        [*self as u8]
    }

    pub fn decode(data: &[u8]) -> Result<Self, LayoutError> {
        match data.first().ok_or(LayoutError::MalformedLayout)? {
            0 => Ok(StreamState::Scheduled),
            1 => Ok(StreamState::Paused),
            2 => Ok(StreamState::Closed),
            tag => Err(LayoutError::UnknownVariant(*tag)),
        }
    }
}

impl std::fmt::Display for StreamState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StreamState::Scheduled => write!(f, "scheduled"),
            StreamState::Paused => write!(f, "paused"),
            StreamState::Closed => write!(f, "closed"),
        }
    }
}

/// Zero-pad a stream name into its fixed 64-byte buffer. Returns `None` if
/// the name does not fit.
pub fn encode_stream_name(name: &str) -> Option<[u8; 64]> {
    let bytes = name.as_bytes();
    if bytes.len() > 64 {
        return None;
    }
    let mut buffer = [0u8; 64];
    buffer[..bytes.len()].copy_from_slice(bytes);
    Some(buffer)
}

fn decode_stream_name(buffer: &[u8; 64]) -> String {
    let end = buffer
        .iter()
        .rposition(|byte| *byte != 0)
        .map(|index| index + 1)
        .unwrap_or(0);
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

fn decode_fixed<T: BorshDeserialize>(data: &[u8], min_len: usize) -> Result<T, LayoutError> {
    if data.len() < min_len {
        return Err(LayoutError::MalformedLayout);
    }
    let mut rest = data;
    T::deserialize(&mut rest).map_err(|_| LayoutError::MalformedLayout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create_params() -> CreateParams {
        CreateParams {
            start_time: 0,
            net_amount_deposited: 1_000_000,
            period: 30,
            amount_per_period: 100_000,
            cliff: 0,
            cliff_amount: 0,
            cancelable_by_sender: true,
            cancelable_by_recipient: true,
            automatic_withdrawal: false,
            transferable_by_sender: false,
            transferable_by_recipient: false,
            can_topup: false,
            stream_name: [0u8; 64],
            withdraw_frequency: 0,
            pausable: false,
            can_update_rate: false,
            increase_rate: 1_500_000_000,
            penalty_rate: 1_000_000_000,
            is_penalized: false,
        }
    }

    fn sample_stream_params() -> StreamParams {
        StreamParams {
            start_time: 1,
            net_amount_deposited: 2,
            period: 3,
            amount_per_period: 4,
            cliff: 5,
            cliff_amount: 6,
            cancelable_by_sender: true,
            cancelable_by_recipient: false,
            automatic_withdrawal: true,
            transferable_by_sender: false,
            transferable_by_recipient: true,
            can_topup: false,
            stream_name: encode_stream_name("payroll").unwrap(),
            withdraw_frequency: 7,
            ghost: 0,
            pausable: true,
            can_update_rate: false,
        }
    }

    #[test]
    fn test_create_params_round_trip() {
        let params = sample_create_params();
        let encoded = borsh::to_vec(&params).unwrap();
        assert_eq!(encoded.len(), CreateParams::LEN);
        assert_eq!(CreateParams::decode(&encoded).unwrap(), params);
    }

    #[test]
    fn test_create_params_field_offsets() {
        let mut params = sample_create_params();
        params.stream_name = encode_stream_name("x").unwrap();
        let encoded = borsh::to_vec(&params).unwrap();
        // net_amount_deposited immediately follows start_time.
        assert_eq!(encoded[8..16], 1_000_000u64.to_le_bytes());
        // The six policy flags sit after the six u64 head fields.
        assert_eq!(&encoded[48..54], &[1, 1, 0, 0, 0, 0]);
        // The name buffer starts right after the flags.
        assert_eq!(encoded[54], b'x');
        // increase_rate is the u32 after withdraw_frequency and two flags.
        assert_eq!(encoded[128..132], 1_500_000_000u32.to_le_bytes());
        assert_eq!(encoded[132..136], 1_000_000_000u32.to_le_bytes());
        assert_eq!(encoded[136], 0);
    }

    #[test]
    fn test_create_params_truncation_fails() {
        let encoded = borsh::to_vec(&sample_create_params()).unwrap();
        for len in 0..encoded.len() {
            assert_eq!(
                CreateParams::decode(&encoded[..len]),
                Err(LayoutError::MalformedLayout),
                "truncation to {len} bytes must fail"
            );
        }
    }

    #[test]
    fn test_stream_params_round_trip() {
        let params = sample_stream_params();
        let encoded = borsh::to_vec(&params).unwrap();
        assert_eq!(encoded.len(), StreamParams::LEN);
        assert_eq!(StreamParams::decode(&encoded).unwrap(), params);
    }

    #[test]
    fn test_proxy_contract_round_trip() {
        let contract = ProxyContract {
            magic: 0x4d525453,
            version: 2,
            sender: Pubkey::new_unique(),
            sender_tokens: Pubkey::new_unique(),
            recipient: Pubkey::new_unique(),
            recipient_tokens: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            stream: Pubkey::new_unique(),
            end_time: 1_700_000_000,
            last_available: 250_000,
            last_release_update_time: 1_650_000_000,
            stream_canceled_at: 0,
            ix: sample_create_params(),
            ix_padding: vec![0; 16],
        };
        let encoded = borsh::to_vec(&contract).unwrap();
        assert_eq!(encoded.len(), ProxyContract::MIN_LEN + 16);
        assert_eq!(ProxyContract::decode(&encoded).unwrap(), contract);
    }

    #[test]
    fn test_proxy_contract_empty_padding_is_min_len() {
        let contract = ProxyContract {
            magic: 0,
            version: 0,
            sender: Pubkey::default(),
            sender_tokens: Pubkey::default(),
            recipient: Pubkey::default(),
            recipient_tokens: Pubkey::default(),
            mint: Pubkey::default(),
            stream: Pubkey::default(),
            end_time: 0,
            last_available: 0,
            last_release_update_time: 0,
            stream_canceled_at: 0,
            ix: sample_create_params(),
            ix_padding: vec![],
        };
        assert_eq!(borsh::to_vec(&contract).unwrap().len(), ProxyContract::MIN_LEN);
    }

    #[test]
    fn test_stream_contract_round_trip() {
        let contract = StreamContract {
            magic: 0,
            version: 2,
            created_at: 1_650_000_000,
            amount_withdrawn: 300_000,
            canceled_at: 0,
            end_time: 1_700_000_000,
            last_withdrawn_at: 1_660_000_000,
            sender: Pubkey::new_unique(),
            sender_tokens: Pubkey::new_unique(),
            recipient: Pubkey::new_unique(),
            recipient_tokens: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            escrow_tokens: Pubkey::new_unique(),
            streamflow_treasury: Pubkey::new_unique(),
            streamflow_treasury_tokens: Pubkey::new_unique(),
            streamflow_fee_total: 2_500,
            streamflow_fee_withdrawn: 750,
            streamflow_fee_percent: 0.25,
            partner: Pubkey::new_unique(),
            partner_tokens: Pubkey::new_unique(),
            partner_fee_total: 2_500,
            partner_fee_withdrawn: 750,
            partner_fee_percent: 0.25,
            ix: sample_stream_params(),
            ix_padding: vec![0; 526],
            closed: false,
            current_pause_start: 0,
            pause_cumulative: 0,
            last_rate_change_time: 0,
            funds_unlocked_at_last_rate_change: 0,
        };
        let encoded = borsh::to_vec(&contract).unwrap();
        assert_eq!(encoded.len(), StreamContract::MIN_LEN + 526);
        assert_eq!(StreamContract::decode(&encoded).unwrap(), contract);
    }

    #[test]
    fn test_stream_contract_truncation_fails() {
        assert_eq!(
            StreamContract::decode(&[0u8; StreamContract::MIN_LEN - 1]),
            Err(LayoutError::MalformedLayout)
        );
    }

    #[test]
    fn test_stream_state_tags() {
        assert_eq!(StreamState::decode(&[0]), Ok(StreamState::Scheduled));
        assert_eq!(StreamState::decode(&[1]), Ok(StreamState::Paused));
        assert_eq!(StreamState::decode(&[2]), Ok(StreamState::Closed));
        assert_eq!(StreamState::decode(&[3]), Err(LayoutError::UnknownVariant(3)));
        assert_eq!(StreamState::decode(&[]), Err(LayoutError::MalformedLayout));
        for state in [StreamState::Scheduled, StreamState::Paused, StreamState::Closed] {
            assert_eq!(StreamState::decode(&state.encode()), Ok(state));
        }
    }

    #[test]
    fn test_stream_state_from_contract() {
        let encoded = borsh::to_vec(&StreamContract {
            magic: 0,
            version: 2,
            created_at: 0,
            amount_withdrawn: 0,
            canceled_at: 0,
            end_time: 0,
            last_withdrawn_at: 0,
            sender: Pubkey::default(),
            sender_tokens: Pubkey::default(),
            recipient: Pubkey::default(),
            recipient_tokens: Pubkey::default(),
            mint: Pubkey::default(),
            escrow_tokens: Pubkey::default(),
            streamflow_treasury: Pubkey::default(),
            streamflow_treasury_tokens: Pubkey::default(),
            streamflow_fee_total: 0,
            streamflow_fee_withdrawn: 0,
            streamflow_fee_percent: 0.0,
            partner: Pubkey::default(),
            partner_tokens: Pubkey::default(),
            partner_fee_total: 0,
            partner_fee_withdrawn: 0,
            partner_fee_percent: 0.0,
            ix: sample_stream_params(),
            ix_padding: vec![],
            closed: false,
            current_pause_start: 0,
            pause_cumulative: 0,
            last_rate_change_time: 0,
            funds_unlocked_at_last_rate_change: 0,
        })
        .unwrap();
        let mut contract = StreamContract::decode(&encoded).unwrap();
        assert_eq!(contract.state(), StreamState::Scheduled);
        contract.current_pause_start = 1_660_000_000;
        assert_eq!(contract.state(), StreamState::Paused);
        contract.closed = true;
        assert_eq!(contract.state(), StreamState::Closed);
    }

    #[test]
    fn test_encode_stream_name() {
        let buffer = encode_stream_name("team vesting").unwrap();
        assert_eq!(&buffer[..12], b"team vesting");
        assert!(buffer[12..].iter().all(|byte| *byte == 0));
        assert_eq!(decode_stream_name(&buffer), "team vesting");
        assert_eq!(encode_stream_name(""), Some([0u8; 64]));
        assert!(encode_stream_name(&"x".repeat(65)).is_none());
        assert!(encode_stream_name(&"x".repeat(64)).is_some());
    }
}
