//! Transport error types.

use thiserror::Error;
use ton_wallet::{Address, WalletError};

/// Failures reported by a [`LedgerTransport`](crate::LedgerTransport).
///
/// The ledger-level rejections (`SeqnoMismatch`, `Expired`,
/// `InsufficientFunds`, `NotDeployed`) become their own [`WalletError`]
/// kinds; the rest surface as [`WalletError::Network`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out")]
    Timeout,

    #[error("rejected by ledger: {0}")]
    Rejected(String),

    #[error("seqno mismatch: expected {expected}, got {actual}")]
    SeqnoMismatch { expected: u32, actual: u32 },

    #[error("message expired")]
    Expired,

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("account not deployed: {0}")]
    NotDeployed(Address),
}

/// Result type alias
pub type TransportResult<T> = Result<T, TransportError>;

impl From<TransportError> for WalletError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::SeqnoMismatch { expected, actual } => {
                WalletError::InvalidSequenceNumber { expected, actual }
            }
            TransportError::Expired => WalletError::TransactionExpired,
            TransportError::InsufficientFunds {
                required,
                available,
            } => WalletError::InsufficientBalance {
                required,
                available,
            },
            TransportError::NotDeployed(address) => WalletError::ContractNotDeployed(address),
            other => WalletError::Network(other.to_string()),
        }
    }
}
