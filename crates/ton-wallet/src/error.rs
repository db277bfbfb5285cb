//! Error types for ton-wallet

use thiserror::Error;
use ton_crypto::CryptoError;

use crate::address::Address;

/// Wallet error type
///
/// Each variant is a separate condition callers can branch on: retry, ask for
/// funds, fix input, or abort. Nothing in this crate retries on its own.
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Wallet has no key pair: signing capability required")]
    SignatureCapability,

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Invalid sequence number: expected {expected}, got {actual}")]
    InvalidSequenceNumber { expected: u32, actual: u32 },

    #[error("Transaction expired")]
    TransactionExpired,

    #[error("Contract not deployed at address: {0}")]
    ContractNotDeployed(Address),

    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    #[error("Invalid hash length: expected 32 bytes, got {0}")]
    InvalidHashLength(usize),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<CryptoError> for WalletError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidHashLength(len) => WalletError::InvalidHashLength(len),
            CryptoError::VerificationFailed => WalletError::InvalidSignature,
            other => WalletError::KeyGeneration(other.to_string()),
        }
    }
}

/// Result type alias
pub type WalletResult<T> = Result<T, WalletError>;
