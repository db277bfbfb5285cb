//! Error types for ton-crypto

use thiserror::Error;

/// Errors produced by key handling, hashing and signature checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A secret or public key was not exactly 32 bytes.
    #[error("Invalid {kind} key length: expected 32 bytes, got {got}")]
    InvalidKeyLength { kind: &'static str, got: usize },

    /// The public key does not belong to the secret key.
    #[error("Public key does not match secret key")]
    KeyMismatch,

    /// The public key bytes are not a valid curve point.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Only 32-byte digests are signed.
    #[error("Invalid hash length: expected 32 bytes, got {0}")]
    InvalidHashLength(usize),

    /// Signature did not verify under the given public key.
    #[error("Signature verification failed")]
    VerificationFailed,
}

/// Result type alias
pub type CryptoResult<T> = Result<T, CryptoError>;
