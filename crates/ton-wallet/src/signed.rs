//! Signed message envelope.

use ton_crypto::{sha256, verify_signature, Hash256, SIGNATURE_LEN};

use crate::error::{WalletError, WalletResult};
use crate::transfer::fixed;

/// A canonical message body plus the Ed25519 signature over its SHA-256.
///
/// Serialized as `signature:64 bytes | body`, the same order wallet contracts
/// expect for signed external messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    pub signature: [u8; SIGNATURE_LEN],
    pub body: Vec<u8>,
}

impl SignedMessage {
    pub fn new(signature: [u8; SIGNATURE_LEN], body: Vec<u8>) -> Self {
        Self { signature, body }
    }

    /// Hash of the body; the value the signature covers.
    pub fn body_hash(&self) -> Hash256 {
        sha256(&self.body)
    }

    /// Check the signature with only the signer's public key.
    pub fn verify(&self, public_key: &[u8; 32]) -> WalletResult<()> {
        verify_signature(public_key, &self.body_hash(), &self.signature).map_err(Into::into)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SIGNATURE_LEN + self.body.len());
        bytes.extend_from_slice(&self.signature);
        bytes.extend_from_slice(&self.body);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() < SIGNATURE_LEN {
            return Err(WalletError::Serialization(format!(
                "Signed message too short: {} bytes",
                bytes.len()
            )));
        }
        let (signature, body) = bytes.split_at(SIGNATURE_LEN);
        Ok(Self::new(fixed(signature), body.to_vec()))
    }
}
