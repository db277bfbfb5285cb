//! Ed25519 key pairs for wallet signing.
//!
//! A [`KeyPair`] holds the 32-byte secret seed and the matching 32-byte public
//! key. Wallets sign the SHA-256 digest of a message, so [`KeyPair::sign_hash`]
//! insists on exactly 32 input bytes.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// An Ed25519 key pair.
///
/// The secret seed is zeroized on drop and never shows up in `Debug` output.
///
/// # Example
/// ```
/// use ton_crypto::{sha256, KeyPair};
///
/// let key_pair = KeyPair::generate();
/// let hash = sha256(b"transfer body");
/// let signature = key_pair.sign_hash(&hash).unwrap();
/// assert!(key_pair.verify(&hash, &signature).is_ok());
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    secret_key: [u8; 32],
    #[zeroize(skip)]
    public_key: [u8; 32],
    // SigningKey zeroizes itself; secret_key above holds the same seed.
    #[zeroize(skip)]
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS random number generator.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Derive the key pair for a 32-byte secret seed.
    pub fn from_secret_key(secret_key: [u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(&secret_key))
    }

    /// Build a key pair from caller-supplied secret and public key bytes.
    ///
    /// Both slices must be exactly 32 bytes and the public key must be the one
    /// derived from the secret key.
    pub fn from_bytes(secret_key: &[u8], public_key: &[u8]) -> CryptoResult<Self> {
        let secret: [u8; 32] = secret_key
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                kind: "secret",
                got: secret_key.len(),
            })?;
        let public: [u8; 32] = public_key
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                kind: "public",
                got: public_key.len(),
            })?;

        let key_pair = Self::from_secret_key(secret);
        if key_pair.public_key != public {
            return Err(CryptoError::KeyMismatch);
        }
        Ok(key_pair)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        Self {
            secret_key: signing_key.to_bytes(),
            public_key: signing_key.verifying_key().to_bytes(),
            signing_key,
        }
    }

    /// The 32-byte public key.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// The public key as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    /// The raw secret seed, for callers that persist keys themselves.
    pub fn secret_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// Sign an arbitrary message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Sign a 32-byte message digest.
    pub fn sign_hash(&self, hash: &[u8]) -> CryptoResult<[u8; SIGNATURE_LEN]> {
        if hash.len() != 32 {
            return Err(CryptoError::InvalidHashLength(hash.len()));
        }
        Ok(self.sign(hash))
    }

    /// Verify a signature against this key pair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> CryptoResult<()> {
        self.signing_key
            .verifying_key()
            .verify(message, &Signature::from_bytes(signature))
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Verify a signature with only the public key.
pub fn verify_signature(
    public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> CryptoResult<()> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    verifying_key
        .verify(message, &Signature::from_bytes(signature))
        .map_err(|_| CryptoError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sha256::sha256;

    #[test]
    fn test_generate() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_from_secret_key_is_stable() {
        let a = KeyPair::generate();
        let b = KeyPair::from_secret_key(*a.secret_key_bytes());
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_from_bytes() {
        let a = KeyPair::generate();
        let b = KeyPair::from_bytes(a.secret_key_bytes(), a.public_key()).unwrap();
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_from_bytes_wrong_lengths() {
        let a = KeyPair::generate();
        assert_eq!(
            KeyPair::from_bytes(&[1u8; 31], a.public_key()).unwrap_err(),
            CryptoError::InvalidKeyLength { kind: "secret", got: 31 }
        );
        assert_eq!(
            KeyPair::from_bytes(a.secret_key_bytes(), &[1u8; 33]).unwrap_err(),
            CryptoError::InvalidKeyLength { kind: "public", got: 33 }
        );
    }

    #[test]
    fn test_from_bytes_mismatch() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_eq!(
            KeyPair::from_bytes(a.secret_key_bytes(), b.public_key()).unwrap_err(),
            CryptoError::KeyMismatch
        );
    }

    #[test]
    fn test_sign_hash_and_verify() {
        let key_pair = KeyPair::generate();
        let hash = sha256(b"hello");
        let signature = key_pair.sign_hash(&hash).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(key_pair.verify(&hash, &signature).is_ok());
        assert!(verify_signature(key_pair.public_key(), &hash, &signature).is_ok());
    }

    #[test]
    fn test_sign_hash_wrong_length() {
        let key_pair = KeyPair::generate();
        assert_eq!(
            key_pair.sign_hash(&[0u8; 31]).unwrap_err(),
            CryptoError::InvalidHashLength(31)
        );
        assert_eq!(
            key_pair.sign_hash(&[0u8; 64]).unwrap_err(),
            CryptoError::InvalidHashLength(64)
        );
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let key_pair = KeyPair::generate();
        let hash = sha256(b"hello");
        let mut signature = key_pair.sign_hash(&hash).unwrap();
        assert!(key_pair.verify(&sha256(b"other"), &signature).is_err());

        signature[0] ^= 0xFF;
        assert_eq!(
            verify_signature(key_pair.public_key(), &hash, &signature),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn test_deterministic_signing() {
        let key_pair = KeyPair::generate();
        let hash = sha256(b"hello");
        assert_eq!(key_pair.sign_hash(&hash).unwrap(), key_pair.sign_hash(&hash).unwrap());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key_pair = KeyPair::from_secret_key([0x42; 32]);
        let rendered = format!("{:?}", key_pair);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(&hex::encode([0x42u8; 32])));
        assert!(rendered.contains(&key_pair.public_key_hex()));
    }
}
