//! SHA-256 digests for message hashing.
//!
//! Every signed payload in the wallet is reduced to a 32-byte SHA-256 digest
//! first; the signature always covers the digest, never the raw encoding.

use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 digest.
pub type Hash256 = [u8; 32];

/// Hash a single buffer.
///
/// # Example
/// ```
/// use ton_crypto::sha256;
///
/// let hash = sha256(b"transfer");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Hash256 {
    Sha256::digest(data).into()
}

/// Hash several buffers as if they were concatenated.
pub fn sha256_parts(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
