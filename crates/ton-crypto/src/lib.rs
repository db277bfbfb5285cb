//! Cryptography for TON wallets.
//!
//! - **Ed25519**: [`KeyPair`] signs 32-byte message digests
//! - **SHA-256**: [`sha256`] produces the digests that get signed
//!
//! # Example
//!
//! ```
//! use ton_crypto::{sha256, verify_signature, KeyPair};
//!
//! let key_pair = KeyPair::generate();
//! let digest = sha256(b"seqno|valid_until|mode|dest|amount");
//! let signature = key_pair.sign_hash(&digest).unwrap();
//!
//! // Anyone holding the public key can check it.
//! assert!(verify_signature(key_pair.public_key(), &digest, &signature).is_ok());
//! ```

pub mod ed25519;
pub mod error;
pub mod sha256;

pub use ed25519::{verify_signature, KeyPair, SIGNATURE_LEN};
pub use error::{CryptoError, CryptoResult};
pub use sha256::{sha256, sha256_parts, Hash256};
