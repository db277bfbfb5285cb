//! TON wallet primitives
//!
//! This crate holds everything needed to produce a signed transfer without
//! touching the network:
//! - [`Address`]: raw (`0:ab..`) and user-friendly (`EQ..`) address forms
//! - [`TransferParams`] / [`TransferMessage`]: transfer intent and its
//!   canonical, hashable encoding
//! - [`Wallet`]: address + signing capability + cached seqno
//! - [`DeployMessage`]: contract code and initial data for deployment
//!
//! Fetching state and broadcasting live in `ton-wallet-client`.

pub mod address;
pub mod deploy;
pub mod error;
pub mod signed;
pub mod transfer;
pub mod wallet;

// Re-exports
pub use address::Address;
pub use deploy::{DeployMessage, StateInit};
pub use error::{WalletError, WalletResult};
pub use signed::SignedMessage;
pub use transfer::{send_mode, unix_now, TransferMessage, TransferParams};
pub use wallet::{Capability, Wallet, WalletBuilder};
pub use ton_crypto::KeyPair;
