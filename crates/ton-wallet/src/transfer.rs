//! Transfer parameters and the canonical transfer message.
//!
//! Wire layout of [`TransferMessage::encode`], big-endian, no length prefixes:
//!
//! ```text
//! seqno:u32 | valid_until:u32 | send_mode:u8 | workchain:i8 | address:32 bytes | amount:u64 | comment:utf8*
//! ```
//!
//! The comment is optional, unterminated, and only present when non-empty, so
//! it has to be the last field.

use std::time::{SystemTime, UNIX_EPOCH};

use ton_crypto::{sha256, Hash256};

use crate::address::Address;
use crate::error::{WalletError, WalletResult};

/// Send mode flag bits.
pub mod send_mode {
    /// Pay transfer fees separately from the sent value.
    pub const PAY_FEES_SEPARATELY: u8 = 1;
    /// Ignore errors during the action phase.
    pub const IGNORE_ERRORS: u8 = 2;
    /// Destroy the account if its balance reaches zero.
    pub const DESTROY_IF_ZERO: u8 = 32;
    /// Carry the remaining value of the inbound message.
    pub const CARRY_REMAINING_VALUE: u8 = 64;
    /// Carry the whole remaining balance.
    pub const CARRY_ALL_BALANCE: u8 = 128;

    /// Default: pay fees separately + ignore errors.
    pub const DEFAULT: u8 = PAY_FEES_SEPARATELY | IGNORE_ERRORS;
}

/// Default lifetime of a transfer, in seconds.
pub const DEFAULT_TTL_SECS: u32 = 60;

/// Length of an encoded message without a comment.
pub const HEADER_LEN: usize = 4 + 4 + 1 + 1 + 32 + 8;

/// Current Unix time in seconds, saturating at `u32::MAX`.
pub fn unix_now() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// What the caller wants to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    /// Destination address
    pub to: Address,
    /// Amount in nanotons
    pub amount: u64,
    /// Optional text comment
    pub comment: Option<String>,
    /// Send mode (default: 3)
    pub send_mode: u8,
    /// Expiry as a Unix timestamp (default: now + 60s)
    pub valid_until: u32,
}

impl TransferParams {
    /// Create a simple transfer
    pub fn new(to: Address, amount: u64) -> Self {
        Self {
            to,
            amount,
            comment: None,
            send_mode: send_mode::DEFAULT,
            valid_until: unix_now().saturating_add(DEFAULT_TTL_SECS),
        }
    }

    /// Set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set send mode
    pub fn with_send_mode(mut self, mode: u8) -> Self {
        self.send_mode = mode;
        self
    }

    /// Set expiry
    pub fn with_valid_until(mut self, valid_until: u32) -> Self {
        self.valid_until = valid_until;
        self
    }

    /// Whether the ledger will take the amount out of the whole balance
    /// instead of a fixed value.
    pub fn carries_all_balance(&self) -> bool {
        self.send_mode & send_mode::CARRY_ALL_BALANCE != 0
    }
}

/// A transfer bound to one seqno, ready for hashing and signing.
///
/// Build one per send attempt with
/// [`Wallet::create_transfer_message`](crate::Wallet::create_transfer_message);
/// reusing it after the seqno moves on makes it stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMessage {
    pub seqno: u32,
    pub valid_until: u32,
    pub send_mode: u8,
    pub destination: Address,
    pub amount: u64,
    pub comment: Option<String>,
}

impl TransferMessage {
    /// Canonical bytes.
    pub fn encode(&self) -> Vec<u8> {
        let comment = self.comment.as_deref().filter(|c| !c.is_empty());

        let mut bytes = Vec::with_capacity(HEADER_LEN + comment.map_or(0, str::len));
        bytes.extend_from_slice(&self.seqno.to_be_bytes());
        bytes.extend_from_slice(&self.valid_until.to_be_bytes());
        bytes.push(self.send_mode);
        bytes.push(self.destination.workchain() as u8);
        bytes.extend_from_slice(self.destination.raw());
        bytes.extend_from_slice(&self.amount.to_be_bytes());
        if let Some(comment) = comment {
            bytes.extend_from_slice(comment.as_bytes());
        }
        bytes
    }

    /// SHA-256 of [`encode`](Self::encode). This is what gets signed.
    pub fn hash(&self) -> Hash256 {
        sha256(&self.encode())
    }

    /// Parse canonical bytes back into a message.
    ///
    /// Everything after the fixed header is taken as the comment. An empty
    /// tail decodes to `None`.
    pub fn decode(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WalletError::Serialization(format!(
                "Transfer message too short: {} bytes (min {})",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let (header, tail) = bytes.split_at(HEADER_LEN);
        let seqno = u32::from_be_bytes(fixed(&header[0..4]));
        let valid_until = u32::from_be_bytes(fixed(&header[4..8]));
        let send_mode = header[8];
        let destination = Address::from_parts(fixed(&header[10..42]), header[9] as i8);
        let amount = u64::from_be_bytes(fixed(&header[42..50]));

        let comment = if tail.is_empty() {
            None
        } else {
            let text = std::str::from_utf8(tail).map_err(|e| {
                WalletError::Serialization(format!("Comment is not valid UTF-8: {}", e))
            })?;
            Some(text.to_string())
        };

        Ok(Self {
            seqno,
            valid_until,
            send_mode,
            destination,
            amount,
            comment,
        })
    }
}

/// Copy a slice of known length into an array.
pub(crate) fn fixed<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}
