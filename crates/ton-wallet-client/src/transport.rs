//! Ledger transport seam.
//!
//! The client never talks HTTP or node RPC itself. It hands validated
//! addresses and signed payloads to a [`LedgerTransport`], which owns the
//! wire protocol, timeouts and any retry policy.

use serde::{Deserialize, Serialize};
use ton_crypto::Hash256;
use ton_wallet::{Address, SignedMessage};

use crate::error::TransportResult;

/// Point-in-time account snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    /// Balance in nanotons
    pub balance: u64,
    /// Seqno the ledger expects next
    pub seqno: u32,
    /// Whether the wallet contract is deployed
    pub is_deployed: bool,
    /// Logical time of the last transaction
    pub last_transaction_lt: Option<u64>,
}

/// Outcome of a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Message hash, hex
    pub hash: String,
    /// Logical time assigned by the ledger
    pub lt: u64,
    /// Fee in nanotons
    pub fee: u64,
    pub success: bool,
    pub error: Option<String>,
}

/// What a signed payload asks the ledger to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadKind {
    Transfer,
    Deploy,
}

/// A signed message addressed to a wallet contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub kind: PayloadKind,
    /// The wallet the message is sent to.
    pub address: Address,
    pub message: SignedMessage,
}

impl SignedPayload {
    pub fn transfer(address: Address, message: SignedMessage) -> Self {
        Self {
            kind: PayloadKind::Transfer,
            address,
            message,
        }
    }

    pub fn deploy(address: Address, message: SignedMessage) -> Self {
        Self {
            kind: PayloadKind::Deploy,
            address,
            message,
        }
    }

    /// Hash of the signed body.
    pub fn hash(&self) -> Hash256 {
        self.message.body_hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// Opaque bytes for the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.message.to_bytes()
    }
}

/// Access to the ledger.
///
/// `endpoint` is the configured query endpoint, passed through untouched.
#[async_trait::async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Fetch balance, seqno and deployment status.
    async fn account_state(
        &self,
        endpoint: &str,
        address: &Address,
    ) -> TransportResult<WalletState>;

    /// Submit a signed payload and wait for the ledger's answer.
    async fn broadcast(
        &self,
        endpoint: &str,
        payload: &SignedPayload,
    ) -> TransportResult<TransactionResult>;
}
