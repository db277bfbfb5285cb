//! In-memory ledger for tests and examples.
//!
//! [`MockLedger`] behaves like a tiny wallet contract host: it checks
//! signatures against each account's public key, enforces seqno and expiry,
//! moves balances and hands out logical times. It also counts every call so
//! tests can assert that nothing reached the network.
//!
//! Deployment is not an ownership check: the mock does not derive the
//! address from the `StateInit`, so any key can be deployed onto any funded,
//! undeployed address. The signature only has to match the key inside the
//! deployed data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ton_wallet::{unix_now, Address, DeployMessage, TransferMessage};

use crate::error::{TransportError, TransportResult};
use crate::transport::{LedgerTransport, PayloadKind, SignedPayload, TransactionResult, WalletState};

/// Flat fee charged per accepted message.
pub const DEFAULT_MOCK_FEE: u64 = 5_000_000;

/// One account held by the mock ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockAccount {
    pub balance: u64,
    pub seqno: u32,
    pub public_key: Option<[u8; 32]>,
    pub deployed: bool,
    pub last_lt: Option<u64>,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<Address, MockAccount>,
    next_lt: u64,
}

/// In-memory [`LedgerTransport`].
#[derive(Debug)]
pub struct MockLedger {
    state: Mutex<LedgerState>,
    fee: u64,
    queries: AtomicUsize,
    broadcasts: AtomicUsize,
    endpoints: Mutex<Vec<String>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                accounts: HashMap::new(),
                next_lt: 1,
            }),
            fee: DEFAULT_MOCK_FEE,
            queries: AtomicUsize::new(0),
            broadcasts: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
        }
    }

    /// Set the fee charged per accepted message.
    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fund an address that has no contract yet.
    pub fn add_account(&self, address: Address, balance: u64) {
        self.lock().accounts.insert(
            address,
            MockAccount {
                balance,
                ..MockAccount::default()
            },
        );
    }

    /// Add a deployed wallet owned by `public_key`.
    pub fn add_wallet(&self, address: Address, public_key: [u8; 32], balance: u64, seqno: u32) {
        self.lock().accounts.insert(
            address,
            MockAccount {
                balance,
                seqno,
                public_key: Some(public_key),
                deployed: true,
                last_lt: None,
            },
        );
    }

    pub fn account(&self, address: &Address) -> Option<MockAccount> {
        self.lock().accounts.get(address).cloned()
    }

    /// Number of state queries received.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of broadcasts received, accepted or not.
    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.query_count() + self.broadcast_count()
    }

    /// Endpoints seen, in call order.
    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_endpoint(&self, endpoint: &str) {
        self.endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(endpoint.to_string());
    }

    fn apply(&self, payload: &SignedPayload) -> TransportResult<TransactionResult> {
        let mut state = self.lock();
        let lt = state.next_lt;

        match payload.kind {
            PayloadKind::Transfer => self.apply_transfer(&mut state, payload, lt)?,
            PayloadKind::Deploy => self.apply_deploy(&mut state, payload, lt)?,
        }

        state.next_lt += 1;
        Ok(TransactionResult {
            hash: payload.hash_hex(),
            lt,
            fee: self.fee,
            success: true,
            error: None,
        })
    }

    fn apply_transfer(
        &self,
        state: &mut LedgerState,
        payload: &SignedPayload,
        lt: u64,
    ) -> TransportResult<()> {
        let account = state
            .accounts
            .get(&payload.address)
            .filter(|a| a.deployed)
            .ok_or(TransportError::NotDeployed(payload.address))?;

        let public_key = account
            .public_key
            .ok_or_else(|| TransportError::Rejected("wallet has no public key".to_string()))?;
        payload
            .message
            .verify(&public_key)
            .map_err(|_| TransportError::Rejected("invalid signature".to_string()))?;

        let message = TransferMessage::decode(&payload.message.body)
            .map_err(|e| TransportError::Rejected(e.to_string()))?;

        if message.valid_until <= unix_now() {
            return Err(TransportError::Expired);
        }
        if message.seqno != account.seqno {
            return Err(TransportError::SeqnoMismatch {
                expected: account.seqno,
                actual: message.seqno,
            });
        }

        let available = account.balance;
        let debit = if message.send_mode & ton_wallet::send_mode::CARRY_ALL_BALANCE != 0 {
            available
        } else {
            message
                .amount
                .checked_add(self.fee)
                .ok_or_else(|| TransportError::Rejected("amount overflow".to_string()))?
        };
        if debit > available || debit < self.fee {
            return Err(TransportError::InsufficientFunds {
                required: debit.max(self.fee),
                available,
            });
        }
        let credited = debit - self.fee;

        if let Some(sender) = state.accounts.get_mut(&payload.address) {
            sender.balance -= debit;
            sender.seqno = sender.seqno.wrapping_add(1);
            sender.last_lt = Some(lt);
        }
        let receiver = state.accounts.entry(message.destination).or_default();
        receiver.balance = receiver.balance.saturating_add(credited);
        receiver.last_lt = Some(lt);
        Ok(())
    }

    fn apply_deploy(
        &self,
        state: &mut LedgerState,
        payload: &SignedPayload,
        lt: u64,
    ) -> TransportResult<()> {
        let message = DeployMessage::decode(&payload.message.body)
            .map_err(|e| TransportError::Rejected(e.to_string()))?;

        let public_key = message
            .state_init
            .wallet_public_key()
            .ok_or_else(|| TransportError::Rejected("unexpected wallet data".to_string()))?;
        payload
            .message
            .verify(&public_key)
            .map_err(|_| TransportError::Rejected("invalid signature".to_string()))?;

        if message.valid_until <= unix_now() {
            return Err(TransportError::Expired);
        }

        let account = state.accounts.entry(payload.address).or_default();
        if account.deployed {
            return Err(TransportError::Rejected("already deployed".to_string()));
        }
        let required = message.initial_balance.max(self.fee);
        if account.balance < required {
            return Err(TransportError::InsufficientFunds {
                required,
                available: account.balance,
            });
        }

        account.balance -= self.fee;
        account.seqno = 0;
        account.public_key = Some(public_key);
        account.deployed = true;
        account.last_lt = Some(lt);
        Ok(())
    }
}

#[async_trait::async_trait]
impl LedgerTransport for MockLedger {
    async fn account_state(
        &self,
        endpoint: &str,
        address: &Address,
    ) -> TransportResult<WalletState> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.record_endpoint(endpoint);

        let snapshot = {
            let state = self.lock();
            state
                .accounts
                .get(address)
                .map(|a| WalletState {
                    balance: a.balance,
                    seqno: a.seqno,
                    is_deployed: a.deployed,
                    last_transaction_lt: a.last_lt,
                })
                .unwrap_or_default()
        };

        // Let other tasks run between read and answer, like a real round-trip.
        tokio::task::yield_now().await;
        Ok(snapshot)
    }

    async fn broadcast(
        &self,
        endpoint: &str,
        payload: &SignedPayload,
    ) -> TransportResult<TransactionResult> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        self.record_endpoint(endpoint);
        self.apply(payload)
    }
}
