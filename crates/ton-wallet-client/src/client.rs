//! Wallet client: state queries and the send/deploy workflow.

use std::sync::Arc;

use ton_wallet::{
    send_mode, unix_now, Address, TransferParams, Wallet, WalletError, WalletResult,
};
use tracing::debug;

use crate::events::{ClientEvent, EventSink, TracingSink};
use crate::network::{ClientConfig, Network};
use crate::transport::{LedgerTransport, SignedPayload, TransactionResult, WalletState};

/// Talks to the ledger on behalf of wallets.
///
/// The client holds no per-wallet state. `send` refreshes the wallet's cached
/// seqno from the ledger right before building the message, but two `send`
/// calls on the same wallet running at once can still read the same seqno;
/// the ledger then rejects one with [`WalletError::InvalidSequenceNumber`].
/// Serialize sends per wallet, e.g. behind a `tokio::sync::Mutex<Wallet>`.
pub struct WalletClient<T> {
    config: ClientConfig,
    transport: T,
    sink: Arc<dyn EventSink>,
}

impl<T: LedgerTransport> WalletClient<T> {
    /// Client for `network` using its default endpoint.
    pub fn new(network: Network, transport: T) -> Self {
        Self {
            config: ClientConfig::new(network),
            transport,
            sink: Arc::new(TracingSink),
        }
    }

    /// Client for a custom query endpoint. Explorer links stay on testnet.
    pub fn with_custom_endpoint(endpoint: impl Into<String>, transport: T) -> WalletResult<Self> {
        Self::with_config(ClientConfig::default().with_endpoint(endpoint), transport)
    }

    pub fn with_config(config: ClientConfig, transport: T) -> WalletResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the default [`TracingSink`].
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoint handed to the transport.
    pub fn api_url(&self) -> &str {
        self.config.api_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Balance in nanotons.
    pub async fn get_balance(&self, address: &str) -> WalletResult<u64> {
        Ok(self.get_wallet_state(address).await?.balance)
    }

    pub async fn get_wallet_state(&self, address: &str) -> WalletResult<WalletState> {
        let address = Address::parse(address)?;
        self.query_state(&address, "get_wallet_state").await
    }

    /// Seqno the ledger expects next.
    pub async fn get_seqno(&self, address: &str) -> WalletResult<u32> {
        Ok(self.get_wallet_state(address).await?.seqno)
    }

    /// Send a transfer from `wallet`.
    ///
    /// Refreshes `wallet`'s seqno, builds and signs the message, then
    /// broadcasts it. Read-only wallets fail before anything reaches the
    /// transport.
    pub async fn send(
        &self,
        wallet: &mut Wallet,
        params: &TransferParams,
    ) -> WalletResult<TransactionResult> {
        const OP: &str = "send";
        let address = *wallet.address();

        if !wallet.can_sign() {
            return Err(self.fail(&address, OP, WalletError::SignatureCapability));
        }

        debug!("Sending {} nanotons from {} to {}", params.amount, address, params.to);

        let state = self.query_state(&address, OP).await?;
        self.refresh_seqno(wallet, state.seqno);

        if !state.is_deployed {
            return Err(self.fail(&address, OP, WalletError::ContractNotDeployed(address)));
        }
        if params.valid_until <= unix_now() {
            return Err(self.fail(&address, OP, WalletError::TransactionExpired));
        }
        if params.send_mode & send_mode::CARRY_ALL_BALANCE == 0 && params.amount > state.balance {
            return Err(self.fail(
                &address,
                OP,
                WalletError::InsufficientBalance {
                    required: params.amount,
                    available: state.balance,
                },
            ));
        }

        let signed = wallet
            .create_transfer_message(params)
            .and_then(|message| wallet.sign_transfer(&message))
            .map_err(|e| self.fail(&address, OP, e))?;
        self.broadcast(SignedPayload::transfer(address, signed), OP)
            .await
    }

    /// Deploy `wallet`'s contract with the configured wallet code.
    pub async fn deploy(
        &self,
        wallet: &Wallet,
        initial_balance: u64,
    ) -> WalletResult<TransactionResult> {
        const OP: &str = "deploy";
        let address = *wallet.address();

        if !wallet.can_sign() {
            return Err(self.fail(&address, OP, WalletError::SignatureCapability));
        }
        let code = self.config.wallet_code.clone().ok_or_else(|| {
            self.fail(
                &address,
                OP,
                WalletError::Configuration("Wallet code is not configured".to_string()),
            )
        })?;

        debug!("Deploying wallet {} with {} nanotons", address, initial_balance);

        let state = self.query_state(&address, OP).await?;
        if state.balance < initial_balance {
            return Err(self.fail(
                &address,
                OP,
                WalletError::InsufficientBalance {
                    required: initial_balance,
                    available: state.balance,
                },
            ));
        }

        let valid_until = unix_now().saturating_add(self.config.message_ttl_secs);
        let signed = wallet
            .create_deploy_message(code, initial_balance, valid_until)
            .and_then(|message| wallet.sign_deploy(&message))
            .map_err(|e| self.fail(&address, OP, e))?;
        self.broadcast(SignedPayload::deploy(address, signed), OP)
            .await
    }

    /// Explorer page for an address. `address` is used verbatim.
    pub fn explorer_link(&self, address: &str) -> String {
        format!("{}/address/{}", self.config.network.explorer_url(), address)
    }

    /// Explorer page for a transaction hash.
    pub fn transaction_link(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.config.network.explorer_url(), hash)
    }

    async fn query_state(
        &self,
        address: &Address,
        operation: &'static str,
    ) -> WalletResult<WalletState> {
        let state = self
            .transport
            .account_state(self.api_url(), address)
            .await
            .map_err(|e| self.fail(address, operation, e.into()))?;

        self.sink.emit(&ClientEvent::StateQueried {
            address: *address,
            balance: state.balance,
            seqno: state.seqno,
            is_deployed: state.is_deployed,
        });
        Ok(state)
    }

    fn refresh_seqno(&self, wallet: &mut Wallet, current: u32) {
        let previous = wallet.seqno();
        wallet.set_seqno(current);
        self.sink.emit(&ClientEvent::SeqnoRefreshed {
            address: *wallet.address(),
            previous,
            current,
        });
    }

    async fn broadcast(
        &self,
        payload: SignedPayload,
        operation: &'static str,
    ) -> WalletResult<TransactionResult> {
        self.sink.emit(&ClientEvent::Signed {
            address: payload.address,
            kind: payload.kind,
            hash: payload.hash(),
        });

        let result = self
            .transport
            .broadcast(self.api_url(), &payload)
            .await
            .map_err(|e| self.fail(&payload.address, operation, e.into()))?;

        self.sink.emit(&ClientEvent::Broadcast {
            address: payload.address,
            kind: payload.kind,
            hash: result.hash.clone(),
            lt: result.lt,
            success: result.success,
        });
        Ok(result)
    }

    fn fail(&self, address: &Address, operation: &'static str, err: WalletError) -> WalletError {
        self.sink.emit(&ClientEvent::Failed {
            address: *address,
            operation,
            reason: err.to_string(),
        });
        err
    }
}

impl<T> std::fmt::Debug for WalletClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletClient")
            .field("network", &self.config.network)
            .field("api_url", &self.config.api_url())
            .finish_non_exhaustive()
    }
}
