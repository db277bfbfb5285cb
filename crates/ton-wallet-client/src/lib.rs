//! TON wallet client
//!
//! Queries account state and drives the send/deploy workflow for
//! [`ton_wallet::Wallet`]s:
//! - [`WalletClient`]: balance, seqno and state queries; `send` and `deploy`
//! - [`LedgerTransport`]: the seam to the ledger; bring your own HTTP or
//!   liteserver implementation
//! - [`MockLedger`]: in-memory transport for tests
//! - [`ClientEvent`] / [`EventSink`]: structured reporting, `tracing` by default
//!
//! ```
//! use ton_wallet::{Address, KeyPair, TransferParams, Wallet};
//! use ton_wallet_client::{MockLedger, Network, WalletClient};
//!
//! # tokio_test_runtime(async {
//! let ledger = MockLedger::new();
//! let mut wallet = Wallet::with_key_pair(Address::from_parts([1; 32], 0), KeyPair::generate());
//! ledger.add_wallet(*wallet.address(), *wallet.public_key().unwrap(), 1_000_000_000, 0);
//!
//! let client = WalletClient::new(Network::Testnet, ledger);
//! let to = Address::parse("EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c").unwrap();
//! let result = client.send(&mut wallet, &TransferParams::new(to, 1_000)).await.unwrap();
//! assert!(result.success);
//! # });
//! # fn tokio_test_runtime<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod client;
pub mod error;
pub mod events;
pub mod mock;
pub mod network;
pub mod transport;

// Re-exports
pub use client::WalletClient;
pub use error::{TransportError, TransportResult};
pub use events::{ClientEvent, EventSink, RecordingSink, TracingSink};
pub use mock::{MockAccount, MockLedger};
pub use network::{ClientConfig, Network, DEFAULT_MESSAGE_TTL_SECS};
pub use transport::{LedgerTransport, PayloadKind, SignedPayload, TransactionResult, WalletState};
