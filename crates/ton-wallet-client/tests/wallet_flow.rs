//! End-to-end wallet flows against the in-memory ledger
//!
//! Run with: cargo test -p ton-wallet-client --test wallet_flow

use std::sync::Arc;

use ton_wallet::{
    send_mode, Address, KeyPair, TransferMessage, TransferParams, Wallet, WalletBuilder,
    WalletError,
};
use ton_wallet_client::{
    ClientConfig, ClientEvent, LedgerTransport, MockLedger, Network, PayloadKind, RecordingSink,
    SignedPayload, WalletClient,
};

const BALANCE: u64 = 5_000_000_000;

fn sender_address() -> Address {
    Address::from_parts([0x11; 32], 0)
}

fn destination() -> Address {
    format!("0:{}", "ab".repeat(32)).parse().unwrap()
}

fn setup(seqno: u32) -> (WalletClient<MockLedger>, Wallet) {
    let ledger = MockLedger::new();
    let wallet = Wallet::with_key_pair(sender_address(), KeyPair::generate());
    ledger.add_wallet(*wallet.address(), *wallet.public_key().unwrap(), BALANCE, seqno);
    (WalletClient::new(Network::Testnet, ledger), wallet)
}

// ============================================================================
// Message construction
// ============================================================================

#[test]
fn test_canonical_message_is_fifty_bytes() {
    let mut wallet = Wallet::with_key_pair(sender_address(), KeyPair::generate());
    wallet.set_seqno(5);

    let params = TransferParams::new(destination(), 1_000_000_000)
        .with_send_mode(3)
        .with_valid_until(1_700_000_000);
    let message = wallet.create_transfer_message(&params).unwrap();

    let encoded = message.encode();
    assert_eq!(encoded.len(), 50);
    assert_eq!(&encoded[..4], &5u32.to_be_bytes());
    assert_eq!(&encoded[4..8], &1_700_000_000u32.to_be_bytes());
    assert_eq!(encoded[8], 3);
    assert_eq!(encoded[9], 0);
    assert_eq!(&encoded[10..42], &[0xAB; 32]);
    assert_eq!(&encoded[42..50], &1_000_000_000u64.to_be_bytes());

    let signed = wallet.sign_transfer(&message).unwrap();
    assert_eq!(signed.signature.len(), 64);
    assert!(signed.verify(wallet.public_key().unwrap()).is_ok());
}

#[test]
fn test_comment_extends_message() {
    let wallet = Wallet::with_key_pair(sender_address(), KeyPair::generate());
    let params = TransferParams::new(destination(), 1).with_comment("thanks");
    let message = wallet.create_transfer_message(&params).unwrap();
    assert_eq!(message.encode().len(), 50 + "thanks".len());
    assert_eq!(TransferMessage::decode(&message.encode()).unwrap(), message);
}

// ============================================================================
// Send workflow
// ============================================================================

#[tokio::test]
async fn test_send_end_to_end() {
    let (client, mut wallet) = setup(3);
    let params = TransferParams::new(destination(), 1_000_000_000).with_comment("invoice 42");

    let result = client.send(&mut wallet, &params).await.unwrap();
    assert!(result.success);
    assert_eq!(result.error, None);
    assert_eq!(result.hash.len(), 64);
    assert_eq!(wallet.seqno(), 3);

    let ledger = client.transport();
    assert_eq!(ledger.query_count(), 1);
    assert_eq!(ledger.broadcast_count(), 1);
    assert_eq!(ledger.account(&destination()).unwrap().balance, 1_000_000_000);
    assert_eq!(ledger.account(wallet.address()).unwrap().seqno, 4);

    assert_eq!(
        client.transaction_link(&result.hash),
        format!("https://testnet.tonscan.org/tx/{}", result.hash)
    );
}

#[tokio::test]
async fn test_consecutive_sends_advance_seqno() {
    let (client, mut wallet) = setup(0);
    for expected in 0..3 {
        client
            .send(&mut wallet, &TransferParams::new(destination(), 10))
            .await
            .unwrap();
        assert_eq!(wallet.seqno(), expected);
    }
    assert_eq!(client.get_seqno(&sender_address().to_string()).await.unwrap(), 3);
}

#[tokio::test]
async fn test_read_only_send_never_reaches_transport() {
    let ledger = MockLedger::new();
    ledger.add_wallet(sender_address(), [7u8; 32], BALANCE, 0);
    let client = WalletClient::new(Network::Mainnet, ledger);
    let mut wallet = Wallet::read_only(sender_address());

    let err = client
        .send(&mut wallet, &TransferParams::new(destination(), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::SignatureCapability));
    assert_eq!(client.transport().total_calls(), 0);

    // Read-only wallets can still be queried.
    assert_eq!(
        client.get_balance(&sender_address().to_string()).await.unwrap(),
        BALANCE
    );
}

#[tokio::test]
async fn test_stale_seqno_is_rejected() {
    let (client, wallet) = setup(0);

    let first = wallet
        .create_transfer_message(&TransferParams::new(destination(), 1))
        .unwrap();
    let second = wallet
        .create_transfer_message(&TransferParams::new(destination(), 2))
        .unwrap();
    assert_eq!(first.seqno, second.seqno);

    let ledger = client.transport();
    let endpoint = client.api_url();
    ledger
        .broadcast(
            endpoint,
            &SignedPayload::transfer(*wallet.address(), wallet.sign_transfer(&first).unwrap()),
        )
        .await
        .unwrap();

    let err: WalletError = ledger
        .broadcast(
            endpoint,
            &SignedPayload::transfer(*wallet.address(), wallet.sign_transfer(&second).unwrap()),
        )
        .await
        .unwrap_err()
        .into();
    assert!(matches!(
        err,
        WalletError::InvalidSequenceNumber {
            expected: 1,
            actual: 0
        }
    ));
}

#[tokio::test]
async fn test_concurrent_sends_race_on_seqno() {
    let (client, wallet) = setup(0);
    let mut a = wallet.clone();
    let mut b = wallet;
    let params = TransferParams::new(destination(), 100);

    let (ra, rb) = tokio::join!(client.send(&mut a, &params), client.send(&mut b, &params));

    let results = [ra, rb];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(WalletError::InvalidSequenceNumber {
            expected: 1,
            actual: 0
        })
    )));
    assert_eq!(client.transport().account(&sender_address()).unwrap().seqno, 1);
}

#[tokio::test]
async fn test_serialized_sends_both_succeed() {
    let (client, wallet) = setup(0);
    let wallet = tokio::sync::Mutex::new(wallet);
    let params = TransferParams::new(destination(), 100);

    async fn locked_send(
        client: &WalletClient<MockLedger>,
        wallet: &tokio::sync::Mutex<Wallet>,
        params: &TransferParams,
    ) -> Result<ton_wallet_client::TransactionResult, WalletError> {
        let mut wallet = wallet.lock().await;
        client.send(&mut wallet, params).await
    }

    let (ra, rb) = tokio::join!(
        locked_send(&client, &wallet, &params),
        locked_send(&client, &wallet, &params)
    );
    assert!(ra.is_ok());
    assert!(rb.is_ok());
    assert_eq!(client.transport().account(&sender_address()).unwrap().seqno, 2);
}

#[tokio::test]
async fn test_carry_all_balance_skips_amount_check() {
    let (client, mut wallet) = setup(0);
    let params = TransferParams::new(destination(), BALANCE * 2)
        .with_send_mode(send_mode::CARRY_ALL_BALANCE);

    client.send(&mut wallet, &params).await.unwrap();

    let ledger = client.transport();
    assert_eq!(ledger.account(&sender_address()).unwrap().balance, 0);
    assert_eq!(
        ledger.account(&destination()).unwrap().balance,
        BALANCE - ledger.fee()
    );
}

#[tokio::test]
async fn test_ledger_overdraft_maps_to_insufficient_balance() {
    let (client, mut wallet) = setup(0);

    // Covers the amount but not the fee, so only the ledger notices.
    let err = client
        .send(&mut wallet, &TransferParams::new(destination(), BALANCE))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::InsufficientBalance {
            available: BALANCE,
            ..
        }
    ));
}

// ============================================================================
// Deployment
// ============================================================================

#[tokio::test]
async fn test_deploy_then_send() {
    let ledger = MockLedger::new();
    let mut wallet = WalletBuilder::new()
        .address(Address::from_parts([0x22; 32], 0))
        .key_pair(KeyPair::generate())
        .build()
        .unwrap();
    ledger.add_account(*wallet.address(), BALANCE);

    let config = ClientConfig::new(Network::Mainnet)
        .with_endpoint("http://127.0.0.1:8081")
        .with_wallet_code(vec![0xB5, 0xEE, 0x9C, 0x72]);
    let sink = Arc::new(RecordingSink::new());
    let client = WalletClient::with_config(config, ledger)
        .unwrap()
        .with_event_sink(sink.clone());

    let params = TransferParams::new(destination(), 1);
    assert!(matches!(
        client.send(&mut wallet, &params).await,
        Err(WalletError::ContractNotDeployed(_))
    ));

    client.deploy(&wallet, 1_000).await.unwrap();
    client.send(&mut wallet, &params).await.unwrap();

    let friendly = wallet.address().to_user_friendly(true, false).unwrap();
    let state = client.get_wallet_state(&friendly).await.unwrap();
    assert!(state.is_deployed);
    assert_eq!(state.seqno, 1);
    assert_eq!(state.last_transaction_lt, Some(2));

    assert!(
        client
            .transport()
            .endpoints()
            .iter()
            .all(|e| e == "http://127.0.0.1:8081")
    );
    assert_eq!(
        client.explorer_link(&friendly),
        format!("https://tonscan.org/address/{}", friendly)
    );
    let non_bounceable = wallet.address().to_user_friendly(false, false).unwrap();
    assert!(non_bounceable.starts_with("UQ"));
    assert_eq!(
        client.explorer_link(&non_bounceable),
        format!("https://tonscan.org/address/{}", non_bounceable)
    );
    let raw = wallet.address().to_string();
    assert_eq!(
        client.explorer_link(&raw),
        format!("https://tonscan.org/address/{}", raw)
    );

    let events = sink.events();
    assert!(events.iter().any(|e| matches!(
        e,
        ClientEvent::Failed {
            operation: "send",
            ..
        }
    )));
    let kinds: Vec<PayloadKind> = events
        .iter()
        .filter_map(|e| match e {
            ClientEvent::Broadcast { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![PayloadKind::Deploy, PayloadKind::Transfer]);
}
