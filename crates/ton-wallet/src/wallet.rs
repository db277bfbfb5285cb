//! Wallet: an address, its signing capability and the cached seqno.

use ton_crypto::{KeyPair, SIGNATURE_LEN};

use crate::address::Address;
use crate::deploy::{DeployMessage, StateInit};
use crate::error::{WalletError, WalletResult};
use crate::signed::SignedMessage;
use crate::transfer::{TransferMessage, TransferParams};

/// Whether a wallet can sign.
#[derive(Debug, Clone, Default)]
pub enum Capability {
    /// Watch-only: state queries work, signing does not.
    #[default]
    ReadOnly,
    /// Owns the key pair and can sign.
    CanSign(KeyPair),
}

impl Capability {
    pub fn can_sign(&self) -> bool {
        matches!(self, Capability::CanSign(_))
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        match self {
            Capability::CanSign(key_pair) => Some(key_pair),
            Capability::ReadOnly => None,
        }
    }
}

impl From<Option<KeyPair>> for Capability {
    fn from(key_pair: Option<KeyPair>) -> Self {
        key_pair.map_or(Capability::ReadOnly, Capability::CanSign)
    }
}

/// A TON wallet.
///
/// `seqno` is a local cache of the ledger's counter. The wallet never fetches
/// it; whoever sends from the wallet must refresh it first. Concurrent sends
/// from one wallet are not serialized here: both can pick up the same seqno
/// and the ledger will reject one of them.
#[derive(Debug, Clone)]
pub struct Wallet {
    address: Address,
    capability: Capability,
    seqno: u32,
}

impl Wallet {
    /// Create a wallet with an optional key pair.
    pub fn new(address: Address, key_pair: Option<KeyPair>) -> Self {
        Self {
            address,
            capability: key_pair.into(),
            seqno: 0,
        }
    }

    /// Create a read-only wallet.
    pub fn read_only(address: Address) -> Self {
        Self::new(address, None)
    }

    /// Create a wallet that can sign.
    pub fn with_key_pair(address: Address, key_pair: KeyPair) -> Self {
        Self::new(address, Some(key_pair))
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn can_sign(&self) -> bool {
        self.capability.can_sign()
    }

    pub fn public_key(&self) -> Option<&[u8; 32]> {
        self.capability.key_pair().map(KeyPair::public_key)
    }

    pub fn seqno(&self) -> u32 {
        self.seqno
    }

    pub fn set_seqno(&mut self, seqno: u32) {
        self.seqno = seqno;
    }

    fn key_pair(&self) -> WalletResult<&KeyPair> {
        self.capability
            .key_pair()
            .ok_or(WalletError::SignatureCapability)
    }

    /// Bind `params` to the cached seqno.
    pub fn create_transfer_message(
        &self,
        params: &TransferParams,
    ) -> WalletResult<TransferMessage> {
        self.key_pair()?;

        Ok(TransferMessage {
            seqno: self.seqno,
            valid_until: params.valid_until,
            send_mode: params.send_mode,
            destination: params.to,
            amount: params.amount,
            comment: params.comment.clone(),
        })
    }

    /// Sign a 32-byte message hash.
    pub fn sign(&self, hash: &[u8]) -> WalletResult<[u8; SIGNATURE_LEN]> {
        let key_pair = self.key_pair()?;
        key_pair.sign_hash(hash).map_err(Into::into)
    }

    /// Hash and sign a transfer message.
    pub fn sign_transfer(&self, message: &TransferMessage) -> WalletResult<SignedMessage> {
        let signature = self.sign(&message.hash())?;
        Ok(SignedMessage::new(signature, message.encode()))
    }

    /// Build the deployment request for this wallet's contract.
    pub fn create_deploy_message(
        &self,
        code: Vec<u8>,
        initial_balance: u64,
        valid_until: u32,
    ) -> WalletResult<DeployMessage> {
        let key_pair = self.key_pair()?;

        Ok(DeployMessage {
            valid_until,
            workchain: self.address.workchain(),
            initial_balance,
            state_init: StateInit::for_wallet(code, key_pair.public_key()),
        })
    }

    /// Hash and sign a deployment request.
    pub fn sign_deploy(&self, message: &DeployMessage) -> WalletResult<SignedMessage> {
        let signature = self.sign(&message.hash()?)?;
        Ok(SignedMessage::new(signature, message.encode()?))
    }
}

/// Builder for creating wallets
#[derive(Debug, Default)]
pub struct WalletBuilder {
    address: Option<Address>,
    key_pair: Option<KeyPair>,
    seqno: u32,
}

impl WalletBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn key_pair(mut self, key_pair: KeyPair) -> Self {
        self.key_pair = Some(key_pair);
        self
    }

    /// Start from a known seqno instead of 0.
    pub fn seqno(mut self, seqno: u32) -> Self {
        self.seqno = seqno;
        self
    }

    pub fn build(self) -> WalletResult<Wallet> {
        let address = self.address.ok_or_else(|| {
            WalletError::Configuration("Wallet address is required".to_string())
        })?;

        let mut wallet = Wallet::new(address, self.key_pair);
        wallet.set_seqno(self.seqno);
        Ok(wallet)
    }
}
