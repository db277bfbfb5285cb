//! Wallet deployment messages.
//!
//! Deploying publishes the wallet contract: its code plus the initial data
//! (seqno 0 and the owner's public key). The payload is framed with explicit
//! lengths since both code and data are variable-sized:
//!
//! ```text
//! StateInit:     code_len:u32 | code | data_len:u32 | data
//! DeployMessage: valid_until:u32 | workchain:i8 | initial_balance:u64 | StateInit
//! ```

use ton_crypto::{sha256, Hash256};

use crate::error::{WalletError, WalletResult};
use crate::transfer::fixed;

const DEPLOY_HEADER_LEN: usize = 4 + 1 + 8;

/// Contract code and initial data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    pub code: Vec<u8>,
    pub data: Vec<u8>,
}

impl StateInit {
    /// Initial state of a fresh wallet: `seqno:u32 = 0 | public_key:32`.
    pub fn for_wallet(code: Vec<u8>, public_key: &[u8; 32]) -> Self {
        let mut data = Vec::with_capacity(36);
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(public_key);
        Self { code, data }
    }

    /// Public key stored in wallet data, if the data has the wallet layout.
    pub fn wallet_public_key(&self) -> Option<[u8; 32]> {
        (self.data.len() == 36).then(|| fixed(&self.data[4..36]))
    }

    pub fn encode(&self) -> WalletResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(8 + self.code.len() + self.data.len());
        write_framed(&mut bytes, &self.code, "code")?;
        write_framed(&mut bytes, &self.data, "data")?;
        Ok(bytes)
    }

    pub fn hash(&self) -> WalletResult<Hash256> {
        Ok(sha256(&self.encode()?))
    }

    fn decode(bytes: &[u8]) -> WalletResult<Self> {
        let (code, rest) = read_framed(bytes, "code")?;
        let (data, rest) = read_framed(rest, "data")?;
        if !rest.is_empty() {
            return Err(WalletError::Serialization(format!(
                "{} trailing bytes after state init",
                rest.len()
            )));
        }
        Ok(Self {
            code: code.to_vec(),
            data: data.to_vec(),
        })
    }
}

/// A signed-to-be request to deploy a wallet contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployMessage {
    pub valid_until: u32,
    pub workchain: i8,
    pub initial_balance: u64,
    pub state_init: StateInit,
}

impl DeployMessage {
    pub fn encode(&self) -> WalletResult<Vec<u8>> {
        let state_init = self.state_init.encode()?;
        let mut bytes = Vec::with_capacity(DEPLOY_HEADER_LEN + state_init.len());
        bytes.extend_from_slice(&self.valid_until.to_be_bytes());
        bytes.push(self.workchain as u8);
        bytes.extend_from_slice(&self.initial_balance.to_be_bytes());
        bytes.extend_from_slice(&state_init);
        Ok(bytes)
    }

    pub fn hash(&self) -> WalletResult<Hash256> {
        Ok(sha256(&self.encode()?))
    }

    pub fn decode(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() < DEPLOY_HEADER_LEN {
            return Err(WalletError::Serialization(format!(
                "Deploy message too short: {} bytes",
                bytes.len()
            )));
        }
        let (header, rest) = bytes.split_at(DEPLOY_HEADER_LEN);
        Ok(Self {
            valid_until: u32::from_be_bytes(fixed(&header[0..4])),
            workchain: header[4] as i8,
            initial_balance: u64::from_be_bytes(fixed(&header[5..13])),
            state_init: StateInit::decode(rest)?,
        })
    }
}

fn write_framed(out: &mut Vec<u8>, part: &[u8], what: &str) -> WalletResult<()> {
    let len = u32::try_from(part.len()).map_err(|_| {
        WalletError::Serialization(format!("State init {} too large: {} bytes", what, part.len()))
    })?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(part);
    Ok(())
}

fn read_framed<'a>(bytes: &'a [u8], what: &str) -> WalletResult<(&'a [u8], &'a [u8])> {
    let truncated =
        || WalletError::Serialization(format!("Truncated state init {}", what));
    if bytes.len() < 4 {
        return Err(truncated());
    }
    let (len, rest) = bytes.split_at(4);
    let len = u32::from_be_bytes(fixed(len)) as usize;
    if rest.len() < len {
        return Err(truncated());
    }
    Ok(rest.split_at(len))
}
