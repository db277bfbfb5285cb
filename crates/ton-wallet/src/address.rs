//! TON account addresses.
//!
//! An [`Address`] is a signed 8-bit workchain plus a 256-bit account id. It
//! has two textual forms:
//!
//! - Raw: `"<workchain>:<64 hex chars>"`, e.g. `"0:abab...ab"`
//! - User-friendly: 36 bytes `[flags:1][workchain:1][address:32][crc16:2]`
//!   in base64url or standard base64, e.g. `"EQAAAA...AM9c"`
//!
//! Both parse to the same value. `Display` always renders the raw form. The
//! user-friendly form only exists for the basechain (0) and masterchain (-1);
//! other workchains are raw-only.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};

/// Decoded length of a user-friendly address.
pub const USER_FRIENDLY_LEN: usize = 36;

/// Prefixes produced by the user-friendly encoder for workchains 0 and -1.
///
/// The first character comes from the flag byte (bounceable `E`/`k`,
/// non-bounceable `U`/`0`, testnet `k`/`0`), the second from the workchain.
pub const USER_FRIENDLY_PREFIXES: [&str; 8] = ["EQ", "Ef", "UQ", "Uf", "kQ", "kf", "0Q", "0f"];

const FLAG_BOUNCEABLE: u8 = 0x11;
const FLAG_NON_BOUNCEABLE: u8 = 0x51;
const FLAG_TESTNET: u8 = 0x80;

/// A TON account address.
///
/// # Example
///
/// ```
/// use ton_wallet::Address;
///
/// let raw = format!("0:{}", "ab".repeat(32));
/// let addr: Address = raw.parse().unwrap();
/// assert_eq!(addr.workchain(), 0);
/// assert_eq!(addr.to_string(), raw);
///
/// let friendly = addr.to_user_friendly(true, false).unwrap();
/// assert_eq!(Address::parse(&friendly).unwrap(), addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    raw: [u8; 32],
    workchain: i8,
}

impl Address {
    /// Create an address from a byte slice, which must be exactly 32 bytes.
    pub fn new(raw: &[u8], workchain: i8) -> WalletResult<Self> {
        let raw: [u8; 32] = raw.try_into().map_err(|_| {
            WalletError::InvalidAddressFormat(format!(
                "Address must be 32 bytes, got {}",
                raw.len()
            ))
        })?;
        Ok(Self::from_parts(raw, workchain))
    }

    /// Create an address from its fixed-size parts.
    pub const fn from_parts(raw: [u8; 32], workchain: i8) -> Self {
        Self { raw, workchain }
    }

    /// Parse either textual form.
    pub fn parse(text: &str) -> WalletResult<Self> {
        let text = text.trim();

        if USER_FRIENDLY_PREFIXES
            .iter()
            .any(|prefix| text.starts_with(prefix))
        {
            return Self::from_user_friendly(text);
        }

        if text.contains(':') {
            return Self::from_raw(text);
        }

        Err(WalletError::InvalidAddressFormat(format!(
            "Unrecognized address format: {}",
            text
        )))
    }

    /// Parse the raw `"<workchain>:<hex>"` form.
    fn from_raw(text: &str) -> WalletResult<Self> {
        let (workchain_str, hex_str) = match text.split_once(':') {
            Some((wc, hex)) if !hex.contains(':') => (wc, hex),
            _ => {
                return Err(WalletError::InvalidAddressFormat(
                    "Expected exactly one ':' separator".to_string(),
                ));
            }
        };

        let workchain: i8 = workchain_str.parse().map_err(|_| {
            WalletError::InvalidAddressFormat(format!("Invalid workchain: {}", workchain_str))
        })?;

        let bytes = hex::decode(hex_str).map_err(|e| {
            WalletError::InvalidAddressFormat(format!("Invalid hex in address: {}", e))
        })?;

        Self::new(&bytes, workchain)
    }

    /// Parse the 36-byte user-friendly form.
    ///
    /// Accepts the URL-safe and standard alphabets, with or without padding.
    /// The CRC16 checksum is verified.
    fn from_user_friendly(text: &str) -> WalletResult<Self> {
        let unpadded = text.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(unpadded)
            .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
            .map_err(|e| WalletError::InvalidAddressFormat(format!("Invalid base64: {}", e)))?;

        if bytes.len() != USER_FRIENDLY_LEN {
            return Err(WalletError::InvalidAddressFormat(format!(
                "User-friendly address must be {} bytes, got {}",
                USER_FRIENDLY_LEN,
                bytes.len()
            )));
        }

        let expected_crc = u16::from_be_bytes([bytes[34], bytes[35]]);
        let actual_crc = crc16_xmodem(&bytes[..34]);
        if expected_crc != actual_crc {
            return Err(WalletError::InvalidAddressFormat(format!(
                "CRC16 mismatch: expected {:04x}, got {:04x}",
                expected_crc, actual_crc
            )));
        }

        let workchain = bytes[1] as i8;
        check_user_friendly_workchain(workchain)?;
        Self::new(&bytes[2..34], workchain)
    }

    /// Render the user-friendly base64url form.
    ///
    /// Fails for workchains other than 0 and -1, whose encoding would not
    /// start with one of [`USER_FRIENDLY_PREFIXES`].
    pub fn to_user_friendly(&self, bounceable: bool, testnet: bool) -> WalletResult<String> {
        check_user_friendly_workchain(self.workchain)?;

        let mut data = Vec::with_capacity(USER_FRIENDLY_LEN);

        let mut flags = if bounceable {
            FLAG_BOUNCEABLE
        } else {
            FLAG_NON_BOUNCEABLE
        };
        if testnet {
            flags |= FLAG_TESTNET;
        }
        data.push(flags);
        data.push(self.workchain as u8);
        data.extend_from_slice(&self.raw);

        let crc = crc16_xmodem(&data);
        data.extend_from_slice(&crc.to_be_bytes());

        Ok(URL_SAFE_NO_PAD.encode(&data))
    }

    /// The 256-bit account id.
    pub fn raw(&self) -> &[u8; 32] {
        &self.raw
    }

    /// The workchain id (-1 masterchain, 0 basechain).
    pub fn workchain(&self) -> i8 {
        self.workchain
    }

    /// The raw `"<workchain>:<hex>"` form.
    pub fn friendly(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.raw))
    }

    pub fn is_masterchain(&self) -> bool {
        self.workchain == -1
    }

    pub fn is_basechain(&self) -> bool {
        self.workchain == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.raw))
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.friendly()
    }
}

fn check_user_friendly_workchain(workchain: i8) -> WalletResult<()> {
    match workchain {
        0 | -1 => Ok(()),
        other => Err(WalletError::InvalidAddressFormat(format!(
            "Workchain {} has no user-friendly form",
            other
        ))),
    }
}

/// CRC16-XMODEM checksum.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
