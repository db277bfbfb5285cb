//! Network selection and client configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ton_wallet::{WalletError, WalletResult};

/// Default lifetime of messages the client builds itself, in seconds.
pub const DEFAULT_MESSAGE_TTL_SECS: u32 = 60;

/// TON network selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// TON mainnet
    Mainnet,
    /// TON testnet
    #[default]
    Testnet,
}

impl Network {
    /// Query endpoint for this network.
    pub fn api_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://toncenter.com/api/v2",
            Network::Testnet => "https://testnet.toncenter.com/api/v2",
        }
    }

    /// Explorer base URL for this network.
    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://tonscan.org",
            Network::Testnet => "https://testnet.tonscan.org",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(WalletError::Configuration(format!("Unknown network: {}", other))),
        }
    }
}

/// Configuration for [`WalletClient`](crate::WalletClient).
///
/// Deserializable so callers can embed it in their own config files:
///
/// ```
/// use ton_wallet_client::{ClientConfig, Network};
///
/// let config: ClientConfig =
///     serde_json::from_str(r#"{ "network": "mainnet", "message_ttl_secs": 120 }"#).unwrap();
/// assert_eq!(config.network, Network::Mainnet);
/// assert_eq!(config.endpoint, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network; picks the explorer and, unless overridden, the endpoint.
    pub network: Network,
    /// Custom query endpoint, e.g. a private node.
    pub endpoint: Option<String>,
    /// Lifetime of deploy messages built by the client.
    pub message_ttl_secs: u32,
    /// Wallet contract code used by `deploy`.
    #[serde(skip)]
    pub wallet_code: Option<Vec<u8>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            endpoint: None,
            message_ttl_secs: DEFAULT_MESSAGE_TTL_SECS,
            wallet_code: None,
        }
    }
}

impl ClientConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Override the query endpoint only; the explorer stays on `network`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_message_ttl(mut self, secs: u32) -> Self {
        self.message_ttl_secs = secs;
        self
    }

    pub fn with_wallet_code(mut self, code: Vec<u8>) -> Self {
        self.wallet_code = Some(code);
        self
    }

    /// The endpoint requests go to.
    pub fn api_url(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.network.api_endpoint())
    }

    pub fn validate(&self) -> WalletResult<()> {
        if let Some(endpoint) = &self.endpoint
            && endpoint.trim().is_empty()
        {
            return Err(WalletError::Configuration(
                "Custom endpoint must not be empty".to_string(),
            ));
        }
        if self.message_ttl_secs == 0 {
            return Err(WalletError::Configuration(
                "Message TTL must be positive".to_string(),
            ));
        }
        if matches!(&self.wallet_code, Some(code) if code.is_empty()) {
            return Err(WalletError::Configuration(
                "Wallet code must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_endpoints() {
        assert_eq!(Network::Mainnet.api_endpoint(), "https://toncenter.com/api/v2");
        assert_eq!(
            Network::Testnet.api_endpoint(),
            "https://testnet.toncenter.com/api/v2"
        );
        assert_eq!(Network::Mainnet.explorer_url(), "https://tonscan.org");
        assert_eq!(Network::Testnet.explorer_url(), "https://testnet.tonscan.org");
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" TestNet ".parse::<Network>().unwrap(), Network::Testnet);
        assert!(matches!(
            "devnet".parse::<Network>(),
            Err(WalletError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.api_url(), "https://testnet.toncenter.com/api/v2");
        assert_eq!(config.message_ttl_secs, DEFAULT_MESSAGE_TTL_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_endpoint_overrides_api_url_only() {
        let config = ClientConfig::new(Network::Mainnet).with_endpoint("http://localhost:8081");
        assert_eq!(config.api_url(), "http://localhost:8081");
        assert_eq!(config.network.explorer_url(), "https://tonscan.org");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::default().with_endpoint("  ").validate().is_err());
        assert!(ClientConfig::default().with_message_ttl(0).validate().is_err());
        assert!(ClientConfig::default().with_wallet_code(vec![]).validate().is_err());
        assert!(ClientConfig::default().with_wallet_code(vec![1]).validate().is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "network": "mainnet", "endpoint": "https://node.example/api" }"#,
        )
        .unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.api_url(), "https://node.example/api");
        assert_eq!(config.message_ttl_secs, DEFAULT_MESSAGE_TTL_SECS);

        assert!(serde_json::from_str::<ClientConfig>(r#"{ "network": "devnet" }"#).is_err());
    }
}
