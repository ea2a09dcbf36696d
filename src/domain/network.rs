//! Network configuration for Aptos networks.
//!
//! This module defines the supported networks and the endpoints each one
//! exposes: the fullnode REST API, the indexer GraphQL API and the ANS
//! (Aptos Name Service) API.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Network Configuration
// ============================================================================

/// Aptos network variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Aptos Mainnet - the production network.
    #[default]
    Mainnet,
    /// Aptos Testnet.
    Testnet,
    /// Aptos Devnet, reset weekly.
    Devnet,
    /// A local development network.
    Local,
}

impl Network {
    /// Returns the identifier of the network.
    ///
    /// This is also the network component of every search cache key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Local => "local",
        }
    }

    /// Returns the fullnode REST API base URL (including the `/v1` prefix).
    #[must_use]
    pub const fn node_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.mainnet.aptoslabs.com/v1",
            Self::Testnet => "https://api.testnet.aptoslabs.com/v1",
            Self::Devnet => "https://api.devnet.aptoslabs.com/v1",
            Self::Local => "http://127.0.0.1:8080/v1",
        }
    }

    /// Returns the indexer GraphQL endpoint.
    #[must_use]
    pub const fn indexer_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.mainnet.aptoslabs.com/v1/graphql",
            Self::Testnet => "https://api.testnet.aptoslabs.com/v1/graphql",
            Self::Devnet => "https://api.devnet.aptoslabs.com/v1/graphql",
            Self::Local => "http://127.0.0.1:8090/v1/graphql",
        }
    }

    /// Returns the ANS API base URL for the network.
    ///
    /// ANS is only deployed on Mainnet and Testnet.
    #[must_use]
    pub const fn ans_api_url(&self) -> Option<&'static str> {
        match self {
            Self::Mainnet => Some("https://www.aptosnames.com/api/mainnet/v1"),
            Self::Testnet => Some("https://www.aptosnames.com/api/testnet/v1"),
            Self::Devnet | Self::Local => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "devnet" | "dev" => Ok(Self::Devnet),
            "local" | "localnet" => Ok(Self::Local),
            other => Err(format!(
                "unknown network '{other}' (expected mainnet, testnet, devnet or local)"
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
