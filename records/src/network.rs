//! Algorand network descriptors shared by the server config and the wallet
//! connectors.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorand network: {0} (expected testnet or mainnet)")]
pub struct NetworkError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Testnet => "Algorand Testnet",
            Self::Mainnet => "Algorand Mainnet",
        }
    }

    /// Chain id passed to wallet connectors.
    #[must_use]
    pub fn chain_id(self) -> u32 {
        match self {
            Self::Testnet => 416_002,
            Self::Mainnet => 416_001,
        }
    }

    #[must_use]
    pub fn algod_url(self) -> &'static str {
        match self {
            Self::Testnet => "https://testnet-api.algonode.cloud",
            Self::Mainnet => "https://mainnet-api.algonode.cloud",
        }
    }

    #[must_use]
    pub fn indexer_url(self) -> &'static str {
        match self {
            Self::Testnet => "https://testnet-idx.algonode.cloud",
            Self::Mainnet => "https://mainnet-idx.algonode.cloud",
        }
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(NetworkError(other.to_owned())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
#[path = "network_test.rs"]
mod tests;
