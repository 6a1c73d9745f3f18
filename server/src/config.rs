//! Server configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before [`Settings::from_env`] runs, so every key
//! below can come from either the process environment or the dotenv file.

use records::{Network, NetworkError};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
pub const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub environment: String,
    pub port: u16,
    /// Allowed CORS origins. A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    pub network: Network,
    pub algod_url: String,
    pub indexer_url: String,
    pub algod_token: String,
    pub challenge_ttl_secs: u64,
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// Optional (all keys):
    /// - `ENVIRONMENT`: default `development`
    /// - `PORT`: default 8000
    /// - `CORS_ORIGINS`: comma-separated origins
    /// - `ALGORAND_NETWORK`: `testnet` (default) or `mainnet`
    /// - `ALGOD_URL` / `INDEXER_URL`: network defaults when absent
    /// - `ALGOD_TOKEN`: default empty
    /// - `CHALLENGE_TTL_SECS`: default 300
    ///
    /// # Errors
    ///
    /// Returns an error if the network name or a numeric value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = lookup("ALGORAND_NETWORK")
            .map(|raw| raw.parse::<Network>())
            .transpose()?
            .unwrap_or_default();

        let cors_origins = parse_origins(&lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_owned()));

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_owned()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            cors_origins,
            network,
            algod_url: lookup("ALGOD_URL").unwrap_or_else(|| network.algod_url().to_owned()),
            indexer_url: lookup("INDEXER_URL").unwrap_or_else(|| network.indexer_url().to_owned()),
            algod_token: lookup("ALGOD_TOKEN").unwrap_or_default(),
            challenge_ttl_secs: parse_or(&lookup, "CHALLENGE_TTL_SECS", DEFAULT_CHALLENGE_TTL_SECS)?,
        })
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

pub(crate) fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
