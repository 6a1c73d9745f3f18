//! QR-code bridge sessions.
//!
//! A session is opened by publishing a `wc:` pairing URI carrying a random
//! topic, the bridge URL and a fresh symmetric key. The URI is handed to a
//! [`PairingApprover`] (the CLI prints it and reads the peer's answer) which
//! resolves with the peer's accounts or an error. An approved session is
//! reused until [`WalletProvider::disconnect`] drops it.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use data_encoding::HEXLOWER;
use rand::Rng;
use reqwest::Url;

use super::{WalletError, WalletProvider};

pub const DEFAULT_BRIDGE_URL: &str = "https://bridge.walletconnect.org";
pub const BRIDGE_URL_ENV: &str = "HOSCONNECT_BRIDGE_URL";
const NAME: &str = "WalletConnect";
const PROTOCOL_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub topic: String,
    /// Hex-encoded 32-byte symmetric key.
    pub key: String,
    pub uri: String,
}

impl Pairing {
    /// New pairing with a random topic and key.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Session`] if `bridge_url` is not a valid URL.
    pub fn generate(bridge_url: &str) -> Result<Self, WalletError> {
        let key: [u8; 32] = rand::rng().random();
        Self::new(&uuid::Uuid::new_v4().to_string(), &HEXLOWER.encode(&key), bridge_url)
    }

    /// # Errors
    ///
    /// Returns [`WalletError::Session`] if `bridge_url` is not a valid URL.
    pub fn new(topic: &str, key: &str, bridge_url: &str) -> Result<Self, WalletError> {
        Url::parse(bridge_url).map_err(|e| WalletError::Session(format!("invalid bridge url {bridge_url:?}: {e}")))?;
        let mut uri = Url::parse(&format!("wc:{topic}@{PROTOCOL_VERSION}"))
            .map_err(|e| WalletError::Session(format!("invalid pairing topic {topic:?}: {e}")))?;
        uri.query_pairs_mut()
            .append_pair("bridge", bridge_url)
            .append_pair("key", key);
        Ok(Self { topic: topic.to_owned(), key: key.to_owned(), uri: uri.into() })
    }
}

/// Delivers a pairing to the peer and waits for its answer.
#[async_trait]
pub trait PairingApprover: Send + Sync {
    /// # Errors
    ///
    /// Returns [`WalletError`] if the peer declines or never answers.
    async fn approve(&self, pairing: &Pairing) -> Result<Vec<String>, WalletError>;
}

struct Session {
    topic: String,
    accounts: Vec<String>,
}

pub struct BridgeWallet {
    bridge_url: String,
    approver: Arc<dyn PairingApprover>,
    session: Mutex<Option<Session>>,
}

impl BridgeWallet {
    #[must_use]
    pub fn new(bridge_url: impl Into<String>, approver: Arc<dyn PairingApprover>) -> Self {
        Self { bridge_url: bridge_url.into(), approver, session: Mutex::new(None) }
    }

    #[must_use]
    pub fn bridge_url(&self) -> &str {
        &self.bridge_url
    }

    fn session_accounts(&self) -> Option<Vec<String>> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.as_ref().map(|s| s.accounts.clone())
    }
}

#[async_trait]
impl WalletProvider for BridgeWallet {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<Vec<String>, WalletError> {
        if let Some(accounts) = self.session_accounts() {
            tracing::debug!("reusing bridge session");
            return Ok(accounts);
        }

        let pairing = Pairing::generate(&self.bridge_url)?;
        tracing::info!(topic = %pairing.topic, "bridge session created");
        let accounts = self.approver.approve(&pairing).await?;
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts(NAME));
        }

        *self.session.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Session { topic: pairing.topic, accounts: accounts.clone() });
        Ok(accounts)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let ended = self.session.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(session) = ended {
            tracing::info!(topic = %session.topic, "bridge session closed");
        }
        Ok(())
    }
}
