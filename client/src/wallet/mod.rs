//! Wallet providers and the connect fallback flow.
//!
//! ARCHITECTURE
//! ============
//! A [`WalletProvider`] is anything that can hand over account addresses:
//! an injected wallet the environment already holds ([`injected`]) or a
//! bridge session paired through a `wc:` URI ([`bridge`]). The
//! [`connector::WalletConnector`] tries the requested method, falls back from
//! the injected wallet to the bridge once, and turns the final failure into
//! a [`ConnectError`] category.

pub mod bridge;
pub mod connector;
pub mod injected;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

pub use connector::{ConnectionState, WalletConnector};

/// Failure reported by a single provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("{0} wallet not found")]
    Unavailable(&'static str),
    #[error("User rejected the request")]
    Rejected,
    #[error("No accounts returned from {0}")]
    NoAccounts(&'static str),
    #[error("{0}")]
    Session(String),
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Display name used in error text and logs.
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    /// Ask the wallet for its accounts.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError`] if the wallet is missing, the user declines,
    /// or the session fails.
    async fn connect(&self) -> Result<Vec<String>, WalletError>;

    /// # Errors
    ///
    /// Returns [`WalletError`] if the wallet cannot end its session.
    async fn disconnect(&self) -> Result<(), WalletError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectMethod {
    /// Wallet injected by the environment, falling back to QR.
    Extension,
    /// Bridge session paired by scanning a QR code.
    Qr,
}

impl ConnectMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Qr => "qr",
        }
    }
}

impl fmt::Display for ConnectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extension" => Ok(Self::Extension),
            "qr" => Ok(Self::Qr),
            other => Err(format!("unknown connect method {other:?} (expected extension or qr)")),
        }
    }
}

/// Categorized connect failure shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("Connection rejected by user")]
    Rejected,
    #[error("Wallet not found. Please install a wallet extension or use the QR code option.")]
    NotFound,
    #[error("Wallet connection failed: {0}")]
    Failed(String),
    #[error("A wallet connection is already in progress")]
    Busy,
}

impl ConnectError {
    /// Categorize raw failure text.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.contains("rejected") {
            Self::Rejected
        } else if text.contains("not found") || text.contains("undefined") {
            Self::NotFound
        } else if text.trim().is_empty() {
            Self::Failed("Unknown error".to_owned())
        } else {
            Self::Failed(text.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_substring() {
        assert_eq!(ConnectError::classify("User rejected the request"), ConnectError::Rejected);
        assert_eq!(ConnectError::classify("Injected wallet not found"), ConnectError::NotFound);
        assert_eq!(ConnectError::classify("provider is undefined"), ConnectError::NotFound);
        assert_eq!(ConnectError::classify("socket closed"), ConnectError::Failed("socket closed".into()));
    }

    #[test]
    fn classified_text_is_never_empty() {
        for raw in ["", "  ", "x"] {
            assert!(!ConnectError::classify(raw).to_string().trim().is_empty());
        }
        assert_eq!(ConnectError::classify("").to_string(), "Wallet connection failed: Unknown error");
    }

    #[test]
    fn provider_errors_classify_as_expected() {
        assert_eq!(ConnectError::classify(&WalletError::Rejected.to_string()), ConnectError::Rejected);
        assert_eq!(ConnectError::classify(&WalletError::Unavailable("Injected").to_string()), ConnectError::NotFound);
    }

    #[test]
    fn method_parses() {
        assert_eq!("QR".parse::<ConnectMethod>().unwrap(), ConnectMethod::Qr);
        assert_eq!("extension".parse::<ConnectMethod>().unwrap(), ConnectMethod::Extension);
        assert!("bluetooth".parse::<ConnectMethod>().is_err());
    }
}
