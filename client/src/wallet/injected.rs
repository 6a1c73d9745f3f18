//! Wallet whose account is supplied by the environment.
//!
//! Stands in for a browser extension: when `HOSCONNECT_INJECTED_ACCOUNT` is
//! set, the wallet is available and approves with that account.

use async_trait::async_trait;
use records::is_valid_address;

use super::{WalletError, WalletProvider};

pub const INJECTED_ACCOUNT_ENV: &str = "HOSCONNECT_INJECTED_ACCOUNT";
const NAME: &str = "Injected";

#[derive(Debug, Clone, Default)]
pub struct InjectedWallet {
    account: Option<String>,
}

impl InjectedWallet {
    #[must_use]
    pub fn new(account: Option<String>) -> Self {
        Self { account: account.filter(|a| !a.trim().is_empty()) }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(INJECTED_ACCOUNT_ENV).ok())
    }
}

#[async_trait]
impl WalletProvider for InjectedWallet {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.account.is_some()
    }

    async fn connect(&self) -> Result<Vec<String>, WalletError> {
        let account = self.account.as_deref().ok_or(WalletError::Unavailable(NAME))?.trim();
        if !is_valid_address(account) {
            return Err(WalletError::Session(format!("injected account {account:?} is not a valid Algorand address")));
        }
        Ok(vec![account.to_owned()])
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }
}
