//! Connect flow with injected-to-bridge fallback.
//!
//! DESIGN
//! ======
//! `Disconnected -> Connecting -> Connected | Disconnected (+ last error)`.
//! Each method gets one linear attempt: no retries, no timeout. A second
//! `connect` while one is in flight is refused with [`ConnectError::Busy`].
//! If an in-flight attempt is dropped, the state returns to `Disconnected`.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures are folded into one text per method and then
//! categorized by [`ConnectError::classify`]. When the injected wallet fails
//! and the bridge fallback fails too, the injected wallet's error is the one
//! reported.

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ConnectError, ConnectMethod, WalletError, WalletProvider};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting(ConnectMethod),
    /// `via` is the method that produced the account, which differs from the
    /// requested one after a fallback.
    Connected { address: String, via: ConnectMethod },
}

#[derive(Debug)]
struct Status {
    state: ConnectionState,
    last_error: Option<ConnectError>,
}

fn lock(status: &Mutex<Status>) -> MutexGuard<'_, Status> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks an attempt in flight; resets to `Disconnected` if dropped unfinished.
struct Attempt<'a> {
    status: &'a Mutex<Status>,
    finished: bool,
}

impl<'a> Attempt<'a> {
    fn begin(status: &'a Mutex<Status>, method: ConnectMethod) -> Result<Self, ConnectError> {
        let mut guard = lock(status);
        if matches!(guard.state, ConnectionState::Connecting(_)) {
            return Err(ConnectError::Busy);
        }
        guard.state = ConnectionState::Connecting(method);
        guard.last_error = None;
        Ok(Self { status, finished: false })
    }

    fn succeed(mut self, address: String, via: ConnectMethod) {
        lock(self.status).state = ConnectionState::Connected { address, via };
        self.finished = true;
    }

    fn fail(mut self, err: ConnectError) {
        let mut guard = lock(self.status);
        guard.state = ConnectionState::Disconnected;
        guard.last_error = Some(err);
        self.finished = true;
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if !self.finished {
            lock(self.status).state = ConnectionState::Disconnected;
        }
    }
}

async fn first_account(provider: &dyn WalletProvider) -> Result<String, WalletError> {
    provider
        .connect()
        .await?
        .into_iter()
        .find(|account| !account.trim().is_empty())
        .ok_or(WalletError::NoAccounts(provider.name()))
}

/// Connection state plus the two providers. Clones share state.
#[derive(Clone)]
pub struct WalletConnector {
    injected: Arc<dyn WalletProvider>,
    bridge: Arc<dyn WalletProvider>,
    status: Arc<Mutex<Status>>,
}

impl WalletConnector {
    #[must_use]
    pub fn new(injected: Arc<dyn WalletProvider>, bridge: Arc<dyn WalletProvider>) -> Self {
        Self {
            injected,
            bridge,
            status: Arc::new(Mutex::new(Status { state: ConnectionState::Disconnected, last_error: None })),
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        lock(&self.status).state.clone()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<ConnectError> {
        lock(&self.status).last_error.clone()
    }

    #[must_use]
    pub fn is_connecting(&self) -> bool {
        matches!(lock(&self.status).state, ConnectionState::Connecting(_))
    }

    #[must_use]
    pub fn address(&self) -> Option<String> {
        match &lock(&self.status).state {
            ConnectionState::Connected { address, .. } => Some(address.clone()),
            _ => None,
        }
    }

    /// Connect with `method` and return the first account address.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Busy`] while another attempt is in flight,
    /// otherwise the categorized failure of the attempt.
    pub async fn connect(&self, method: ConnectMethod) -> Result<String, ConnectError> {
        let attempt = Attempt::begin(&self.status, method)?;
        tracing::info!(%method, "connecting wallet");

        let outcome = match method {
            ConnectMethod::Qr => self
                .via_bridge()
                .await
                .map_err(|e| format!("QR code connection failed: {e}")),
            ConnectMethod::Extension => self
                .via_extension()
                .await
                .map_err(|e| format!("Extension connection failed. {e}")),
        };

        match outcome {
            Ok((address, via)) => {
                tracing::info!(%address, %via, "wallet connected");
                attempt.succeed(address.clone(), via);
                Ok(address)
            }
            Err(text) => {
                let err = ConnectError::classify(&text);
                tracing::warn!(error = %text, "wallet connection failed");
                attempt.fail(err.clone());
                Err(err)
            }
        }
    }

    async fn via_bridge(&self) -> Result<(String, ConnectMethod), String> {
        first_account(self.bridge.as_ref())
            .await
            .map(|address| (address, ConnectMethod::Qr))
            .map_err(|e| format!("{} failed: {e}", self.bridge.name()))
    }

    async fn via_extension(&self) -> Result<(String, ConnectMethod), String> {
        if !self.injected.is_available() {
            tracing::info!(provider = self.injected.name(), "injected wallet unavailable, using QR");
            return self.via_bridge().await;
        }

        match first_account(self.injected.as_ref()).await {
            Ok(address) => Ok((address, ConnectMethod::Extension)),
            Err(primary) => {
                tracing::warn!(error = %primary, "injected wallet failed, falling back to QR");
                self.via_bridge().await.map_err(|fallback| {
                    tracing::debug!(error = %fallback, "QR fallback failed");
                    format!("Failed to connect with any method: {primary}")
                })
            }
        }
    }

    /// End the session with whichever provider connected (the injected one if
    /// none is known). Provider errors are logged and swallowed.
    pub async fn disconnect(&self) {
        let via = {
            let mut guard = lock(&self.status);
            let via = match &guard.state {
                ConnectionState::Connected { via, .. } => Some(*via),
                _ => None,
            };
            guard.state = ConnectionState::Disconnected;
            via
        };

        let provider = match via {
            Some(ConnectMethod::Qr) => &self.bridge,
            Some(ConnectMethod::Extension) | None => &self.injected,
        };
        if let Err(e) = provider.disconnect().await {
            tracing::warn!(provider = provider.name(), error = %e, "wallet disconnect failed");
        }
    }
}
