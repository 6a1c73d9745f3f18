//! Session state for the signed-in user.
//!
//! DESIGN
//! ======
//! [`AuthContext`] is owned by the front end and borrowed mutably for each
//! operation. The current [`User`] lives in memory and, serialized as JSON,
//! under the `medicalConnectUser` key of a [`KeyValueStore`]. Every mutation
//! writes the whole record back; logout deletes the key.
//!
//! ERROR HANDLING
//! ==============
//! A stored record that fails to parse is logged and discarded rather than
//! failing startup. Wallet disconnect failures are logged and never block
//! logout. Contract registration failures abort login before anything is
//! persisted.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use records::{Role, User, UserPatch};

use super::login::{FormError, LoginForm};
use crate::contract::{ContractError, MedicalContract};
use crate::storage::{KeyValueStore, StoreError};
use crate::wallet::{ConnectError, ConnectMethod, WalletConnector};

pub const USER_STORAGE_KEY: &str = "medicalConnectUser";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Wallet(#[from] ConnectError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode user record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Shared "operation in progress" flag. Clones observe the same value.
#[derive(Clone, Debug, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn hold(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.clone())
    }
}

/// Clears the flag when the operation ends, including on early return.
struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::SeqCst);
    }
}

pub struct AuthContext {
    store: Box<dyn KeyValueStore>,
    wallet: WalletConnector,
    contract: Arc<dyn MedicalContract>,
    user: Option<User>,
    loading: LoadingFlag,
}

impl AuthContext {
    /// Context with no user. Call [`AuthContext::load`] to restore a session.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>, wallet: WalletConnector, contract: Arc<dyn MedicalContract>) -> Self {
        Self { store, wallet, contract, user: None, loading: LoadingFlag::default() }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|u| u.role)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Handle for observing the loading flag from elsewhere.
    #[must_use]
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    #[must_use]
    pub fn wallet(&self) -> &WalletConnector {
        &self.wallet
    }

    #[must_use]
    pub fn contract(&self) -> &Arc<dyn MedicalContract> {
        &self.contract
    }

    #[must_use]
    pub fn is_wallet_connected(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.wallet_connected)
    }

    /// Restore the stored user, if any. An unparseable record is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the store cannot be read.
    pub fn load(&mut self) -> Result<Option<&User>, AuthError> {
        self.user = match self.store.get(USER_STORAGE_KEY)? {
            None => None,
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::error!(error = %e, "failed to parse saved user, discarding");
                    self.store.remove(USER_STORAGE_KEY)?;
                    None
                }
            },
        };
        Ok(self.user.as_ref())
    }

    /// Sign in with the form's role and profile.
    ///
    /// The user is merged over any existing record and marked registered.
    /// With `register`, the role is first registered on the contract and the
    /// transaction id is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Form`] for an incomplete form,
    /// [`AuthError::Contract`] if registration fails, or a store error.
    pub async fn login(&mut self, form: &LoginForm, register: bool) -> Result<Option<String>, AuthError> {
        let credentials = form.validate()?;
        let _loading = self.loading.hold();

        let transaction_id = if register {
            let tx_id = match (credentials.role, credentials.specialization.as_deref()) {
                (Role::Doctor, Some(specialization)) => {
                    self.contract
                        .register_doctor(&credentials.name, specialization)
                        .await?
                }
                (Role::Doctor, None) => return Err(FormError::MissingSpecialization.into()),
                (Role::Patient, _) => self.contract.register_patient(&credentials.name).await?,
            };
            Some(tx_id)
        } else {
            None
        };

        let mut user = self.user.clone().unwrap_or_default();
        user.apply(UserPatch {
            role: Some(credentials.role),
            name: Some(credentials.name),
            specialization: credentials.specialization,
            email: None,
            is_registered: Some(true),
        });
        if credentials.role == Role::Patient {
            user.specialization = None;
        }

        self.persist(&user)?;
        tracing::info!(role = credentials.role.as_str(), "user logged in");
        self.user = Some(user);
        Ok(transaction_id)
    }

    /// Disconnect the wallet if connected, then forget the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the stored record cannot be deleted.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        let _loading = self.loading.hold();
        if self.is_wallet_connected() {
            self.disconnect_wallet().await;
        }
        self.store.remove(USER_STORAGE_KEY)?;
        self.user = None;
        tracing::info!("user logged out");
        Ok(())
    }

    /// Merge `patch` into the current user and persist. No-op without a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn update_user(&mut self, patch: UserPatch) -> Result<(), AuthError> {
        let Some(mut user) = self.user.clone() else {
            return Ok(());
        };
        user.apply(patch);
        self.persist(&user)?;
        self.user = Some(user);
        Ok(())
    }

    /// Connect a wallet and record its address on the current user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Wallet`] with the categorized connect failure, or
    /// a store error if the updated user cannot be persisted.
    pub async fn connect_wallet(&mut self, method: ConnectMethod) -> Result<String, AuthError> {
        let address = self.wallet.connect(method).await?;
        if let Some(mut user) = self.user.clone() {
            user.address = Some(address.clone());
            user.wallet_connected = true;
            self.persist(&user)?;
            self.user = Some(user);
        }
        Ok(address)
    }

    /// Disconnect the wallet and clear the address. Failures are logged.
    pub async fn disconnect_wallet(&mut self) {
        self.wallet.disconnect().await;
        if let Some(mut user) = self.user.clone() {
            user.address = None;
            user.wallet_connected = false;
            if let Err(e) = self.persist(&user) {
                tracing::warn!(error = %e, "failed to persist wallet disconnect");
            }
            self.user = Some(user);
        }
    }

    fn persist(&self, user: &User) -> Result<(), AuthError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_STORAGE_KEY, &raw)?;
        Ok(())
    }
}
