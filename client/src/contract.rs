//! Medical-connect smart contract service.
//!
//! DESIGN
//! ======
//! [`MedicalContract`] is the seam the session layer calls for on-chain
//! actions. The only implementation, [`DemoContract`], submits nothing: every
//! write waits a fixed delay and returns a fabricated `DEMO_TX_` id, and
//! reads return fixed demo records. Swapping in a real contract client means
//! implementing the trait; callers do not change.

#[cfg(test)]
#[path = "contract_test.rs"]
mod contract_test;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use records::{GlobalStats, MAX_RATING, MIN_RATING, USER_TYPE_DOCTOR, UserInfo};

pub const DEFAULT_CALL_DELAY: Duration = Duration::from_secs(1);
pub const TX_PREFIX: &str = "DEMO_TX_";
const TX_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("Rating must be between 1 and 5")]
    InvalidRating(i64),
    #[error("contract call failed: {0}")]
    Call(String),
}

/// Deployed application the service would target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    pub app_id: u64,
    pub app_address: String,
}

#[async_trait]
pub trait MedicalContract: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ContractError`] if the call fails.
    async fn register_doctor(&self, name: &str, specialization: &str) -> Result<String, ContractError>;

    /// # Errors
    ///
    /// Returns [`ContractError`] if the call fails.
    async fn register_patient(&self, name: &str) -> Result<String, ContractError>;

    /// # Errors
    ///
    /// Returns [`ContractError`] if the call fails.
    async fn submit_proof_of_work(&self, patient_address: &str, treatment: &str) -> Result<String, ContractError>;

    /// # Errors
    ///
    /// Returns [`ContractError::InvalidRating`] for ratings outside 1–5.
    async fn rate_doctor(&self, doctor_address: &str, rating: i64) -> Result<String, ContractError>;

    /// # Errors
    ///
    /// Returns [`ContractError`] if the call fails.
    async fn set_emergency_status(&self, emergency: bool) -> Result<String, ContractError>;

    async fn get_user_info(&self, address: &str) -> UserInfo;

    async fn get_global_stats(&self) -> GlobalStats;

    fn update_contract_config(&self, app_id: u64, app_address: &str);
}

/// `DEMO_TX_` followed by nine random lowercase base-36 characters.
#[must_use]
pub fn demo_transaction_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TX_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{TX_PREFIX}{suffix}")
}

#[derive(Debug)]
pub struct DemoContract {
    delay: Duration,
    config: Mutex<Option<ContractConfig>>,
}

impl Default for DemoContract {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_DELAY)
    }
}

impl DemoContract {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, config: Mutex::new(None) }
    }

    #[must_use]
    pub fn config(&self) -> Option<ContractConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn simulate(&self, call: &'static str) -> String {
        tokio::time::sleep(self.delay).await;
        let tx_id = demo_transaction_id();
        tracing::info!(call, %tx_id, "demo contract call");
        tx_id
    }
}

#[async_trait]
impl MedicalContract for DemoContract {
    async fn register_doctor(&self, name: &str, specialization: &str) -> Result<String, ContractError> {
        tracing::debug!(doctor = name, specialization, "registering doctor");
        Ok(self.simulate("register_doctor").await)
    }

    async fn register_patient(&self, name: &str) -> Result<String, ContractError> {
        tracing::debug!(patient = name, "registering patient");
        Ok(self.simulate("register_patient").await)
    }

    async fn submit_proof_of_work(&self, patient_address: &str, treatment: &str) -> Result<String, ContractError> {
        tracing::debug!(patient_address, treatment, "submitting proof of work");
        Ok(self.simulate("submit_proof_of_work").await)
    }

    async fn rate_doctor(&self, doctor_address: &str, rating: i64) -> Result<String, ContractError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ContractError::InvalidRating(rating));
        }
        tracing::debug!(doctor_address, rating, "rating doctor");
        Ok(self.simulate("rate_doctor").await)
    }

    async fn set_emergency_status(&self, emergency: bool) -> Result<String, ContractError> {
        tracing::debug!(emergency, "setting emergency status");
        Ok(self.simulate("set_emergency_status").await)
    }

    async fn get_user_info(&self, address: &str) -> UserInfo {
        UserInfo {
            address: address.to_owned(),
            user_type: USER_TYPE_DOCTOR,
            name: "Demo User".into(),
            specialization: Some("General Practice".into()),
            rating_sum: 20,
            rating_count: 5,
            consultations_count: 10,
            emergency_status: 0,
            registered: true,
        }
    }

    async fn get_global_stats(&self) -> GlobalStats {
        GlobalStats { total_doctors: 5, total_patients: 20, total_consultations: 50, owner: "DEMO_OWNER".into() }
    }

    fn update_contract_config(&self, app_id: u64, app_address: &str) {
        tracing::info!(app_id, app_address, "contract configuration updated");
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(ContractConfig { app_id, app_address: app_address.to_owned() });
    }
}
