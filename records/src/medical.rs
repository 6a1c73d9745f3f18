//! Request and response bodies for the `/api/medical` and `/api/auth` routes.

use serde::{Deserialize, Serialize};

pub const USER_TYPE_NONE: u8 = 0;
pub const USER_TYPE_DOCTOR: u8 = 1;
pub const USER_TYPE_PATIENT: u8 = 2;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub wallet_address: String,
}

/// Proof of work: a doctor's treatment record for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPowRequest {
    pub doctor_address: String,
    pub patient_address: String,
    pub treatment_description: String,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_date: Option<String>,
}

/// Rating is signed so that out-of-range values reach validation instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDoctorRequest {
    pub patient_address: String,
    pub doctor_address: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEmergencyRequest {
    pub patient_address: String,
    pub emergency_status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub address: String,
    pub signature_b64: String,
    pub nonce: String,
}

// =============================================================================
// RECORDS
// =============================================================================

/// Per-account contract state as reported by `GET /api/medical/user/{address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub address: String,
    pub user_type: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default)]
    pub rating_sum: u64,
    #[serde(default)]
    pub rating_count: u64,
    #[serde(default)]
    pub consultations_count: u64,
    #[serde(default)]
    pub emergency_status: u8,
    pub registered: bool,
}

impl UserInfo {
    /// Record for an address the contract has never seen.
    #[must_use]
    pub fn unregistered(address: &str) -> Self {
        Self {
            address: address.to_owned(),
            user_type: USER_TYPE_NONE,
            name: String::new(),
            specialization: None,
            rating_sum: 0,
            rating_count: 0,
            consultations_count: 0,
            emergency_status: 0,
            registered: false,
        }
    }

    /// Mean rating, `0.0` when unrated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_rating(&self) -> f64 {
        if self.rating_count == 0 {
            return 0.0;
        }
        self.rating_sum as f64 / self.rating_count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_doctors: u64,
    pub total_patients: u64,
    pub total_consultations: u64,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyPatient {
    pub address: String,
    pub name: String,
    pub emergency_status: u8,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyDoctor {
    pub address: String,
    pub name: String,
    pub specialization: String,
    pub rating: f64,
    pub location: String,
    pub consultations_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowRecord {
    pub doctor_address: String,
    pub patient_address: String,
    pub treatment_description: String,
    pub medications: Option<String>,
    pub follow_up_required: bool,
    pub follow_up_date: Option<String>,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub patient_address: String,
    pub doctor_address: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRecord {
    pub patient_address: String,
    pub emergency_status: bool,
    pub timestamp: u64,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
    pub user_info: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
    pub pow_data: PowRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
    pub rating_data: RatingRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
    pub emergency_data: EmergencyRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub message_to_sign: String,
    pub nonce: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub ok: bool,
}

/// Development keypair. `private_key` is base64 of the 32-byte seed followed
/// by the 32-byte public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAccount {
    pub address: String,
    pub private_key: String,
    pub mnemonic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAccounts {
    pub doctor: TestAccount,
    pub patient: TestAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAccountsResponse {
    pub success: bool,
    pub accounts: TestAccounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body returned by every failing route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
#[path = "medical_test.rs"]
mod tests;
