//! `/api/medical` routes.
//!
//! DESIGN
//! ======
//! Write routes validate required fields first (400 with a fixed detail
//! text), then apply the change to the ledger and answer with a synthetic
//! transaction id `DEMO_<KIND>_<unix seconds>`. Read routes never fail:
//! unknown addresses report as unregistered.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::{Path, Query, State};
use records::{
    EmergencyPatient, EmergencyRecord, EmergencyResponse, GlobalStats, MAX_RATING, MIN_RATING, NearbyDoctor,
    PowRecord, PowResponse, RateDoctorRequest, RatingRecord, RatingResponse, RegisterDoctorRequest,
    RegisterPatientRequest, RegistrationResponse, SetEmergencyRequest, SubmitPowRequest, TestAccountsResponse,
    UserInfo,
};
use serde::Deserialize;

use super::error::{ApiError, ApiJson, require};
use crate::services::accounts::generate_test_accounts;
use crate::services::ledger::LedgerError;
use crate::state::AppState;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn transaction_id(kind: &str, timestamp: u64) -> String {
    format!("DEMO_{kind}_{timestamp}")
}

// =============================================================================
// REGISTRATION
// =============================================================================

pub async fn register_doctor(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterDoctorRequest>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    require(&body.name, "Name is required")?;
    require(&body.specialization, "Specialization is required")?;
    require(&body.wallet_address, "Wallet address is required")?;

    let user_info = state
        .ledger
        .write()
        .await
        .register_doctor(&body.wallet_address, body.name.trim(), body.specialization.trim())?;
    tracing::info!(address = %body.wallet_address, "doctor registered");

    Ok(Json(RegistrationResponse {
        success: true,
        transaction_id: transaction_id("TX", unix_now()),
        message: "Doctor registered successfully".into(),
        user_info,
    }))
}

pub async fn register_patient(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterPatientRequest>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    require(&body.name, "Name is required")?;
    require(&body.wallet_address, "Wallet address is required")?;

    let user_info = state
        .ledger
        .write()
        .await
        .register_patient(&body.wallet_address, body.name.trim())?;
    tracing::info!(address = %body.wallet_address, "patient registered");

    Ok(Json(RegistrationResponse {
        success: true,
        transaction_id: transaction_id("TX", unix_now()),
        message: "Patient registered successfully".into(),
        user_info,
    }))
}

// =============================================================================
// ACTIONS
// =============================================================================

pub async fn submit_pow(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitPowRequest>,
) -> Result<Json<PowResponse>, ApiError> {
    require(&body.doctor_address, "Doctor address is required")?;
    require(&body.patient_address, "Patient address is required")?;
    require(&body.treatment_description, "Treatment description is required")?;

    let timestamp = unix_now();
    let pow_id = state.ledger.write().await.submit_pow(
        &body.doctor_address,
        &body.patient_address,
        &body.treatment_description,
        timestamp,
    )?;
    tracing::info!(doctor = %body.doctor_address, pow_id, "proof of work recorded");

    Ok(Json(PowResponse {
        success: true,
        transaction_id: transaction_id("POW", timestamp),
        message: "Proof of work submitted successfully".into(),
        pow_data: PowRecord {
            doctor_address: body.doctor_address,
            patient_address: body.patient_address,
            treatment_description: body.treatment_description,
            medications: body.medications,
            follow_up_required: body.follow_up_required,
            follow_up_date: body.follow_up_date,
            timestamp,
        },
    }))
}

pub async fn submit_rating(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RateDoctorRequest>,
) -> Result<Json<RatingResponse>, ApiError> {
    require(&body.patient_address, "Patient address is required")?;
    require(&body.doctor_address, "Doctor address is required")?;
    if !(MIN_RATING..=MAX_RATING).contains(&body.rating) {
        return Err(LedgerError::InvalidRating(body.rating).into());
    }

    state
        .ledger
        .write()
        .await
        .rate_doctor(&body.patient_address, &body.doctor_address, body.rating)?;
    tracing::info!(doctor = %body.doctor_address, rating = body.rating, "doctor rated");

    let timestamp = unix_now();
    Ok(Json(RatingResponse {
        success: true,
        transaction_id: transaction_id("RATING", timestamp),
        message: "Rating submitted successfully".into(),
        rating_data: RatingRecord {
            patient_address: body.patient_address,
            doctor_address: body.doctor_address,
            rating: body.rating,
            comment: body.comment,
            timestamp,
        },
    }))
}

pub async fn set_emergency(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetEmergencyRequest>,
) -> Result<Json<EmergencyResponse>, ApiError> {
    require(&body.patient_address, "Patient address is required")?;

    state
        .ledger
        .write()
        .await
        .set_emergency(&body.patient_address, body.emergency_status)?;
    tracing::info!(patient = %body.patient_address, emergency = body.emergency_status, "emergency status set");

    let timestamp = unix_now();
    Ok(Json(EmergencyResponse {
        success: true,
        transaction_id: transaction_id("EMERGENCY", timestamp),
        message: format!("Emergency status set to {}", body.emergency_status),
        emergency_data: EmergencyRecord {
            patient_address: body.patient_address,
            emergency_status: body.emergency_status,
            timestamp,
        },
    }))
}

// =============================================================================
// READS
// =============================================================================

pub async fn user_info(State(state): State<AppState>, Path(address): Path<String>) -> Json<UserInfo> {
    Json(state.ledger.read().await.user_info(&address))
}

pub async fn stats(State(state): State<AppState>) -> Json<GlobalStats> {
    Json(state.ledger.read().await.stats())
}

pub async fn emergency_patients(State(state): State<AppState>) -> Json<Vec<EmergencyPatient>> {
    Json(state.ledger.read().await.emergency_patients())
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub location: Option<String>,
}

pub async fn nearby_doctors(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Json<Vec<NearbyDoctor>> {
    Json(state.ledger.read().await.nearby_doctors(query.location.as_deref()))
}

pub async fn test_accounts() -> Json<TestAccountsResponse> {
    Json(TestAccountsResponse { success: true, accounts: generate_test_accounts() })
}

#[cfg(test)]
#[path = "medical_test.rs"]
mod tests;
