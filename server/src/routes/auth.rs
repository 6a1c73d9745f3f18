//! Wallet-signature login routes.
//!
//! `GET /api/auth/challenge` issues a nonce; `POST /api/auth/verify` checks
//! the wallet's signature over it. Verification does not mint a session:
//! the dashboard keeps its own session record client-side.

use axum::Json;
use axum::extract::State;
use records::{ChallengeResponse, VerifyRequest, VerifyResponse};

use super::error::{ApiError, ApiJson};
use crate::state::AppState;

pub async fn challenge(State(state): State<AppState>) -> Json<ChallengeResponse> {
    Json(state.challenges.issue())
}

pub async fn verify(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    state
        .challenges
        .verify(&body.address, &body.signature_b64, &body.nonce)?;
    tracing::info!(address = %body.address, "wallet signature verified");
    Ok(Json(VerifyResponse { ok: true }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
