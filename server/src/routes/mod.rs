//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the health check, the wallet-signature login routes, and
//! the `/api/medical` routes under a single Axum router. CORS follows the
//! configured origin list; `*` opens it to any origin without credentials.

pub mod auth;
pub mod error;
pub mod medical;

use axum::Json;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use records::HealthResponse;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/challenge", get(auth::challenge))
        .route("/api/auth/verify", post(auth::verify))
        .route("/api/medical/register/doctor", post(medical::register_doctor))
        .route("/api/medical/register/patient", post(medical::register_patient))
        .route("/api/medical/pow/submit", post(medical::submit_pow))
        .route("/api/medical/rating/submit", post(medical::submit_rating))
        .route("/api/medical/emergency/set", post(medical::set_emergency))
        .route("/api/medical/user/{address}", get(medical::user_info))
        .route("/api/medical/stats", get(medical::stats))
        .route("/api/medical/emergency/patients", get(medical::emergency_patients))
        .route("/api/medical/doctors/nearby", get(medical::nearby_doctors))
        .route("/api/medical/test-accounts", get(medical::test_accounts))
        .layer(cors_layer(settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".into() })
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
