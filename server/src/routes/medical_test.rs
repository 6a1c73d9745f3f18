use super::super::test_support::{get, post_json, router, send};
use crate::state::test_helpers::{empty_app_state, test_app_state};
use axum::http::StatusCode;
use records::is_valid_address;
use serde_json::{Value, json};

fn assert_detail(response: &(StatusCode, Value), status: StatusCode, detail: &str) {
    assert_eq!(response.0, status);
    assert_eq!(response.1["detail"], detail);
}

// =============================================================================
// registration
// =============================================================================

#[tokio::test]
async fn register_doctor_returns_user_info() {
    let state = empty_app_state();
    let payload = json!({"name": "Dr. Who", "specialization": "Cardiology", "wallet_address": "W1"});
    let (status, body) = send(router(state.clone()), post_json("/api/medical/register/doctor", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Doctor registered successfully");
    assert!(body["transaction_id"].as_str().unwrap().starts_with("DEMO_TX_"));
    assert_eq!(body["user_info"]["user_type"], 1);
    assert_eq!(body["user_info"]["specialization"], "Cardiology");
    assert_eq!(body["user_info"]["registered"], true);
    assert_eq!(state.ledger.read().await.stats().total_doctors, 1);
}

#[tokio::test]
async fn register_doctor_validates_fields_in_order() {
    let cases = [
        (json!({"name": " ", "specialization": "", "wallet_address": ""}), "Name is required"),
        (json!({"name": "A", "specialization": "", "wallet_address": ""}), "Specialization is required"),
        (json!({"name": "A", "specialization": "GP", "wallet_address": ""}), "Wallet address is required"),
    ];
    for (payload, detail) in cases {
        let response = send(router(empty_app_state()), post_json("/api/medical/register/doctor", &payload)).await;
        assert_detail(&response, StatusCode::BAD_REQUEST, detail);
    }
}

#[tokio::test]
async fn register_patient_then_again_conflicts() {
    let state = empty_app_state();
    let payload = json!({"name": "Pat", "wallet_address": "W2"});

    let (status, body) = send(router(state.clone()), post_json("/api/medical/register/patient", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_info"]["user_type"], 2);
    assert!(body["user_info"].get("specialization").is_none());

    let response = send(router(state), post_json("/api/medical/register/patient", &payload)).await;
    assert_detail(&response, StatusCode::CONFLICT, "Account already registered");
}

#[tokio::test]
async fn missing_body_field_is_unprocessable_with_detail() {
    let response = send(router(empty_app_state()), post_json("/api/medical/register/patient", &json!({"name": "x"}))).await;
    assert_eq!(response.0, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = response.1["detail"].as_str().unwrap();
    assert!(detail.contains("wallet_address"), "{detail}");
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_detail() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/medical/rating/submit")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = send(router(test_app_state()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn freshly_registered_wallet_can_rate() {
    let state = test_app_state();
    let account = crate::services::accounts::generate_test_account();
    let registration = json!({"name": "New Patient", "wallet_address": account.address});
    let (status, _) = send(router(state.clone()), post_json("/api/medical/register/patient", &registration)).await;
    assert_eq!(status, StatusCode::OK);

    let rating = json!({"patient_address": account.address, "doctor_address": "DEMO_DOCTOR_1", "rating": 4});
    let (status, body) = send(router(state), post_json("/api/medical/rating/submit", &rating)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

// =============================================================================
// actions
// =============================================================================

#[tokio::test]
async fn pow_by_demo_doctor_is_recorded() {
    let state = test_app_state();
    let payload = json!({
        "doctor_address": "DEMO_DOCTOR_1",
        "patient_address": "DEMO_PATIENT_1",
        "treatment_description": "Stitches",
        "medications": "Ibuprofen",
    });
    let (status, body) = send(router(state.clone()), post_json("/api/medical/pow/submit", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["transaction_id"].as_str().unwrap().starts_with("DEMO_POW_"));
    assert_eq!(body["pow_data"]["medications"], "Ibuprofen");
    assert_eq!(body["pow_data"]["follow_up_required"], false);
    assert_eq!(state.ledger.read().await.stats().total_consultations, 501);
}

#[tokio::test]
async fn pow_validation_and_role_errors() {
    let blank = json!({"doctor_address": "D", "patient_address": "P", "treatment_description": "  "});
    let response = send(router(test_app_state()), post_json("/api/medical/pow/submit", &blank)).await;
    assert_detail(&response, StatusCode::BAD_REQUEST, "Treatment description is required");

    let by_patient = json!({"doctor_address": "DEMO_PATIENT_1", "patient_address": "P", "treatment_description": "x"});
    let response = send(router(test_app_state()), post_json("/api/medical/pow/submit", &by_patient)).await;
    assert_detail(&response, StatusCode::BAD_REQUEST, "Only registered doctors can submit proof of work");
}

#[tokio::test]
async fn rating_out_of_range_is_rejected() {
    for rating in [0, 6] {
        let payload = json!({"patient_address": "DEMO_PATIENT_1", "doctor_address": "DEMO_DOCTOR_1", "rating": rating});
        let response = send(router(test_app_state()), post_json("/api/medical/rating/submit", &payload)).await;
        assert_detail(&response, StatusCode::BAD_REQUEST, "Rating must be between 1 and 5");
    }
}

#[tokio::test]
async fn rating_updates_doctor_average() {
    let state = test_app_state();
    let payload = json!({
        "patient_address": "DEMO_PATIENT_2",
        "doctor_address": "DEMO_DOCTOR_3",
        "rating": 5,
        "comment": "Great",
    });
    let (status, body) = send(router(state.clone()), post_json("/api/medical/rating/submit", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating_data"]["comment"], "Great");

    let (_, info) = send(router(state), get("/api/medical/user/DEMO_DOCTOR_3")).await;
    assert_eq!(info["rating_sum"], 54);
    assert_eq!(info["rating_count"], 11);
}

#[tokio::test]
async fn rating_requires_addresses() {
    let payload = json!({"patient_address": "", "doctor_address": "D", "rating": 3});
    let response = send(router(test_app_state()), post_json("/api/medical/rating/submit", &payload)).await;
    assert_detail(&response, StatusCode::BAD_REQUEST, "Patient address is required");
}

#[tokio::test]
async fn emergency_toggle_changes_patient_list() {
    let state = test_app_state();
    let payload = json!({"patient_address": "DEMO_PATIENT_1", "emergency_status": false});
    let (status, body) = send(router(state.clone()), post_json("/api/medical/emergency/set", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Emergency status set to false");
    assert!(body["transaction_id"].as_str().unwrap().starts_with("DEMO_EMERGENCY_"));

    let (_, patients) = send(router(state), get("/api/medical/emergency/patients")).await;
    let names: Vec<_> = patients.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
    assert_eq!(names, vec![json!("Jane Smith")]);
}

// =============================================================================
// reads
// =============================================================================

#[tokio::test]
async fn unknown_user_is_unregistered() {
    let (status, body) = send(router(test_app_state()), get("/api/medical/user/SOMEONE")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_type"], 0);
    assert_eq!(body["registered"], false);
}

#[tokio::test]
async fn stats_reflect_demo_seed() {
    let (_, body) = send(router(test_app_state()), get("/api/medical/stats")).await;
    assert_eq!(
        body,
        json!({"total_doctors": 3, "total_patients": 2, "total_consultations": 500, "owner": "DEMO_OWNER"})
    );
}

#[tokio::test]
async fn nearby_doctors_filter_by_location() {
    let (_, all) = send(router(test_app_state()), get("/api/medical/doctors/nearby")).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, queens) = send(router(test_app_state()), get("/api/medical/doctors/nearby?location=queens")).await;
    let queens = queens.as_array().unwrap();
    assert_eq!(queens.len(), 1);
    assert_eq!(queens[0]["name"], "Dr. Carol Davis");
    assert_eq!(queens[0]["rating"], 4.9);
}

#[tokio::test]
async fn test_accounts_are_fresh_keypairs() {
    let (status, body) = send(router(test_app_state()), get("/api/medical/test-accounts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    for role in ["doctor", "patient"] {
        assert!(is_valid_address(body["accounts"][role]["address"].as_str().unwrap()));
        assert_eq!(body["accounts"][role]["mnemonic"], "");
    }
}
