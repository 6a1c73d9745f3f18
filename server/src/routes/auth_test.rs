use super::super::test_support::{get, post_json, router, send};
use crate::state::test_helpers::test_app_state;
use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signer, SigningKey};
use records::encode_address;
use serde_json::json;

fn wallet() -> (SigningKey, String) {
    let key = SigningKey::from_bytes(&[42_u8; 32]);
    let address = encode_address(&key.verifying_key().to_bytes());
    (key, address)
}

#[tokio::test]
async fn challenge_returns_message_with_nonce() {
    let (status, body) = send(router(test_app_state()), get("/api/auth/challenge")).await;
    assert_eq!(status, StatusCode::OK);
    let nonce = body["nonce"].as_str().unwrap();
    assert_eq!(body["message_to_sign"], format!("HosConnect login nonce: {nonce}"));
}

#[tokio::test]
async fn signed_challenge_verifies_once() {
    let state = test_app_state();
    let (key, address) = wallet();

    let (_, challenge) = send(router(state.clone()), get("/api/auth/challenge")).await;
    let message = challenge["message_to_sign"].as_str().unwrap();
    let payload = json!({
        "address": address,
        "signature_b64": STANDARD.encode(key.sign(message.as_bytes()).to_bytes()),
        "nonce": challenge["nonce"],
    });

    let (status, body) = send(router(state.clone()), post_json("/api/auth/verify", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (status, body) = send(router(state), post_json("/api/auth/verify", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid signature");
}

#[tokio::test]
async fn bad_signature_is_rejected() {
    let state = test_app_state();
    let (_, address) = wallet();
    let (_, challenge) = send(router(state.clone()), get("/api/auth/challenge")).await;
    let payload = json!({
        "address": address,
        "signature_b64": STANDARD.encode([0_u8; 64]),
        "nonce": challenge["nonce"],
    });

    let (status, body) = send(router(state), post_json("/api/auth/verify", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid signature");
}
