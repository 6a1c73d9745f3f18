use super::*;
use ed25519_dalek::{Signer, SigningKey};
use records::encode_address;

fn signer() -> (SigningKey, String) {
    let key = SigningKey::from_bytes(&[7_u8; 32]);
    let address = encode_address(&key.verifying_key().to_bytes());
    (key, address)
}

fn sign_b64(key: &SigningKey, message: &str) -> String {
    STANDARD.encode(key.sign(message.as_bytes()).to_bytes())
}

#[test]
fn message_embeds_nonce() {
    assert_eq!(challenge_message("abc"), "HosConnect login nonce: abc");
}

#[test]
fn nonce_is_url_safe_and_unique() {
    let a = generate_nonce();
    let b = generate_nonce();
    assert_eq!(a.len(), 22);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert_ne!(a, b);
}

#[test]
fn issued_challenge_verifies_once() {
    let store = ChallengeStore::new(Duration::from_secs(60));
    let (key, address) = signer();
    let challenge = store.issue();
    assert_eq!(store.pending(), 1);

    let signature = sign_b64(&key, &challenge.message_to_sign);
    store.verify(&address, &signature, &challenge.nonce).unwrap();
    assert_eq!(store.pending(), 0);

    let replay = store.verify(&address, &signature, &challenge.nonce);
    assert!(matches!(replay, Err(ChallengeError::UnknownNonce)));
}

#[test]
fn unknown_nonce_is_rejected() {
    let store = ChallengeStore::new(Duration::from_secs(60));
    let (key, address) = signer();
    let signature = sign_b64(&key, &challenge_message("made-up"));
    assert!(matches!(store.verify(&address, &signature, "made-up"), Err(ChallengeError::UnknownNonce)));
}

#[test]
fn expired_nonce_is_rejected() {
    let store = ChallengeStore::new(Duration::ZERO);
    let challenge = store.issue();
    assert!(!store.consume(&challenge.nonce));
}

#[test]
fn signature_from_other_key_fails() {
    let (_, address) = signer();
    let other = SigningKey::from_bytes(&[9_u8; 32]);
    let message = challenge_message("n");
    let err = verify_signature(&address, &sign_b64(&other, &message), &message).unwrap_err();
    assert!(matches!(err, ChallengeError::InvalidSignature));
}

#[test]
fn signature_over_other_message_fails() {
    let (key, address) = signer();
    let signature = sign_b64(&key, &challenge_message("one"));
    assert!(verify_signature(&address, &signature, &challenge_message("two")).is_err());
}

#[test]
fn malformed_inputs_are_classified() {
    let (key, address) = signer();
    let message = challenge_message("n");
    assert!(matches!(
        verify_signature("DEMO_PATIENT_1", &sign_b64(&key, &message), &message),
        Err(ChallengeError::Address(_))
    ));
    assert!(matches!(
        verify_signature(&address, "%%%not-base64%%%", &message),
        Err(ChallengeError::SignatureEncoding)
    ));
    assert!(matches!(
        verify_signature(&address, &STANDARD.encode([1_u8; 10]), &message),
        Err(ChallengeError::InvalidSignature)
    ));
}
