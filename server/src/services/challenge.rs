//! Wallet-signature login challenges.
//!
//! ARCHITECTURE
//! ============
//! `GET /api/auth/challenge` hands out a random nonce and the exact message
//! the wallet must sign. `POST /api/auth/verify` checks an ed25519 signature
//! over that message against the public key embedded in the Algorand address.
//!
//! TRADE-OFFS
//! ==========
//! Nonces live in process memory with a TTL and are consumed on the first
//! verification attempt, successful or not. A restart invalidates every
//! outstanding challenge.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use rand::Rng;
use records::{AddressError, ChallengeResponse, decode_address};

const NONCE_BYTES: usize = 16;
const MESSAGE_PREFIX: &str = "HosConnect login nonce: ";

#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("unknown or expired nonce")]
    UnknownNonce,
    #[error("invalid address: {0}")]
    Address(#[from] AddressError),
    #[error("signature is not valid base64")]
    SignatureEncoding,
    #[error("signature does not verify")]
    InvalidSignature,
}

/// Message a wallet signs for `nonce`.
#[must_use]
pub fn challenge_message(nonce: &str) -> String {
    format!("{MESSAGE_PREFIX}{nonce}")
}

/// Random URL-safe nonce (16 bytes, unpadded base64).
#[must_use]
pub fn generate_nonce() -> String {
    let bytes: [u8; NONCE_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Outstanding nonces and their expiry instants.
#[derive(Clone)]
pub struct ChallengeStore {
    inner: Arc<Mutex<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl ChallengeStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    /// Issue a fresh challenge, dropping any expired ones.
    #[must_use]
    pub fn issue(&self) -> ChallengeResponse {
        let nonce = generate_nonce();
        let now = Instant::now();
        let mut pending = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|_, expires_at| *expires_at > now);
        pending.insert(nonce.clone(), now + self.ttl);
        ChallengeResponse { message_to_sign: challenge_message(&nonce), nonce }
    }

    /// Remove `nonce`, returning whether it was outstanding and unexpired.
    pub fn consume(&self, nonce: &str) -> bool {
        let mut pending = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        pending
            .remove(nonce)
            .is_some_and(|expires_at| expires_at > Instant::now())
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Consume `nonce` and verify `signature_b64` over its challenge message.
    ///
    /// # Errors
    ///
    /// Returns [`ChallengeError`] if the nonce is unknown or expired, or the
    /// signature does not verify against `address`.
    pub fn verify(&self, address: &str, signature_b64: &str, nonce: &str) -> Result<(), ChallengeError> {
        if !self.consume(nonce) {
            return Err(ChallengeError::UnknownNonce);
        }
        verify_signature(address, signature_b64, &challenge_message(nonce))
    }
}

/// Verify an ed25519 signature over `message` by the owner of `address`.
///
/// # Errors
///
/// Returns [`ChallengeError`] if the address or signature cannot be decoded,
/// or the signature does not verify.
pub fn verify_signature(address: &str, signature_b64: &str, message: &str) -> Result<(), ChallengeError> {
    let public_key = decode_address(address)?;
    let key = VerifyingKey::from_bytes(&public_key).map_err(|_| ChallengeError::InvalidSignature)?;
    let raw = STANDARD
        .decode(signature_b64.trim())
        .map_err(|_| ChallengeError::SignatureEncoding)?;
    let signature = Signature::from_slice(&raw).map_err(|_| ChallengeError::InvalidSignature)?;
    key.verify(message.as_bytes(), &signature)
        .map_err(|_| ChallengeError::InvalidSignature)
}

#[cfg(test)]
#[path = "challenge_test.rs"]
mod tests;
