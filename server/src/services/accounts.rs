//! Throwaway keypairs for local testing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::SigningKey;
use rand::Rng;
use records::{TestAccount, TestAccounts, encode_address};

/// Generate one fresh ed25519 account.
///
/// `private_key` is the 64-byte secret key (seed then public key) in standard
/// base64. No mnemonic is derived.
#[must_use]
pub fn generate_test_account() -> TestAccount {
    let seed: [u8; 32] = rand::rng().random();
    let signing = SigningKey::from_bytes(&seed);
    TestAccount {
        address: encode_address(&signing.verifying_key().to_bytes()),
        private_key: STANDARD.encode(signing.to_keypair_bytes()),
        mnemonic: String::new(),
    }
}

#[must_use]
pub fn generate_test_accounts() -> TestAccounts {
    TestAccounts { doctor: generate_test_account(), patient: generate_test_account() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Signer;
    use records::is_valid_address;

    #[test]
    fn account_address_matches_private_key() {
        let account = generate_test_account();
        assert!(is_valid_address(&account.address));
        assert!(account.mnemonic.is_empty());

        let raw = STANDARD.decode(&account.private_key).unwrap();
        let keypair: [u8; 64] = raw.try_into().unwrap();
        let signing = SigningKey::from_keypair_bytes(&keypair).unwrap();
        assert_eq!(encode_address(&signing.verifying_key().to_bytes()), account.address);

        let message = crate::services::challenge::challenge_message("n");
        let signature = STANDARD.encode(signing.sign(message.as_bytes()).to_bytes());
        crate::services::challenge::verify_signature(&account.address, &signature, &message).unwrap();
    }

    #[test]
    fn doctor_and_patient_differ() {
        let accounts = generate_test_accounts();
        assert_ne!(accounts.doctor.address, accounts.patient.address);
    }
}
