//! Algorand address codec.
//!
//! An address is the unpadded base32 encoding of a 32-byte ed25519 public key
//! followed by a 4-byte checksum (the last four bytes of the SHA-512/256
//! digest of the key), 58 characters in total.

use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};

pub const ADDRESS_LEN: usize = 58;
pub const PUBLIC_KEY_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;

/// Error returned by [`decode_address`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must be {ADDRESS_LEN} characters, got {0}")]
    Length(usize),
    #[error("address is not valid base32")]
    Encoding,
    #[error("address checksum mismatch")]
    Checksum,
}

fn checksum(public_key: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha512_256::digest(public_key);
    let mut out = [0_u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

/// Encode a public key as an Algorand address.
#[must_use]
pub fn encode_address(public_key: &[u8; PUBLIC_KEY_LEN]) -> String {
    let mut raw = Vec::with_capacity(PUBLIC_KEY_LEN + CHECKSUM_LEN);
    raw.extend_from_slice(public_key);
    raw.extend_from_slice(&checksum(public_key));
    BASE32_NOPAD.encode(&raw)
}

/// Decode an Algorand address into its public key, verifying the checksum.
///
/// # Errors
///
/// Returns [`AddressError`] if the address has the wrong length, is not valid
/// base32, or carries a checksum that does not match the key.
pub fn decode_address(address: &str) -> Result<[u8; PUBLIC_KEY_LEN], AddressError> {
    if address.len() != ADDRESS_LEN {
        return Err(AddressError::Length(address.len()));
    }
    let raw = BASE32_NOPAD
        .decode(address.as_bytes())
        .map_err(|_| AddressError::Encoding)?;
    if raw.len() != PUBLIC_KEY_LEN + CHECKSUM_LEN {
        return Err(AddressError::Encoding);
    }

    let (key, sum) = raw.split_at(PUBLIC_KEY_LEN);
    if checksum(key) != sum {
        return Err(AddressError::Checksum);
    }

    let mut public_key = [0_u8; PUBLIC_KEY_LEN];
    public_key.copy_from_slice(key);
    Ok(public_key)
}

#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Shorten an address for display: first six characters, `...`, last four.
///
/// Short values (ten characters or fewer) are returned whole.
#[must_use]
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
#[path = "address_test.rs"]
mod tests;
