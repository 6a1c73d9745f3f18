//! Shared records for the HosConnect API.
//!
//! This crate owns the JSON shapes exchanged between `server` and `client`,
//! the persisted session `User` record, and the Algorand address codec used
//! by both sides to validate wallet addresses. Field names serialize exactly
//! as the dashboard expects them on the wire.

pub mod address;
pub mod medical;
pub mod network;
pub mod user;

pub use address::{AddressError, decode_address, encode_address, format_address, is_valid_address};
pub use medical::*;
pub use network::{Network, NetworkError};
pub use user::{Role, User, UserPatch};
