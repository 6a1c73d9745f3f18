//! # client
//!
//! Client library behind the HosConnect dashboards.
//!
//! This crate contains the session state (`state::auth`), the wallet-connect
//! fallback flow, the demo smart-contract service, the typed HTTP client for
//! the API service, the light/dark palette, and the list filtering the
//! doctor and patient dashboards use. Front ends (the CLI) own an
//! [`state::auth::AuthContext`] and drive it one operation at a time.

pub mod contract;
pub mod net;
pub mod state;
pub mod storage;
pub mod util;
pub mod wallet;
