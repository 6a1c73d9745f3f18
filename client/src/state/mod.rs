//! Client-side session and dashboard state.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth`, `login`, `directory`) so front ends
//! depend only on the pieces they render. None of these modules perform I/O
//! beyond the injected store, wallet, and contract seams.

pub mod auth;
pub mod directory;
pub mod login;
