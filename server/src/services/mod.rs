//! Domain services behind the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Routes stay thin: they validate request shape, then delegate here.
//! `ledger` applies the medical-connect contract rules, `challenge` owns the
//! wallet-signature login flow, `accounts` mints development keypairs, and
//! `seed` loads the demo doctors and patients.

pub mod accounts;
pub mod challenge;
pub mod ledger;
pub mod seed;
