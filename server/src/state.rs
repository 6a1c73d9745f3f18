//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the demo ledger behind an async `RwLock` and the outstanding
//! login challenges. Both are cheap to clone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::Settings;
use crate::services::challenge::ChallengeStore;
use crate::services::ledger::Ledger;
use crate::services::seed::demo_ledger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub challenges: ChallengeStore,
}

impl AppState {
    /// State seeded with the demo accounts.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_ledger(demo_ledger(), Duration::from_secs(settings.challenge_ttl_secs))
    }

    #[must_use]
    pub fn with_ledger(ledger: Ledger, challenge_ttl: Duration) -> Self {
        Self { ledger: Arc::new(RwLock::new(ledger)), challenges: ChallengeStore::new(challenge_ttl) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
